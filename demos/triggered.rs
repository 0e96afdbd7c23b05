extern crate bmp280_iio;
extern crate byteorder;
extern crate env_logger;

use std::time::{Duration, SystemTime};

use bmp280_iio::{AssembledBuffer, Bmp280, Channel, SampleSink, ScanMask, TriggerWorker};
use byteorder::{ByteOrder, NativeEndian};

/// Prints each sample as it arrives.
struct Printer {
    mask: ScanMask,
}

impl SampleSink for Printer {
    type Error = String;

    fn active_scan_mask(&self) -> ScanMask {
        self.mask
    }

    fn push(&mut self, sample: &AssembledBuffer, timestamp: SystemTime) -> Result<(), String> {
        let b = sample.as_bytes();
        let since = timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| e.to_string())?;
        println!(
            "{}.{:03}: {} centi-degC, {} Pa/256",
            since.as_secs(),
            since.subsec_millis(),
            NativeEndian::read_i32(&b[0..4]),
            NativeEndian::read_u32(&b[4..8])
        );
        Ok(())
    }

    fn notify_done(&mut self) {}
}

fn main() {
    env_logger::init();
    let bmp280 = Bmp280::open_default().expect("Couldn't open BMP280");
    let mask = ScanMask::empty()
        .with(Channel::TemperatureProcessed)
        .with(Channel::PressureProcessed);
    let (worker, trigger) =
        TriggerWorker::spawn(bmp280, Printer { mask }).expect("Couldn't start worker");
    for _ in 0..10 {
        trigger.fire();
        ::std::thread::sleep(Duration::from_secs(1));
    }
    drop(trigger);
    worker.join().expect("Worker panicked");
}
