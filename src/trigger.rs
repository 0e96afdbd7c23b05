//! Deferred trigger handling.
//!
//! Firing a trigger only records a timestamp and queues it, so it is safe
//! to call from contexts that must not block. The bus traffic happens on a
//! worker thread that owns the device and handles triggers one at a time,
//! in the order they were fired.
//!
//! The queue is bounded. Triggers fired while it is full are dropped, the
//! same way a busy hardware trigger skips events.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use log::{debug, trace, warn};

use crate::bmp280::Bmp280;
use crate::buffer::SampleSink;
use crate::bus::Bus;

/// Triggers that may wait behind the one being handled.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Cheap, cloneable handle used to fire triggers.
#[derive(Clone)]
pub struct TriggerHandle {
    tx: SyncSender<SystemTime>,
}

impl TriggerHandle {
    /// Queue a trigger stamped with the current time.
    ///
    /// Never blocks. Returns `false` if the trigger was dropped because the
    /// queue is full or the worker has gone away.
    pub fn fire(&self) -> bool {
        self.fire_at(SystemTime::now())
    }

    /// Queue a trigger with an explicit timestamp.
    pub fn fire_at(&self, timestamp: SystemTime) -> bool {
        match self.tx.try_send(timestamp) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("trigger queue full, dropping trigger");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Owns the thread that turns triggers into samples.
pub struct TriggerWorker<B, S> {
    thread: JoinHandle<(Bmp280<B>, S)>,
}

impl<B, S> TriggerWorker<B, S>
where
    B: Bus + Send + 'static,
    B::Error: fmt::Display,
    S: SampleSink + Send + 'static,
{
    /// Move `device` and `sink` onto a new worker thread.
    ///
    /// The worker runs until every [`TriggerHandle`] has been dropped.
    pub fn spawn(device: Bmp280<B>, sink: S) -> io::Result<(TriggerWorker<B, S>, TriggerHandle)> {
        TriggerWorker::with_queue_depth(device, sink, DEFAULT_QUEUE_DEPTH)
    }

    /// Like [`spawn`](TriggerWorker::spawn), with room for `depth` pending
    /// triggers. A depth of 0 is raised to 1.
    pub fn with_queue_depth(
        device: Bmp280<B>,
        sink: S,
        depth: usize,
    ) -> io::Result<(TriggerWorker<B, S>, TriggerHandle)> {
        let (tx, rx) = mpsc::sync_channel(depth.max(1));
        let thread = thread::Builder::new()
            .name("bmp280-trigger".to_string())
            .spawn(move || run(device, sink, rx))?;
        Ok((TriggerWorker { thread }, TriggerHandle { tx }))
    }

    /// Wait for the worker to drain its queue and hand back the device and
    /// sink. Drop all trigger handles first, or this never returns.
    pub fn join(self) -> thread::Result<(Bmp280<B>, S)> {
        self.thread.join()
    }
}

fn run<B, S>(mut device: Bmp280<B>, mut sink: S, rx: Receiver<SystemTime>) -> (Bmp280<B>, S)
where
    B: Bus,
    B::Error: fmt::Display,
    S: SampleSink,
{
    let mut count = 0u64;
    for timestamp in rx {
        count += 1;
        trace!("handling trigger #{}", count);
        if let Err(err) = device.handle_trigger(&mut sink, timestamp) {
            debug!("trigger #{} dropped: {}", count, err);
        }
    }
    debug!("trigger worker exiting after {} triggers", count);
    (device, sink)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::channel::{Channel, ScanMask};
    use crate::registers::REG_TEMP_MSB;
    use crate::testing::{FakeBus, RecordingSink};
    use crate::buffer::AssembledBuffer;
    use byteorder::{ByteOrder, NativeEndian};
    use std::sync::mpsc::Sender;
    use std::time::Duration;

    /// Blocks in `push` until the gate opens, reporting each entry.
    struct GatedSink {
        entered: Sender<()>,
        gate: Receiver<()>,
        pushed: usize,
        done: usize,
    }

    impl SampleSink for GatedSink {
        type Error = String;

        fn active_scan_mask(&self) -> ScanMask {
            ScanMask::empty().with(Channel::TemperatureProcessed)
        }

        fn push(&mut self, _sample: &AssembledBuffer, _timestamp: SystemTime) -> Result<(), String> {
            let _ = self.entered.send(());
            let _ = self.gate.recv();
            self.pushed += 1;
            Ok(())
        }

        fn notify_done(&mut self) {
            self.done += 1;
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn samples_in_trigger_order() {
        init_logger();
        let device = Bmp280::new(FakeBus::datasheet()).unwrap();
        let sink = RecordingSink::new(ScanMask::empty().with(Channel::TemperatureProcessed));
        let (worker, handle) = TriggerWorker::spawn(device, sink).unwrap();

        let base = SystemTime::UNIX_EPOCH;
        for i in 0..5 {
            assert!(handle.fire_at(base + Duration::from_secs(i)));
        }
        drop(handle);

        let (_device, sink) = worker.join().unwrap();
        assert_eq!(sink.done, 5);
        assert_eq!(sink.samples.len(), 5);
        for (i, ts) in sink.timestamps.iter().enumerate() {
            assert_eq!(*ts, base + Duration::from_secs(i as u64));
        }
        for sample in &sink.samples {
            assert_eq!(NativeEndian::read_i32(sample), 2508);
        }
    }

    #[test]
    fn failures_do_not_stop_the_worker() {
        init_logger();
        let mut bus = FakeBus::datasheet();
        bus.fail(REG_TEMP_MSB);
        let device = Bmp280::new(bus).unwrap();
        let sink = RecordingSink::new(ScanMask::empty().with(Channel::TemperatureRaw));
        let (worker, handle) = TriggerWorker::spawn(device, sink).unwrap();
        let second = handle.clone();
        assert!(handle.fire());
        assert!(second.fire());
        drop(handle);
        drop(second);

        let (device, sink) = worker.join().unwrap();
        assert!(sink.samples.is_empty());
        assert_eq!(sink.done, 2);
        assert_eq!(device.release().writes.len(), 2);
    }

    #[test]
    fn full_queue_drops_triggers() {
        init_logger();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (gate_tx, gate_rx) = mpsc::channel();
        let sink = GatedSink {
            entered: entered_tx,
            gate: gate_rx,
            pushed: 0,
            done: 0,
        };
        let device = Bmp280::new(FakeBus::datasheet()).unwrap();
        let (worker, handle) = TriggerWorker::with_queue_depth(device, sink, 1).unwrap();

        // The worker holds the first trigger inside push, one more fits
        // in the queue and the third is dropped without blocking.
        assert!(handle.fire());
        entered_rx.recv().unwrap();
        assert!(handle.fire());
        assert!(!handle.fire());

        drop(gate_tx);
        drop(handle);
        let (_device, sink) = worker.join().unwrap();
        assert_eq!(sink.pushed, 2);
        assert_eq!(sink.done, 2);
    }
}
