extern crate bmp280_iio;
extern crate env_logger;

use bmp280_iio::{Bmp280, Channel, ChannelValue, DEFAULT_I2C_ADDRESS, DEFAULT_I2C_BUS};

/// Poll temperature and pressure every two seconds and print them the way a
/// two-line character display would show them.
fn main() {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_I2C_BUS.to_string());
    let address = args
        .next()
        .map(|a| u16::from_str_radix(a.trim_start_matches("0x"), 16).expect("Bad address"))
        .unwrap_or(DEFAULT_I2C_ADDRESS);

    let mut bmp280 = Bmp280::open(&path, address).expect("Couldn't open BMP280");
    loop {
        let temp = bmp280.read_channel(Channel::TemperatureProcessed);
        let press = bmp280.read_channel(Channel::PressureProcessed);
        match (temp, press) {
            (
                Ok(t @ ChannelValue::Fractional { .. }),
                Ok(ChannelValue::Fractional { value: p, divisor: p_div }),
            ) => {
                // Two decimals of the nine Display prints.
                let t = t.to_string();
                let t = &t[..t.len() - 7];
                println!("Temp: {:>6} C", t);
                // Pa to hPa
                println!("Pres: {:4} hPa", p / (p_div * 100));
            }
            (Err(e), _) | (_, Err(e)) => eprintln!("Read failed: {}", e),
            _ => eprintln!("Unexpected channel value"),
        }
        ::std::thread::sleep(::std::time::Duration::from_millis(2000));
    }
}
