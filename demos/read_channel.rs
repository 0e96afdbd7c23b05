extern crate bmp280_iio;
extern crate env_logger;

use bmp280_iio::{Bmp280, Channel};

/// Read channels by name, e.g. `read_channel in_temp_input in_pressure9_raw`.
fn main() {
    env_logger::init();
    let mut bmp280 = Bmp280::open_default().expect("Couldn't open BMP280");
    for name in std::env::args().skip(1) {
        let channel: Channel = match name.parse() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        match bmp280.read_channel(channel) {
            Ok(value) => println!("{} = {}", channel, value),
            Err(e) => eprintln!("{}: {}", channel, e),
        }
    }
    let temp = bmp280.read_temperature().expect("Couldn't get temp");
    let pressure = bmp280.read_pressure().expect("Couldn't get pressure");
    println!("It's {} and the pressure is {}", temp, pressure);
}
