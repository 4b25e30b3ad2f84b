// SPDX-License-Identifier: MIT

use uls24_hid::{Channel, Gain, HidApiTransport, SensorSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let transport = HidApiTransport::new()?;
    let mut session = SensorSession::new(transport);

    // Find and open the first matching sensor
    session.discover()?;

    // Trim has to be in a known state before the first capture
    session.load_trim()?;
    session.reset_trim()?;
    let trim = session.read_device_trim(Channel::new(1)?)?;
    println!("Device trim for channel 1: {} values", trim.values().len());

    // Channel 1, low gain, 30 ms integration time
    session.configure(1, Gain::Low, 30)?;
    session.apply_config()?;

    println!("Capturing with {}...", session.config());
    let frame = session.capture_frame()?;
    print!("{frame}");

    session.close();
    Ok(())
}
