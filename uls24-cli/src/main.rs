// SPDX-License-Identifier: MIT

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Config;
use log::info;
use output::OutputFormat;
use std::path::PathBuf;
use uls24_hid::{Gain, HidApiTransport, SensorSession};

#[derive(Parser)]
#[command(name = "uls24", version, about = "Host tool for the ULS24 optical sensor")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a matching sensor is attached and can be opened
    Probe,
    /// Push channel, gain and integration time to the device
    Config(SensorArgs),
    /// Capture one frame and print or save it
    Capture {
        #[command(flatten)]
        sensor: SensorArgs,

        /// Write the frame to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct SensorArgs {
    /// Sensor channel (1-4)
    #[arg(short, long)]
    channel: Option<u8>,

    /// Gain mode
    #[arg(short, long, value_enum)]
    gain: Option<GainArg>,

    /// Integration time in milliseconds (1-66000)
    #[arg(short = 't', long)]
    integration_ms: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GainArg {
    High,
    Low,
}

impl GainArg {
    fn to_gain(self) -> Gain {
        match self {
            GainArg::High => Gain::High,
            GainArg::Low => Gain::Low,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Probe => probe(&config),
        Command::Config(sensor) => apply(&config, &sensor),
        Command::Capture {
            sensor,
            output,
            format,
        } => capture(&config, &sensor, output.as_deref(), format),
    }
}

fn open_session(config: &Config) -> Result<SensorSession<HidApiTransport>> {
    let transport = HidApiTransport::new().context("Failed to initialize the HID transport")?;
    let mut session = SensorSession::new(transport)
        .with_device_ids(config.device.vendor_id, config.device.product_id);
    session.discover().with_context(|| {
        format!(
            "No sensor found ({:04x}:{:04x})",
            config.device.vendor_id, config.device.product_id
        )
    })?;
    Ok(session)
}

fn configure_session(
    session: &mut SensorSession<HidApiTransport>,
    config: &Config,
    sensor: &SensorArgs,
) -> Result<()> {
    let channel = sensor.channel.unwrap_or(config.defaults.channel);
    let gain = sensor
        .gain
        .map(GainArg::to_gain)
        .unwrap_or(config.defaults.gain);
    let integration_ms = sensor
        .integration_ms
        .unwrap_or(config.defaults.integration_ms);
    session
        .configure(channel, gain, integration_ms)
        .context("Rejected capture configuration")?;
    Ok(())
}

fn probe(config: &Config) -> Result<()> {
    let mut session = open_session(config)?;
    println!("Device found");
    session.close();
    Ok(())
}

fn apply(config: &Config, sensor: &SensorArgs) -> Result<()> {
    let mut session = open_session(config)?;
    configure_session(&mut session, config, sensor)?;
    session
        .apply_config()
        .context("Failed to push configuration to the device")?;
    info!("Applied {}", session.config());
    session.close();
    Ok(())
}

fn capture(
    config: &Config,
    sensor: &SensorArgs,
    output: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = open_session(config)?;

    // Trim must be loaded and reset before the first capture.
    session.load_trim().context("Failed to load trim data")?;
    session.reset_trim().context("Failed to reset trim data")?;

    configure_session(&mut session, config, sensor)?;
    session
        .apply_config()
        .context("Failed to push configuration to the device")?;

    info!("Capturing with {}", session.config());
    let frame = session.capture_frame().context("Capture failed")?;
    session.close();

    match output {
        Some(path) => {
            output::write_frame(&frame, path, format)?;
            println!("Frame data saved to {}", path.display());
        }
        None => print!("{frame}"),
    }
    Ok(())
}
