mod audio;

use std::path::PathBuf;

use aprstone_core::bits::bit_string;
use aprstone_core::callsign::parse_path;
use aprstone_core::{
    AfskConfig, Callsign, Encoder, Frame, APRS_DESTINATION, DEFAULT_PATH, SAMPLE_RATE,
};
use clap::{ArgAction, Parser};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "aprs")]
#[command(about = "Encode an APRS packet as Bell 202 AFSK audio")]
struct Cli {
    /// Your ham callsign, CALL or CALL-SSID
    #[arg(short, long)]
    callsign: Callsign,

    /// APRS message body
    #[arg(value_name = "INFO")]
    info: String,

    /// AX.25 destination address. See http://www.aprs.org/aprs11/tocalls.txt
    #[arg(long, default_value = APRS_DESTINATION)]
    destination: Callsign,

    /// Comma separated list of digipeaters to address (empty for none)
    #[arg(short, long, default_value = DEFAULT_PATH)]
    digipeaters: String,

    /// Write audio to a WAV file. Use '-' for stdout.
    #[arg(short, long, value_name = "OUTPUT.WAV")]
    output: Option<PathBuf>,

    /// Sample rate of the WAV output
    #[arg(long, default_value_t = SAMPLE_RATE)]
    sample_rate: u32,

    /// Print more debugging output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let frame = Frame::ui(
        cli.destination,
        cli.callsign,
        parse_path(&cli.digipeaters)?,
        cli.info.into_bytes(),
    );

    log::info!("Sending packet: '{}'", frame);
    log::debug!("Packet bits: {}", bit_string(frame.unparse()));

    match cli.output {
        Some(path) => encode_command(&frame, &path, cli.sample_rate)?,
        None => play_command(&frame)?,
    }

    Ok(())
}

fn encode_command(
    frame: &Frame,
    output_path: &PathBuf,
    sample_rate: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new(AfskConfig::with_sample_rate(sample_rate as f64))?;
    let samples = encoder.encode_frame(frame);

    let written = if output_path.as_os_str() == "-" {
        audio::write_wav_stdout(sample_rate, samples)?
    } else {
        audio::write_wav_file(output_path, sample_rate, samples)?
    };

    log::info!(
        "Encoded {} audio samples ({:.2} s) to {}",
        written,
        written as f64 / sample_rate as f64,
        output_path.display()
    );
    Ok(())
}

#[cfg(feature = "playback")]
fn play_command(frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = audio::playback::default_output_rate()?;
    let encoder = Encoder::new(AfskConfig::with_sample_rate(sample_rate as f64))?;
    log::info!("Playing at {} Hz", sample_rate);
    audio::playback::play(encoder.encode_frame(frame))?;
    Ok(())
}

#[cfg(not(feature = "playback"))]
fn play_command(_frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
    Err("no --output given and sound card playback is not built in \
         (enable the `playback` feature)"
        .into())
}
