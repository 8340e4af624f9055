use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn tmp_path(name: &str) -> PathBuf {
    let tmp_dir = std::env::temp_dir().join("aprstone-cli-tests");
    fs::create_dir_all(&tmp_dir).ok();
    tmp_dir.join(name)
}

fn run_aprs(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aprs"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute aprs")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_encode_to_wav_file() {
    let output = tmp_path("test_encode.wav");
    let result = run_aprs(&[
        "-c",
        "N0CALL-7",
        "-o",
        output.to_str().unwrap(),
        ">Test status",
    ]);

    assert!(result.status.success(), "aprs failed: {}", stderr(&result));
    assert!(
        stderr(&result).contains("Sending packet: 'N0CALL-7>APRS,WIDE1-1,WIDE2-1:>Test status'"),
        "unexpected log output: {}",
        stderr(&result)
    );

    let mut reader = hound::WavReader::open(&output).expect("Output is not a WAV file");
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    // two 1.05 s silences plus the tone
    assert!(samples.len() > 2 * 46305 + 44100 / 2);
    assert!(samples[..46305].iter().all(|&s| s == 0));
    // half-scale tone
    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    assert!(peak > 16000 && peak <= 16384, "peak {}", peak);
}

#[test]
fn test_encode_without_digipeaters_at_custom_rate() {
    let output = tmp_path("test_no_path.wav");
    let result = run_aprs(&[
        "-c",
        "DUMMY",
        "-d",
        "",
        "--sample-rate",
        "48000",
        "-o",
        output.to_str().unwrap(),
        ":Test",
    ]);

    assert!(result.status.success(), "aprs failed: {}", stderr(&result));
    assert!(stderr(&result).contains("DUMMY>APRS::Test"));

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().sample_rate, 48000);
    // 1168 symbols at 40 samples each plus 2 x 1.05 s of silence
    assert_eq!(reader.duration(), 1168 * 40 + 2 * 50400);
}

#[test]
fn test_encode_to_stdout() {
    let result = run_aprs(&["-c", "DUMMY", "-d", "", "-o", "-", ":Test"]);
    assert!(result.status.success(), "aprs failed: {}", stderr(&result));

    let reader = hound::WavReader::new(std::io::Cursor::new(result.stdout)).unwrap();
    assert_eq!(reader.spec().sample_rate, 44100);
    assert_eq!(reader.duration(), 42924 + 2 * 46305);
}

#[test]
fn test_invalid_callsign_fails() {
    let output = tmp_path("test_invalid.wav");
    let _ = fs::remove_file(&output);
    let result = run_aprs(&["-c", "TOOLONGCALL", "-o", output.to_str().unwrap(), "x"]);

    assert!(!result.status.success());
    assert!(stderr(&result).contains("Invalid callsign"), "{}", stderr(&result));
    assert!(!output.exists(), "no audio may be written for an invalid frame");
}

#[test]
fn test_invalid_digipeater_fails() {
    let output = tmp_path("test_invalid_digi.wav");
    let _ = fs::remove_file(&output);
    let result = run_aprs(&[
        "-c",
        "N0CALL",
        "-d",
        "WIDE1-1,WIDE2-22",
        "-o",
        output.to_str().unwrap(),
        "x",
    ]);

    assert!(!result.status.success());
    assert!(stderr(&result).contains("Invalid SSID"), "{}", stderr(&result));
    assert!(!output.exists());
}

#[test]
fn test_verbose_logs_packet_bits() {
    let output = tmp_path("test_verbose.wav");
    let result = run_aprs(&["-c", "DUMMY", "-d", "", "-v", "-o", output.to_str().unwrap(), ":Test"]);

    assert!(result.status.success(), "aprs failed: {}", stderr(&result));
    let log = stderr(&result);
    // opening flag, least-significant bit first
    assert!(log.contains("Packet bits: 01111110"), "{}", log);
    assert_eq!(log.matches("Encoding frame DUMMY>APRS::Test").count(), 1, "{}", log);
}
