//! Sample sinks: 16-bit PCM WAV and (with the `playback` feature) the sound card.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Seek, Write};
use std::path::Path;

use hound::{WavSpec, WavWriter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Audio device error: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, AudioError>;

pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Convert a sample in [-1.0, 1.0] to i16, clamping anything outside.
pub fn to_i16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    (clamped * 32767.0) as i16
}

/// Stream samples into a WAV container. Returns the number of samples written.
pub fn write_wav<W, I>(writer: W, sample_rate: u32, samples: I) -> Result<usize>
where
    W: Write + Seek,
    I: IntoIterator<Item = f32>,
{
    let mut wav = WavWriter::new(writer, wav_spec(sample_rate))?;
    let mut written = 0;
    for sample in samples {
        wav.write_sample(to_i16(sample))?;
        written += 1;
    }
    wav.finalize()?;
    Ok(written)
}

pub fn write_wav_file<I>(path: &Path, sample_rate: u32, samples: I) -> Result<usize>
where
    I: IntoIterator<Item = f32>,
{
    let file = BufWriter::new(File::create(path)?);
    write_wav(file, sample_rate, samples)
}

/// stdout cannot seek back to patch the RIFF header, so the WAV is built in
/// memory first.
pub fn write_wav_stdout<I>(sample_rate: u32, samples: I) -> Result<usize>
where
    I: IntoIterator<Item = f32>,
{
    let mut buffer = Cursor::new(Vec::new());
    let written = write_wav(&mut buffer, sample_rate, samples)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(buffer.get_ref())?;
    stdout.flush()?;
    Ok(written)
}

#[cfg(feature = "playback")]
pub mod playback {
    use std::fmt::Display;
    use std::sync::mpsc;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::SampleFormat;

    use super::{to_i16, AudioError, Result};

    /// Native sample rate of the default output device.
    pub fn default_output_rate() -> Result<u32> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| AudioError::Device("no default output device".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::Device(format!("no default output config: {e}")))?;
        Ok(config.sample_rate().0)
    }

    /// Outcome reported by the stream callbacks to the thread waiting in [`play`].
    #[derive(Clone)]
    struct Completion(mpsc::Sender<std::result::Result<(), String>>);

    impl Completion {
        fn finished(&self) {
            let _ = self.0.send(Ok(()));
        }

        fn failed(&self, err: impl Display) {
            let _ = self.0.send(Err(err.to_string()));
        }
    }

    fn completion() -> (Completion, mpsc::Receiver<std::result::Result<(), String>>) {
        let (tx, rx) = mpsc::channel();
        (Completion(tx), rx)
    }

    /// Block until the samples run out or the stream reports an error.
    fn wait(done: &mpsc::Receiver<std::result::Result<(), String>>) -> Result<()> {
        match done.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AudioError::Device(format!("output stream failed: {e}"))),
            Err(e) => Err(AudioError::Device(format!("playback interrupted: {e}"))),
        }
    }

    /// Play samples on the default output device and block until they are
    /// exhausted. Samples are pulled lazily inside the device callback.
    pub fn play<I>(samples: I) -> Result<()>
    where
        I: Iterator<Item = f32> + Send + 'static,
    {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| AudioError::Device("no default output device".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Device(format!("no default output config: {e}")))?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels as usize;

        let (done, done_rx) = completion();
        let stream_done = done.clone();
        let mut source = samples.fuse();
        let mut finished = false;
        let mut next_frame = move || -> Option<f32> {
            let sample = source.next();
            if sample.is_none() && !finished {
                finished = true;
                done.finished();
            }
            sample
        };

        let on_error = move |err: cpal::StreamError| {
            log::error!("cpal output stream error: {}", err);
            stream_done.failed(err);
        };
        let stream = match sample_format {
            SampleFormat::F32 => device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = next_frame().unwrap_or(0.0);
                        frame.fill(value);
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::I16 => device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = to_i16(next_frame().unwrap_or(0.0));
                        frame.fill(value);
                    }
                },
                on_error,
                None,
            ),
            other => {
                return Err(AudioError::Device(format!(
                    "unsupported output sample format: {other}"
                )))
            }
        }
        .map_err(|e| AudioError::Device(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| AudioError::Device(format!("failed to start output stream: {e}")))?;

        wait(&done_rx)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_i16_clamps() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), 32767);
        assert_eq!(to_i16(-1.0), -32767);
        assert_eq!(to_i16(2.0), 32767);
        assert_eq!(to_i16(-2.0), -32767);
    }

    #[test]
    fn test_write_wav_roundtrip_header() {
        let samples = vec![0.0f32, 0.5, -0.5, 1.0];
        let mut buffer = Cursor::new(Vec::new());
        let written = write_wav(&mut buffer, 44100, samples.clone()).unwrap();
        assert_eq!(written, samples.len());

        buffer.set_position(0);
        let mut reader = hound::WavReader::new(buffer).unwrap();
        assert_eq!(reader.spec(), wav_spec(44100));
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, vec![0, 16383, -16383, 32767]);
    }
}
