use std::iter::{self, Chain, Repeat, Take};

use crate::error::Result;
use crate::frame::{Frame, FrameBits};
use crate::framing::{frame, FramedSymbols};
use crate::modulator::{AfskConfig, Modulator};

/// Scales a sample stream by a constant gain.
#[derive(Debug, Clone)]
pub struct Scaled<I> {
    samples: I,
    gain: f32,
}

impl<I: Iterator<Item = f32>> Iterator for Scaled<I> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.samples.next().map(|s| s * self.gain)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.samples.size_hint()
    }
}

type Silence = Take<Repeat<f32>>;

/// Sample stream for one transmission: silence, scaled tone, silence.
pub type Samples<I> = Chain<Chain<Silence, Scaled<Modulator<FramedSymbols<I>>>>, Silence>;

/// Bell 202 AFSK encoder.
///
/// Produces samples lazily; nothing is buffered beyond the per-stage state,
/// so a consumer can stop pulling at any point.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    config: AfskConfig,
}

impl Encoder {
    pub fn new(config: AfskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AfskConfig {
        &self.config
    }

    /// Encode an already checksummed and stuffed bit stream: frame it, NRZI
    /// encode, modulate at the configured amplitude and pad with silence on
    /// both sides.
    pub fn encode<B>(&self, bits: B) -> Samples<B::IntoIter>
    where
        B: IntoIterator<Item = bool>,
    {
        let silence = self.config.silence_samples();
        let tone = Scaled {
            samples: Modulator::new(frame(bits), &self.config),
            gain: self.config.amplitude,
        };
        iter::repeat(0.0)
            .take(silence)
            .chain(tone)
            .chain(iter::repeat(0.0).take(silence))
    }

    /// Encode a complete frame.
    pub fn encode_frame(&self, frame: &Frame) -> Samples<FrameBits> {
        log::debug!("Encoding frame {}", frame);
        self.encode(frame.unparse())
    }

    /// Total number of samples [`Encoder::encode`] emits for `bits_len` input bits.
    pub fn sample_count(&self, bits_len: usize) -> usize {
        let symbols = crate::framing::framed_len(bits_len);
        2 * self.config.silence_samples() + self.config.tone_samples(symbols)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            config: AfskConfig::default(),
        }
    }
}
