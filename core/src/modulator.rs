use std::f64::consts::TAU;

use crate::error::{AprsError, Result};
use crate::{AMPLITUDE, BAUD_RATE, MARK_HZ, SAMPLE_RATE, SILENCE_SECS, SPACE_HZ};

/// Physical layer parameters. Defaults are Bell 202.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AfskConfig {
    /// Symbols per second
    pub baud_rate: f64,
    /// Tone for a `true` symbol (Hz)
    pub mark_hz: f64,
    /// Tone for a `false` symbol (Hz)
    pub space_hz: f64,
    /// Audio frames per second
    pub sample_rate: f64,
    /// Output scale applied to the modulated tone
    pub amplitude: f32,
    /// Silence before and after the tone, to ride out device startup latency
    pub silence_secs: f64,
}

impl Default for AfskConfig {
    fn default() -> Self {
        Self {
            baud_rate: BAUD_RATE,
            mark_hz: MARK_HZ,
            space_hz: SPACE_HZ,
            sample_rate: SAMPLE_RATE as f64,
            amplitude: AMPLITUDE,
            silence_secs: SILENCE_SECS,
        }
    }
}

impl AfskConfig {
    /// Default Bell 202 parameters at a different audio rate.
    pub fn with_sample_rate(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("baud_rate", self.baud_rate),
            ("mark_hz", self.mark_hz),
            ("space_hz", self.space_hz),
            ("sample_rate", self.sample_rate),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(AprsError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(AprsError::InvalidConfig(format!(
                "amplitude must be within [0, 1], got {}",
                self.amplitude
            )));
        }
        if !self.silence_secs.is_finite() || self.silence_secs < 0.0 {
            return Err(AprsError::InvalidConfig(format!(
                "silence_secs must be non-negative, got {}",
                self.silence_secs
            )));
        }
        Ok(())
    }

    /// Number of zero samples on each side of the tone.
    pub fn silence_samples(&self) -> usize {
        (self.silence_secs * self.sample_rate).round() as usize
    }

    /// Number of samples [`Modulator`] emits for `symbols` symbols.
    pub fn tone_samples(&self, symbols: usize) -> usize {
        (symbols as f64 * self.sample_rate / self.baud_rate).ceil() as usize
    }
}

/// Continuous-phase two-tone FSK modulator.
///
/// The phase accumulator runs across the whole stream so tone changes are
/// click-free. Symbol boundaries are measured against the ideal clock
/// (`n / baud_rate`), not by summing per-sample increments, so a long packet
/// does not drift.
#[derive(Debug, Clone)]
pub struct Modulator<I> {
    symbols: I,
    baud_rate: f64,
    mark_step: f64,
    space_step: f64,
    sample_rate: f64,
    phase: f64,
    step: Option<f64>,
    symbols_started: u64,
    samples_emitted: u64,
}

impl<I: Iterator<Item = bool>> Modulator<I> {
    /// Build a modulator from a config that has already passed
    /// [`AfskConfig::validate`].
    pub(crate) fn new(symbols: I, config: &AfskConfig) -> Self {
        Modulator {
            symbols,
            baud_rate: config.baud_rate,
            mark_step: TAU * config.mark_hz / config.sample_rate,
            space_step: TAU * config.space_hz / config.sample_rate,
            sample_rate: config.sample_rate,
            phase: 0.0,
            step: None,
            symbols_started: 0,
            samples_emitted: 0,
        }
    }

    /// Samples are due while elapsed time is short of the current symbol's
    /// end boundary: `samples / sample_rate < symbols / baud_rate`.
    fn in_current_symbol(&self) -> bool {
        (self.samples_emitted as f64) * self.baud_rate
            < (self.symbols_started as f64) * self.sample_rate
    }

    fn log_clock(&self) {
        if log::log_enabled!(log::Level::Trace) {
            let seconds = self.samples_emitted as f64 / self.sample_rate;
            let expected = self.symbols_started as f64 / self.baud_rate;
            log::trace!(
                "bits = {}, time = {:.7} ms, expected time = {:.7} ms, error = {:.7} ms",
                self.symbols_started,
                1000.0 * seconds,
                1000.0 * expected,
                1000.0 * (seconds - expected)
            );
        }
    }
}

impl<I: Iterator<Item = bool>> Iterator for Modulator<I> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        loop {
            if let Some(step) = self.step {
                if self.in_current_symbol() {
                    let sample = self.phase.sin();
                    self.samples_emitted += 1;
                    self.phase += step;
                    if self.phase >= TAU {
                        self.phase -= TAU;
                    }
                    return Some(sample as f32);
                }
                self.log_clock();
            }

            let symbol = self.symbols.next()?;
            self.symbols_started += 1;
            self.step = Some(if symbol { self.mark_step } else { self.space_step });
        }
    }
}

/// Modulate a symbol stream (`true` = mark) into unit-amplitude samples.
///
/// Fails with `InvalidConfig` unless `config` passes [`AfskConfig::validate`].
pub fn modulate<B>(symbols: B, config: &AfskConfig) -> Result<Modulator<B::IntoIter>>
where
    B: IntoIterator<Item = bool>,
{
    config.validate()?;
    Ok(Modulator::new(symbols.into_iter(), config))
}
