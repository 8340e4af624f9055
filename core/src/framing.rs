//! Preamble/flag framing and NRZI line coding.

use std::iter::{self, Chain, Cycle, Once, Repeat, Take};

use crate::bits::{bytes_to_bits, LsbBits};
use crate::{FLAG, PREAMBLE_FLAGS, PREAMBLE_ZERO_BYTES};

/// NRZI line coder: a 0 toggles the tone, a 1 holds it.
///
/// Polarity starts at mark (`true`).
#[derive(Debug, Clone)]
pub struct Nrzi<I> {
    bits: I,
    current: bool,
}

impl<I: Iterator<Item = bool>> Iterator for Nrzi<I> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.bits.next()?;
        if !bit {
            self.current = !self.current;
        }
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bits.size_hint()
    }
}

pub fn nrzi<B>(bits: B) -> Nrzi<B::IntoIter>
where
    B: IntoIterator<Item = bool>,
{
    Nrzi {
        bits: bits.into_iter(),
        current: true,
    }
}

/// Bits of one `01111110` flag.
pub type FlagBits = LsbBits<Once<u8>>;

/// Raw bit stream before line coding: sync zeros, opening flags, payload, closing flag.
pub type FramedBits<I> =
    Chain<Chain<Chain<Take<Repeat<bool>>, Take<Cycle<FlagBits>>>, I>, FlagBits>;

/// Symbol stream produced by [`frame`].
pub type FramedSymbols<I> = Nrzi<FramedBits<I>>;

pub fn flag_bits() -> FlagBits {
    bytes_to_bits(iter::once(FLAG))
}

/// Wrap already checksummed and stuffed bits in the preamble and flags, then
/// NRZI encode.
///
/// The preamble is `PREAMBLE_ZERO_BYTES` zero bytes (continuously alternating
/// tones for receiver clock recovery) followed by `PREAMBLE_FLAGS` flags. One
/// flag closes the frame.
pub fn frame<B>(stuffed: B) -> FramedSymbols<B::IntoIter>
where
    B: IntoIterator<Item = bool>,
{
    let sync = iter::repeat(false).take(PREAMBLE_ZERO_BYTES * 8);
    let opening = flag_bits().cycle().take(PREAMBLE_FLAGS * 8);
    nrzi(sync.chain(opening).chain(stuffed).chain(flag_bits()))
}

/// Number of symbols [`frame`] produces for `stuffed_len` payload bits.
pub fn framed_len(stuffed_len: usize) -> usize {
    PREAMBLE_ZERO_BYTES * 8 + (PREAMBLE_FLAGS + 1) * 8 + stuffed_len
}
