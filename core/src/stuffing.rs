/// Number of consecutive set bits after which a zero is inserted.
pub const STUFF_RUN_LENGTH: u8 = 5;

/// Inserts a zero after every run of five consecutive ones so the payload
/// can never look like a `01111110` flag.
#[derive(Debug, Clone)]
pub struct BitStuffer<I> {
    bits: I,
    ones: u8,
    pending_zero: bool,
}

impl<I: Iterator<Item = bool>> Iterator for BitStuffer<I> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.pending_zero {
            self.pending_zero = false;
            return Some(false);
        }

        let bit = self.bits.next()?;
        if bit {
            self.ones += 1;
        } else {
            self.ones = 0;
        }
        if self.ones == STUFF_RUN_LENGTH {
            log::debug!("Stuffing bit");
            self.ones = 0;
            self.pending_zero = true;
        }
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.bits.size_hint();
        let pending = usize::from(self.pending_zero);
        // worst case: one extra bit per five input bits
        (
            lo.saturating_add(pending),
            hi.and_then(|hi| hi.checked_add(hi / 5 + 1 + pending)),
        )
    }
}

/// Bit-stuff a checksummed header+info stream.
pub fn stuff<B>(bits: B) -> BitStuffer<B::IntoIter>
where
    B: IntoIterator<Item = bool>,
{
    BitStuffer {
        bits: bits.into_iter(),
        ones: 0,
        pending_zero: false,
    }
}
