//! Byte <-> bit conversion in AX.25 wire order (least-significant bit first).

/// Lazily unpacks bytes into bits, least-significant bit of each byte first.
#[derive(Debug, Clone)]
pub struct LsbBits<I> {
    bytes: I,
    current: u8,
    remaining: u8,
}

impl<I: Iterator<Item = u8>> Iterator for LsbBits<I> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            self.current = self.bytes.next()?;
            self.remaining = 8;
        }
        let bit = self.current & 1 == 1;
        self.current >>= 1;
        self.remaining -= 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.bytes.size_hint();
        let pending = self.remaining as usize;
        (
            lo.saturating_mul(8).saturating_add(pending),
            hi.and_then(|hi| hi.checked_mul(8)?.checked_add(pending)),
        )
    }
}

/// Unpack bytes into a bit stream, least-significant bit first per byte.
pub fn bytes_to_bits<B>(bytes: B) -> LsbBits<B::IntoIter>
where
    B: IntoIterator<Item = u8>,
{
    LsbBits {
        bytes: bytes.into_iter(),
        current: 0,
        remaining: 0,
    }
}

/// The reverse of [`bytes_to_bits`]. A trailing partial byte is zero-padded
/// in its high bits.
pub fn bits_to_bytes<B>(bits: B) -> Vec<u8>
where
    B: IntoIterator<Item = bool>,
{
    let mut bytes = Vec::new();
    let mut current = 0u8;
    let mut filled = 0;
    for bit in bits {
        if bit {
            current |= 1 << filled;
        }
        filled += 1;
        if filled == 8 {
            bytes.push(current);
            current = 0;
            filled = 0;
        }
    }
    if filled > 0 {
        bytes.push(current);
    }
    bytes
}

/// Render a bit stream as a string of `0`/`1` characters.
pub fn bit_string<B>(bits: B) -> String
where
    B: IntoIterator<Item = bool>,
{
    bits.into_iter().map(|b| if b { '1' } else { '0' }).collect()
}
