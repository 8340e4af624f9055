//! AX.25 frame check sequence: bitwise CRC-16/X-25 (reversed polynomial 0x8408).

use crate::bits::{bytes_to_bits, LsbBits};

/// Reversed CRC-16-CCITT polynomial
pub const FCS_POLYNOMIAL: u16 = 0x8408;

const FCS_INIT: u16 = 0xFFFF;

/// Running checksum register.
///
/// One value per frame, fed every header+info bit in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fcs {
    register: u16,
}

impl Fcs {
    pub fn new() -> Self {
        Self { register: FCS_INIT }
    }

    pub fn update_bit(&mut self, bit: bool) {
        let check = self.register & 0x01 == 0x01;
        self.register >>= 1;
        if check != bit {
            self.register ^= FCS_POLYNOMIAL;
        }
    }

    /// Feed whole bytes, most-significant bit first.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            for i in (0..8).rev() {
                self.update_bit((byte >> i) & 0x01 == 0x01);
            }
        }
    }

    /// One's complement of the register, little-endian.
    pub fn digest(&self) -> [u8; 2] {
        (!self.register).to_le_bytes()
    }
}

impl Default for Fcs {
    fn default() -> Self {
        Self::new()
    }
}

enum FcsState<I> {
    Payload(I),
    Digest(LsbBits<std::array::IntoIter<u8, 2>>),
}

/// Passes every input bit through unchanged, then appends the 16 digest bits
/// least-significant bit first within little-endian bytes.
pub struct FcsAppender<I> {
    state: FcsState<I>,
    fcs: Fcs,
}

impl<I: Iterator<Item = bool>> Iterator for FcsAppender<I> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        loop {
            match &mut self.state {
                FcsState::Payload(bits) => match bits.next() {
                    Some(bit) => {
                        self.fcs.update_bit(bit);
                        return Some(bit);
                    }
                    None => {
                        self.state = FcsState::Digest(bytes_to_bits(self.fcs.digest()));
                    }
                },
                FcsState::Digest(bits) => return bits.next(),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            FcsState::Payload(bits) => {
                let (lo, hi) = bits.size_hint();
                (lo.saturating_add(16), hi.and_then(|hi| hi.checked_add(16)))
            }
            FcsState::Digest(bits) => bits.size_hint(),
        }
    }
}

/// Append the frame check sequence to a bit stream.
pub fn fcs<B>(bits: B) -> FcsAppender<B::IntoIter>
where
    B: IntoIterator<Item = bool>,
{
    FcsAppender {
        state: FcsState::Payload(bits.into_iter()),
        fcs: Fcs::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{bit_string, bits_to_bytes};
    use crc::{Crc, CRC_16_IBM_SDLC};

    const X25: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

    #[test]
    fn test_known_vector() {
        let mut fcs = Fcs::new();
        fcs.update(&[b'a'; 54]);
        assert_eq!(fcs.digest(), [0x5B, 0x07]);
        assert_eq!(bit_string(bytes_to_bits(fcs.digest())), "1101101011100000");
    }

    #[test]
    fn test_update_bytes_matches_update_bit() {
        let mut by_bytes = Fcs::new();
        by_bytes.update(b"Hello");

        let mut by_bits = Fcs::new();
        for &byte in b"Hello" {
            for i in (0..8).rev() {
                by_bits.update_bit((byte >> i) & 1 == 1);
            }
        }
        assert_eq!(by_bytes, by_bits);
    }

    #[test]
    fn test_wire_order_matches_x25() {
        for data in [&b"123456789"[..], b"", b"\x00\xff", b"APRS test packet"] {
            let mut fcs = Fcs::new();
            for bit in bytes_to_bits(data.iter().copied()) {
                fcs.update_bit(bit);
            }
            assert_eq!(fcs.digest(), X25.checksum(data).to_le_bytes());
        }
    }

    #[test]
    fn test_empty_digest() {
        assert_eq!(Fcs::new().digest(), [0x00, 0x00]);
    }

    #[test]
    fn test_appender_passes_bits_then_digest() {
        let data = b"123456789";
        let appended: Vec<bool> = fcs(bytes_to_bits(data.iter().copied())).collect();
        assert_eq!(appended.len(), data.len() * 8 + 16);

        let bytes = bits_to_bytes(appended);
        assert_eq!(&bytes[..data.len()], data);
        assert_eq!(&bytes[data.len()..], &[0x6E, 0x90]);
    }

    #[test]
    fn test_appender_on_empty_stream() {
        let appended: Vec<bool> = fcs(std::iter::empty()).collect();
        assert_eq!(appended.len(), 16);
        assert!(appended.iter().all(|&b| !b));
    }

    #[test]
    fn test_size_hint() {
        let stream = fcs(vec![true; 10]);
        assert_eq!(stream.size_hint(), (26, Some(26)));
    }
}
