use std::fmt;
use std::iter::Chain;

use crate::bits::{bytes_to_bits, LsbBits};
use crate::callsign::{encode_address_field, Callsign};
use crate::error::{AprsError, Result};
use crate::fcs::{fcs, Fcs, FcsAppender};
use crate::framing::{flag_bits, FlagBits};
use crate::stuffing::{stuff, BitStuffer};

/// Control and protocol ID pair identifying the frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKind {
    pub control: u8,
    pub protocol_id: u8,
}

impl FrameKind {
    /// Unnumbered information frame, no layer 3 protocol (APRS).
    pub const UI: FrameKind = FrameKind {
        control: 0x03,
        protocol_id: 0xF0,
    };
}

/// An AX.25 frame ready to be encoded. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub destination: Callsign,
    pub source: Callsign,
    pub digipeaters: Vec<Callsign>,
    pub kind: FrameKind,
    pub info: Vec<u8>,
}

/// Link-layer bit stream: flag, stuffed header+info+FCS, flag.
pub type FrameBits =
    Chain<Chain<FlagBits, BitStuffer<FcsAppender<LsbBits<std::vec::IntoIter<u8>>>>>, FlagBits>;

impl Frame {
    pub fn new(
        destination: Callsign,
        source: Callsign,
        digipeaters: Vec<Callsign>,
        kind: FrameKind,
        info: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            destination,
            source,
            digipeaters,
            kind,
            info: info.into(),
        }
    }

    /// Unnumbered information frame, the kind APRS uses.
    pub fn ui(
        destination: Callsign,
        source: Callsign,
        digipeaters: Vec<Callsign>,
        info: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(destination, source, digipeaters, FrameKind::UI, info)
    }

    pub fn address_field(&self) -> Vec<u8> {
        encode_address_field(&self.destination, &self.source, &self.digipeaters)
    }

    /// Address field, control byte, protocol ID.
    pub fn header(&self) -> Vec<u8> {
        let mut header = self.address_field();
        header.push(self.kind.control);
        header.push(self.kind.protocol_id);
        header
    }

    /// Header followed by the info field; the span covered by the FCS.
    pub fn body(&self) -> Vec<u8> {
        let mut body = self.header();
        body.extend_from_slice(&self.info);
        body
    }

    /// FCS digest over the body, in wire order.
    pub fn fcs(&self) -> [u8; 2] {
        let mut fcs = Fcs::new();
        for bit in bytes_to_bits(self.body()) {
            fcs.update_bit(bit);
        }
        fcs.digest()
    }

    /// Body followed by its FCS, unstuffed and unflagged.
    pub fn packet(&self) -> Vec<u8> {
        let mut packet = self.body();
        packet.extend_from_slice(&self.fcs());
        packet
    }

    /// Lazy link-layer bit stream, least-significant bit first per byte:
    /// opening flag, bit-stuffed body and FCS, closing flag.
    pub fn unparse(&self) -> FrameBits {
        flag_bits()
            .chain(stuff(fcs(bytes_to_bits(self.body()))))
            .chain(flag_bits())
    }

    /// Receive path; decoding frames from a bit stream is not supported.
    pub fn parse<B>(_bits: B) -> Result<Frame>
    where
        B: IntoIterator<Item = bool>,
    {
        Err(AprsError::NotImplemented("AX.25 frame parsing"))
    }
}

impl fmt::Display for Frame {
    /// Monitor format: `SRC>DEST,DIGI1,DIGI2:INFO`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)?;
        for digi in &self.digipeaters {
            write!(f, ",{}", digi)?;
        }
        write!(f, ":{}", String::from_utf8_lossy(&self.info))
    }
}
