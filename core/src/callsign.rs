use std::fmt;
use std::str::FromStr;

use crate::error::{AprsError, Result};

/// Maximum callsign length in an AX.25 address field.
pub const CALLSIGN_MAX_LEN: usize = 6;

/// Encoded size of one address (6 name bytes + 1 SSID byte).
pub const ADDRESS_LEN: usize = 7;

/// A station identifier: an uppercase alphanumeric name and a single-digit SSID.
///
/// Only SSIDs 0-9 are representable, and the has-been-repeated and
/// command/response bits of the SSID byte are never set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callsign {
    name: String,
    ssid: u8,
}

impl Callsign {
    /// Build a callsign from a name and a one-character SSID (`"0"`..`"9"`).
    ///
    /// The name is uppercased before validation.
    pub fn new(name: &str, ssid: &str) -> Result<Self> {
        let name = name.to_ascii_uppercase();
        if name.is_empty() || name.len() > CALLSIGN_MAX_LEN {
            return Err(AprsError::InvalidCallsign(format!(
                "'{}' must be 1 to {} characters",
                name, CALLSIGN_MAX_LEN
            )));
        }
        if !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(AprsError::InvalidCallsign(format!(
                "'{}' must be alphanumeric",
                name
            )));
        }

        let mut chars = ssid.chars();
        let ssid = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => c as u8 - b'0',
            _ => {
                return Err(AprsError::InvalidSsid(format!(
                    "'{}' must be a single digit",
                    ssid
                )))
            }
        };

        Ok(Self { name, ssid })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Encode into the 7-byte address form: the space-padded name and the
    /// ASCII SSID digit, each byte shifted left one bit.
    pub fn encode(&self) -> [u8; ADDRESS_LEN] {
        let mut out = [b' ' << 1; ADDRESS_LEN];
        for (slot, byte) in out.iter_mut().zip(self.name.bytes()) {
            *slot = byte << 1;
        }
        out[ADDRESS_LEN - 1] = (b'0' + self.ssid) << 1;
        out
    }
}

impl FromStr for Callsign {
    type Err = AprsError;

    /// Parse `CALL` or `CALL-SSID`. A missing SSID means 0.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('-') {
            Some((name, ssid)) => Self::new(name, ssid),
            None => Self::new(s, "0"),
        }
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}-{}", self.name, self.ssid)
        }
    }
}

/// Concatenate the encoded destination, source and digipeater addresses and
/// mark the last byte as the end of the address list.
pub fn encode_address_field(
    destination: &Callsign,
    source: &Callsign,
    digipeaters: &[Callsign],
) -> Vec<u8> {
    let mut field = Vec::with_capacity(ADDRESS_LEN * (2 + digipeaters.len()));
    field.extend_from_slice(&destination.encode());
    field.extend_from_slice(&source.encode());
    for digi in digipeaters {
        field.extend_from_slice(&digi.encode());
    }
    if let Some(last) = field.last_mut() {
        *last |= 0x01;
    }
    field
}

/// Parse a comma separated digipeater path such as `WIDE1-1,WIDE2-1`.
/// Blank entries are skipped, so an empty string is an empty path.
pub fn parse_path(path: &str) -> Result<Vec<Callsign>> {
    path.split(',')
        .map(str::trim)
        .filter(|digi| !digi.is_empty())
        .map(str::parse::<Callsign>)
        .collect()
}
