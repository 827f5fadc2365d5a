// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Identities and inbound payloads shared by every module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// 20-byte account / asset identifier.
///
/// Ordering is plain byte order, which is the canonical pool ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from raw bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address whose low 8 bytes hold `n` big-endian. Handy for fixtures.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Errors from parsing a hex address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address must be 40 hex characters, got {0}")]
    BadLength(usize),

    #[error("invalid hex character at position {0}")]
    BadHex(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix("0x").unwrap_or(s);
        if hex.len() != 40 {
            return Err(AddressParseError::BadLength(hex.len()));
        }
        let mut bytes = [0u8; 20];
        let raw = hex.as_bytes();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_nibble(raw[2 * i]).ok_or(AddressParseError::BadHex(2 * i))?;
            let lo = hex_nibble(raw[2 * i + 1]).ok_or(AddressParseError::BadHex(2 * i + 1))?;
            *byte = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// PoolKey
// ---------------------------------------------------------------------------

/// Pool descriptor handed in by the pool engine on every lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub currency0: Address,
    pub currency1: Address,
}

impl PoolKey {
    pub fn new(currency0: Address, currency1: Address) -> Self {
        Self { currency0, currency1 }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.currency0, self.currency1)
    }
}

// ---------------------------------------------------------------------------
// TradeDelta
// ---------------------------------------------------------------------------

/// Signed balance change of both pool assets for one settled trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDelta {
    pub amount0: i128,
    pub amount1: i128,
}

impl TradeDelta {
    pub fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Tier movement signal. Also the persisted "last applied move".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
}

impl Direction {
    /// Two-bit persisted encoding.
    pub fn to_bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => 2,
        }
    }

    /// Decode the two-bit form. `0b11` is not a direction.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::None),
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            _ => None,
        }
    }

    /// Whether `self` and `other` are both moves and point opposite ways.
    pub fn opposes(self, other: Direction) -> bool {
        matches!((self, other), (Self::Up, Self::Down) | (Self::Down, Self::Up))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(s)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_and_parse_agree() {
        let a = Address::from_low_u64(0xdead_beef);
        let text = a.to_string();
        assert_eq!(text, "0x00000000000000000000000000000000deadbeef");
        assert_eq!(text.parse::<Address>(), Ok(a));
        assert_eq!("00000000000000000000000000000000DEADBEEF".parse::<Address>(), Ok(a));
    }

    #[test]
    fn address_parse_rejects_garbage() {
        assert_eq!("0x1234".parse::<Address>(), Err(AddressParseError::BadLength(4)));
        let bad = format!("0x{}zz", "0".repeat(38));
        assert_eq!(bad.parse::<Address>(), Err(AddressParseError::BadHex(38)));
    }

    #[test]
    fn address_ordering_is_byte_order() {
        assert!(Address::from_low_u64(1) < Address::from_low_u64(2));
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_low_u64(1).is_zero());
    }

    #[test]
    fn direction_bits() {
        for d in [Direction::None, Direction::Up, Direction::Down] {
            assert_eq!(Direction::from_bits(d.to_bits()), Some(d));
        }
        assert_eq!(Direction::from_bits(3), None);
    }

    #[test]
    fn direction_opposition() {
        assert!(Direction::Up.opposes(Direction::Down));
        assert!(Direction::Down.opposes(Direction::Up));
        assert!(!Direction::Up.opposes(Direction::Up));
        assert!(!Direction::None.opposes(Direction::Down));
        assert!(!Direction::Up.opposes(Direction::None));
    }
}
