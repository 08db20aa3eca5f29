//! Service instance tokens.
//!
//! A token is a 12-byte, globally unique identifier laid out as:
//!
//! ```text
//! ┌───────────────┬─────────────┬─────────┬─────────────┐
//! │ unix seconds  │ machine id  │   pid   │   counter   │
//! │ 4 bytes (BE)  │   3 bytes   │ 2 bytes │ 3 bytes (BE)│
//! └───────────────┴─────────────┴─────────┴─────────────┘
//! ```
//!
//! The binary form is canonical. The string form is 20 characters of the
//! alphabet `0-9a-v` (big-endian 5-bit groups), so string order matches byte
//! order and tokens minted later by one process sort after earlier ones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::TokenError;

/// Length of the binary form in bytes.
pub const RAW_LEN: usize = 12;

/// Length of the canonical string form in characters.
pub const ENCODED_LEN: usize = 20;

const ENCODING: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// 20 groups of 5 bits carry 100 bits; the low 4 are zero.
const PADDING_BITS: u32 = 4;
const PADDING_MASK: u128 = (1 << PADDING_BITS) - 1;

const INVALID: u8 = 0xFF;

const DECODING: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ENCODING.len() {
        table[ENCODING[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Unique, time-sortable identifier of a running service instance.
///
/// The all-zero value ([`Token::NIL`]) means "absent or invalid".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token([u8; RAW_LEN]);

impl Token {
    /// The zero-value token.
    pub const NIL: Self = Self([0; RAW_LEN]);

    /// Wrap raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; RAW_LEN]) -> Self {
        Self(bytes)
    }

    /// Assemble a token from its components.
    ///
    /// Only the low 24 bits of `counter` are kept.
    #[must_use]
    pub const fn from_parts(seconds: u32, machine: [u8; 3], pid: u16, counter: u32) -> Self {
        let time = seconds.to_be_bytes();
        let pid = pid.to_be_bytes();
        let counter = counter.to_be_bytes();
        Self([
            time[0], time[1], time[2], time[3], machine[0], machine[1], machine[2], pid[0], pid[1],
            counter[1], counter[2], counter[3],
        ])
    }

    /// Parse a canonical string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 20 characters of the
    /// alphabet `0-9a-v`, or if its trailing padding bits are set.
    pub fn parse(s: &str) -> Result<Self, TokenError> {
        let src = s.as_bytes();
        if src.len() != ENCODED_LEN {
            return Err(TokenError::InvalidLength(src.len()));
        }

        let mut bits: u128 = 0;
        for (position, &byte) in src.iter().enumerate() {
            let value = DECODING[usize::from(byte)];
            if value == INVALID {
                // Every byte before `position` was ASCII, so this is a char boundary.
                let character = s
                    .get(position..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or_else(|| char::from(byte));
                return Err(TokenError::InvalidCharacter {
                    character,
                    position,
                });
            }
            bits = (bits << 5) | u128::from(value);
        }

        if bits & PADDING_MASK != 0 {
            return Err(TokenError::NonCanonical);
        }

        let wide = (bits >> PADDING_BITS).to_be_bytes();
        let mut raw = [0u8; RAW_LEN];
        raw.copy_from_slice(&wide[16 - RAW_LEN..]);
        Ok(Self(raw))
    }

    /// Parse a canonical string, returning [`Token::NIL`] on malformed input.
    ///
    /// Use [`Token::parse`] when the caller needs to know why parsing failed.
    #[must_use]
    pub fn from_string_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|err| {
            debug!(input = s, error = %err, "Discarding malformed token");
            Self::NIL
        })
    }

    /// Encode into the 20-character canonical form.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(&self) -> [u8; ENCODED_LEN] {
        let mut wide = [0u8; 16];
        wide[16 - RAW_LEN..].copy_from_slice(&self.0);
        let bits = u128::from_be_bytes(wide) << PADDING_BITS;

        let mut out = [0u8; ENCODED_LEN];
        for (i, slot) in out.iter_mut().enumerate() {
            let shift = 5 * (ENCODED_LEN - 1 - i);
            *slot = ENCODING[((bits >> shift) & 0x1F) as usize];
        }
        out
    }

    /// Raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; RAW_LEN] {
        &self.0
    }

    /// Whether this is the zero-value token.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Mint time, second precision.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Machine discriminator.
    #[must_use]
    pub const fn machine(&self) -> [u8; 3] {
        [self.0[4], self.0[5], self.0[6]]
    }

    /// Process discriminator.
    #[must_use]
    pub const fn pid(&self) -> u16 {
        u16::from_be_bytes([self.0[7], self.0[8]])
    }

    /// Per-process counter value (24 bits).
    #[must_use]
    pub const fn counter(&self) -> u32 {
        u32::from_be_bytes([0, self.0[9], self.0[10], self.0[11]])
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.encode();
        f.write_str(std::str::from_utf8(&encoded).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({self})")
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; RAW_LEN]> for Token {
    fn from(bytes: [u8; RAW_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Token {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The nil token is written as `null`, every other token as its canonical string.
impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_nil() {
            serializer.serialize_none()
        } else {
            serializer.collect_str(self)
        }
    }
}

/// Accepts the canonical string, or `null` as [`Token::NIL`].
impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TokenVisitor;

        impl<'de> Visitor<'de> for TokenVisitor {
            type Value = Token;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 20-character token string or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Token, E> {
                Token::parse(v).map_err(E::custom)
            }

            fn visit_none<E: de::Error>(self) -> Result<Token, E> {
                Ok(Token::NIL)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Token, E> {
                Ok(Token::NIL)
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Token, D::Error> {
                deserializer.deserialize_str(self)
            }
        }

        deserializer.deserialize_option(TokenVisitor)
    }
}
