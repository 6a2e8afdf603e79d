//! Exact address and subnet counts
//!
//! Every count this crate deals with is a power of two, and the largest one
//! (the number of addresses in `::/0`) is 2^128, one past `u128::MAX`. Storing
//! the exponent keeps the value exact without a big-integer dependency.

use serde::{Serialize, Serializer};
use std::fmt;

/// 2^128 in decimal
const TWO_POW_128: &str = "340282366920938463463374607431768211456";

/// An exact power of two in the range 2^0 ..= 2^128
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressCount {
    exponent: u8,
}

impl AddressCount {
    /// Largest exponent representable, the bit width of an IPv6 address
    pub const MAX_EXPONENT: u8 = 128;

    /// Create 2^exponent; returns `None` when the exponent exceeds 128
    pub fn pow2(exponent: u8) -> Option<Self> {
        (exponent <= Self::MAX_EXPONENT).then_some(Self { exponent })
    }

    /// Size of a network with the given number of host bits (clamped to 128)
    pub(crate) fn for_host_bits(host_bits: u8) -> Self {
        Self {
            exponent: host_bits.min(Self::MAX_EXPONENT),
        }
    }

    pub fn exponent(&self) -> u8 {
        self.exponent
    }

    /// The count as `u128`, or `None` for 2^128
    pub fn to_u128(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.exponent))
    }

    /// Number of usable hosts for a network of this size
    ///
    /// Networks of one or two addresses use every address; larger ones lose
    /// the network and broadcast address. Always fits in `u128`.
    pub fn usable_hosts(&self) -> u128 {
        match self.exponent {
            0 => 1,
            1 => 2,
            e if e >= Self::MAX_EXPONENT => u128::MAX - 1,
            e => (1u128 << e) - 2,
        }
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u128() {
            Some(n) => write!(f, "{}", n),
            None => f.write_str(TWO_POW_128),
        }
    }
}

impl Serialize for AddressCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
