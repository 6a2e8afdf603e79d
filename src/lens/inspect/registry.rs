//! IANA special-purpose address registries
//!
//! Tables follow the IANA IPv4 and IPv6 Special-Purpose Address Registries
//! plus the multicast, loopback, link-local and reserved blocks of RFC 5735,
//! RFC 4291 and RFC 3513.

use crate::lens::network::AddressFamily;

/// An address block, stored as the integer value of its base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    base: u128,
    prefix_len: u8,
    width: u8,
}

impl Block {
    const fn v4(octets: [u8; 4], prefix_len: u8) -> Self {
        Block {
            base: u32::from_be_bytes(octets) as u128,
            prefix_len,
            width: 32,
        }
    }

    const fn v6(segments: [u16; 8], prefix_len: u8) -> Self {
        let mut base = 0u128;
        let mut i = 0;
        while i < 8 {
            base = (base << 16) | segments[i] as u128;
            i += 1;
        }
        Block {
            base,
            prefix_len,
            width: 128,
        }
    }

    /// Whether the address with the given integer value falls in this block
    pub(crate) fn contains(&self, bits: u128) -> bool {
        let host_bits = u32::from(self.width - self.prefix_len);
        bits.checked_shr(host_bits).unwrap_or(0) == self.base.checked_shr(host_bits).unwrap_or(0)
    }
}

/// Special-purpose blocks of one address family
pub(crate) struct Registry {
    pub(crate) private: &'static [Block],
    /// Blocks inside `private` that are globally reachable
    pub(crate) private_exceptions: &'static [Block],
    /// Shared address space, neither private nor global (IPv4 only)
    pub(crate) shared: &'static [Block],
    pub(crate) multicast: &'static [Block],
    pub(crate) reserved: &'static [Block],
    pub(crate) loopback: &'static [Block],
    pub(crate) link_local: &'static [Block],
    pub(crate) unspecified: &'static [Block],
}

impl Registry {
    pub(crate) fn for_family(family: AddressFamily) -> &'static Registry {
        match family {
            AddressFamily::V4 => &IPV4,
            AddressFamily::V6 => &IPV6,
        }
    }
}

/// Whether the address is in any of the blocks
pub(crate) fn in_any(blocks: &[Block], bits: u128) -> bool {
    blocks.iter().any(|b| b.contains(bits))
}

/// Whether a single block holds both addresses
pub(crate) fn both_in_one(blocks: &[Block], first: u128, last: u128) -> bool {
    blocks.iter().any(|b| b.contains(first) && b.contains(last))
}

// =============================================================================
// IPv4
// =============================================================================

const IPV4_PRIVATE: &[Block] = &[
    Block::v4([0, 0, 0, 0], 8),
    Block::v4([10, 0, 0, 0], 8),
    Block::v4([127, 0, 0, 0], 8),
    Block::v4([169, 254, 0, 0], 16),
    Block::v4([172, 16, 0, 0], 12),
    Block::v4([192, 0, 0, 0], 29),
    Block::v4([192, 0, 0, 170], 31),
    Block::v4([192, 0, 2, 0], 24),
    Block::v4([192, 168, 0, 0], 16),
    Block::v4([198, 18, 0, 0], 15),
    Block::v4([198, 51, 100, 0], 24),
    Block::v4([203, 0, 113, 0], 24),
    Block::v4([240, 0, 0, 0], 4),
    Block::v4([255, 255, 255, 255], 32),
];

const IPV4_PRIVATE_EXCEPTIONS: &[Block] = &[
    // PCP anycast
    Block::v4([192, 0, 0, 9], 32),
    // TURN anycast
    Block::v4([192, 0, 0, 10], 32),
];

static IPV4: Registry = Registry {
    private: IPV4_PRIVATE,
    private_exceptions: IPV4_PRIVATE_EXCEPTIONS,
    shared: &[Block::v4([100, 64, 0, 0], 10)],
    multicast: &[Block::v4([224, 0, 0, 0], 4)],
    reserved: &[Block::v4([240, 0, 0, 0], 4)],
    loopback: &[Block::v4([127, 0, 0, 0], 8)],
    link_local: &[Block::v4([169, 254, 0, 0], 16)],
    unspecified: &[Block::v4([0, 0, 0, 0], 32)],
};

// =============================================================================
// IPv6
// =============================================================================

const IPV6_PRIVATE: &[Block] = &[
    Block::v6([0, 0, 0, 0, 0, 0, 0, 1], 128),
    Block::v6([0, 0, 0, 0, 0, 0, 0, 0], 128),
    Block::v6([0, 0, 0, 0, 0, 0xffff, 0, 0], 96),
    Block::v6([0x64, 0xff9b, 1, 0, 0, 0, 0, 0], 48),
    Block::v6([0x100, 0, 0, 0, 0, 0, 0, 0], 64),
    Block::v6([0x2001, 0, 0, 0, 0, 0, 0, 0], 23),
    Block::v6([0x2001, 0xdb8, 0, 0, 0, 0, 0, 0], 32),
    Block::v6([0x2002, 0, 0, 0, 0, 0, 0, 0], 16),
    Block::v6([0x3fff, 0, 0, 0, 0, 0, 0, 0], 20),
    Block::v6([0xfc00, 0, 0, 0, 0, 0, 0, 0], 7),
    Block::v6([0xfe80, 0, 0, 0, 0, 0, 0, 0], 10),
];

const IPV6_PRIVATE_EXCEPTIONS: &[Block] = &[
    Block::v6([0x2001, 1, 0, 0, 0, 0, 0, 1], 128),
    Block::v6([0x2001, 1, 0, 0, 0, 0, 0, 2], 128),
    Block::v6([0x2001, 3, 0, 0, 0, 0, 0, 0], 32),
    Block::v6([0x2001, 4, 0x112, 0, 0, 0, 0, 0], 48),
    Block::v6([0x2001, 0x20, 0, 0, 0, 0, 0, 0], 28),
    Block::v6([0x2001, 0x30, 0, 0, 0, 0, 0, 0], 28),
];

const IPV6_RESERVED: &[Block] = &[
    Block::v6([0, 0, 0, 0, 0, 0, 0, 0], 8),
    Block::v6([0x100, 0, 0, 0, 0, 0, 0, 0], 8),
    Block::v6([0x200, 0, 0, 0, 0, 0, 0, 0], 7),
    Block::v6([0x400, 0, 0, 0, 0, 0, 0, 0], 6),
    Block::v6([0x800, 0, 0, 0, 0, 0, 0, 0], 5),
    Block::v6([0x1000, 0, 0, 0, 0, 0, 0, 0], 4),
    Block::v6([0x4000, 0, 0, 0, 0, 0, 0, 0], 3),
    Block::v6([0x6000, 0, 0, 0, 0, 0, 0, 0], 3),
    Block::v6([0x8000, 0, 0, 0, 0, 0, 0, 0], 3),
    Block::v6([0xa000, 0, 0, 0, 0, 0, 0, 0], 3),
    Block::v6([0xc000, 0, 0, 0, 0, 0, 0, 0], 3),
    Block::v6([0xe000, 0, 0, 0, 0, 0, 0, 0], 4),
    Block::v6([0xf000, 0, 0, 0, 0, 0, 0, 0], 5),
    Block::v6([0xf800, 0, 0, 0, 0, 0, 0, 0], 6),
    Block::v6([0xfe00, 0, 0, 0, 0, 0, 0, 0], 9),
];

static IPV6: Registry = Registry {
    private: IPV6_PRIVATE,
    private_exceptions: IPV6_PRIVATE_EXCEPTIONS,
    shared: &[],
    multicast: &[Block::v6([0xff00, 0, 0, 0, 0, 0, 0, 0], 8)],
    reserved: IPV6_RESERVED,
    loopback: &[Block::v6([0, 0, 0, 0, 0, 0, 0, 1], 128)],
    link_local: &[Block::v6([0xfe80, 0, 0, 0, 0, 0, 0, 0], 10)],
    unspecified: &[Block::v6([0, 0, 0, 0, 0, 0, 0, 0], 128)],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::network::addr_to_bits;
    use std::net::IpAddr;

    fn bits(s: &str) -> u128 {
        addr_to_bits(&s.parse::<IpAddr>().unwrap())
    }

    #[test]
    fn test_block_contains_v4() {
        let block = Block::v4([172, 16, 0, 0], 12);
        assert!(block.contains(bits("172.16.0.0")));
        assert!(block.contains(bits("172.31.255.255")));
        assert!(!block.contains(bits("172.32.0.0")));
        assert!(!block.contains(bits("172.15.255.255")));

        let host = Block::v4([255, 255, 255, 255], 32);
        assert!(host.contains(bits("255.255.255.255")));
        assert!(!host.contains(bits("255.255.255.254")));
    }

    #[test]
    fn test_block_contains_v6() {
        let block = Block::v6([0xfe80, 0, 0, 0, 0, 0, 0, 0], 10);
        assert!(block.contains(bits("fe80::1")));
        assert!(block.contains(bits("febf:ffff::")));
        assert!(!block.contains(bits("fec0::")));

        let everything = Block::v6([0, 0, 0, 0, 0, 0, 0, 0], 0);
        assert!(everything.contains(bits("ffff::")));
    }

    #[test]
    fn test_registry_lookup() {
        let v4 = Registry::for_family(AddressFamily::V4);
        assert!(in_any(v4.private, bits("192.168.10.1")));
        assert!(in_any(v4.private_exceptions, bits("192.0.0.9")));
        assert!(!in_any(v4.private, bits("8.8.8.8")));
        assert!(in_any(v4.shared, bits("100.100.0.1")));

        let v6 = Registry::for_family(AddressFamily::V6);
        assert!(in_any(v6.private, bits("fd12:3456::1")));
        assert!(in_any(v6.reserved, bits("::1")));
        assert!(!in_any(v6.reserved, bits("2001:db8::")));
        assert!(in_any(v6.multicast, bits("ff02::1")));
    }

    #[test]
    fn test_both_in_one() {
        let v4 = Registry::for_family(AddressFamily::V4);
        assert!(both_in_one(v4.private, bits("10.0.0.0"), bits("10.255.255.255")));
        // each end is private, but not within the same block
        assert!(!both_in_one(v4.private, bits("0.0.0.0"), bits("255.255.255.255")));
    }
}
