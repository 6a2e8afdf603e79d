//! Network parsing lens
//!
//! This module turns user input such as `192.168.1.10/24`, `10.1.2.0 255.255.255.0`
//! or `2001:db8::1 64` into a canonical [`Network`]: the address family, the
//! network address (host bits cleared) and the prefix length.
//!
//! # Example
//!
//! ```rust
//! use subnetcalc::lens::network::{NetworkLens, NetworkParseArgs};
//!
//! let lens = NetworkLens::new();
//! let args = NetworkParseArgs::new("192.168.1.10").with_mask("24");
//! let network = lens.parse(&args).unwrap();
//! assert_eq!(network.to_string(), "192.168.1.0/24");
//! ```

mod count;

pub use count::AddressCount;

use crate::error::CalcError;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::debug;

// =============================================================================
// Types
// =============================================================================

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl AddressFamily {
    /// Family of the given address
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    /// Address width in bits, which is also the longest valid prefix length
    pub fn width(self) -> u8 {
        match self {
            AddressFamily::V4 => 32,
            AddressFamily::V6 => 128,
        }
    }

    /// IP version number (4 or 6)
    pub fn version(self) -> u8 {
        match self {
            AddressFamily::V4 => 4,
            AddressFamily::V6 => 6,
        }
    }

    /// Build an address of this family from its integer value.
    ///
    /// For IPv4 only the low 32 bits are used.
    pub fn addr_from_bits(self, bits: u128) -> IpAddr {
        match self {
            AddressFamily::V4 => IpAddr::V4(Ipv4Addr::from(bits as u32)),
            AddressFamily::V6 => IpAddr::V6(Ipv6Addr::from(bits)),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPv{}", self.version())
    }
}

/// Integer value of an address, widened to `u128`
pub fn addr_to_bits(addr: &IpAddr) -> u128 {
    match addr {
        IpAddr::V4(a) => u128::from(u32::from(*a)),
        IpAddr::V6(a) => u128::from(*a),
    }
}

/// A canonical IP network: family, network address and prefix length.
///
/// The address never has host bits set; every constructor clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Network {
    net: IpNet,
}

impl Network {
    /// Create a network from any member address and a prefix length
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, CalcError> {
        let net = IpNet::new(addr, prefix_len).map_err(|_| {
            let family = AddressFamily::of(&addr);
            CalcError::invalid_network(format!(
                "'{}' is not a valid prefix length for {} (expected 0-{})",
                prefix_len,
                family,
                family.width()
            ))
        })?;
        Ok(Network { net: net.trunc() })
    }

    /// Create a network from the integer value of its address
    pub fn from_bits(family: AddressFamily, bits: u128, prefix_len: u8) -> Result<Self, CalcError> {
        Network::new(family.addr_from_bits(bits), prefix_len)
    }

    pub fn family(&self) -> AddressFamily {
        match self.net {
            IpNet::V4(_) => AddressFamily::V4,
            IpNet::V6(_) => AddressFamily::V6,
        }
    }

    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    pub fn max_prefix_len(&self) -> u8 {
        self.net.max_prefix_len()
    }

    /// Number of host bits (width minus prefix length)
    pub fn host_bits(&self) -> u8 {
        self.max_prefix_len() - self.prefix_len()
    }

    pub fn network_address(&self) -> IpAddr {
        self.net.network()
    }

    /// Last address of the network (all host bits set)
    pub fn broadcast_address(&self) -> IpAddr {
        self.net.broadcast()
    }

    pub fn netmask(&self) -> IpAddr {
        self.net.netmask()
    }

    pub fn hostmask(&self) -> IpAddr {
        self.net.hostmask()
    }

    /// Number of addresses, 2^(width - prefix length)
    pub fn num_addresses(&self) -> AddressCount {
        AddressCount::for_host_bits(self.host_bits())
    }

    /// Integer value of the network address
    pub fn base_bits(&self) -> u128 {
        addr_to_bits(&self.network_address())
    }

    /// Integer value of the broadcast address
    pub fn last_bits(&self) -> u128 {
        addr_to_bits(&self.broadcast_address())
    }

    /// Usable host range of this network
    pub fn host_range(&self) -> HostRange {
        HostRange::of(self)
    }

    /// Fully expanded notation (`2001:0db8:0000:...:0000/64` for IPv6)
    pub fn exploded(&self) -> String {
        match self.net {
            IpNet::V4(n) => n.to_string(),
            IpNet::V6(n) => {
                let segments = n
                    .network()
                    .segments()
                    .iter()
                    .map(|s| format!("{:04x}", s))
                    .collect::<Vec<_>>()
                    .join(":");
                format!("{}/{}", segments, n.prefix_len())
            }
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl FromStr for Network {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_network(s, None)
    }
}

/// Usable host range of a network
///
/// Networks of a single address (/32, /128) have that address as their only
/// host. Point-to-point networks (/31, /127) use both addresses. Larger
/// networks exclude the network and broadcast address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostRange {
    pub first: IpAddr,
    pub last: IpAddr,
    /// Number of usable hosts
    pub usable: u128,
}

impl HostRange {
    pub fn of(network: &Network) -> Self {
        let family = network.family();
        let count = network.num_addresses();
        let (first, last) = match count.exponent() {
            0 | 1 => (network.base_bits(), network.last_bits()),
            _ => (network.base_bits() + 1, network.last_bits() - 1),
        };
        HostRange {
            first: family.addr_from_bits(first),
            last: family.addr_from_bits(last),
            usable: count.usable_hosts(),
        }
    }

    /// Whether the range holds exactly one host
    pub fn is_single(&self) -> bool {
        self.first == self.last
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{} to {}", self.first, self.last)
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a network from a primary string and an optional mask.
///
/// The primary string is an address, optionally followed by `/mask`. When a
/// separate mask is given it is appended as `primary/mask`. A missing mask
/// means a host route (/32 or /128). The mask is a prefix length, or for
/// IPv4 a dotted netmask (`255.255.255.0`) or hostmask (`0.0.0.255`).
pub fn parse_network(primary: &str, secondary: Option<&str>) -> Result<Network, CalcError> {
    let combined = match secondary {
        Some(mask) => format!("{}/{}", primary.trim(), mask.trim()),
        None => primary.trim().to_string(),
    };

    let (addr_str, mask_str) = match combined.split_once('/') {
        Some((addr, mask)) => (addr, Some(mask)),
        None => (combined.as_str(), None),
    };

    if mask_str.is_some_and(|m| m.contains('/')) {
        return Err(CalcError::invalid_network(format!(
            "Only one '/' permitted in '{}'",
            combined
        )));
    }

    let addr: IpAddr = addr_str.parse().map_err(|_| {
        CalcError::invalid_network(format!(
            "'{}' does not appear to be an IPv4 or IPv6 address",
            addr_str
        ))
    })?;
    let family = AddressFamily::of(&addr);

    let prefix_len = match mask_str {
        None => family.width(),
        Some(mask) => parse_mask(mask, family)?,
    };

    let network = Network::new(addr, prefix_len)?;
    debug!(input = %combined, %network, "parsed network");
    Ok(network)
}

/// Convert a mask string into a prefix length for the given family
fn parse_mask(mask: &str, family: AddressFamily) -> Result<u8, CalcError> {
    if mask.is_empty() {
        return Err(CalcError::invalid_network(
            "Missing prefix length or netmask after '/'",
        ));
    }

    let out_of_range = || {
        CalcError::invalid_network(format!(
            "'{}' is not a valid prefix length for {} (expected 0-{})",
            mask,
            family,
            family.width()
        ))
    };

    if mask.bytes().all(|b| b.is_ascii_digit()) {
        return match mask.parse::<u16>() {
            Ok(len) if len <= u16::from(family.width()) => Ok(len as u8),
            _ => Err(out_of_range()),
        };
    }

    match family {
        AddressFamily::V6 => Err(out_of_range()),
        AddressFamily::V4 => {
            let bits: u32 = mask
                .parse::<Ipv4Addr>()
                .map_err(|_| {
                    CalcError::invalid_network(format!("'{}' is not a valid netmask", mask))
                })?
                .into();
            prefix_from_netmask(bits)
                .or_else(|| prefix_from_netmask(!bits))
                .ok_or_else(|| {
                    CalcError::invalid_network(format!(
                        "'{}' is not a valid netmask (bits must be contiguous)",
                        mask
                    ))
                })
        }
    }
}

/// Prefix length of a contiguous IPv4 netmask, `None` if the ones have gaps
fn prefix_from_netmask(bits: u32) -> Option<u8> {
    let ones = bits.leading_ones();
    (ones + bits.trailing_zeros() == 32).then_some(ones as u8)
}

// =============================================================================
// Args
// =============================================================================

/// Arguments for network parsing
///
/// Shared by every command that takes a network on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct NetworkParseArgs {
    /// The IPv4 or IPv6 prefix, or prefix/mask (e.g. 192.168.1.0/24)
    #[cfg_attr(feature = "cli", clap(value_name = "PREFIX"))]
    pub prefix: String,

    /// Optional subnet mask, as prefix length (24) or dotted netmask (255.255.255.0)
    #[cfg_attr(feature = "cli", clap(value_name = "MASK"))]
    #[serde(default)]
    pub mask: Option<String>,
}

impl NetworkParseArgs {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mask: None,
        }
    }

    /// Set a separate mask
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Network parsing lens
pub struct NetworkLens;

impl NetworkLens {
    pub fn new() -> Self {
        Self
    }

    /// Parse the arguments into a canonical network
    pub fn parse(&self, args: &NetworkParseArgs) -> Result<Network, CalcError> {
        parse_network(&args.prefix, args.mask.as_deref())
    }
}

impl Default for NetworkLens {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
