//! Network inspection lens
//!
//! Derives the descriptive facts of a [`Network`]: address count, masks,
//! network and broadcast address, usable host range and the IANA
//! special-purpose classification flags.
//!
//! # Example
//!
//! ```rust
//! use subnetcalc::lens::inspect::{InspectLens, NetworkFlag};
//! use subnetcalc::lens::network::Network;
//!
//! let network: Network = "192.168.1.0/24".parse().unwrap();
//! let facts = InspectLens::new().inspect(&network);
//!
//! assert_eq!(facts.num_addresses.to_string(), "256");
//! assert_eq!(facts.host_range.to_string(), "192.168.1.1 to 192.168.1.254");
//! assert!(facts.flags.contains(&NetworkFlag::Private));
//! ```

mod registry;

use crate::error::CalcError;
use crate::lens::network::{
    AddressCount, AddressFamily, HostRange, Network, NetworkLens, NetworkParseArgs,
};
use crate::lens::utils::group_digits;
use registry::{both_in_one, in_any, Block, Registry};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

// =============================================================================
// Types
// =============================================================================

/// Special-purpose classification of a network
///
/// Variants are declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkFlag {
    #[serde(rename = "MCAST")]
    Multicast,
    Private,
    Global,
    Unspecified,
    Reserved,
    Loopback,
    LinkLocal,
}

impl fmt::Display for NetworkFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkFlag::Multicast => "MCAST",
            NetworkFlag::Private => "PRIVATE",
            NetworkFlag::Global => "GLOBAL",
            NetworkFlag::Unspecified => "UNSPECIFIED",
            NetworkFlag::Reserved => "RESERVED",
            NetworkFlag::Loopback => "LOOPBACK",
            NetworkFlag::LinkLocal => "LINK_LOCAL",
        };
        f.write_str(name)
    }
}

/// Everything known about a network
#[derive(Debug, Clone, Serialize)]
pub struct FactSheet {
    /// IP version (4 or 6)
    pub version: u8,
    /// The network in `address/prefix_len` form
    pub network: Network,
    pub num_addresses: AddressCount,
    pub netmask: IpAddr,
    pub hostmask: IpAddr,
    /// Fully expanded notation, IPv6 only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploded: Option<String>,
    pub network_address: IpAddr,
    pub broadcast_address: IpAddr,
    pub host_range: HostRange,
    /// Network address as an uppercase hexadecimal integer, IPv4 only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hexadecimal: Option<String>,
    pub flags: Vec<NetworkFlag>,
}

/// One labelled line of a fact sheet, for table output
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct FactRow {
    #[cfg_attr(feature = "display", tabled(rename = "Field"))]
    pub field: String,
    #[cfg_attr(feature = "display", tabled(rename = "Value"))]
    pub value: String,
}

impl FactRow {
    fn new(field: &str, value: impl ToString) -> Self {
        FactRow {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl FactSheet {
    /// Labelled rows in display order
    pub fn rows(&self) -> Vec<FactRow> {
        let mut rows = vec![
            FactRow::new("Version", format!("IPv{}", self.version)),
            FactRow::new("Addresses", group_digits(&self.num_addresses.to_string())),
            FactRow::new("Subnet", self.network),
            FactRow::new("Netmask", self.netmask),
            FactRow::new("Hostmask", self.hostmask),
        ];
        if let Some(exploded) = &self.exploded {
            rows.push(FactRow::new("Expanded", exploded));
        }
        rows.push(FactRow::new("Network", self.network_address));
        rows.push(FactRow::new("Broadcast", self.broadcast_address));
        if self.host_range.is_single() {
            rows.push(FactRow::new("Host", self.host_range));
        } else {
            rows.push(FactRow::new("Hosts", self.host_range));
        }
        if let Some(hex) = &self.hexadecimal {
            rows.push(FactRow::new("Hexadecimal", hex));
        }
        if !self.flags.is_empty() {
            rows.push(FactRow::new("Flags", self.flag_names()));
        }
        rows
    }

    /// Flags as a space separated string
    pub fn flag_names(&self) -> String {
        self.flags
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Network inspection lens
pub struct InspectLens;

impl InspectLens {
    pub fn new() -> Self {
        Self
    }

    /// Build the fact sheet of a network
    pub fn inspect(&self, network: &Network) -> FactSheet {
        let family = network.family();
        FactSheet {
            version: family.version(),
            network: *network,
            num_addresses: network.num_addresses(),
            netmask: network.netmask(),
            hostmask: network.hostmask(),
            exploded: match family {
                AddressFamily::V4 => None,
                AddressFamily::V6 => Some(network.exploded()),
            },
            network_address: network.network_address(),
            broadcast_address: network.broadcast_address(),
            host_range: HostRange::of(network),
            hexadecimal: match family {
                AddressFamily::V4 => Some(format!("{:X}", network.base_bits())),
                AddressFamily::V6 => None,
            },
            flags: self.flags(network),
        }
    }

    /// Parse the input and build its fact sheet
    pub fn inspect_input(&self, args: &NetworkParseArgs) -> Result<FactSheet, CalcError> {
        let network = NetworkLens::new().parse(args)?;
        Ok(self.inspect(&network))
    }

    /// Every classification flag that applies to the network.
    ///
    /// A flag applies when both the network address and the broadcast
    /// address belong to the category.
    pub fn flags(&self, network: &Network) -> Vec<NetworkFlag> {
        let registry = Registry::for_family(network.family());
        let first = network.base_bits();
        let last = network.last_bits();
        let both_in = |blocks: &[Block]| in_any(blocks, first) && in_any(blocks, last);

        let private = both_in_one(registry.private, first, last)
            && !in_any(registry.private_exceptions, first)
            && !in_any(registry.private_exceptions, last);
        let shared = both_in_one(registry.shared, first, last);

        let mut flags = Vec::new();
        if both_in(registry.multicast) {
            flags.push(NetworkFlag::Multicast);
        }
        if private {
            flags.push(NetworkFlag::Private);
        }
        if !private && !shared {
            flags.push(NetworkFlag::Global);
        }
        if both_in(registry.unspecified) {
            flags.push(NetworkFlag::Unspecified);
        }
        if both_in(registry.reserved) {
            flags.push(NetworkFlag::Reserved);
        }
        if both_in(registry.loopback) {
            flags.push(NetworkFlag::Loopback);
        }
        if both_in(registry.link_local) {
            flags.push(NetworkFlag::LinkLocal);
        }
        flags
    }
}

impl Default for InspectLens {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
