#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Subnetcalc - IPv4/IPv6 subnet calculator
//!
//! Subnetcalc parses network prefixes, reports their derived properties
//! (addresses, masks, host ranges, IANA classification flags) and splits
//! them into smaller subnets, either by a target prefix length or by a
//! desired number of subnets. It can be used as both a command-line
//! application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Arithmetic core: parsing, inspection, splitting | `ipnet`, `serde` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Full CLI binary | All above + `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Library only, no table rendering or CLI dependencies
//! subnetcalc = { version = "0.1", default-features = false }
//!
//! # Default (CLI binary)
//! subnetcalc = "0.1"
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: the calculator itself
//!   - `network`: input parsing and the canonical [`Network`] value
//!   - `inspect`: derived facts and classification flags
//!   - `split`: subnet enumeration by prefix length or count
//!   - `utils`: output format selection shared by all commands
//! - **[`error`]**: the [`CalcError`] type returned by every fallible operation
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust
//! use subnetcalc::{parse_network, InspectLens, SplitLens};
//!
//! let network = parse_network("192.168.1.0", Some("255.255.255.0")).unwrap();
//! assert_eq!(network.to_string(), "192.168.1.0/24");
//!
//! let facts = InspectLens::new().inspect(&network);
//! assert_eq!(facts.host_range.to_string(), "192.168.1.1 to 192.168.1.254");
//! assert_eq!(facts.flag_names(), "PRIVATE");
//!
//! let split = SplitLens::new().split_by_prefix(&network, 26).unwrap();
//! let children: Vec<String> = split.subnets().map(|n| n.to_string()).collect();
//! assert_eq!(
//!     children,
//!     vec![
//!         "192.168.1.0/26",
//!         "192.168.1.64/26",
//!         "192.168.1.128/26",
//!         "192.168.1.192/26",
//!     ]
//! );
//! ```

pub mod config;
pub mod error;
pub mod lens;

pub use config::SubnetcalcConfig;
pub use error::CalcError;

pub use lens::inspect::{FactSheet, InspectLens, NetworkFlag};
pub use lens::network::{
    parse_network, AddressCount, AddressFamily, HostRange, Network, NetworkLens, NetworkParseArgs,
};
pub use lens::split::{SplitArgs, SplitLens, SplitResult, SplitRow, Subnets};
pub use lens::utils::OutputFormat;
