//! Lens module
//!
//! This module provides the high-level "lens" abstractions. Each lens wraps one
//! piece of subnet arithmetic behind a small struct and returns plain,
//! serializable data; rendering is left to the caller (the CLI, or any other
//! front end).
//!
//! | Lens | Module | Purpose |
//! |------|--------|---------|
//! | `NetworkLens` | [`network`] | parse `address[/mask]` input into a canonical network |
//! | `InspectLens` | [`inspect`] | addresses, masks, host range and IANA flags |
//! | `SplitLens` | [`split`] | split a network by prefix length or subnet count |
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `InspectLens`) - the entry point for its operations
//! - **Args structs** - input arguments, doubling as clap args with the `cli` feature
//! - **Output types** - serde-serializable results
//!
//! ```rust
//! use subnetcalc::lens::inspect::InspectLens;
//! use subnetcalc::lens::network::{NetworkLens, NetworkParseArgs};
//! use subnetcalc::lens::split::{SplitArgs, SplitLens};
//!
//! let network = NetworkLens::new()
//!     .parse(&NetworkParseArgs::new("10.0.0.0/16"))
//!     .unwrap();
//!
//! let facts = InspectLens::new().inspect(&network);
//! assert_eq!(facts.num_addresses.to_string(), "65536");
//!
//! let split = SplitLens::new()
//!     .split(&network, &SplitArgs::by_count(3))
//!     .unwrap();
//! assert_eq!(split.total.to_string(), "4");
//! ```

pub mod utils;

// NetworkLens - input parsing and the canonical network value
pub mod network;

// InspectLens - derived facts and classification flags
pub mod inspect;

// SplitLens - subnet enumeration
pub mod split;
