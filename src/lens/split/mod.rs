//! Subnet splitting lens
//!
//! Splits a [`Network`] into equally sized child subnets, either by giving the
//! new prefix length or the number of parts wanted. Counts that are not a
//! power of two round up: asking for 3 parts of a /24 produces 4 /26s.
//!
//! Children are produced lazily by [`Subnets`], so even splitting `::/0`
//! into /128s only costs a couple of integers; callers decide how many to
//! take.
//!
//! # Example
//!
//! ```rust
//! use subnetcalc::lens::network::Network;
//! use subnetcalc::lens::split::SplitLens;
//!
//! let network: Network = "192.168.0.0/24".parse().unwrap();
//! let result = SplitLens::new().split_by_prefix(&network, 26).unwrap();
//!
//! assert_eq!(result.total.to_string(), "4");
//! let children: Vec<String> = result.subnets().map(|n| n.to_string()).collect();
//! assert_eq!(children[1], "192.168.0.64/26");
//! ```

use crate::error::CalcError;
use crate::lens::network::{AddressCount, AddressFamily, HostRange, Network};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use tracing::debug;

// =============================================================================
// Types
// =============================================================================

/// Outcome of a split: what was split, into what, and how many
#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    /// The network that was split
    pub network: Network,
    pub new_prefix_len: u8,
    /// Number of bits added to the prefix
    pub prefix_delta: u8,
    /// Count asked for when splitting by count; may be below `total`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_count: Option<i128>,
    /// Number of subnets produced, 2^prefix_delta
    pub total: AddressCount,
}

impl SplitResult {
    /// A fresh iterator over every child subnet, in ascending order
    pub fn subnets(&self) -> Subnets {
        Subnets::new(&self.network, self.new_prefix_len)
    }

    /// The first `limit` children as display rows
    pub fn listing(&self, limit: usize) -> SplitListing {
        let mut subnets = self.subnets();
        let rows = subnets.by_ref().take(limit).map(|n| SplitRow::of(&n)).collect();
        SplitListing {
            summary: self.clone(),
            subnets: rows,
            truncated: subnets.next().is_some(),
        }
    }
}

/// One child subnet with its usable hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRow {
    pub prefix: Network,
    pub hosts: u128,
    pub range: HostRange,
}

impl SplitRow {
    pub fn of(network: &Network) -> Self {
        let range = HostRange::of(network);
        SplitRow {
            prefix: *network,
            hosts: range.usable,
            range,
        }
    }
}

/// A bounded view of a split result
#[derive(Debug, Clone, Serialize)]
pub struct SplitListing {
    #[serde(flatten)]
    pub summary: SplitResult,
    pub subnets: Vec<SplitRow>,
    /// Whether children were left out because of the limit
    pub truncated: bool,
}

/// Lazy iterator over the children of a split
///
/// Cloning gives an independent iterator at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnets {
    family: AddressFamily,
    prefix_len: u8,
    /// Host bits of each child; the step between bases is 2^child_host_bits
    child_host_bits: u8,
    next: Option<u128>,
    /// Base of the final child
    last: u128,
}

impl Subnets {
    /// Children of `parent` at `prefix_len`; empty unless `prefix_len` lies
    /// between the parent's prefix length and the family width
    fn new(parent: &Network, prefix_len: u8) -> Self {
        let in_range = (parent.prefix_len()..=parent.max_prefix_len()).contains(&prefix_len);
        let child_host_bits = parent.max_prefix_len().saturating_sub(prefix_len);
        let shift = u32::from(child_host_bits);
        let last = parent
            .last_bits()
            .checked_shr(shift)
            .and_then(|b| b.checked_shl(shift))
            .unwrap_or(0);
        Subnets {
            family: parent.family(),
            prefix_len,
            child_host_bits,
            next: in_range.then_some(parent.base_bits()),
            last,
        }
    }

    fn step(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.child_host_bits))
    }

    /// Children left, or `None` if the count does not fit in `u128`
    fn remaining(&self) -> Option<u128> {
        match self.next {
            None => Some(0),
            Some(base) => self.last.checked_sub(base).map_or(Some(0), |span| {
                span.checked_shr(u32::from(self.child_host_bits))
                    .unwrap_or(0)
                    .checked_add(1)
            }),
        }
    }
}

impl Iterator for Subnets {
    type Item = Network;

    fn next(&mut self) -> Option<Network> {
        let base = self.next?;
        self.next = if base >= self.last {
            None
        } else {
            self.step().and_then(|step| base.checked_add(step))
        };
        // the prefix length was validated against the family width
        Network::from_bits(self.family, base, self.prefix_len).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().map(usize::try_from) {
            Some(Ok(n)) => (n, Some(n)),
            _ => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Network> {
        let base = self.next?;
        let skip = self
            .step()
            .and_then(|step| step.checked_mul(n as u128))
            .and_then(|offset| base.checked_add(offset));
        match skip {
            Some(target) if target <= self.last => {
                self.next = Some(target);
                self.next()
            }
            _ => {
                self.next = None;
                None
            }
        }
    }
}

impl FusedIterator for Subnets {}

// =============================================================================
// Args
// =============================================================================

/// Arguments for splitting a network; exactly one of the two must be set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[cfg_attr(feature = "cli", group(id = "split_by", required = true, multiple = false))]
pub struct SplitArgs {
    /// Number of parts to split the prefix into (rounded up to a power of two)
    #[cfg_attr(feature = "cli", clap(short, long, allow_negative_numbers = true))]
    #[serde(default)]
    pub count: Option<i128>,

    /// Length of the subnets to split the prefix into
    #[cfg_attr(
        feature = "cli",
        clap(
            short = 'm',
            long = "mask",
            value_name = "LENGTH",
            allow_negative_numbers = true
        )
    )]
    #[serde(default, rename = "mask")]
    pub new_prefix_len: Option<i64>,
}

impl SplitArgs {
    /// Split into at least `count` parts
    pub fn by_count(count: i128) -> Self {
        Self {
            count: Some(count),
            new_prefix_len: None,
        }
    }

    /// Split into subnets of the given prefix length
    pub fn by_prefix(new_prefix_len: i64) -> Self {
        Self {
            count: None,
            new_prefix_len: Some(new_prefix_len),
        }
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Subnet splitting lens
pub struct SplitLens;

impl SplitLens {
    pub fn new() -> Self {
        Self
    }

    /// Split according to the arguments
    pub fn split(&self, network: &Network, args: &SplitArgs) -> Result<SplitResult, CalcError> {
        match (args.count, args.new_prefix_len) {
            (Some(_), Some(_)) => Err(CalcError::invalid_split(
                "Cannot specify both --count and --mask options",
                "Use either --count to specify number of subnets OR --mask to specify target prefix length",
            )),
            (None, None) => Err(CalcError::invalid_split(
                "Must specify either --count or --mask option",
                "Use --count <number> to split into N subnets OR --mask <length> to create subnets of specific size",
            )),
            (Some(count), None) => self.split_by_count(network, count),
            (None, Some(new_prefix_len)) => self.split_by_prefix(network, new_prefix_len),
        }
    }

    /// Split into subnets of `new_prefix_len`, which must be longer than the
    /// network's prefix and fit the address family.
    ///
    /// The length is taken as a signed integer so that negative or oversized
    /// user input is reported as an [`CalcError::InvalidSplit`].
    pub fn split_by_prefix(
        &self,
        network: &Network,
        new_prefix_len: i64,
    ) -> Result<SplitResult, CalcError> {
        let family = network.family();
        let prefix_len = network.prefix_len();
        let width = family.width();

        let suggestion = if prefix_len >= width {
            format!("A /{} {} network cannot be split any further", prefix_len, family)
        } else {
            format!(
                "For {}, use a prefix length greater than {} and at most {}",
                family, prefix_len, width
            )
        };

        if new_prefix_len <= i64::from(prefix_len) {
            return Err(CalcError::invalid_split(
                format!(
                    "New prefix length /{} must be longer than the original /{}",
                    new_prefix_len, prefix_len
                ),
                suggestion,
            ));
        }
        if new_prefix_len > i64::from(width) {
            return Err(CalcError::invalid_split(
                format!(
                    "New prefix length /{} exceeds the {} maximum of /{}",
                    new_prefix_len, family, width
                ),
                suggestion,
            ));
        }

        // bounded by the family width above
        Ok(self.build(network, new_prefix_len as u8, None))
    }

    /// Split into at least `desired_count` parts.
    ///
    /// The prefix grows by ceil(log2(desired_count)) bits, so the number of
    /// subnets produced is the next power of two at or above the request.
    /// A count of 1 yields the network itself.
    pub fn split_by_count(
        &self,
        network: &Network,
        desired_count: i128,
    ) -> Result<SplitResult, CalcError> {
        let family = network.family();
        let prefix_len = network.prefix_len();
        let width = family.width();
        let max_count = network.num_addresses();
        let suggestion = format!(
            "Use a count between 1 and {} for a /{} {} network",
            max_count, prefix_len, family
        );

        if desired_count < 1 {
            return Err(CalcError::invalid_split(
                format!("Split count must be at least 1, got {}", desired_count),
                suggestion,
            ));
        }

        let prefix_delta = ceil_log2(desired_count.unsigned_abs());
        let new_prefix_len = u32::from(prefix_len) + prefix_delta;
        if new_prefix_len > u32::from(width) {
            return Err(CalcError::invalid_split(
                format!(
                    "Splitting a /{} into {} parts needs a /{}, which exceeds the {} maximum of /{}",
                    prefix_len, desired_count, new_prefix_len, family, width
                ),
                suggestion,
            ));
        }

        Ok(self.build(network, new_prefix_len as u8, Some(desired_count)))
    }

    fn build(&self, network: &Network, new_prefix_len: u8, requested: Option<i128>) -> SplitResult {
        let prefix_delta = new_prefix_len - network.prefix_len();
        let total = AddressCount::for_host_bits(prefix_delta);
        debug!(%network, new_prefix_len, %total, "split network");
        SplitResult {
            network: *network,
            new_prefix_len,
            prefix_delta,
            requested_count: requested,
            total,
        }
    }
}

impl Default for SplitLens {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest `k` with 2^k >= n (0 for n <= 1)
fn ceil_log2(n: u128) -> u32 {
    if n <= 1 {
        0
    } else {
        u128::BITS - (n - 1).leading_zeros()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::network::addr_to_bits;

    fn net(s: &str) -> Network {
        s.parse().unwrap()
    }

    fn names(subnets: impl Iterator<Item = Network>) -> Vec<String> {
        subnets.map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2(9), 4);
        assert_eq!(ceil_log2(1 << 100), 100);
        assert_eq!(ceil_log2((1 << 100) + 1), 101);
        assert_eq!(ceil_log2(i128::MAX as u128), 127);
    }

    #[test]
    fn test_split_by_prefix_v4() {
        let result = SplitLens::new()
            .split_by_prefix(&net("192.168.0.0/24"), 26)
            .unwrap();
        assert_eq!(result.total.to_u128(), Some(4));
        assert_eq!(result.prefix_delta, 2);
        assert_eq!(
            names(result.subnets()),
            vec![
                "192.168.0.0/26",
                "192.168.0.64/26",
                "192.168.0.128/26",
                "192.168.0.192/26"
            ]
        );
    }

    #[test]
    fn test_split_by_prefix_rejects_same_or_shorter() {
        let lens = SplitLens::new();
        for input in ["10.0.0.0/8", "192.168.1.0/24", "2001:db8::/32", "::/0"] {
            let network = net(input);
            let prefix_len = network.prefix_len();
            let err = lens
                .split_by_prefix(&network, i64::from(prefix_len))
                .unwrap_err();
            assert!(matches!(err, CalcError::InvalidSplit { .. }));
            assert!(lens
                .split_by_prefix(&network, i64::from(prefix_len) - 1)
                .is_err());
        }
    }

    #[test]
    fn test_split_by_prefix_rejects_too_long() {
        let lens = SplitLens::new();
        let err = lens.split_by_prefix(&net("10.0.0.0/8"), 33).unwrap_err();
        assert_eq!(
            err.suggestion(),
            "For IPv4, use a prefix length greater than 8 and at most 32"
        );
        assert!(lens.split_by_prefix(&net("2001:db8::/32"), 129).is_err());

        let err = lens.split_by_prefix(&net("10.0.0.1/32"), 33).unwrap_err();
        assert_eq!(err.suggestion(), "A /32 IPv4 network cannot be split any further");
    }

    #[test]
    fn test_split_by_prefix_rejects_out_of_range_input() {
        let lens = SplitLens::new();
        for new_prefix_len in [-1, -300, 300, 256, i64::MAX, i64::MIN] {
            let err = lens
                .split_by_prefix(&net("10.0.0.0/8"), new_prefix_len)
                .unwrap_err();
            assert!(matches!(err, CalcError::InvalidSplit { .. }));
            assert_eq!(
                err.suggestion(),
                "For IPv4, use a prefix length greater than 8 and at most 32"
            );
        }
        let err = lens
            .split(&net("2001:db8::/32"), &SplitArgs::by_prefix(300))
            .unwrap_err();
        assert!(err.message().contains("/300"));
    }

    #[test]
    fn test_subnets_of_inconsistent_result_are_empty() {
        let network = net("10.0.0.0/8");
        for new_prefix_len in [4, 40] {
            let result = SplitResult {
                network,
                new_prefix_len,
                prefix_delta: 0,
                requested_count: None,
                total: AddressCount::for_host_bits(0),
            };
            let subnets = result.subnets();
            assert_eq!(subnets.size_hint(), (0, Some(0)));
            assert_eq!(subnets.count(), 0);
            assert!(result.listing(10).subnets.is_empty());
        }
    }

    #[test]
    fn test_split_one_bit_yields_two_halves() {
        let lens = SplitLens::new();
        for input in ["10.0.0.0/8", "0.0.0.0/0", "10.0.0.0/31", "2001:db8::/32", "::/0", "::/127"] {
            let network = net(input);
            let new_prefix_len = network.prefix_len() + 1;
            let result = lens
                .split_by_prefix(&network, i64::from(new_prefix_len))
                .unwrap();
            let children: Vec<Network> = result.subnets().collect();
            assert_eq!(children.len(), 2);
            let step = 1u128 << (network.max_prefix_len() - new_prefix_len);
            assert_eq!(children[0].base_bits(), network.base_bits());
            assert_eq!(children[1].base_bits(), network.base_bits() + step);
            assert!(children.iter().all(|c| c.prefix_len() == new_prefix_len));
        }
    }

    #[test]
    fn test_split_by_count_rounds_up() {
        let lens = SplitLens::new();
        let network = net("192.168.1.0/24");
        for (count, expected) in [(1, 1u128), (2, 2), (3, 4), (4, 4), (5, 8), (8, 8), (9, 16)] {
            let result = lens.split_by_count(&network, count).unwrap();
            assert_eq!(result.total.to_u128(), Some(expected));
            assert_eq!(result.subnets().count() as u128, expected);
            assert_eq!(result.requested_count, Some(count));
        }

        let result = lens.split_by_count(&network, 3).unwrap();
        assert_eq!(result.prefix_delta, 2);
        assert_eq!(result.new_prefix_len, 26);
    }

    #[test]
    fn test_split_by_count_one_is_identity() {
        let network = net("10.1.2.3/32");
        let result = SplitLens::new().split_by_count(&network, 1).unwrap();
        assert_eq!(names(result.subnets()), vec!["10.1.2.3/32"]);

        let everything = net("::/0");
        let result = SplitLens::new().split_by_count(&everything, 1).unwrap();
        assert_eq!(names(result.subnets()), vec!["::/0"]);
    }

    #[test]
    fn test_split_by_count_v6() {
        let result = SplitLens::new()
            .split_by_count(&net("2001:db8::/64"), 8)
            .unwrap();
        assert_eq!(result.prefix_delta, 3);
        assert_eq!(result.new_prefix_len, 67);
        assert_eq!(result.total.to_u128(), Some(8));
        let children = names(result.subnets());
        assert_eq!(children.len(), 8);
        assert_eq!(children[1], "2001:db8:0:0:2000::/67");
        assert_eq!(children[7], "2001:db8:0:0:e000::/67");
    }

    #[test]
    fn test_split_by_count_errors() {
        let lens = SplitLens::new();
        let network = net("192.168.1.0/24");
        for count in [0, -1, -100] {
            let err = lens.split_by_count(&network, count).unwrap_err();
            assert!(matches!(err, CalcError::InvalidSplit { .. }));
        }
        // 257 parts of a /24 would need a /33
        let err = lens.split_by_count(&network, 257).unwrap_err();
        assert!(err.message().contains("/33"));
        assert_eq!(
            err.suggestion(),
            "Use a count between 1 and 256 for a /24 IPv4 network"
        );
        assert!(lens.split_by_count(&network, 256).is_ok());
    }

    #[test]
    fn test_split_dispatch() {
        let lens = SplitLens::new();
        let network = net("10.0.0.0/16");
        assert_eq!(
            lens.split(&network, &SplitArgs::by_prefix(20))
                .unwrap()
                .new_prefix_len,
            20
        );
        assert_eq!(
            lens.split(&network, &SplitArgs::by_count(5))
                .unwrap()
                .new_prefix_len,
            19
        );

        let both = SplitArgs {
            count: Some(2),
            new_prefix_len: Some(20),
        };
        assert!(lens.split(&network, &both).is_err());
        assert!(lens.split(&network, &SplitArgs::default()).is_err());
    }

    #[test]
    fn test_subnets_are_lazy_for_huge_splits() {
        let result = SplitLens::new().split_by_prefix(&net("::/0"), 128).unwrap();
        assert_eq!(result.total.exponent(), 128);
        assert_eq!(
            result.total.to_string(),
            "340282366920938463463374607431768211456"
        );

        let first = names(result.subnets().take(3));
        assert_eq!(first, vec!["::/128", "::1/128", "::2/128"]);

        let mut subnets = result.subnets();
        assert_eq!(subnets.size_hint(), (usize::MAX, None));
        let last = subnets.nth(usize::MAX).unwrap();
        assert_eq!(addr_to_bits(&last.network_address()), usize::MAX as u128);
    }

    #[test]
    fn test_subnets_end_at_top_of_address_space() {
        let result = SplitLens::new()
            .split_by_prefix(&net("255.255.255.0/24"), 25)
            .unwrap();
        assert_eq!(
            names(result.subnets()),
            vec!["255.255.255.0/25", "255.255.255.128/25"]
        );

        let result = SplitLens::new()
            .split_by_prefix(&net("ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffc/126"), 128)
            .unwrap();
        let children = names(result.subnets());
        assert_eq!(children.len(), 4);
        assert_eq!(children[3], "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff/128");
    }

    #[test]
    fn test_subnets_restartable_and_nth() {
        let result = SplitLens::new()
            .split_by_prefix(&net("10.0.0.0/24"), 28)
            .unwrap();
        let mut subnets = result.subnets();
        assert_eq!(subnets.size_hint(), (16, Some(16)));
        let snapshot = subnets.clone();

        assert_eq!(subnets.nth(2).unwrap().to_string(), "10.0.0.32/28");
        assert_eq!(subnets.size_hint(), (13, Some(13)));
        assert_eq!(subnets.nth(12).unwrap().to_string(), "10.0.0.240/28");
        assert_eq!(subnets.next(), None);
        assert_eq!(subnets.next(), None);

        // the clone and a fresh iterator both start over
        assert_eq!(snapshot.count(), 16);
        assert_eq!(result.subnets().count(), 16);

        let mut subnets = result.subnets();
        assert_eq!(subnets.nth(16), None);
        assert_eq!(subnets.next(), None);
    }

    #[test]
    fn test_children_partition_parent() {
        let parent = net("172.16.0.0/20");
        let result = SplitLens::new().split_by_prefix(&parent, 23).unwrap();
        let children: Vec<Network> = result.subnets().collect();
        assert_eq!(children.len(), 8);
        assert_eq!(children[0].base_bits(), parent.base_bits());
        assert_eq!(children[7].last_bits(), parent.last_bits());
        for pair in children.windows(2) {
            assert_eq!(pair[0].last_bits() + 1, pair[1].base_bits());
        }
    }

    #[test]
    fn test_listing() {
        let result = SplitLens::new()
            .split_by_prefix(&net("10.0.0.0/24"), 30)
            .unwrap();
        let listing = result.listing(50);
        assert_eq!(listing.subnets.len(), 50);
        assert!(listing.truncated);
        assert_eq!(listing.subnets[0].hosts, 2);
        assert_eq!(listing.subnets[0].range.to_string(), "10.0.0.1 to 10.0.0.2");

        let listing = result.listing(64);
        assert_eq!(listing.subnets.len(), 64);
        assert!(!listing.truncated);

        let json = serde_json::to_value(&result.listing(1)).unwrap();
        assert_eq!(json["network"], "10.0.0.0/24");
        assert_eq!(json["total"], "64");
        assert_eq!(json["subnets"][0]["prefix"], "10.0.0.0/30");
        assert_eq!(json["truncated"], true);
    }

    #[test]
    fn test_split_rows_for_tiny_subnets() {
        let result = SplitLens::new()
            .split_by_prefix(&net("10.0.0.0/30"), 32)
            .unwrap();
        let listing = result.listing(10);
        assert!(listing.subnets.iter().all(|r| r.hosts == 1));
        assert_eq!(listing.subnets[3].range.to_string(), "10.0.0.3");

        let result = SplitLens::new()
            .split_by_prefix(&net("10.0.0.0/30"), 31)
            .unwrap();
        let listing = result.listing(10);
        assert_eq!(listing.subnets[1].range.to_string(), "10.0.0.2 to 10.0.0.3");
    }
}
