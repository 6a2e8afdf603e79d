use clap::Args;
use subnetcalc::lens::network::{NetworkLens, NetworkParseArgs};
use subnetcalc::lens::split::{SplitArgs as SplitOptions, SplitLens, SplitListing, SplitResult};
use subnetcalc::lens::utils::{group_digits, OutputFormat};
use subnetcalc::SubnetcalcConfig;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{exit_with_error, print_json};

/// Arguments for the Split command
#[derive(Args)]
pub struct SplitArgs {
    #[clap(flatten)]
    pub network: NetworkParseArgs,

    #[clap(flatten)]
    pub split: SplitOptions,

    /// Maximum number of subnets to list (default from config, 50)
    #[clap(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Tabled)]
struct SubnetTableRow {
    #[tabled(rename = "Prefixes")]
    prefix: String,
    #[tabled(rename = "Nbr of hosts")]
    hosts: String,
    #[tabled(rename = "Range of hosts")]
    range: String,
}

pub fn run(config: &SubnetcalcConfig, args: SplitArgs, output_format: OutputFormat) {
    let SplitArgs {
        network,
        split,
        limit,
    } = args;

    let network = match NetworkLens::new().parse(&network) {
        Ok(n) => n,
        Err(e) => exit_with_error(&e, output_format),
    };

    let result = match SplitLens::new().split(&network, &split) {
        Ok(r) => r,
        Err(e) => exit_with_error(&e, output_format),
    };

    let limit = limit.unwrap_or(config.max_displayed_subnets);
    format_output(&result, result.listing(limit), output_format);
}

/// Note shown when a count was rounded up to the next power of two
fn rounding_note(result: &SplitResult) -> Option<String> {
    let requested = u128::try_from(result.requested_count?).ok()?;
    let total = result.total.to_u128()?;
    (requested < total).then(|| {
        format!(
            "Requested {} subnets, rounded up to {}",
            group_digits(&requested.to_string()),
            group_digits(&total.to_string())
        )
    })
}

fn format_output(result: &SplitResult, listing: SplitListing, output_format: OutputFormat) {
    let total = group_digits(&result.total.to_string());
    let limit = listing.subnets.len();

    match output_format {
        OutputFormat::Table | OutputFormat::Markdown => {
            let rows: Vec<SubnetTableRow> = listing
                .subnets
                .iter()
                .map(|row| SubnetTableRow {
                    prefix: row.prefix.to_string(),
                    hosts: group_digits(&row.hosts.to_string()),
                    range: row.range.to_string(),
                })
                .collect();

            let mut table = Table::new(rows);
            match output_format {
                OutputFormat::Markdown => table.with(Style::markdown()),
                _ => table.with(Style::rounded()),
            };

            println!("Total: {} subnets", total);
            if let Some(note) = rounding_note(result) {
                println!("{}", note);
            }
            println!("{}", table);
            if listing.truncated {
                println!("... Only showing first {} subnets ...", limit);
            }
        }
        OutputFormat::Json => print_json(&listing, false),
        OutputFormat::JsonPretty => print_json(&listing, true),
        OutputFormat::JsonLine => {
            for row in &listing.subnets {
                print_json(row, false);
            }
        }
        OutputFormat::Psv => {
            println!("prefix|hosts|range");
            for row in &listing.subnets {
                println!("{}|{}|{}", row.prefix, row.hosts, row.range);
            }
        }
    }
}
