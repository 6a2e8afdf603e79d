use clap::Args;
use subnetcalc::lens::inspect::{FactSheet, InspectLens};
use subnetcalc::lens::network::NetworkParseArgs;
use subnetcalc::lens::utils::OutputFormat;
use tabled::settings::Style;
use tabled::Table;

use super::{exit_with_error, print_json};

/// Arguments for the Info command
#[derive(Args)]
pub struct InfoArgs {
    #[clap(flatten)]
    pub network: NetworkParseArgs,
}

pub fn run(args: InfoArgs, output_format: OutputFormat) {
    let lens = InspectLens::new();

    let facts = match lens.inspect_input(&args.network) {
        Ok(f) => f,
        Err(e) => exit_with_error(&e, output_format),
    };

    format_output(&facts, output_format);
}

fn format_output(facts: &FactSheet, output_format: OutputFormat) {
    match output_format {
        OutputFormat::Table => {
            println!("Network Information: {}", facts.network);
            println!("{}", Table::new(facts.rows()).with(Style::rounded()));
        }
        OutputFormat::Markdown => {
            println!("### Network Information: {}\n", facts.network);
            println!("{}", Table::new(facts.rows()).with(Style::markdown()));
        }
        OutputFormat::Json | OutputFormat::JsonLine => print_json(facts, false),
        OutputFormat::JsonPretty => print_json(facts, true),
        OutputFormat::Psv => {
            println!("field|value");
            for row in facts.rows() {
                println!("{}|{}", row.field, row.value);
            }
        }
    }
}
