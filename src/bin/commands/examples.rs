use serde::Serialize;
use subnetcalc::lens::utils::OutputFormat;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;

#[derive(Serialize, Tabled)]
struct Example {
    #[tabled(rename = "Task")]
    task: &'static str,
    #[tabled(rename = "Command")]
    command: &'static str,
}

const EXAMPLES: &[Example] = &[
    Example {
        task: "Display subnet information",
        command: "subnetcalc info 172.16.0.1/21",
    },
    Example {
        task: "Display subnet information",
        command: "subnetcalc info 172.16.0.1 21",
    },
    Example {
        task: "Display subnet information",
        command: "subnetcalc info 10.1.2.0/255.255.255.0",
    },
    Example {
        task: "Display subnet information",
        command: "subnetcalc info 10.1.2.0 255.255.255.0",
    },
    Example {
        task: "Display subnet information",
        command: "subnetcalc info 2001:1:2:3::0/64",
    },
    Example {
        task: "Display subnet information",
        command: "subnetcalc info 2001:1:2:3::0 64",
    },
    Example {
        task: "Split subnets",
        command: "subnetcalc split 2001:1:2:3::0/64 --mask 68",
    },
    Example {
        task: "Split subnets",
        command: "subnetcalc split 192.168.1.0/24 --count 8",
    },
    Example {
        task: "Split subnets, list at most 10",
        command: "subnetcalc split 10.0.0.0/8 --mask 24 --limit 10",
    },
];

pub fn run(output_format: OutputFormat) {
    match output_format {
        OutputFormat::Table => {
            println!("{}", Table::new(EXAMPLES).with(Style::rounded()));
        }
        OutputFormat::Markdown => {
            println!("{}", Table::new(EXAMPLES).with(Style::markdown()));
        }
        OutputFormat::Json => print_json(EXAMPLES, false),
        OutputFormat::JsonPretty => print_json(EXAMPLES, true),
        OutputFormat::JsonLine => {
            for example in EXAMPLES {
                print_json(example, false);
            }
        }
        OutputFormat::Psv => {
            println!("task|command");
            for example in EXAMPLES {
                println!("{}|{}", example.task, example.command);
            }
        }
    }
}
