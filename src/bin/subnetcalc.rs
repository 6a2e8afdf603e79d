use clap::{Parser, Subcommand};
use subnetcalc::lens::utils::OutputFormat;
use subnetcalc::SubnetcalcConfig;
use tracing::Level;

mod commands;

use commands::info::InfoArgs;
use commands::split::SplitArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.subnetcalc/subnetcalc.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(long, global = true, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display comprehensive network information
    Info(InfoArgs),

    /// Split a network into smaller subnets, by --count or by --mask
    Split(SplitArgs),

    /// Show usage examples for all commands
    Examples,

    /// Show the effective configuration
    Config,
}

fn print_overview() {
    println!("IPv4 and IPv6 Subnet Calculator");
    println!();
    println!("Available commands:");
    println!("  info      Display comprehensive network information");
    println!("  split     Split networks into smaller subnets");
    println!("  examples  Show usage examples");
    println!("  config    Show the effective configuration");
    println!();
    println!("Use --help with any command for detailed information.");
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(Level::DEBUG)
            .init();
    }

    let config = match SubnetcalcConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let output_format = cli.format.unwrap_or(config.default_format);

    match cli.command {
        None => print_overview(),
        Some(Commands::Info(args)) => commands::info::run(args, output_format),
        Some(Commands::Split(args)) => commands::split::run(&config, args, output_format),
        Some(Commands::Examples) => commands::examples::run(output_format),
        Some(Commands::Config) => commands::config::run(&config, output_format),
    }
}
