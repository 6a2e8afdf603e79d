use serde::Serialize;
use subnetcalc::lens::utils::OutputFormat;
use subnetcalc::SubnetcalcConfig;

use super::print_json;

#[derive(Debug, Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_config_file: Option<String>,
    max_displayed_subnets: usize,
    default_format: OutputFormat,
}

pub fn run(config: &SubnetcalcConfig, output_format: OutputFormat) {
    let info = ConfigInfo {
        config_file: config.config_file.clone(),
        default_config_file: SubnetcalcConfig::config_file_path(),
        max_displayed_subnets: config.max_displayed_subnets,
        default_format: config.default_format,
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => print_json(&info, false),
        OutputFormat::JsonPretty => print_json(&info, true),
        OutputFormat::Psv => {
            println!("key|value");
            println!(
                "config_file|{}",
                info.config_file.as_deref().unwrap_or_default()
            );
            println!("max_displayed_subnets|{}", info.max_displayed_subnets);
            println!("default_format|{}", info.default_format);
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("{}", config.summary());
            if config.config_file.is_none() {
                if let Some(path) = &info.default_config_file {
                    println!();
                    println!("Create {} to change these settings.", path);
                }
            }
        }
    }
}
