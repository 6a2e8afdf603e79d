pub mod config;
pub mod examples;
pub mod info;
pub mod split;

use subnetcalc::lens::utils::OutputFormat;
use subnetcalc::CalcError;

/// Print a calculation error and exit with status 1
///
/// JSON formats get the error as a JSON object on stderr, everything else
/// gets `ERROR (<kind>): <message>` followed by the suggestion.
pub(crate) fn exit_with_error(error: &CalcError, output_format: OutputFormat) -> ! {
    if output_format.is_json() {
        match serde_json::to_string(error) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("ERROR ({}): {}", error.kind(), error.message()),
        }
    } else {
        eprintln!("ERROR ({}): {}", error.kind(), error.message());
        if !error.suggestion().is_empty() {
            eprintln!("{}", error.suggestion());
        }
    }
    std::process::exit(1);
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match result {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
    }
}
