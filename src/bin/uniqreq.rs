use anyhow::Result;
use clap::{arg, value_parser, ArgAction, Command};
use httpreplay::extract::{extract_unique_requests, ExtractConfig, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

fn main() -> Result<()> {
    httpreplay::init_logging();

    let cmd = Command::new("uniqreq")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Extract unique parameterized requests from a proxy xml export")
        .arg_required_else_help(true)
        .arg(
            arg!(-f --file <FILE>)
                .help("path to the xml export")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            arg!(-o --output <DIR>)
                .help("output directory for saved requests")
                .required(false)
                .default_value(DEFAULT_OUTPUT_DIR)
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            arg!(--csv <CSV>)
                .help("optional csv output in [request_base64,response_base64,method,url] format")
                .required(false)
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        );

    let matches = cmd.get_matches();
    let config = ExtractConfig {
        export_file: matches.get_one::<PathBuf>("file").cloned().unwrap_or_default(),
        output_dir: matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        csv: matches.get_one::<PathBuf>("csv").cloned(),
    };
    extract_unique_requests(&config)?;
    return Ok(());
}
