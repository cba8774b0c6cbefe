use anyhow::Result;
use clap::{arg, value_parser, ArgAction, Command};
use httpreplay::execute::{execute_http_files, ReplayConfig};

fn main() -> Result<()> {
    httpreplay::init_logging();

    let cmd = Command::new("httpreplay")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Send raw http request files through a proxy")
        .arg_required_else_help(true)
        .arg(
            arg!(<FILES> "files")
                .help("request files or glob patterns, e.g. 'requests/*.txt'")
                .required(true)
                .value_parser(value_parser!(String))
                .action(ArgAction::Append),
        )
        .arg(
            arg!(-p --proxy <URL>)
                .help("proxy url, e.g. http://127.0.0.1:8080")
                .required(true)
                .value_parser(value_parser!(String))
                .action(ArgAction::Set),
        );

    let matches = cmd.get_matches();
    let config = ReplayConfig {
        patterns: matches
            .get_many::<String>("FILES")
            .map(|files| files.cloned().collect())
            .unwrap_or_default(),
        proxy: matches.get_one::<String>("proxy").cloned().unwrap_or_default(),
    };
    execute_http_files(&config)?;
    return Ok(());
}
