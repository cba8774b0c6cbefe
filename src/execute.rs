use crate::http_file_parser::parse_request_file;
use crate::http_request_executor::{execute_http_request, ExecutionContext, SendOutcome};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub patterns: Vec<String>,
    pub proxy: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Paths matching each pattern in turn. Patterns that match nothing, or
/// aren't valid glob syntax, add no paths.
pub fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("ignoring invalid pattern '{}': {}", pattern, e);
                continue;
            }
        };
        for entry in paths {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => warn!("ignoring unreadable path {}: {}", e.path().display(), e),
            }
        }
    }
    return files;
}

/// Parses and sends every file matching `config.patterns`, one after the
/// other. A file that can't be read or parsed stops the whole run.
pub fn execute_http_files(config: &ReplayConfig) -> Result<ReplaySummary> {
    let context = ExecutionContext::new(&config.proxy)?;
    let mut summary = ReplaySummary::default();

    for p in expand_patterns(&config.patterns) {
        if !p.is_file() {
            return Err(anyhow!("{} is not a file", p.display()));
        }
        debug!("replaying {}", p.display());
        let request = parse_request_file(&p).context(format!("while parsing file {}", p.display()))?;
        match execute_http_request(request, &context) {
            SendOutcome::Sent { .. } => summary.sent += 1,
            SendOutcome::Skipped => summary.skipped += 1,
            SendOutcome::Failed => summary.failed += 1,
        }
    }

    info!(
        "replayed requests: {} sent, {} skipped, {} failed",
        summary.sent, summary.skipped, summary.failed
    );
    return Ok(summary);
}
