use crate::burp_export::{read_export, CapturedItem};
use crate::dedup::{param_names, split_url, DedupKey, Deduplicator};
use crate::encoding::{to_standard_base64, url_safe_substitute};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "parsed_requests";

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub export_file: PathBuf,
    pub output_dir: PathBuf,
    pub csv: Option<PathBuf>,
}

/// One CSV row: both base64 fields use the `/`→`_`, `+`→`-` substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub request_b64: String,
    pub response_b64: String,
    pub method: String,
    pub url: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: usize,
    pub skipped_no_params: usize,
    pub skipped_duplicate: usize,
}

pub fn request_file_name(sequence: usize) -> String {
    return format!("request_{:04}.txt", sequence);
}

/// State of one extraction run: the keys seen so far, files written and CSV
/// rows collected.
pub struct ExtractionRun {
    output_dir: PathBuf,
    collect_rows: bool,
    dedup: Deduplicator,
    rows: Vec<OutputRecord>,
    summary: ExtractSummary,
}

impl ExtractionRun {
    pub fn new(output_dir: &Path, collect_rows: bool) -> Result<ExtractionRun> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("couldn't create output directory {}", output_dir.display()))?;
        return Ok(ExtractionRun {
            output_dir: output_dir.to_path_buf(),
            collect_rows,
            dedup: Deduplicator::new(),
            rows: Vec::new(),
            summary: ExtractSummary::default(),
        });
    }

    /// Writes `item` out if it carries parameters and its key is new.
    /// Returns the path written, if any.
    pub fn process(&mut self, item: &CapturedItem) -> Result<Option<PathBuf>> {
        let (url_path, query) = split_url(&item.url);
        let (raw_bytes, raw_request) = item.decode_request()?;

        let params = param_names(&item.method, query, &raw_request);
        if params.is_empty() {
            debug!("no parameters in {} {}", item.method, item.url);
            self.summary.skipped_no_params += 1;
            return Ok(None);
        }

        if !self.dedup.first_seen(DedupKey::new(&item.method, url_path, params)) {
            debug!("duplicate of an earlier request: {} {}", item.method, item.url);
            self.summary.skipped_duplicate += 1;
            return Ok(None);
        }

        let path = self.output_dir.join(request_file_name(self.summary.written + 1));
        fs::write(&path, &raw_request).with_context(|| format!("couldn't write {}", path.display()))?;
        self.summary.written += 1;

        if self.collect_rows {
            let response_b64 = match &item.response {
                Some(response) => response.to_base64()?,
                None => String::new(),
            };
            self.rows.push(OutputRecord {
                request_b64: url_safe_substitute(&to_standard_base64(&raw_bytes)),
                response_b64: url_safe_substitute(&response_b64),
                method: item.method.clone(),
                url: item.url.clone(),
            });
        }
        return Ok(Some(path));
    }

    pub fn rows(&self) -> &[OutputRecord] {
        return &self.rows;
    }

    pub fn summary(&self) -> ExtractSummary {
        return self.summary;
    }
}

/// Header-less CSV, CRLF terminated, quoting only where needed.
pub fn write_csv(path: &Path, rows: &[OutputRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("couldn't create {}", path.display()))?;
    for row in rows {
        writer.write_record([&row.request_b64, &row.response_b64, &row.method, &row.url])?;
    }
    writer.flush()?;
    return Ok(());
}

/// Saves the first request of every (method, path, parameter names)
/// combination in the export, optionally summarised as CSV.
pub fn extract_unique_requests(config: &ExtractConfig) -> Result<ExtractSummary> {
    let items = read_export(&config.export_file)?;
    let mut run = ExtractionRun::new(&config.output_dir, config.csv.is_some())?;

    for (index, item) in items.iter().enumerate() {
        run.process(item)
            .with_context(|| format!("while processing item {} ({})", index + 1, item.url))?;
    }

    if let Some(csv_path) = &config.csv {
        write_csv(csv_path, run.rows())?;
        println!("Exported CSV to '{}'", csv_path.display());
    }

    let summary = run.summary();
    println!(
        "Saved {} unique requests with parameters to '{}/'",
        summary.written,
        config.output_dir.display()
    );
    info!(
        "{} items: {} written, {} without parameters, {} duplicates",
        items.len(),
        summary.written,
        summary.skipped_no_params,
        summary.skipped_duplicate
    );
    return Ok(summary);
}
