use crate::error::{AnalysisError, ParseError, Result};
use crate::log_entry::LogEntry;
use crate::progress_bar::ProgressBar;
use crate::settings::AnalyzerSettings;
use crate::statistics::Statistics;
use crate::user_agent::SearchCrawler;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Requests made by the search crawlers we tally
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlerHits {
    pub googlebot: usize,
    pub yandexbot: usize,
}

impl CrawlerHits {
    pub fn record(&mut self, crawler: SearchCrawler) {
        match crawler {
            SearchCrawler::Googlebot => self.googlebot += 1,
            SearchCrawler::YandexBot => self.yandexbot += 1,
        }
    }

    pub fn get(&self, crawler: SearchCrawler) -> usize {
        match crawler {
            SearchCrawler::Googlebot => self.googlebot,
            SearchCrawler::YandexBot => self.yandexbot,
        }
    }

    pub fn total(&self) -> usize {
        self.googlebot + self.yandexbot
    }
}

/// Outcome of a complete pass over one log file
#[derive(Debug, Default, Clone)]
pub struct FileReport {
    /// Lines read, parsed or not
    pub total_lines: usize,
    /// Lines rejected by the parser
    pub parse_errors: usize,
    pub crawler_hits: CrawlerHits,
    pub statistics: Statistics,
}

impl FileReport {
    /// Parses one line and folds it into the report.
    ///
    /// A malformed line is counted and returned as an error; the report
    /// stays usable and the caller is expected to carry on.
    pub fn process_line(&mut self, line: &str) -> std::result::Result<(), ParseError> {
        self.total_lines += 1;

        let entry = match LogEntry::parse(line) {
            Ok(entry) => entry,
            Err(e) => {
                self.parse_errors += 1;
                return Err(e);
            }
        };

        self.statistics.add_entry(&entry);

        if let Some(crawler) = SearchCrawler::detect(entry.user_agent_raw()) {
            self.crawler_hits.record(crawler);
        }

        Ok(())
    }

    /// Share of `count` among successfully parsed entries, in percent
    pub fn percent_of_entries(&self, count: usize) -> f64 {
        let entries = self.statistics.entry_count();
        if entries == 0 {
            return 0.0;
        }
        count as f64 / entries as f64 * 100.0
    }
}

/// Reads an access log line by line and aggregates it into a [`FileReport`]
pub struct FileReader {
    file_path: PathBuf,
    settings: AnalyzerSettings,
}

impl FileReader {
    pub fn new(file_path: impl Into<PathBuf>, settings: AnalyzerSettings) -> Self {
        Self {
            file_path: file_path.into(),
            settings,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Analyses the whole file.
    ///
    /// Malformed lines are skipped and counted. A line longer than
    /// `max_line_length` characters aborts the analysis and everything
    /// gathered so far is dropped.
    pub async fn analyze(&self) -> Result<FileReport> {
        let file = File::open(&self.file_path).await?;
        let file_size = file.metadata().await?.len();
        let mut reader = BufReader::new(file);

        info!(
            "Analyzing {} ({} bytes)",
            self.file_path.display(),
            file_size
        );

        let mut progress_bar = self
            .settings
            .show_progress
            .then(|| ProgressBar::new(file_size));
        let mut report = FileReport::default();
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            let bytes_read = reader.read_until(b'\n', &mut buffer).await?;
            if bytes_read == 0 {
                break;
            }

            if let Some(progress_bar) = progress_bar.as_mut() {
                progress_bar.advance(bytes_read as u64);
            }

            let line = String::from_utf8_lossy(trim_line_ending(&buffer));
            let line_number = report.total_lines + 1;

            let length = line.chars().count();
            if length > self.settings.max_line_length {
                error!(
                    "Line {} of {} exceeds {} characters, analysis stopped",
                    line_number,
                    self.file_path.display(),
                    self.settings.max_line_length
                );
                return Err(AnalysisError::LineTooLong {
                    line_number,
                    length,
                    limit: self.settings.max_line_length,
                });
            }

            match report.process_line(&line) {
                Ok(()) => debug!("Line {} parsed", line_number),
                Err(e) => warn!("Failed to parse line {}: {}", line_number, e),
            }
        }

        if let Some(progress_bar) = progress_bar.as_mut() {
            progress_bar.finish();
        }

        info!(
            "Finished {}: {} lines, {} entries, {} parse errors",
            self.file_path.display(),
            report.total_lines,
            report.statistics.entry_count(),
            report.parse_errors
        );

        Ok(report)
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
