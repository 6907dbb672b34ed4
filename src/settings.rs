use std::path::PathBuf;
use structopt::StructOpt;

/// Lines longer than this many characters abort the analysis of a file
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

#[derive(StructOpt, Debug, Clone)]
#[structopt(
    name = "logstat",
    author = "s00d",
    about = "Reads an Nginx/Apache combined access log and prints traffic, visitor, bot and error statistics.\n\n\
    Without FILE the tool keeps asking for log paths on stdin."
)]
pub struct CliArgs {
    /// Path to the access log file
    #[structopt(parse(from_os_str))]
    pub file: Option<PathBuf>,

    /// Maximum line length in characters; a longer line stops the analysis of the file
    #[structopt(short = "m", long, default_value = "1024")]
    pub max_line_length: usize,

    /// Number of top entries to display in listings
    #[structopt(short, long, default_value = "10")]
    pub top: usize,

    /// Show a progress bar while reading the file
    #[structopt(short, long)]
    pub progress: bool,
}

impl CliArgs {
    pub fn analyzer_settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            max_line_length: self.max_line_length,
            show_progress: self.progress,
        }
    }
}

/// Settings consumed by [`FileReader`](crate::file_reader::FileReader)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerSettings {
    pub max_line_length: usize,
    pub show_progress: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            show_progress: false,
        }
    }
}
