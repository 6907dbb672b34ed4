pub mod error;
pub mod file_reader;
pub mod log_entry;
pub mod progress_bar;
pub mod report;
pub mod settings;
pub mod statistics;
pub mod user_agent;

pub use error::{AnalysisError, ParseError};
pub use file_reader::{FileReader, FileReport};
pub use log_entry::{HttpMethod, LogEntry};
pub use statistics::Statistics;
pub use user_agent::{BrowserCategory, OsCategory, SearchCrawler, UserAgent};
