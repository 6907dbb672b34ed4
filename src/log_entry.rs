use crate::error::ParseError;
use crate::user_agent::UserAgent;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Date format of the bracketed timestamp, e.g. `10/Oct/2023:13:55:36 +0000`
pub const DATE_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

const HTTP_VERSION_MARKER: &str = " HTTP/";

/// HTTP methods accepted in the request line. Anything else rejects the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Trace,
    Connect,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "PATCH" => Ok(HttpMethod::Patch),
            "TRACE" => Ok(HttpMethod::Trace),
            "CONNECT" => Ok(HttpMethod::Connect),
            _ => Err(ParseError::UnknownHttpMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed line of a combined-format access log.
///
/// A `LogEntry` only exists fully populated: [`LogEntry::parse`] either
/// extracts every field or returns a [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// IP address (or host) of the client
    ip: String,
    /// Request time, normalized to UTC
    timestamp: DateTime<Utc>,
    /// HTTP method of the request
    method: HttpMethod,
    /// Requested path, query string included
    path: String,
    /// HTTP status code of the response
    status_code: u16,
    /// Response body size in bytes
    response_size: u64,
    /// Referer header, empty when the log had `-`
    referer: String,
    /// Raw User-Agent header, empty when the log had `-`
    user_agent_raw: String,
    /// Classification of `user_agent_raw`
    agent: UserAgent,
}

impl LogEntry {
    /// Parses a line in the combined log format:
    ///
    /// `IP - - [DATE] "METHOD PATH HTTP/x.y" STATUS SIZE "REFERER" "USER_AGENT"`
    ///
    /// Fields are located positionally, left to right, by their delimiters.
    /// The User-Agent is always taken from the last quoted segment.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let ip = extract_ip(line)?;
        let (timestamp, after_timestamp) = extract_timestamp(line)?;
        let request = extract_request(line, after_timestamp)?;
        let (status_code, after_status) = extract_status_code(line, request.version_start)?;
        let (response_size, after_size) = extract_response_size(line, after_status)?;
        let referer = extract_referer(line, after_size)?;
        let user_agent_raw = normalize_dash(extract_user_agent(line));

        Ok(Self {
            ip: ip.to_string(),
            timestamp,
            method: request.method,
            path: request.path.to_string(),
            status_code,
            response_size,
            referer: normalize_dash(referer),
            agent: UserAgent::classify(&user_agent_raw),
            user_agent_raw,
        })
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Request time truncated to whole Unix seconds
    pub fn epoch_second(&self) -> i64 {
        self.timestamp.timestamp()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn response_size(&self) -> u64 {
        self.response_size
    }

    pub fn referer(&self) -> &str {
        &self.referer
    }

    pub fn user_agent_raw(&self) -> &str {
        &self.user_agent_raw
    }

    pub fn agent(&self) -> &UserAgent {
        &self.agent
    }

    /// 4xx and 5xx responses
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.status_code)
    }
}

impl FromStr for LogEntry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct RequestLine<'a> {
    method: HttpMethod,
    path: &'a str,
    // byte index of the `HTTP/x.y"` token
    version_start: usize,
}

fn normalize_dash(value: &str) -> String {
    if value == "-" {
        String::new()
    } else {
        value.to_string()
    }
}

/// Finds `needle` at or after byte index `from`, returning an absolute index
fn find_from(line: &str, from: usize, needle: char) -> Option<usize> {
    line.get(from..)?.find(needle).map(|pos| from + pos)
}

/// Returns the space-terminated token starting at `from` and the index of the terminating space
fn next_token(line: &str, from: usize) -> Option<(&str, usize)> {
    let end = find_from(line, from, ' ')?;
    Some((&line[from..end], end))
}

fn extract_ip(line: &str) -> Result<&str, ParseError> {
    line.find(' ')
        .map(|space| &line[..space])
        .ok_or(ParseError::MissingClientAddress)
}

fn extract_timestamp(line: &str) -> Result<(DateTime<Utc>, usize), ParseError> {
    let open = line.find('[').ok_or(ParseError::MissingTimestamp)?;
    let close = find_from(line, open, ']').ok_or(ParseError::MissingTimestamp)?;
    let datetime_str = &line[open + 1..close];

    let datetime = DateTime::parse_from_str(datetime_str, DATE_FORMAT)
        .map_err(|_| ParseError::InvalidTimestampFormat(datetime_str.to_string()))?;

    Ok((datetime.with_timezone(&Utc), close + 1))
}

fn extract_request(line: &str, from: usize) -> Result<RequestLine<'_>, ParseError> {
    let quote = find_from(line, from, '"').ok_or(ParseError::MissingRequestLine)?;
    let method_end = find_from(line, quote + 1, ' ').ok_or(ParseError::MissingRequestLine)?;
    let method = line[quote + 1..method_end].parse::<HttpMethod>()?;

    let path_start = method_end + 1;
    let marker = line[path_start..]
        .find(HTTP_VERSION_MARKER)
        .map(|pos| path_start + pos)
        .ok_or(ParseError::MissingRequestLine)?;

    Ok(RequestLine {
        method,
        path: &line[path_start..marker],
        version_start: marker + 1,
    })
}

fn extract_status_code(line: &str, version_start: usize) -> Result<(u16, usize), ParseError> {
    let invalid = || ParseError::InvalidStatusCode(String::new());

    // Skip the `HTTP/x.y"` token itself
    let (_, version_end) = next_token(line, version_start).ok_or_else(invalid)?;
    let status_start = version_end + 1;
    let (token, status_end) = next_token(line, status_start)
        .ok_or_else(|| ParseError::InvalidStatusCode(line[status_start..].to_string()))?;

    let status_code = token
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidStatusCode(token.to_string()))?;

    Ok((status_code, status_end))
}

fn extract_response_size(line: &str, status_end: usize) -> Result<(u64, usize), ParseError> {
    let size_start = status_end + 1;
    let (token, size_end) = next_token(line, size_start).ok_or_else(|| {
        ParseError::InvalidResponseSize(line.get(size_start..).unwrap_or_default().to_string())
    })?;

    let response_size = token
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidResponseSize(token.to_string()))?;

    Ok((response_size, size_end))
}

fn extract_referer(line: &str, size_end: usize) -> Result<&str, ParseError> {
    let open = find_from(line, size_end + 1, '"').ok_or(ParseError::MissingReferer)?;
    let close = find_from(line, open + 1, '"').ok_or(ParseError::MissingReferer)?;
    Ok(&line[open + 1..close])
}

/// The User-Agent lives in the last pair of quotes, whatever precedes it
fn extract_user_agent(line: &str) -> &str {
    let Some(last) = line.rfind('"') else {
        return "";
    };
    match line[..last].rfind('"') {
        Some(second_last) => &line[second_last + 1..last],
        None => "",
    }
}
