use crate::log_entry::LogEntry;
use crate::user_agent::{BrowserCategory, OsCategory};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Running statistics over the entries of one log file.
///
/// Entries are folded in one at a time through [`Statistics::add_entry`];
/// nothing but the aggregates is kept. Every query is computed on demand
/// and reflects the entries seen so far.
#[derive(Debug, Default, Clone)]
pub struct Statistics {
    entry_count: usize,
    total_traffic: u64,
    human_visits: usize,
    error_requests: usize,
    min_time: Option<DateTime<Utc>>,
    max_time: Option<DateTime<Utc>>,
    existing_pages: HashSet<String>,
    non_existing_pages: HashSet<String>,
    referer_domains: HashSet<String>,
    unique_human_ips: HashSet<String>,
    os_counts: HashMap<OsCategory, usize>,
    browser_counts: HashMap<BrowserCategory, usize>,
    // human traffic only
    visits_per_second: HashMap<i64, usize>,
    visits_per_human_ip: HashMap<String, usize>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: &LogEntry) {
        self.total_traffic += entry.response_size();

        self.update_time_bounds(entry.timestamp());

        match entry.status_code() {
            200 => {
                self.existing_pages.insert(entry.path().to_string());
            }
            404 => {
                self.non_existing_pages.insert(entry.path().to_string());
            }
            _ => {}
        }

        if entry.is_error() {
            self.error_requests += 1;
        }

        if let Some(domain) = referer_domain(entry.referer()) {
            self.referer_domains.insert(domain);
        }

        let agent = entry.agent();
        if !agent.is_bot {
            self.human_visits += 1;
            self.unique_human_ips.insert(entry.ip().to_string());
            *self.visits_per_second.entry(entry.epoch_second()).or_insert(0) += 1;
            *self
                .visits_per_human_ip
                .entry(entry.ip().to_string())
                .or_insert(0) += 1;
        }

        // Bots are part of the OS and browser distribution
        *self.os_counts.entry(agent.os).or_insert(0) += 1;
        *self.browser_counts.entry(agent.browser).or_insert(0) += 1;

        self.entry_count += 1;
    }

    fn update_time_bounds(&mut self, time: DateTime<Utc>) {
        if self.min_time.map_or(true, |min| time < min) {
            self.min_time = Some(time);
        }
        if self.max_time.map_or(true, |max| time > max) {
            self.max_time = Some(time);
        }
    }

    /// Whole hours between the first and last entry, never less than 1.
    /// `None` until an entry has been added.
    pub fn hours_in_period(&self) -> Option<i64> {
        match (self.min_time, self.max_time) {
            (Some(min), Some(max)) => Some((max - min).num_hours().max(1)),
            _ => None,
        }
    }

    fn per_hour(&self, value: u64) -> f64 {
        match self.hours_in_period() {
            Some(hours) if value > 0 => value as f64 / hours as f64,
            _ => 0.0,
        }
    }

    /// Average traffic in bytes per hour
    pub fn traffic_rate(&self) -> f64 {
        self.per_hour(self.total_traffic)
    }

    /// Average number of human visits per hour
    pub fn average_visits_per_hour(&self) -> f64 {
        self.per_hour(self.human_visits as u64)
    }

    /// Average number of 4xx/5xx responses per hour
    pub fn average_error_requests_per_hour(&self) -> f64 {
        self.per_hour(self.error_requests as u64)
    }

    /// Human visits divided by the number of distinct human IPs
    pub fn average_visits_per_user(&self) -> f64 {
        if self.human_visits == 0 || self.unique_human_ips.is_empty() {
            return 0.0;
        }
        self.human_visits as f64 / self.unique_human_ips.len() as f64
    }

    /// Highest number of human visits within a single second
    pub fn peak_visits_per_second(&self) -> usize {
        self.visits_per_second.values().copied().max().unwrap_or(0)
    }

    /// Highest number of visits made by a single human IP
    pub fn max_visits_by_single_user(&self) -> usize {
        self.visits_per_human_ip.values().copied().max().unwrap_or(0)
    }

    /// Share of each operating system among all entries, in `[0, 1]`
    pub fn os_statistics(&self) -> HashMap<OsCategory, f64> {
        shares(&self.os_counts, self.entry_count)
    }

    /// Share of each browser among all entries, in `[0, 1]`
    pub fn browser_statistics(&self) -> HashMap<BrowserCategory, f64> {
        shares(&self.browser_counts, self.entry_count)
    }

    /// Paths answered with 200
    pub fn existing_pages(&self) -> HashSet<String> {
        self.existing_pages.clone()
    }

    /// Paths answered with 404
    pub fn non_existing_pages(&self) -> HashSet<String> {
        self.non_existing_pages.clone()
    }

    /// Domains of the sites that link here
    pub fn referer_domains(&self) -> HashSet<String> {
        self.referer_domains.clone()
    }

    pub fn unique_human_ips(&self) -> HashSet<String> {
        self.unique_human_ips.clone()
    }

    pub fn existing_pages_count(&self) -> usize {
        self.existing_pages.len()
    }

    pub fn non_existing_pages_count(&self) -> usize {
        self.non_existing_pages.len()
    }

    pub fn referer_domains_count(&self) -> usize {
        self.referer_domains.len()
    }

    pub fn unique_human_ips_count(&self) -> usize {
        self.unique_human_ips.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn total_traffic(&self) -> u64 {
        self.total_traffic
    }

    pub fn human_visits(&self) -> usize {
        self.human_visits
    }

    pub fn error_requests(&self) -> usize {
        self.error_requests
    }

    pub fn min_time(&self) -> Option<DateTime<Utc>> {
        self.min_time
    }

    pub fn max_time(&self) -> Option<DateTime<Utc>> {
        self.max_time
    }

    /// Most frequent human IPs, most active first
    pub fn top_human_ips(&self, n: usize) -> Vec<(String, usize)> {
        let mut top: Vec<(String, usize)> = self
            .visits_per_human_ip
            .iter()
            .map(|(ip, count)| (ip.clone(), *count))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(n);
        top
    }
}

fn shares<K: Copy + Eq + std::hash::Hash>(counts: &HashMap<K, usize>, total: usize) -> HashMap<K, f64> {
    if total == 0 {
        return HashMap::new();
    }
    counts
        .iter()
        .map(|(key, count)| (*key, *count as f64 / total as f64))
        .collect()
}

/// Resolves a referer to the domain of the linking site.
///
/// Well-formed references are parsed strictly and only contribute when they
/// carry a host, so a relative reference such as `example.com/page` yields
/// `None`. Malformed referers go through a lenient strip of scheme, `www.`,
/// path and port.
pub fn referer_domain(referer: &str) -> Option<String> {
    if referer.is_empty() || referer == "-" {
        return None;
    }

    match Url::parse(referer) {
        Ok(url) => {
            let host = url.host_str()?;
            let host = host.strip_prefix("www.").unwrap_or(host);
            (!host.is_empty()).then(|| host.to_string())
        }
        Err(url::ParseError::RelativeUrlWithoutBase) if is_well_formed_reference(referer) => None,
        Err(_) => extract_domain_manually(referer),
    }
}

/// A relative reference without characters that are illegal in a URI
fn is_well_formed_reference(referer: &str) -> bool {
    !referer.chars().any(|c| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
    })
}

fn extract_domain_manually(referer: &str) -> Option<String> {
    let lowered = referer.to_lowercase();
    let mut domain = lowered
        .strip_prefix("http://")
        .or_else(|| lowered.strip_prefix("https://"))
        .unwrap_or(lowered.as_str());
    domain = domain.strip_prefix("www.").unwrap_or(domain);

    if let Some(slash) = domain.find('/').filter(|&pos| pos > 0) {
        domain = &domain[..slash];
    }
    if let Some(colon) = domain.find(':').filter(|&pos| pos > 0) {
        domain = &domain[..colon];
    }

    (!domain.is_empty()).then(|| domain.to_string())
}
