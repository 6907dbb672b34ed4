use crate::file_reader::FileReport;
use crate::user_agent::SearchCrawler;
use std::fmt::{self, Write};

const RULE: &str = "════════════════════════════════════════════════";

/// Formats a byte count in human readable units
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        0..KB => format!("{} B", bytes),
        KB..MB => format!("{:.1} KB", bytes as f64 / KB as f64),
        MB..GB => format!("{:.1} MB", bytes as f64 / MB as f64),
        _ => format!("{:.1} GB", bytes as f64 / GB as f64),
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> fmt::Result {
    writeln!(out, "\n═══════════ {} ═══════════", title)
}

fn sorted_shares<K: ToString>(shares: impl IntoIterator<Item = (K, f64)>) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = shares
        .into_iter()
        .map(|(key, share)| (key.to_string(), share))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

fn sorted_set(set: impl IntoIterator<Item = String>, top: usize) -> Vec<String> {
    let mut items: Vec<String> = set.into_iter().collect();
    items.sort();
    items.truncate(top);
    items
}

/// Renders the console report for one analysed file
pub fn render(report: &FileReport, top: usize) -> String {
    let mut out = String::new();
    // Writing into a String never fails
    let _ = write_report(&mut out, report, top);
    out
}

/// Writes the console report for one analysed file, listing at most `top`
/// items per section
pub fn write_report<W: Write>(out: &mut W, report: &FileReport, top: usize) -> fmt::Result {
    let stats = &report.statistics;

    section(out, "ANALYSIS RESULTS")?;
    writeln!(out, "Total lines:            {}", report.total_lines)?;
    writeln!(out, "Parsed entries:         {}", stats.entry_count())?;
    writeln!(out, "Parse errors:           {}", report.parse_errors)?;
    for crawler in [SearchCrawler::Googlebot, SearchCrawler::YandexBot] {
        writeln!(
            out,
            "{:<24}{}",
            format!("{} requests:", crawler),
            report.crawler_hits.get(crawler)
        )?;
    }

    section(out, "TRAFFIC")?;
    writeln!(
        out,
        "Total traffic:          {} ({} bytes)",
        format_size(stats.total_traffic()),
        stats.total_traffic()
    )?;
    if let (Some(min), Some(max), Some(hours)) =
        (stats.min_time(), stats.max_time(), stats.hours_in_period())
    {
        writeln!(
            out,
            "Period:                 {} - {}",
            min.format("%Y-%m-%d %H:%M:%S"),
            max.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out, "Hours in period:        {}", hours)?;
    }
    writeln!(out, "Traffic per hour:       {:.2} bytes", stats.traffic_rate())?;
    writeln!(out, "Error requests:         {}", stats.error_requests())?;
    writeln!(
        out,
        "Errors per hour:        {:.2}",
        stats.average_error_requests_per_hour()
    )?;

    section(out, "VISITORS")?;
    writeln!(out, "Human visits:           {}", stats.human_visits())?;
    writeln!(out, "Unique human IPs:       {}", stats.unique_human_ips_count())?;
    writeln!(out, "Visits per hour:        {:.2}", stats.average_visits_per_hour())?;
    writeln!(out, "Visits per user:        {:.2}", stats.average_visits_per_user())?;
    writeln!(out, "Peak visits per second: {}", stats.peak_visits_per_second())?;
    writeln!(out, "Max visits by one user: {}", stats.max_visits_by_single_user())?;
    for (ip, count) in stats.top_human_ips(top) {
        writeln!(out, "  {:<22}{}", ip, count)?;
    }

    if stats.entry_count() > 0 {
        section(out, "REQUEST SHARES")?;
        for crawler in [SearchCrawler::Googlebot, SearchCrawler::YandexBot] {
            writeln!(
                out,
                "{:<24}{:.2}%",
                format!("{}:", crawler),
                report.percent_of_entries(report.crawler_hits.get(crawler))
            )?;
        }
        let crawler_share = report.percent_of_entries(report.crawler_hits.total());
        writeln!(out, "Search crawlers total:  {:.2}%", crawler_share)?;
        writeln!(out, "Other requests:         {:.2}%", 100.0 - crawler_share)?;

        section(out, "OPERATING SYSTEMS")?;
        for (os, share) in sorted_shares(stats.os_statistics()) {
            writeln!(out, "  {:<22}{:.2}%", os, share * 100.0)?;
        }

        section(out, "BROWSERS")?;
        for (browser, share) in sorted_shares(stats.browser_statistics()) {
            writeln!(out, "  {:<22}{:.2}%", browser, share * 100.0)?;
        }
    } else {
        writeln!(out, "\nNo entries were parsed, shares are not available")?;
    }

    section(out, "PAGES")?;
    writeln!(out, "Existing pages (200):   {}", stats.existing_pages_count())?;
    for page in sorted_set(stats.existing_pages(), top) {
        writeln!(out, "  {}", page)?;
    }
    writeln!(out, "Missing pages (404):    {}", stats.non_existing_pages_count())?;
    for page in sorted_set(stats.non_existing_pages(), top) {
        writeln!(out, "  {}", page)?;
    }

    section(out, "REFERERS")?;
    writeln!(out, "Referer domains:        {}", stats.referer_domains_count())?;
    for domain in sorted_set(stats.referer_domains(), top) {
        writeln!(out, "  {}", domain)?;
    }

    writeln!(out, "{}", RULE)
}
