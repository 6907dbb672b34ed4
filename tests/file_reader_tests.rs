use logstat::error::{AnalysisError, ParseError};
use logstat::file_reader::{FileReader, FileReport};
use logstat::settings::AnalyzerSettings;
use logstat::user_agent::SearchCrawler;
use std::io::Write;
use tempfile::NamedTempFile;

const HUMAN_LINE: &str = r#"192.168.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 1043 "https://www.example.com/" "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36""#;
const GOOGLEBOT_LINE: &str = r#"66.249.66.1 - - [10/Oct/2023:14:10:00 +0000] "GET /robots.txt HTTP/1.1" 200 68 "-" "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)""#;
const YANDEXBOT_LINE: &str = r#"5.255.253.1 - - [10/Oct/2023:15:20:00 +0000] "GET /missing HTTP/1.1" 404 153 "-" "Mozilla/5.0 (compatible; YandexBot/3.0; +http://yandex.com/bots)""#;
const BROKEN_SIZE_LINE: &str = r#"192.168.0.2 - - [10/Oct/2023:13:56:00 +0000] "GET / HTTP/1.1" 304 - "-" "-""#;

fn create_test_log_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[tokio::test]
async fn test_analyze_counts_lines_and_entries() {
    let content = format!(
        "{}\n{}\n{}\n{}\nnot a log line\n",
        HUMAN_LINE, GOOGLEBOT_LINE, BROKEN_SIZE_LINE, YANDEXBOT_LINE
    );
    let temp_file = create_test_log_file(&content);

    let reader = FileReader::new(temp_file.path(), AnalyzerSettings::default());
    assert_eq!(reader.file_path(), temp_file.path());
    let report = reader.analyze().await.unwrap();

    assert_eq!(report.total_lines, 5);
    assert_eq!(report.parse_errors, 2);
    assert_eq!(report.statistics.entry_count(), 3);
    assert_eq!(report.statistics.total_traffic(), 1043 + 68 + 153);
    assert_eq!(report.statistics.human_visits(), 1);
    assert_eq!(report.statistics.error_requests(), 1);
    assert!(report.statistics.referer_domains().contains("example.com"));
}

#[tokio::test]
async fn test_analyze_tallies_search_crawlers() {
    let content = format!(
        "{}\n{}\n{}\n{}\n",
        GOOGLEBOT_LINE, GOOGLEBOT_LINE, YANDEXBOT_LINE, HUMAN_LINE
    );
    let temp_file = create_test_log_file(&content);

    let report = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.crawler_hits.googlebot, 2);
    assert_eq!(report.crawler_hits.yandexbot, 1);
    assert_eq!(report.crawler_hits.get(SearchCrawler::Googlebot), 2);
    assert_eq!(report.crawler_hits.total(), 3);
    assert_eq!(report.percent_of_entries(report.crawler_hits.total()), 75.0);
}

#[tokio::test]
async fn test_long_line_aborts_analysis() {
    let long_line = "x".repeat(1025);
    let content = format!("{}\n{}\n{}\n", HUMAN_LINE, long_line, HUMAN_LINE);
    let temp_file = create_test_log_file(&content);

    let result = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await;

    match result {
        Err(AnalysisError::LineTooLong {
            line_number,
            length,
            limit,
        }) => {
            assert_eq!(line_number, 2);
            assert_eq!(length, 1025);
            assert_eq!(limit, 1024);
        }
        other => panic!("expected LineTooLong, got {:?}", other),
    }
}

#[tokio::test]
async fn test_line_at_limit_is_only_a_parse_error() {
    let content = format!("{}\n{}\n", "x".repeat(1024), HUMAN_LINE);
    let temp_file = create_test_log_file(&content);

    let report = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.total_lines, 2);
    assert_eq!(report.parse_errors, 1);
    assert_eq!(report.statistics.entry_count(), 1);
}

#[tokio::test]
async fn test_line_length_is_counted_in_characters() {
    // 600 two-byte characters: 1200 bytes but within the limit
    let content = format!("{}\n", "é".repeat(600));
    let temp_file = create_test_log_file(&content);

    let report = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.parse_errors, 1);
}

#[tokio::test]
async fn test_astral_characters_count_once() {
    let content = format!("{}\n", "😀".repeat(1000));
    let temp_file = create_test_log_file(&content);

    let report = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.total_lines, 1);
    assert_eq!(report.parse_errors, 1);
}

#[tokio::test]
async fn test_custom_line_limit() {
    let content = format!("{}\n", HUMAN_LINE);
    let temp_file = create_test_log_file(&content);
    let settings = AnalyzerSettings {
        max_line_length: 100,
        ..AnalyzerSettings::default()
    };

    let result = FileReader::new(temp_file.path(), settings).analyze().await;
    assert!(matches!(
        result,
        Err(AnalysisError::LineTooLong { line_number: 1, .. })
    ));
}

#[tokio::test]
async fn test_crlf_line_endings() {
    let content = format!("{}\r\n{}\r\n", HUMAN_LINE, GOOGLEBOT_LINE);
    let temp_file = create_test_log_file(&content);

    let report = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.parse_errors, 0);
    assert_eq!(report.statistics.entry_count(), 2);
}

#[tokio::test]
async fn test_empty_file() {
    let temp_file = create_test_log_file("");

    let report = FileReader::new(temp_file.path(), AnalyzerSettings::default())
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.total_lines, 0);
    assert_eq!(report.statistics.entry_count(), 0);
    assert_eq!(report.percent_of_entries(0), 0.0);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");

    let result = FileReader::new(&path, AnalyzerSettings::default())
        .analyze()
        .await;
    assert!(matches!(result, Err(AnalysisError::Io(_))));
}

#[test]
fn test_process_line_keeps_going_after_errors() {
    let mut report = FileReport::default();

    assert!(report.process_line(HUMAN_LINE).is_ok());
    assert_eq!(
        report.process_line(BROKEN_SIZE_LINE),
        Err(ParseError::InvalidResponseSize("-".to_string()))
    );
    assert!(report.process_line(GOOGLEBOT_LINE).is_ok());

    assert_eq!(report.total_lines, 3);
    assert_eq!(report.parse_errors, 1);
    assert_eq!(report.statistics.entry_count(), 2);
    assert_eq!(report.crawler_hits.googlebot, 1);
}
