use logstat::file_reader::FileReport;
use logstat::report::{format_size, render, write_report};

const LINES: [&str; 3] = [
    r#"192.168.0.1 - - [10/Oct/2023:10:00:00 +0000] "GET /index.html HTTP/1.1" 200 2048 "https://www.example.com/" "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0""#,
    r#"192.168.0.1 - - [10/Oct/2023:12:00:00 +0000] "GET /gone HTTP/1.1" 404 100 "-" "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0""#,
    r#"66.249.66.1 - - [10/Oct/2023:12:30:00 +0000] "GET /robots.txt HTTP/1.1" 200 52 "-" "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)""#,
];

#[test]
fn test_format_size() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(2048), "2.0 KB");
    assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
}

#[test]
fn test_render_report() {
    let mut report = FileReport::default();
    for line in LINES {
        report.process_line(line).unwrap();
    }
    let _ = report.process_line("broken");

    let text = render(&report, 10);

    assert!(text.contains("Total lines:            4"));
    assert!(text.contains("Parsed entries:         3"));
    assert!(text.contains("Parse errors:           1"));
    assert!(text.contains("Googlebot requests:     1"));
    assert!(text.contains("Hours in period:        2"));
    assert!(text.contains("Human visits:           2"));
    assert!(text.contains("/index.html"));
    assert!(text.contains("/gone"));
    assert!(text.contains("example.com"));
    assert!(text.contains("Firefox"));
    assert!(text.contains("Googlebot:              33.33%"));
}

#[test]
fn test_render_empty_report() {
    let text = render(&FileReport::default(), 10);

    assert!(text.contains("Parsed entries:         0"));
    assert!(text.contains("No entries were parsed"));
    assert!(!text.contains("Period:"));
}

#[test]
fn test_write_report_matches_render() {
    let mut report = FileReport::default();
    report.process_line(LINES[0]).unwrap();

    let mut out = String::new();
    assert!(write_report(&mut out, &report, 5).is_ok());
    assert_eq!(out, render(&report, 5));
    assert!(out.ends_with("════════════════════════════════════════════════\n"));
}
