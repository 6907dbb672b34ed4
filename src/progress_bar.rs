use std::io::Write;
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 50;

/// Formats a duration as `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Single-line console progress indicator driven by the number of bytes read
pub struct ProgressBar {
    start_time: Instant,
    last_update_time: Instant,
    last_percent: f64,
    total_bytes: u64,
    processed_bytes: u64,
    processed_lines: usize,
}

impl ProgressBar {
    pub fn new(total_bytes: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update_time: now,
            last_percent: 0.0,
            total_bytes,
            processed_bytes: 0,
            processed_lines: 0,
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.processed_bytes as f64 / self.total_bytes as f64 * 100.0).min(100.0)
    }

    /// Records one more line of `bytes` bytes and redraws when enough changed
    pub fn advance(&mut self, bytes: u64) {
        self.processed_bytes += bytes;
        self.processed_lines += 1;

        let now = Instant::now();
        let percent = self.percent();
        // Throttle redraws: every 100ms or on a full percent step
        if now.duration_since(self.last_update_time).as_millis() > 100
            || (percent - self.last_percent).abs() >= 1.0
        {
            self.draw(percent);
            self.last_update_time = now;
            self.last_percent = percent;
        }
    }

    pub fn finish(&mut self) {
        self.draw(100.0);
        println!();
    }

    fn draw(&self, percent: f64) {
        let filled_width = ((percent / 100.0) * BAR_WIDTH as f64) as usize;
        let filled = "█".repeat(filled_width);
        let empty = "░".repeat(BAR_WIDTH - filled_width.min(BAR_WIDTH));

        let elapsed = self.start_time.elapsed();
        let remaining = if percent > 0.0 {
            (elapsed.as_secs_f64() * 100.0 / percent - elapsed.as_secs_f64()).max(0.0)
        } else {
            0.0
        };
        let rate = if elapsed.as_secs_f64() > 0.0 {
            self.processed_lines as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        print!(
            "\rAnalyzing [{}{}] {}% ({} lines) {:.1} lines/s ETA: {}   ",
            filled,
            empty,
            percent as i32,
            self.processed_lines,
            rate,
            format_duration(Duration::from_secs_f64(remaining))
        );
        let _ = std::io::stdout().flush();
    }
}
