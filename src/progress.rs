use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Progress display for a replay run
pub struct ReplayProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
    total_frames: u64,
    frame_rate: f64,
    processed_frames: u64,
}

impl ReplayProgress {
    /// Creates a progress bar over `total_frames`; hidden when `headless`
    pub fn new(total_frames: u64, frame_rate: f64, headless: bool) -> Result<Self> {
        let progress_bar = if headless {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total_frames)
        };

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) | {msg}")?
            .progress_chars("#>-");
        progress_bar.set_style(style);
        progress_bar.set_message("Starting...");

        Ok(Self {
            progress_bar,
            start_time: Instant::now(),
            total_frames,
            frame_rate,
            processed_frames: 0,
        })
    }

    /// Advances by one frame, showing possession holder in the message
    pub fn update_frame(&mut self, team_possession: Option<&str>) {
        self.processed_frames += 1;
        self.progress_bar.inc(1);
        let msg = self.progress_message(team_possession);
        self.progress_bar.set_message(msg);
    }

    fn progress_message(&self, team_possession: Option<&str>) -> String {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 {
            self.processed_frames as f64 / elapsed
        } else {
            0.0
        };
        format!(
            "{} / {} | Ball: {} | Speed: {:.1} fps",
            format_duration(self.processed_frames as f64 / self.frame_rate),
            format_duration(self.total_frames as f64 / self.frame_rate),
            team_possession.unwrap_or("-"),
            speed
        )
    }

    pub fn finish(&self) {
        let processing_time = format_duration(self.start_time.elapsed().as_secs_f64());
        self.progress_bar.finish_with_message(format!(
            "Completed! Match time: {} | Processing: {}",
            format_duration(self.processed_frames as f64 / self.frame_rate),
            processing_time
        ));
    }

    pub fn processed_frames(&self) -> u64 {
        self.processed_frames
    }
}

/// Formats a duration in seconds to h:mm:ss format
fn format_duration(seconds: f64) -> String {
    let total_seconds = if seconds.is_finite() { seconds as u64 } else { 0 };
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
