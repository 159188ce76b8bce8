// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for enrichment runs
// reference: uses indicatif for progress bars and tracks per-row outcomes

use crate::models::ContactRecord;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub rows_processed: usize,
    /// Rows without a company name.
    pub rows_skipped: usize,
    pub empty_searches: usize,
    pub model_assisted: usize,
    pub websites_found: usize,
    pub phones_found: usize,
    pub revalidated: usize,
    pub fallbacks: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rows(&self) -> usize {
        self.rows_processed + self.rows_skipped
    }

    pub fn rows_per_minute(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.rows_processed as f64 * 60.0 / self.duration_secs as f64
    }

    pub fn website_rate(&self) -> f64 {
        percentage(self.websites_found, self.rows_processed)
    }

    pub fn phone_rate(&self) -> f64 {
        percentage(self.phones_found, self.rows_processed)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

#[derive(Default)]
struct Counters {
    rows_processed: AtomicUsize,
    rows_skipped: AtomicUsize,
    empty_searches: AtomicUsize,
    model_assisted: AtomicUsize,
    websites_found: AtomicUsize,
    phones_found: AtomicUsize,
    revalidated: AtomicUsize,
    fallbacks: AtomicUsize,
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    counters: Arc<Counters>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_rows: usize) -> Self {
        Self::with_color(total_rows, true)
    }

    pub fn with_color(total_rows: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_rows, colored)
    }

    /// Counts without drawing anything.
    pub fn hidden(total_rows: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_rows,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_rows: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_rows as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            counters: Arc::new(Counters::default()),
            start_time: Instant::now(),
        }
    }

    pub fn record_row(&self, record: &ContactRecord, model_assisted: bool) {
        let c = &self.counters;
        c.rows_processed.fetch_add(1, Ordering::SeqCst);
        if model_assisted {
            c.model_assisted.fetch_add(1, Ordering::SeqCst);
        }
        if record.has_website() {
            c.websites_found.fetch_add(1, Ordering::SeqCst);
        }
        if record.has_phone() {
            c.phones_found.fetch_add(1, Ordering::SeqCst);
        }

        match record.validation_status {
            crate::models::ValidationStatus::Revalidated => {
                c.revalidated.fetch_add(1, Ordering::SeqCst);
            }
            status if status.is_fallback() => {
                c.fallbacks.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }

        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_rows_skipped(&self) {
        self.counters.rows_skipped.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_empty_searches(&self) {
        self.counters.empty_searches.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Enrichment complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        let c = &self.counters;

        PipelineStats {
            rows_processed: c.rows_processed.load(Ordering::SeqCst),
            rows_skipped: c.rows_skipped.load(Ordering::SeqCst),
            empty_searches: c.empty_searches.load(Ordering::SeqCst),
            model_assisted: c.model_assisted.load(Ordering::SeqCst),
            websites_found: c.websites_found.load(Ordering::SeqCst),
            phones_found: c.phones_found.load(Ordering::SeqCst),
            revalidated: c.revalidated.load(Ordering::SeqCst),
            fallbacks: c.fallbacks.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let c = &self.counters;
        let message = format!(
            "Websites: {} | Phones: {} | Empty searches: {} | Skipped: {}",
            c.websites_found.load(Ordering::SeqCst),
            c.phones_found.load(Ordering::SeqCst),
            c.empty_searches.load(Ordering::SeqCst),
            c.rows_skipped.load(Ordering::SeqCst),
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}"
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars(if colored { "█▓▒░" } else { "=>-" }));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationStatus;

    #[test]
    fn test_pipeline_stats_calculations() {
        let mut stats = PipelineStats::new();
        stats.rows_processed = 40;
        stats.rows_skipped = 2;
        stats.websites_found = 30;
        stats.phones_found = 10;
        stats.duration_secs = 120;

        assert_eq!(stats.total_rows(), 42);
        assert_eq!(stats.rows_per_minute(), 20.0);
        assert_eq!(stats.website_rate(), 75.0);
        assert_eq!(stats.phone_rate(), 25.0);
    }

    #[test]
    fn test_pipeline_stats_zero_rows() {
        let stats = PipelineStats::new();
        assert_eq!(stats.rows_per_minute(), 0.0);
        assert_eq!(stats.website_rate(), 0.0);
    }

    #[test]
    fn test_tracker_counts_record_outcomes() {
        let tracker = ProgressTracker::hidden(3);

        let mut found = ContactRecord::not_found("ABC")
            .with_status(ValidationStatus::Revalidated);
        found.website_link = "https://abc.sg".to_string();
        found.phone_number = "91234567".to_string();
        tracker.record_row(&found, true);

        let fallback = ContactRecord::not_found("XYZ")
            .with_status(ValidationStatus::ReferenceFallback);
        tracker.record_row(&fallback, false);
        tracker.inc_empty_searches();
        tracker.inc_rows_skipped();

        let stats = tracker.get_stats();
        assert_eq!(stats.rows_processed, 2);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.model_assisted, 1);
        assert_eq!(stats.websites_found, 1);
        assert_eq!(stats.phones_found, 1);
        assert_eq!(stats.revalidated, 1);
        assert_eq!(stats.fallbacks, 1);
        assert_eq!(stats.empty_searches, 1);
    }
}
