use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds) and how many times each stage ran
    fetch: StageTimer,
    extract: StageTimer,
    completion: StageTimer,
    insert: StageTimer,

    // Counts
    total_pages_extracted: AtomicUsize,
}

#[derive(Default)]
struct StageTimer {
    total_us: AtomicU64,
    runs: AtomicUsize,
}

impl StageTimer {
    fn record(&self, duration: Duration) {
        self.total_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    fn avg_ms(&self) -> f64 {
        let total = self.total_us.load(Ordering::Relaxed) as f64;
        let cnt = self.runs.load(Ordering::Relaxed) as f64;
        if cnt > 0.0 {
            total / cnt / 1000.0 // Convert to ms
        } else {
            0.0
        }
    }
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            fetch: StageTimer::default(),
            extract: StageTimer::default(),
            completion: StageTimer::default(),
            insert: StageTimer::default(),
            total_pages_extracted: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_fetch(&self, duration: Duration) {
        self.fetch.record(duration);
    }

    pub fn record_extract(&self, duration: Duration, pages: usize) {
        self.extract.record(duration);
        self.total_pages_extracted.fetch_add(pages, Ordering::Relaxed);
    }

    pub fn record_completion(&self, duration: Duration) {
        self.completion.record(duration);
    }

    pub fn record_insert(&self, duration: Duration) {
        self.insert.record(duration);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            avg_fetch_time_ms: self.fetch.avg_ms(),
            avg_extract_time_ms: self.extract.avg_ms(),
            avg_completion_time_ms: self.completion.avg_ms(),
            avg_insert_time_ms: self.insert.avg_ms(),
            total_pages_extracted: self.total_pages_extracted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub avg_fetch_time_ms: f64,
    pub avg_extract_time_ms: f64,
    pub avg_completion_time_ms: f64,
    pub avg_insert_time_ms: f64,
    pub total_pages_extracted: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_counters() {
        let metrics = Metrics::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_request(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.successful_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
    }

    #[test]
    fn test_stage_average() {
        let metrics = Metrics::new();
        metrics.record_extract(Duration::from_millis(10), 2);
        metrics.record_extract(Duration::from_millis(30), 5);

        let snapshot = metrics.snapshot();
        assert!((snapshot.avg_extract_time_ms - 20.0).abs() < 1e-9);
        assert_eq!(snapshot.total_pages_extracted, 7);
        assert_eq!(snapshot.avg_fetch_time_ms, 0.0);
    }
}
