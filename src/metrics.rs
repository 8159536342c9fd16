//! Performance metrics and statistics tracking for the dashboard.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the prediction pipeline
pub struct DashboardMetrics {
    /// Total successful predictions served
    pub predictions_total: AtomicU64,
    /// Inference calls that failed after a valid input was assembled
    pub prediction_faults: AtomicU64,
    /// Requests rejected during input validation
    pub rejected_inputs: AtomicU64,
    /// Predictions by stress level label
    by_level: RwLock<HashMap<String, u64>>,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for uptime and rate calculation
    start_time: Instant,
}

impl DashboardMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_total: AtomicU64::new(0),
            prediction_faults: AtomicU64::new(0),
            rejected_inputs: AtomicU64::new(0),
            by_level: RwLock::new(HashMap::new()),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, latency: Duration, level_label: &str) {
        self.predictions_total.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.latencies.write() {
            times.push(latency.as_micros() as u64);
            // Keep only the most recent window for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Ok(mut by_level) = self.by_level.write() {
            *by_level.entry(level_label.to_string()).or_insert(0) += 1;
        }
    }

    /// Record an inference fault
    pub fn record_fault(&self) {
        self.prediction_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected input vector
    pub fn record_rejected(&self) {
        self.rejected_inputs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let times = self.latencies.read().unwrap();
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get predictions by stress level
    pub fn get_by_level(&self) -> HashMap<String, u64> {
        self.by_level.read().unwrap().clone()
    }

    /// Seconds since the collector started
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Point-in-time snapshot for the stats endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_total: self.predictions_total.load(Ordering::Relaxed),
            prediction_faults: self.prediction_faults.load(Ordering::Relaxed),
            rejected_inputs: self.rejected_inputs.load(Ordering::Relaxed),
            by_level: self.get_by_level(),
            latency: self.get_latency_stats(),
            uptime_secs: self.uptime_secs(),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            predictions = snapshot.predictions_total,
            faults = snapshot.prediction_faults,
            rejected = snapshot.rejected_inputs,
            mean_latency_us = snapshot.latency.mean_us,
            p99_latency_us = snapshot.latency.p99_us,
            uptime_secs = snapshot.uptime_secs,
            "Dashboard metrics summary"
        );
        for (level, count) in &snapshot.by_level {
            info!(level = %level, count = count, "Predictions by level");
        }
    }
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics over the recent window
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable snapshot of all counters
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_total: u64,
    pub prediction_faults: u64,
    pub rejected_inputs: u64,
    pub by_level: HashMap<String, u64>,
    pub latency: LatencyStats,
    pub uptime_secs: u64,
}

/// Periodic reporter that logs metric summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<DashboardMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<DashboardMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = DashboardMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), "Low");
        metrics.record_prediction(Duration::from_micros(200), "High");
        metrics.record_prediction(Duration::from_micros(300), "Low");
        metrics.record_fault();
        metrics.record_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.predictions_total, 3);
        assert_eq!(snapshot.prediction_faults, 1);
        assert_eq!(snapshot.rejected_inputs, 1);
        assert_eq!(snapshot.by_level.get("Low"), Some(&2));
        assert_eq!(snapshot.by_level.get("High"), Some(&1));
    }

    #[test]
    fn test_latency_stats() {
        let metrics = DashboardMetrics::new();
        for us in [100, 200, 300, 400] {
            metrics.record_prediction(Duration::from_micros(us), "Medium");
        }

        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean_us, 250);
        assert_eq!(stats.max_us, 400);
    }

    #[test]
    fn test_empty_latency_stats() {
        let metrics = DashboardMetrics::new();
        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_us, 0);
    }
}
