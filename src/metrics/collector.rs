//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the match-analytics service
//! using Prometheus metrics.

use crate::stats::StatChange;
use crate::types::EventKind;
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the match-analytics service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Match event metrics
    event_metrics: EventMetrics,

    /// Request and storage metrics
    service_metrics: ServiceMetrics,
}

/// Match event and player stat metrics
#[derive(Clone)]
pub struct EventMetrics {
    /// Events recorded by kind
    pub events_recorded_total: IntCounterVec,

    /// Player records saved by the stat updater, by stat
    pub player_updates_total: IntCounterVec,

    /// Players whose rating reached the upper bound
    pub players_at_max_rating: IntGauge,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// API request duration by operation
    pub request_duration_seconds: HistogramVec,

    /// Storage failures by operation
    pub storage_errors_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let event_metrics = EventMetrics::new(&registry)?;
        let service_metrics = ServiceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            event_metrics,
            service_metrics,
        })
    }

    /// Get event metrics
    pub fn events(&self) -> &EventMetrics {
        &self.event_metrics
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Record a stored event and the player updates it caused
    pub fn record_event(&self, kind: EventKind, changes: &[StatChange]) {
        self.event_metrics
            .events_recorded_total
            .with_label_values(&[kind.as_label()])
            .inc();

        for change in changes {
            self.event_metrics
                .player_updates_total
                .with_label_values(&[change.stat.as_label()])
                .inc();
        }
    }

    /// Set the number of players currently at the rating cap
    pub fn set_players_at_max_rating(&self, count: usize) {
        self.event_metrics.players_at_max_rating.set(count as i64);
    }

    /// Record an API request duration
    pub fn record_request(&self, operation: &str, duration: Duration) {
        self.service_metrics
            .request_duration_seconds
            .with_label_values(&[operation])
            .observe(duration.as_secs_f64());
    }

    /// Record a storage failure
    pub fn record_storage_error(&self, operation: &str) {
        self.service_metrics
            .storage_errors_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Encode all registered metrics in the Prometheus text format
    pub fn encode_text(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl EventMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let events_recorded_total = IntCounterVec::new(
            Opts::new("match_analytics_events_recorded_total", "Total match events recorded"),
            &["kind"],
        )?;
        registry.register(Box::new(events_recorded_total.clone()))?;

        let player_updates_total = IntCounterVec::new(
            Opts::new("match_analytics_player_updates_total", "Total player stat updates saved"),
            &["stat"],
        )?;
        registry.register(Box::new(player_updates_total.clone()))?;

        let players_at_max_rating = IntGauge::new(
            "match_analytics_players_at_max_rating",
            "Players whose form rating is at the upper bound",
        )?;
        registry.register(Box::new(players_at_max_rating.clone()))?;

        Ok(Self {
            events_recorded_total,
            player_updates_total,
            players_at_max_rating,
        })
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "match_analytics_request_duration_seconds",
                "API request duration",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["operation"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let storage_errors_total = IntCounterVec::new(
            Opts::new("match_analytics_storage_errors_total", "Total storage failures"),
            &["operation"],
        )?;
        registry.register(Box::new(storage_errors_total.clone()))?;

        let health_status = IntGauge::new(
            "match_analytics_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("match_analytics_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            request_duration_seconds,
            storage_errors_total,
            health_status,
            component_health,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKind;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        let _events = collector.events();
        let _service = collector.service();
    }

    #[test]
    fn test_event_recording() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        let changes = vec![
            StatChange {
                player_id: 1,
                stat: StatKind::Goals,
                old_rating: 6.0,
                new_rating: 7.0,
            },
            StatChange {
                player_id: 2,
                stat: StatKind::Assists,
                old_rating: 6.0,
                new_rating: 6.5,
            },
        ];
        collector.record_event(EventKind::Goal, &changes);
        collector.record_event(EventKind::Other, &[]);

        let events = &collector.events().events_recorded_total;
        assert_eq!(events.with_label_values(&["goal"]).get(), 1);
        assert_eq!(events.with_label_values(&["other"]).get(), 1);

        let updates = &collector.events().player_updates_total;
        assert_eq!(updates.with_label_values(&["goals"]).get(), 1);
        assert_eq!(updates.with_label_values(&["assists"]).get(), 1);
    }

    #[test]
    fn test_text_encoding_contains_prefix() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");
        collector.record_request("fetch_match", Duration::from_millis(3));
        collector.record_storage_error("create_event");
        collector.update_health_status(2);

        let text = collector.encode_text().unwrap();
        assert!(text.contains("match_analytics_request_duration_seconds"));
        assert!(text.contains("match_analytics_storage_errors_total"));
    }

    #[test]
    fn test_metrics_timer() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");
        let timer = collector.start_timer();

        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.elapsed();

        assert!(duration >= Duration::from_millis(10));
    }
}
