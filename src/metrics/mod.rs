//! Metrics and monitoring for the match-analytics service

pub mod collector;

pub use collector::{EventMetrics, MetricsCollector, MetricsTimer, ServiceMetrics};
