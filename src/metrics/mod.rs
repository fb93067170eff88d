//! Prometheus metrics for evaluation runs and the HTTP surface

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub signal_evaluations_total: IntCounter,
    pub signal_evaluations_active: IntGauge,
    pub signal_evaluation_duration_seconds: Histogram,
    /// Per-pair result: created, duplicate, rejected, skipped, timeout, error
    pub signal_outcomes_total: IntCounterVec,
    pub database_connected: Gauge,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signal_evaluations_total = IntCounter::new(
            "signal_evaluations_total",
            "Total number of (symbol, timeframe) evaluations",
        )?;
        let signal_evaluations_active = IntGauge::new(
            "signal_evaluations_active",
            "Evaluations currently in progress",
        )?;
        let signal_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signal_evaluation_duration_seconds",
                "Duration of one evaluation including fetch and store",
            )
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
        )?;
        let signal_outcomes_total = IntCounterVec::new(
            Opts::new("signal_outcomes_total", "Evaluation outcomes by kind"),
            &["outcome"],
        )?;
        let database_connected = Gauge::new(
            "database_connected",
            "1 when the signal store is reachable",
        )?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests being served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(signal_evaluations_total.clone()))?;
        registry.register(Box::new(signal_evaluations_active.clone()))?;
        registry.register(Box::new(signal_evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(signal_outcomes_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            signal_evaluations_total,
            signal_evaluations_active,
            signal_evaluation_duration_seconds,
            signal_outcomes_total,
            database_connected,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.signal_outcomes_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Render every registered metric in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
