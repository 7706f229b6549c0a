//! Prometheus counters for rewards business events.
//!
//! All metrics follow the naming convention: `rewards_<area>_<metric>_total`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Users created, by source (register/referral/sync)
    pub static ref USERS_REGISTERED: CounterVec = CounterVec::new(
        Opts::new("rewards_users_registered_total", "Users created"),
        &["source"]
    ).expect("metric creation failed");

    /// Referral bonuses credited
    pub static ref REFERRALS_PROCESSED: Counter = Counter::new(
        "rewards_referrals_processed_total",
        "Referral bonuses credited to referrers"
    ).expect("metric creation failed");

    /// Sessions completed, by whether the cycle restarted
    pub static ref SESSIONS_COMPLETED: CounterVec = CounterVec::new(
        Opts::new("rewards_sessions_completed_total", "Sessions completed"),
        &["cycle_reset"]  // "true" / "false"
    ).expect("metric creation failed");

    /// Session unlocks, by trigger
    pub static ref SESSION_UNLOCKS: CounterVec = CounterVec::new(
        Opts::new("rewards_session_unlocks_total", "Sessions unlocked"),
        &["trigger"]  // countdown/forced
    ).expect("metric creation failed");

    /// Withdrawal requests recorded
    pub static ref WITHDRAWALS_REQUESTED: Counter = Counter::new(
        "rewards_withdrawals_requested_total",
        "Pending withdrawal records created"
    ).expect("metric creation failed");

    /// Units debited by withdrawals
    pub static ref WITHDRAWN_UNITS: Counter = Counter::new(
        "rewards_withdrawn_units_total",
        "Balance units debited by withdrawal requests"
    ).expect("metric creation failed");

    /// Core errors by kind
    pub static ref CORE_ERRORS: CounterVec = CounterVec::new(
        Opts::new("rewards_core_errors_total", "Errors returned by the rewards core"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(USERS_REGISTERED.clone()),
        Box::new(REFERRALS_PROCESSED.clone()),
        Box::new(SESSIONS_COMPLETED.clone()),
        Box::new(SESSION_UNLOCKS.clone()),
        Box::new(WITHDRAWALS_REQUESTED.clone()),
        Box::new(WITHDRAWN_UNITS.clone()),
        Box::new(CORE_ERRORS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
