//! Application configuration.
//!
//! One `Config` struct parsed from environment variables at startup,
//! following the teacher's `models::Config::from_env` shape: `dotenv`
//! loads a local `.env` first, every field has a documented default, and
//! parse failures fall back rather than panic (except where a malformed
//! value would silently corrupt behavior, in which case we bail).

use anyhow::{Context, Result};
use std::time::Duration;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_duration_secs(key: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_or(key, default_secs))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration: Duration,

    /// §4.2 detector defaults.
    pub default_threshold_pct: f64,
    pub debounce_duration: Duration,
    pub delta_pct_for_realert: f64,

    /// §4.3 reason engine defaults.
    pub reason_lookback: Duration,
    pub reason_trailing: Duration,
    pub proximity_horizon: Duration,
    pub adapter_timeout: Duration,
    pub adapter_retry_budget: u32,
    pub reason_fetch_concurrency: usize,
    pub reason_engine_workers: usize,
    pub reason_queue_capacity: usize,

    /// §4.5 notifier defaults.
    pub cooldown_in_app: Duration,
    pub cooldown_email: Duration,

    /// §4.6 brief builder defaults.
    pub brief_lookback: Duration,
    pub brief_top_n: usize,
    pub brief_min_items: usize,

    /// §4.9 evidence compare defaults.
    pub min_compare_items: usize,
    pub compare_polarity_threshold: f64,

    /// §5 HTTP handler timeout.
    pub http_request_timeout: Duration,

    /// Allowed CORS origins; empty means "reflect nothing" (locked down).
    pub cors_allowed_ports: Vec<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            "dev-secret-change-in-production-minimum-32-characters".to_string()
        });

        let cors_allowed_ports = std::env::var("CORS_ALLOWED_PORTS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u16>().ok())
            .collect();

        Ok(Self {
            port: env_or("PORT", 8080),
            jwt_secret,
            jwt_expiration: Duration::from_secs(env_or("JWT_EXPIRATION_SECS", 24 * 3600)),

            default_threshold_pct: env_or("DEFAULT_THRESHOLD_PCT", 3.0),
            debounce_duration: env_duration_secs("DEBOUNCE_DURATION_SECS", 15 * 60),
            delta_pct_for_realert: env_or("DELTA_PCT_FOR_REALERT", 2.0),

            reason_lookback: env_duration_secs("REASON_LOOKBACK_SECS", 24 * 3600),
            reason_trailing: env_duration_secs("REASON_TRAILING_SECS", 3600),
            proximity_horizon: env_duration_secs("PROXIMITY_HORIZON_SECS", 12 * 3600),
            adapter_timeout: env_duration_secs("ADAPTER_TIMEOUT_SECS", 5),
            adapter_retry_budget: env_or("ADAPTER_RETRY_BUDGET", 3),
            reason_fetch_concurrency: env_or("REASON_FETCH_CONCURRENCY", 8),
            reason_engine_workers: env_or("REASON_ENGINE_WORKERS", 4),
            reason_queue_capacity: env_or("REASON_QUEUE_CAPACITY", 512),

            cooldown_in_app: env_duration_secs("COOLDOWN_IN_APP_SECS", 30 * 60),
            cooldown_email: env_duration_secs("COOLDOWN_EMAIL_SECS", 60 * 60),

            brief_lookback: env_duration_secs("BRIEF_LOOKBACK_SECS", 24 * 3600),
            brief_top_n: env_or("BRIEF_TOP_N", 10),
            brief_min_items: env_or("BRIEF_MIN_ITEMS", 3),

            min_compare_items: env_or("MIN_COMPARE_ITEMS", 2),
            compare_polarity_threshold: env_or("COMPARE_POLARITY_THRESHOLD", 0.15),

            http_request_timeout: env_duration_secs("HTTP_REQUEST_TIMEOUT_SECS", 10),

            cors_allowed_ports,
        })
        .context("failed to build configuration")
    }

    /// Fixed, non-env-dependent config for unit tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: 8080,
            jwt_secret: "test-secret-test-secret-test-secret".into(),
            jwt_expiration: Duration::from_secs(24 * 3600),
            default_threshold_pct: 3.0,
            debounce_duration: Duration::from_secs(15 * 60),
            delta_pct_for_realert: 2.0,
            reason_lookback: Duration::from_secs(24 * 3600),
            reason_trailing: Duration::from_secs(3600),
            proximity_horizon: Duration::from_secs(12 * 3600),
            adapter_timeout: Duration::from_secs(5),
            adapter_retry_budget: 3,
            reason_fetch_concurrency: 8,
            reason_engine_workers: 4,
            reason_queue_capacity: 512,
            cooldown_in_app: Duration::from_secs(30 * 60),
            cooldown_email: Duration::from_secs(60 * 60),
            brief_lookback: Duration::from_secs(24 * 3600),
            brief_top_n: 10,
            brief_min_items: 3,
            min_compare_items: 2,
            compare_polarity_threshold: 0.15,
            http_request_timeout: Duration::from_secs(10),
            cors_allowed_ports: vec![],
        }
    }
}
