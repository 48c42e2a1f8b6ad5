//! Fixed scoring tables and constants.
//!
//! Process-wide immutable data, never configurable at runtime.

/// CircleCI's resource class when a job declares none.
pub const DEFAULT_RESOURCE_CLASS: &str = "medium";

/// Docker resource classes and their credit cost per minute.
pub static CREDIT_RATES: &[(&str, u32)] = &[
    ("small", 5),
    ("medium", 10),
    ("medium+", 15),
    ("large", 20),
    ("xlarge", 40),
    ("2xlarge", 80),
    ("2xlarge+", 100),
];

/// Tiers considered oversized for short jobs.
pub static OVERSIZED_TIERS: &[&str] = &["large", "xlarge", "2xlarge"];

/// Jobs estimated below this many minutes are candidates for downsizing.
pub const SHORT_JOB_MINUTES: u32 = 5;

/// Jobs estimated below this many minutes should drop to `small`.
pub const SMALL_TIER_MINUTES: u32 = 3;

/// Ceiling for the summed time savings of a run.
pub const TIME_SAVINGS_CAP: u32 = 30;

/// Upper bound for the minutes saved by fanning out independent jobs.
pub const FAN_OUT_SAVINGS_CAP: u32 = 10;

pub fn credit_rate(tier: &str) -> Option<u32> {
    CREDIT_RATES
        .iter()
        .find(|(name, _)| *name == tier)
        .map(|(_, rate)| *rate)
}

pub fn is_oversized(tier: &str) -> bool {
    OVERSIZED_TIERS.contains(&tier)
}

/// Percentage saved moving from `current` to `recommended` cost, rounded.
pub fn savings_percent(current: u32, recommended: u32) -> u32 {
    if current == 0 {
        return 0;
    }
    let ratio = f64::from(recommended) / f64::from(current);
    (100.0 * (1.0 - ratio)).round().clamp(0.0, 100.0) as u32
}

/// Base impact scores per rule. Scores only order findings inside one
/// priority bucket.
pub mod impact {
    pub const OVERSIZED_TIER_BASE: f64 = 80.0;
    pub const UNSPECIFIED_TIER: f64 = 30.0;
    pub const MISSING_CACHE: f64 = 80.0;
    pub const WEAK_CACHE_KEY: f64 = 50.0;
    pub const TEST_PARALLELISM: f64 = 70.0;
    pub const WORKFLOW_FAN_OUT: f64 = 60.0;
    pub const LAYER_CACHE: f64 = 65.0;
    pub const REUSABLE_COMPONENT: f64 = 40.0;
    pub const APPROVAL_GATE: f64 = 30.0;
    pub const HARDCODED_SECRET: f64 = 90.0;

    /// Oversized-tier score grows with the savings: `80 + savings / 5`.
    pub fn oversized_tier(savings_percent: u32) -> f64 {
        OVERSIZED_TIER_BASE + f64::from(savings_percent) / 5.0
    }
}
