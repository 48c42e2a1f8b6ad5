/// Estimate used when a job has eight or more steps.
pub const DEFAULT_DURATION_MINUTES: u32 = 10;

/// Estimate a job's runtime in minutes from its step count.
pub fn estimate_duration_minutes(step_count: usize) -> u32 {
    match step_count {
        0..=2 => 2,
        3..=4 => 4,
        5..=7 => 7,
        _ => DEFAULT_DURATION_MINUTES,
    }
}
