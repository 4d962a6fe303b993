use std::time::Duration;

/// Calculate the relay backoff delay for a row that has already failed
/// `retries` times.
///
/// Formula: `min(base_ms * 2^retries, cap_ms)`. Deterministic — the delay is
/// persisted as `available_at` on the row, so two workers computing it for
/// the same row must agree.
pub fn backoff_ms(retries: i32, base_ms: u64, cap_ms: u64) -> u64 {
    let attempts = u32::try_from(retries.max(0)).unwrap_or(u32::MAX);
    let factor = 2u64.saturating_pow(attempts);
    base_ms.saturating_mul(factor).min(cap_ms)
}

/// `backoff_ms` as a `Duration`.
pub fn backoff(retries: i32, base_ms: u64, cap_ms: u64) -> Duration {
    Duration::from_millis(backoff_ms(retries, base_ms, cap_ms))
}
