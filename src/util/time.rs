use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current time in seconds since the UNIX epoch
pub fn current_time_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Milliseconds since the UNIX epoch, used to name saved drawings
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
