use std::path::PathBuf;

const MONITOR_INTERVAL: &str = "MONITOR_INTERVAL";

pub fn get_interval() -> Option<u64> {
    parse_seconds(std::env::var(MONITOR_INTERVAL).ok())
}

const MONITOR_COOLDOWN: &str = "MONITOR_COOLDOWN";

pub fn get_cooldown() -> Option<u64> {
    parse_seconds(std::env::var(MONITOR_COOLDOWN).ok())
}

const MONITOR_LOG_FILE: &str = "MONITOR_LOG_FILE";

pub fn get_log_file() -> Option<PathBuf> {
    std::env::var(MONITOR_LOG_FILE)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

/// Unparseable values are ignored so the next configuration layer applies.
fn parse_seconds(value: Option<String>) -> Option<u64> {
    value.and_then(|value| value.trim().parse().ok())
}
