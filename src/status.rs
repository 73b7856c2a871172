//! Human-readable console output on stdout. Diagnostics go through `tracing`
//! on stderr instead.

use std::fmt;
use std::time::Duration;

use crate::MetricSample;
use crate::monitors::AlertEvent;
use crate::storage::schema::TIMESTAMP_FORMAT;

const SEPARATOR: &str = "===================================";

/// The per-tick block showing every metric of a sample
pub struct StatusBlock<'a>(pub &'a MetricSample);

impl fmt::Display for StatusBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample = self.0;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Time : {}", sample.timestamp().format(TIMESTAMP_FORMAT))?;
        writeln!(f, "CPU  : {}%", sample.cpu_percent())?;
        writeln!(f, "RAM  : {}%", sample.ram_percent())?;
        writeln!(f, "Disk : {}%", sample.disk_percent())?;
        writeln!(f, "GPU  : {:.2}%", sample.gpu_percent())?;
        match sample.battery_percent() {
            Some(battery) => write!(f, "Battery : {battery}%"),
            None => write!(f, "Battery : Not Available"),
        }
    }
}

pub fn print_log_created(location: &str) {
    println!("✓ CSV log file created: {location}");
}

pub fn print_startup(location: &str, interval: Duration) {
    println!("✓ Logging to: {location}");
    println!("✓ Monitoring interval: {} seconds", interval.as_secs());
    println!("✓ Press Ctrl+C to stop\n");
}

pub fn print_sample(sample: &MetricSample) {
    println!("{}", StatusBlock(sample));
}

pub fn print_warning(event: &AlertEvent) {
    println!("{}", event.warning());
}

pub fn print_shutdown(location: &str) {
    println!("\n✓ Monitoring stopped by user.");
    println!("✓ Log saved to: {location}");
}
