use chrono::Utc;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Wall-clock seconds since the Unix epoch, with sub-second precision.
///
/// This is the timestamp carried by count, gauge and rate points.
pub fn now() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / NANOS_PER_SEC
}
