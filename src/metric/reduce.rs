//! The reduction policy of each metric kind, as pure functions.
//!
//! `Metric::add_point` is a thin wrapper that feeds its state through these.

use crate::metric::Kind;

/// A timestamped point: seconds since the epoch and a value.
pub type Point = (f64, f64);

/// The interval-scoped state of a metric
///
/// Count, gauge and rate hold at most one timestamped point. Distribution
/// holds every observed value, untimestamped, in observation order.
#[derive(Debug, Clone, PartialEq)]
pub enum Points {
    /// Running sum of the interval, stamped with its first observation.
    Count(Option<Point>),
    /// Last value of the interval.
    Gauge(Option<Point>),
    /// Rate derived at the latest observation.
    Rate(Option<Point>),
    /// Raw values of the interval.
    Distribution(Vec<f64>),
}

impl Points {
    /// The empty state for a metric of `kind`.
    pub fn empty(kind: Kind) -> Points {
        match kind {
            Kind::Count => Points::Count(None),
            Kind::Gauge => Points::Gauge(None),
            Kind::Rate => Points::Rate(None),
            Kind::Distribution => Points::Distribution(Vec::new()),
        }
    }

    /// The kind whose state this is.
    pub fn kind(&self) -> Kind {
        match *self {
            Points::Count(_) => Kind::Count,
            Points::Gauge(_) => Kind::Gauge,
            Points::Rate(_) => Kind::Rate,
            Points::Distribution(_) => Kind::Distribution,
        }
    }

    /// The number of entries the payload will carry.
    pub fn len(&self) -> usize {
        match *self {
            Points::Count(ref p) | Points::Gauge(ref p) | Points::Rate(ref p) => {
                if p.is_some() {
                    1
                } else {
                    0
                }
            }
            Points::Distribution(ref vs) => vs.len(),
        }
    }

    /// Determine if nothing has been observed in this interval.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The timestamped point of a count, gauge or rate. `None` for
    /// distributions and for empty state.
    pub fn point(&self) -> Option<Point> {
        match *self {
            Points::Count(p) | Points::Gauge(p) | Points::Rate(p) => p,
            Points::Distribution(_) => None,
        }
    }

    /// The raw values of a distribution. Empty for every other kind.
    pub fn values(&self) -> &[f64] {
        match *self {
            Points::Distribution(ref vs) => vs,
            _ => &[],
        }
    }
}

/// Add `value` into the interval's running sum.
///
/// The first observation of an interval opens the point with its own
/// timestamp; later observations keep that timestamp.
pub fn count(current: Option<Point>, value: f64, timestamp: f64) -> Point {
    match current {
        Some((first, total)) => (first, total + value),
        None => (timestamp, value),
    }
}

/// Replace whatever the interval held with `value`.
pub fn gauge(value: f64, timestamp: f64) -> Point {
    (timestamp, value)
}

/// Derive the rate of `running_total` over `interval`.
///
/// The rate is zero when no interval is set or the interval is zero.
pub fn rate(running_total: f64, interval: Option<f64>, timestamp: f64) -> Point {
    let rate = match interval {
        Some(secs) if secs != 0.0 => running_total / secs,
        _ => 0.0,
    };
    (timestamp, rate)
}

/// Append `value` to the interval's raw values.
pub fn distribution(mut values: Vec<f64>, value: f64) -> Vec<f64> {
    values.push(value);
    values
}
