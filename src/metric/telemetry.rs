use crate::metric::payload::{Payload, WirePoints};
use crate::metric::reduce::{self, Points};
use crate::metric::{Identity, Kind, Tags};
use crate::time;
use std::fmt;
use std::mem;

/// The value recorded by `Metric::incr`.
pub const DEFAULT_VALUE: f64 = 1.0;

/// A telemetry metric
///
/// A `Metric` is created once per `Identity` by whoever gathers telemetry,
/// fed with `add_point` from measurement sites and read with `serialize` at
/// flush time. It has no internal synchronization: mutation needs `&mut` and
/// an owner shared across threads must guard it.
#[derive(Clone, PartialEq)]
pub struct Metric {
    name: String,
    namespace: String,
    tags: Tags,
    common: bool,
    interval: Option<f64>,
    points: Points,
    running_total: f64,
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Metric {{ kind: {}, namespace: {}, name: {}, tags: {:?}, points: {:?} }}",
            self.kind(),
            self.namespace,
            self.name,
            self.tags,
            self.points
        )
    }
}

impl Metric {
    /// Make a metric of the given kind
    ///
    /// The name is lowercased; the namespace is kept as given. The metric
    /// starts with no tags, not common and without an interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use telemeter::metric::{Kind, Metric};
    ///
    /// let m = Metric::new(Kind::Gauge, "tracer", "Spans.Open");
    ///
    /// assert_eq!(m.kind(), Kind::Gauge);
    /// assert_eq!(m.name(), "spans.open");
    /// assert!(m.points().is_empty());
    /// ```
    pub fn new<N, S>(kind: Kind, namespace: N, name: S) -> Metric
    where
        N: Into<String>,
        S: Into<String>,
    {
        Metric {
            name: name.into().to_lowercase(),
            namespace: namespace.into(),
            tags: Tags::default(),
            common: false,
            interval: None,
            points: Points::empty(kind),
            running_total: 0.0,
        }
    }

    /// Make a count metric. See `Metric::new`.
    pub fn count<N, S>(namespace: N, name: S) -> Metric
    where
        N: Into<String>,
        S: Into<String>,
    {
        Metric::new(Kind::Count, namespace, name)
    }

    /// Make a gauge metric. See `Metric::new`.
    pub fn gauge<N, S>(namespace: N, name: S) -> Metric
    where
        N: Into<String>,
        S: Into<String>,
    {
        Metric::new(Kind::Gauge, namespace, name)
    }

    /// Make a rate metric. See `Metric::new`.
    pub fn rate<N, S>(namespace: N, name: S) -> Metric
    where
        N: Into<String>,
        S: Into<String>,
    {
        Metric::new(Kind::Rate, namespace, name)
    }

    /// Make a distribution metric. See `Metric::new`.
    pub fn distribution<N, S>(namespace: N, name: S) -> Metric
    where
        N: Into<String>,
        S: Into<String>,
    {
        Metric::new(Kind::Distribution, namespace, name)
    }

    /// Set the tags of the metric
    ///
    /// Tags are part of the metric's identity and are not changed after the
    /// metric starts recording.
    pub fn tags(mut self, tags: Tags) -> Metric {
        self.tags = tags;
        self
    }

    /// Mark the metric as common to all implementations, or as specific to
    /// this one.
    pub fn common(mut self, common: bool) -> Metric {
        self.common = common;
        self
    }

    /// Set the reporting interval, in seconds
    ///
    /// Rates divide by this value. Count and gauge only report it; a
    /// distribution stores it and never reports it.
    pub fn interval(mut self, secs: f64) -> Metric {
        self.interval = Some(secs);
        self
    }

    /// Set or clear the reporting interval. See `Metric::interval`.
    pub fn maybe_interval(mut self, secs: Option<f64>) -> Metric {
        self.interval = secs;
        self
    }

    /// The kind of the metric.
    pub fn kind(&self) -> Kind {
        self.points.kind()
    }

    /// The lowercased name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn tag_list(&self) -> &Tags {
        &self.tags
    }

    pub fn is_common(&self) -> bool {
        self.common
    }

    pub fn interval_secs(&self) -> Option<f64> {
        self.interval
    }

    /// The state recorded since construction or the last `drain`.
    pub fn points(&self) -> &Points {
        &self.points
    }

    /// Sum of every value a rate has observed since construction. Always zero
    /// for other kinds.
    pub fn running_total(&self) -> f64 {
        self.running_total
    }

    /// The identity this metric is gathered under.
    pub fn identity(&self) -> Identity {
        Identity::compute(&self.name, &self.namespace, &self.tags, self.kind())
    }

    /// Record one observation, stamped with the current time.
    pub fn add_point(&mut self, value: f64) {
        self.add_point_at(value, time::now())
    }

    /// Record an observation of `DEFAULT_VALUE`.
    pub fn incr(&mut self) {
        self.add_point(DEFAULT_VALUE)
    }

    /// Record one observation made at `timestamp`, in seconds since the epoch
    ///
    /// # Examples
    ///
    /// ```
    /// use telemeter::metric::Metric;
    ///
    /// let mut m = Metric::count("tracer", "requests");
    /// m.add_point_at(2.0, 100.0);
    /// m.add_point_at(3.0, 101.0);
    ///
    /// assert_eq!(m.points().point(), Some((100.0, 5.0)));
    /// ```
    pub fn add_point_at(&mut self, value: f64, timestamp: f64) {
        match self.points {
            Points::Count(ref mut p) => *p = Some(reduce::count(*p, value, timestamp)),
            Points::Gauge(ref mut p) => *p = Some(reduce::gauge(value, timestamp)),
            Points::Rate(ref mut p) => {
                self.running_total += value;
                *p = Some(reduce::rate(self.running_total, self.interval, timestamp));
            }
            Points::Distribution(ref mut vs) => {
                let values = mem::replace(vs, Vec::new());
                *vs = reduce::distribution(values, value);
            }
        }
        trace!(
            "{} {}.{} recorded {} at {}",
            self.kind(),
            self.namespace,
            self.name,
            value,
            timestamp
        );
    }

    /// Render the metric as the intake expects it. Recorded state is left in
    /// place.
    pub fn serialize(&self) -> Payload {
        let kind = self.kind();
        let full = kind.has_full_schema();
        Payload {
            metric: self.name.clone(),
            kind: if full { Some(kind) } else { None },
            common: if full { Some(self.common) } else { None },
            points: WirePoints::from(&self.points),
            tags: self.tags.to_wire(),
            interval: if full {
                self.interval.map(|secs| secs as i64)
            } else {
                None
            },
        }
    }

    /// Take the state recorded in the current interval, leaving the metric
    /// empty
    ///
    /// Name, namespace, tags, interval and a rate's running total are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use telemeter::metric::{Metric, Points};
    ///
    /// let mut m = Metric::distribution("tracer", "span.size");
    /// m.add_point(12.0);
    ///
    /// assert_eq!(m.drain(), Points::Distribution(vec![12.0]));
    /// assert!(m.points().is_empty());
    /// ```
    pub fn drain(&mut self) -> Points {
        let empty = Points::empty(self.kind());
        let drained = mem::replace(&mut self.points, empty);
        debug!(
            "drained {} entries from {} {}.{}",
            drained.len(),
            self.kind(),
            self.namespace,
            self.name
        );
        drained
    }

    /// Serialize the metric and then drain it.
    pub fn flush(&mut self) -> Payload {
        let payload = self.serialize();
        self.drain();
        payload
    }
}
