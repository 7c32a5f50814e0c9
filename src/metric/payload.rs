use crate::metric::reduce::Points;
use crate::metric::{Error, Kind};

/// The `points` field of a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WirePoints {
    /// `[[timestamp, value], ...]`, used by count, gauge and rate.
    Timestamped(Vec<(f64, f64)>),
    /// `[value, ...]`, used by distribution.
    Raw(Vec<f64>),
}

impl<'a> From<&'a Points> for WirePoints {
    fn from(points: &'a Points) -> WirePoints {
        match *points {
            Points::Count(p) | Points::Gauge(p) | Points::Rate(p) => {
                WirePoints::Timestamped(p.into_iter().collect())
            }
            Points::Distribution(ref vs) => WirePoints::Raw(vs.clone()),
        }
    }
}

/// A metric as the telemetry intake expects it
///
/// Count, gauge and rate payloads carry every field, `interval` only when the
/// metric has one. Distribution payloads carry only `metric`, `points` and
/// `tags`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    /// The lowercased metric name.
    pub metric: String,
    /// The kind's wire name. Absent for distributions.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    /// Whether the metric is common to all implementations. Absent for
    /// distributions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common: Option<bool>,
    /// The interval state.
    pub points: WirePoints,
    /// `key:value` tags, lowercased.
    pub tags: Vec<String>,
    /// Interval in whole seconds. Absent for distributions and for metrics
    /// without an interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
}

impl Payload {
    /// Render the payload as a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render the payload as a compact JSON string.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamped_points_render_as_pairs() {
        let points = WirePoints::from(&Points::Count(Some((1.5, 5.0))));
        assert_eq!("[[1.5,5.0]]", serde_json::to_string(&points).unwrap());
    }

    #[test]
    fn empty_points_render_as_empty_list() {
        for kind in &Kind::ALL {
            let points = WirePoints::from(&Points::empty(*kind));
            assert_eq!("[]", serde_json::to_string(&points).unwrap());
        }
    }

    #[test]
    fn raw_points_render_flat() {
        let points = WirePoints::from(&Points::Distribution(vec![1.0, 2.5]));
        assert_eq!("[1.0,2.5]", serde_json::to_string(&points).unwrap());
    }

    #[test]
    fn absent_fields_are_skipped() {
        let payload = Payload {
            metric: "spans".into(),
            kind: None,
            common: None,
            points: WirePoints::Raw(vec![3.0]),
            tags: vec![],
            interval: None,
        };
        assert_eq!(
            r#"{"metric":"spans","points":[3.0],"tags":[]}"#,
            payload.to_json().unwrap()
        );
    }

    #[test]
    fn kind_renders_wire_name() {
        let payload = Payload {
            metric: "spans".into(),
            kind: Some(Kind::Rate),
            common: Some(false),
            points: WirePoints::Timestamped(vec![(1.0, 0.5)]),
            tags: vec!["a:b".into()],
            interval: Some(10),
        };
        assert_eq!(
            r#"{"metric":"spans","type":"rate","common":false,"points":[[1.0,0.5]],"tags":["a:b"],"interval":10}"#,
            payload.to_json().unwrap()
        );
    }
}
