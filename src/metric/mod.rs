//! The metric core: kinds, their reduction policies and their intake payloads.
//!
//! A `Metric` is one of four kinds:
//!
//!  * count: values observed in an interval are added up, the point keeps the
//!    timestamp of the first observation.
//!  * gauge: the last observed value and its timestamp win.
//!  * rate: every observed value joins a running total, the point holds that
//!    total divided by the interval.
//!  * distribution: every observed value is kept, untimestamped.
//!
//! Metrics observed under the same name, namespace, ordered tags and kind share
//! an `Identity`.

use std::error;
use std::fmt;

mod identity;
mod kind;
mod payload;
pub mod reduce;
mod tags;
mod telemetry;

pub use self::identity::Identity;
pub use self::kind::Kind;
pub use self::payload::{Payload, WirePoints};
pub use self::reduce::{Point, Points};
pub use self::tags::Tags;
pub use self::telemetry::{Metric, DEFAULT_VALUE};

/// Derive the identity of a metric from its coordinates. See
/// `Identity::compute`.
pub fn compute_identity(name: &str, namespace: &str, tags: &Tags, kind: Kind) -> Identity {
    Identity::compute(name, namespace, tags, kind)
}

/// Errors of the metric core
#[derive(Debug)]
pub enum Error {
    /// A kind name that has no reduction policy.
    UnknownKind(String),
    /// A payload could not be rendered as JSON.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::UnknownKind(ref name) => write!(f, "no reduction policy for metric kind '{}'", name),
            Error::Json(ref e) => write!(f, "could not render payload: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::UnknownKind(_) => None,
            Error::Json(ref e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}
