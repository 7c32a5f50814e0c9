use crate::metric::Error;
use std::fmt;
use std::str::FromStr;

/// The kind of a metric
///
/// The kind decides both the reduction applied to observed values and the
/// schema of the payload sent to the intake.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Values observed in an interval are added up.
    Count,
    /// The last value observed in an interval wins.
    Gauge,
    /// The running total of observed values is divided by the interval.
    Rate,
    /// Every observed value is kept as is.
    #[serde(rename = "distributions", alias = "distribution")]
    Distribution,
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 4] = [Kind::Count, Kind::Gauge, Kind::Rate, Kind::Distribution];

    /// The name of this kind on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Count => "count",
            Kind::Gauge => "gauge",
            Kind::Rate => "rate",
            Kind::Distribution => "distributions",
        }
    }

    /// Whether payloads of this kind carry `type`, `common` and `interval`.
    pub fn has_full_schema(self) -> bool {
        match self {
            Kind::Count | Kind::Gauge | Kind::Rate => true,
            Kind::Distribution => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Kind, Error> {
        match s {
            "count" => Ok(Kind::Count),
            "gauge" => Ok(Kind::Gauge),
            "rate" => Ok(Kind::Rate),
            "distribution" | "distributions" => Ok(Kind::Distribution),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};

    impl Arbitrary for Kind {
        fn arbitrary<G>(g: &mut G) -> Self
        where
            G: Gen,
        {
            let i: usize = g.gen_range(0, 4);
            Kind::ALL[i]
        }
    }

    #[test]
    fn wire_names_parse_back() {
        for kind in &Kind::ALL {
            assert_eq!(Ok(*kind), kind.as_str().parse::<Kind>().map_err(|e| e.to_string()));
        }
        assert_eq!(Kind::Distribution, "distribution".parse::<Kind>().unwrap());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        match "histogram".parse::<Kind>() {
            Err(Error::UnknownKind(name)) => assert_eq!("histogram", name),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn only_distribution_has_reduced_schema() {
        assert!(Kind::Count.has_full_schema());
        assert!(Kind::Gauge.has_full_schema());
        assert!(Kind::Rate.has_full_schema());
        assert!(!Kind::Distribution.has_full_schema());
    }
}
