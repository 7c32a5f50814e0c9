use crate::metric::{Kind, Tags};
use seahash::SeaHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The key under which observations of the same metric are gathered
///
/// An `Identity` is derived from name, namespace, tags and kind. Tags are
/// combined in order, so metrics whose tags differ only in order have distinct
/// identities. The combining hasher is seeded with fixed keys, so an identity
/// computed in one process matches the one computed in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(u64);

impl Identity {
    /// Derive the identity of a metric from its coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use telemeter::metric::{Identity, Kind, Tags};
    ///
    /// let tags: Tags = vec![("env", "prod")].into_iter().collect();
    /// let count = Identity::compute("requests", "tracer", &tags, Kind::Count);
    /// let gauge = Identity::compute("requests", "tracer", &tags, Kind::Gauge);
    ///
    /// assert_eq!(count, Identity::compute("requests", "tracer", &tags, Kind::Count));
    /// assert_ne!(count, gauge);
    /// ```
    pub fn compute(name: &str, namespace: &str, tags: &Tags, kind: Kind) -> Identity {
        let mut hasher = SeaHasher::new();
        name.hash(&mut hasher);
        namespace.hash(&mut hasher);
        tags.hash(&mut hasher);
        kind.as_str().hash(&mut hasher);
        Identity(hasher.finish())
    }

    /// The identity as a bare integer.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{QuickCheck, TestResult};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn deterministic() {
        fn inner(name: String, namespace: String, pairs: Vec<(String, String)>, kind: Kind) -> TestResult {
            let tags = Tags::from(pairs);
            let lhs = Identity::compute(&name, &namespace, &tags, kind);
            let rhs = Identity::compute(&name, &namespace, &tags.clone(), kind);
            assert_eq!(lhs, rhs);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(10000)
            .quickcheck(inner as fn(String, String, Vec<(String, String)>, Kind) -> TestResult);
    }

    #[test]
    fn kind_separates_identities() {
        let t = tags(&[("env", "prod")]);
        for lhs in &Kind::ALL {
            for rhs in &Kind::ALL {
                let l = Identity::compute("requests", "tracer", &t, *lhs);
                let r = Identity::compute("requests", "tracer", &t, *rhs);
                assert_eq!(lhs == rhs, l == r, "{} vs {}", lhs, rhs);
            }
        }
    }

    #[test]
    fn tag_order_separates_identities() {
        let ab = tags(&[("a", "1"), ("b", "2")]);
        let ba = tags(&[("b", "2"), ("a", "1")]);

        assert_ne!(
            Identity::compute("requests", "tracer", &ab, Kind::Count),
            Identity::compute("requests", "tracer", &ba, Kind::Count)
        );
    }

    #[test]
    fn namespace_separates_identities() {
        let t = Tags::new();
        assert_ne!(
            Identity::compute("requests", "tracer", &t, Kind::Count),
            Identity::compute("requests", "appsec", &t, Kind::Count)
        );
    }

    #[test]
    fn name_and_namespace_do_not_bleed() {
        let t = Tags::new();
        assert_ne!(
            Identity::compute("ab", "c", &t, Kind::Rate),
            Identity::compute("a", "bc", &t, Kind::Rate)
        );
    }

    #[test]
    fn display_is_hex() {
        let id = Identity(255);
        assert_eq!("00000000000000ff", id.to_string());
        assert_eq!(255, id.as_u64());
    }
}
