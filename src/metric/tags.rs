//! Tags are the ordered key, value pairs attached to each metric. They are
//! deliberately _not_ a map: the same key may appear more than once and the
//! order in which pairs were supplied is part of the metric's identity.

use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::slice::Iter;

/// The ordered tag sequence of a metric.
///
/// Two `Tags` are equal, and hash equal, only if they hold the same pairs in
/// the same order.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags {
    inner: Vec<(String, String)>,
}

impl Hash for Tags {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.inner.len());
        for &(ref k, ref v) in self.iter() {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I>(iter: I) -> Tags
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Tags {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<Vec<(String, String)>> for Tags {
    fn from(inner: Vec<(String, String)>) -> Tags {
        Tags { inner }
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a (String, String);
    type IntoIter = Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl Tags {
    /// Create an empty `Tags`.
    pub fn new() -> Tags {
        Tags::default()
    }

    /// Append a key / value pair. An existing pair with the same key is kept.
    pub fn push<K, V>(&mut self, key: K, val: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.push((key.into(), val.into()));
    }

    /// Iterate the pairs in the order they were supplied.
    pub fn iter(&self) -> Iter<(String, String)> {
        self.inner.iter()
    }

    /// The total number of pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Determine if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Render the pairs as the intake expects them: `key:value`, lowercased.
    pub fn to_wire(&self) -> Vec<String> {
        self.inner
            .iter()
            .map(|&(ref k, ref v)| format!("{}:{}", k, v).to_lowercase())
            .collect()
    }
}
