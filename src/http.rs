//! HTTP settings of the tracer: which request and response headers become
//! trace tags.

use crate::cache::Lookup;
use std::collections::BTreeMap;
use std::fmt;

/// Normalize a header name for comparison: surrounding whitespace is dropped
/// and the name is lowercased.
///
/// # Examples
///
/// ```
/// use telemeter::http::normalize_header_name;
///
/// assert_eq!("x-request-id", normalize_header_name("  X-Request-ID "));
/// ```
pub fn normalize_header_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The header allow-list
///
/// Each traced header maps to the tag its value is stored under. An empty tag
/// means the default tag for that header. Answers to `header_tag` are
/// remembered until the allow-list changes.
#[derive(Debug, Default)]
pub struct HttpConfig {
    header_tags: BTreeMap<String, String>,
    /// Whether the query string is attached to the URL tag. `None` defers to
    /// the integration's default.
    pub trace_query_string: Option<bool>,
    lookups: Lookup<Option<String>>,
}

impl Clone for HttpConfig {
    fn clone(&self) -> HttpConfig {
        HttpConfig {
            header_tags: self.header_tags.clone(),
            trace_query_string: self.trace_query_string,
            lookups: Lookup::default(),
        }
    }
}

impl fmt::Display for HttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&String> = self.header_tags.keys().collect();
        write!(f, "<HttpConfig traced_headers={:?} trace_query_string=", names)?;
        match self.trace_query_string {
            Some(b) => write!(f, "{}>", b),
            None => write!(f, "None>"),
        }
    }
}

impl HttpConfig {
    /// Create an `HttpConfig` that traces no header.
    pub fn new() -> HttpConfig {
        HttpConfig::default()
    }

    /// Create an `HttpConfig` from header name / tag pairs. Header names are
    /// normalized.
    pub fn with_header_tags<I, K, V>(header_tags: I) -> HttpConfig
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        HttpConfig {
            header_tags: header_tags
                .into_iter()
                .map(|(k, v)| (normalize_header_name(k.as_ref()), v.into()))
                .collect(),
            ..HttpConfig::default()
        }
    }

    /// Forget every traced header.
    pub fn reset(&mut self) {
        self.header_tags.clear();
        self.lookups.invalidate();
    }

    /// Determine if any header is traced.
    pub fn is_header_tracing_configured(&self) -> bool {
        !self.header_tags.is_empty()
    }

    /// Register headers to be traced
    ///
    /// Names are case-insensitive. A name that normalizes to nothing is
    /// skipped; a name already traced keeps its tag. Returns `None`, and
    /// changes nothing, if `whitelist` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use telemeter::http::HttpConfig;
    ///
    /// let mut config = HttpConfig::new();
    /// assert!(config.trace_headers(Vec::<String>::new()).is_none());
    ///
    /// config.trace_headers(vec!["Host", "X-Request-Id"]);
    /// assert!(config.header_is_traced("host"));
    /// assert!(config.header_is_traced("x-request-id"));
    /// assert!(!config.header_is_traced("user-agent"));
    /// ```
    pub fn trace_headers<I, S>(&mut self, whitelist: I) -> Option<&mut HttpConfig>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = whitelist.into_iter().peekable();
        if whitelist.peek().is_none() {
            return None;
        }

        for entry in whitelist {
            let name = normalize_header_name(entry.as_ref());
            if name.is_empty() {
                continue;
            }
            self.header_tags.entry(name).or_insert_with(String::new);
        }

        self.lookups.invalidate();
        Some(self)
    }

    /// Register a single header to be traced. See `trace_headers`.
    pub fn trace_header(&mut self, name: &str) -> Option<&mut HttpConfig> {
        if name.is_empty() {
            return None;
        }
        self.trace_headers(Some(name))
    }

    /// The tag a header's value is stored under, if the header is traced.
    /// `Some("")` means the header's default tag.
    pub fn header_tag(&self, header_name: &str) -> Option<String> {
        let header_tags = &self.header_tags;
        self.lookups.get_or_insert_with(header_name, || {
            if header_tags.is_empty() {
                return None;
            }
            let normalized = normalize_header_name(header_name);
            debug!(
                "Checking header '{}' tracing in whitelist {:?}",
                normalized,
                header_tags.keys().collect::<Vec<_>>()
            );
            header_tags.get(&normalized).cloned()
        })
    }

    /// Determine if a header should be traced.
    pub fn header_is_traced(&self, header_name: &str) -> bool {
        self.header_tag(header_name).is_some()
    }
}
