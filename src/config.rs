//! Provides the CLI option parser
//!
//! Used to parse the argv/config file into a struct that the telemeter tool,
//! or an embedding reporter, can consume and use as configuration data.

use crate::http::HttpConfig;
use crate::metric::{self, Kind, Metric, Tags};
use clap::{App, Arg};
use std::error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

fn default_namespace() -> String {
    "tracer".to_string()
}

fn default_version() -> String {
    VERSION.unwrap_or("unknown").to_string()
}

/// Errors raised while reading configuration
#[derive(Debug)]
pub enum Error {
    /// The configuration file could not be read.
    Io(io::Error),
    /// The configuration file is not valid TOML for telemeter.
    Toml(toml::de::Error),
    /// A metric declaration is malformed.
    Metric(metric::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "could not read config file: {}", e),
            Error::Toml(ref e) => write!(f, "could not parse config file: {}", e),
            Error::Metric(ref e) => write!(f, "bad metric declaration: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::Toml(ref e) => Some(e),
            Error::Metric(ref e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Error {
        Error::Toml(e)
    }
}

impl From<metric::Error> for Error {
    fn from(e: metric::Error) -> Error {
        Error::Metric(e)
    }
}

/// The `[http]` table
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HttpSection {
    /// Headers whose values become trace tags.
    #[serde(default)]
    pub header_tags: Vec<String>,
    /// See `HttpConfig::trace_query_string`.
    #[serde(default)]
    pub trace_query_string: Option<bool>,
}

/// One `[[metrics]]` declaration
///
/// Fields left out are inherited from the top level of the file.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricConfig {
    /// The metric name. Lowercased when the metric is built.
    pub name: String,
    /// The metric kind.
    pub kind: Kind,
    pub namespace: Option<String>,
    pub common: Option<bool>,
    pub interval: Option<f64>,
    /// Ordered `[key, value]` pairs.
    pub tags: Tags,
    /// Observations to replay into the metric, in order.
    pub points: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct MetricDecl {
    name: String,
    kind: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    common: Option<bool>,
    #[serde(default)]
    interval: Option<f64>,
    #[serde(default)]
    tags: Tags,
    #[serde(default)]
    points: Vec<f64>,
}

impl MetricDecl {
    fn harden(self) -> Result<MetricConfig, Error> {
        Ok(MetricConfig {
            kind: self.kind.parse()?,
            name: self.name,
            namespace: self.namespace,
            common: self.common,
            interval: self.interval,
            tags: self.tags,
            points: self.points,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileConfig {
    #[serde(default = "default_namespace")]
    namespace: String,
    #[serde(default)]
    interval: Option<f64>,
    #[serde(default)]
    common: bool,
    #[serde(default)]
    http: HttpSection,
    #[serde(default)]
    metrics: Vec<MetricDecl>,
}

/// Configuration struct for telemeter
///
/// This struct is what we construct from parsing the telemeter configuration.
/// Please see documentation on `parse_args` in this module for more details.
#[derive(Clone, Debug, PartialEq)]
pub struct Args {
    /// The verbosity setting. The higher the value the more chatty telemeter
    /// gets.
    pub verbose: u64,
    /// Telemeter version string. This is set automatically.
    pub version: String,
    /// Namespace of metrics that do not name one.
    pub namespace: String,
    /// Interval of metrics that do not set one.
    pub interval: Option<f64>,
    /// Common flag of metrics that do not set one.
    pub common: bool,
    /// The `[http]` table.
    pub http: HttpSection,
    /// The `[[metrics]]` declarations, in file order.
    pub metrics: Vec<MetricConfig>,
    /// Headers to report on, from the command line.
    pub headers: Vec<String>,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            verbose: 0,
            version: default_version(),
            namespace: default_namespace(),
            interval: None,
            common: false,
            http: HttpSection::default(),
            metrics: Vec::new(),
            headers: Vec::new(),
        }
    }
}

impl Args {
    /// Build the header allow-list described by the `[http]` table.
    pub fn http_config(&self) -> HttpConfig {
        let mut config = HttpConfig::new();
        config.trace_headers(&self.http.header_tags);
        config.trace_query_string = self.http.trace_query_string;
        config
    }

    /// Build the empty metric a declaration describes, filling what it leaves
    /// out from the top level.
    pub fn build_metric(&self, declared: &MetricConfig) -> Metric {
        let namespace = declared
            .namespace
            .clone()
            .unwrap_or_else(|| self.namespace.clone());
        Metric::new(declared.kind, namespace, declared.name.as_str())
            .tags(declared.tags.clone())
            .common(declared.common.unwrap_or(self.common))
            .maybe_interval(declared.interval.or(self.interval))
    }
}

/// Parse the telemeter command line
///
/// The configuration file named by `-C` is read and parsed with
/// `parse_config_file`.
pub fn parse_args() -> Result<Args, Error> {
    let args = App::new("telemeter")
        .version(VERSION.unwrap_or("unknown"))
        .about("render telemetry metric payloads from a declaration file")
        .arg(
            Arg::with_name("config-file")
                .long("config")
                .short("C")
                .value_name("config")
                .required(true)
                .help("The config file to feed in.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("header")
                .long("header")
                .short("H")
                .value_name("name")
                .multiple(true)
                .number_of_values(1)
                .help("Report whether this header is traced.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Turn on verbose output."),
        )
        .get_matches();

    let verb = if args.is_present("verbose") {
        args.occurrences_of("verbose")
    } else {
        0
    };

    // config-file is required, clap exits before we get here without it
    let filename = args.value_of("config-file").unwrap_or_default();
    let mut fp = File::open(filename)?;
    let mut buffer = String::new();
    fp.read_to_string(&mut buffer)?;

    let mut parsed = parse_config_file(&buffer, verb)?;
    if let Some(headers) = args.values_of("header") {
        parsed.headers = headers.map(String::from).collect();
    }
    Ok(parsed)
}

/// Parse the telemeter configuration file
///
/// # Examples
///
/// ```
/// use telemeter::config::parse_config_file;
/// use telemeter::metric::Kind;
///
/// let config = r#"
/// namespace = "tracer"
///
/// [[metrics]]
/// name = "Requests"
/// kind = "count"
/// tags = [["env", "prod"]]
/// points = [2.0, 3.0]
/// "#;
///
/// let args = parse_config_file(config, 0).unwrap();
/// assert_eq!(1, args.metrics.len());
/// assert_eq!(Kind::Count, args.metrics[0].kind);
/// ```
pub fn parse_config_file(buffer: &str, verbosity: u64) -> Result<Args, Error> {
    let file: FileConfig = toml::from_str(buffer)?;
    trace!("parsed config with {} metric declarations", file.metrics.len());

    let metrics = file
        .metrics
        .into_iter()
        .map(MetricDecl::harden)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Args {
        verbose: verbosity,
        namespace: file.namespace,
        interval: file.interval,
        common: file.common,
        http: file.http,
        metrics,
        ..Args::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_defaults() {
        let args = parse_config_file("", 2).unwrap();
        assert_eq!(2, args.verbose);
        assert_eq!("tracer", args.namespace);
        assert_eq!(None, args.interval);
        assert!(!args.common);
        assert!(args.metrics.is_empty());
        assert!(!args.http_config().is_header_tracing_configured());
    }

    #[test]
    fn http_section() {
        let config = r#"
[http]
header-tags = ["X-Request-Id", "Host"]
trace-query-string = true
"#;
        let args = parse_config_file(config, 0).unwrap();
        let http = args.http_config();

        assert!(http.header_is_traced("x-request-id"));
        assert!(http.header_is_traced("HOST"));
        assert!(!http.header_is_traced("accept"));
        assert_eq!(Some(true), http.trace_query_string);
    }

    #[test]
    fn metric_inherits_top_level() {
        let config = r#"
namespace = "appsec"
interval = 10.0
common = true

[[metrics]]
name = "Spans.Created"
kind = "rate"
tags = [["b", "2"], ["a", "1"]]
"#;
        let args = parse_config_file(config, 0).unwrap();
        let m = args.build_metric(&args.metrics[0]);

        assert_eq!(Kind::Rate, m.kind());
        assert_eq!("spans.created", m.name());
        assert_eq!("appsec", m.namespace());
        assert_eq!(Some(10.0), m.interval_secs());
        assert!(m.is_common());
        assert_eq!(vec!["b:2", "a:1"], m.tag_list().to_wire());
    }

    #[test]
    fn metric_overrides_top_level() {
        let config = r#"
interval = 10.0
common = true

[[metrics]]
name = "heap"
kind = "gauge"
namespace = "profiler"
common = false
interval = 60.0
"#;
        let args = parse_config_file(config, 0).unwrap();
        let m = args.build_metric(&args.metrics[0]);

        assert_eq!("profiler", m.namespace());
        assert_eq!(Some(60.0), m.interval_secs());
        assert!(!m.is_common());
    }

    #[test]
    fn both_distribution_spellings() {
        let config = r#"
[[metrics]]
name = "a"
kind = "distribution"

[[metrics]]
name = "b"
kind = "distributions"
"#;
        let args = parse_config_file(config, 0).unwrap();
        assert_eq!(Kind::Distribution, args.metrics[0].kind);
        assert_eq!(Kind::Distribution, args.metrics[1].kind);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let config = r#"
[[metrics]]
name = "a"
kind = "histogram"
"#;
        match parse_config_file(config, 0) {
            Err(Error::Metric(metric::Error::UnknownKind(ref name))) => assert_eq!("histogram", name),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        match parse_config_file("flush-interval = 10", 0) {
            Err(Error::Toml(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn points_are_kept_in_order() {
        let config = r#"
[[metrics]]
name = "span.size"
kind = "distribution"
points = [3.0, 1.0, 2.0]
"#;
        let args = parse_config_file(config, 0).unwrap();
        assert_eq!(vec![3.0, 1.0, 2.0], args.metrics[0].points);
    }
}
