#[macro_use]
extern crate criterion;

use criterion::Criterion;

extern crate telemeter;

use telemeter::http::HttpConfig;
use telemeter::metric::{Metric, Tags};

fn tags() -> Tags {
    vec![("env", "prod"), ("service", "web"), ("version", "1.2.3")]
        .into_iter()
        .collect()
}

fn record(mut metric: Metric) -> Metric {
    for i in 0..512 {
        metric.add_point_at(f64::from(i), 1_000.0 + f64::from(i));
    }
    metric
}

fn benchmark_record(c: &mut Criterion) {
    c.bench_function("record_count", |b| {
        b.iter(|| record(Metric::count("tracer", "requests").tags(tags())));
    });
    c.bench_function("record_rate", |b| {
        b.iter(|| record(Metric::rate("tracer", "requests").interval(10.0)));
    });
    c.bench_function("record_distribution", |b| {
        b.iter(|| record(Metric::distribution("tracer", "span.size").tags(tags())));
    });
}

fn benchmark_serialize(c: &mut Criterion) {
    let count = record(Metric::count("tracer", "requests").tags(tags()).common(true));
    c.bench_function("serialize_count", move |b| {
        b.iter(|| count.serialize().to_json());
    });

    let distribution = record(Metric::distribution("tracer", "span.size").tags(tags()));
    c.bench_function("serialize_distribution", move |b| {
        b.iter(|| distribution.serialize().to_json());
    });
}

fn benchmark_identity(c: &mut Criterion) {
    let metric = Metric::gauge("tracer", "spans.open").tags(tags());
    c.bench_function("identity", move |b| {
        b.iter(|| metric.identity());
    });
}

fn benchmark_header_tag(c: &mut Criterion) {
    let mut config = HttpConfig::new();
    config.trace_headers(vec!["Host", "X-Request-Id", "User-Agent"]);
    c.bench_function("header_tag", move |b| {
        b.iter(|| config.header_is_traced("x-request-id"));
    });
}

criterion_group!(
    benches,
    benchmark_record,
    benchmark_serialize,
    benchmark_identity,
    benchmark_header_tag
);
criterion_main!(benches);
