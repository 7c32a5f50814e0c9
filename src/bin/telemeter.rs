#![allow(unknown_lints)]

extern crate chrono;
extern crate fern;
extern crate serde_json;
extern crate telemeter;

#[macro_use]
extern crate log;

use chrono::Utc;
use std::collections::HashMap;
use std::process;
use telemeter::config::Args;
use telemeter::metric::{Identity, Kind, Metric};

/// Build one metric per distinct identity, in declaration order, and replay
/// the declared points into it.
fn populate(args: &Args) -> Vec<Metric> {
    let mut metrics: Vec<Metric> = Vec::new();
    let mut index: HashMap<Identity, usize> = HashMap::new();

    for declared in &args.metrics {
        let fresh = args.build_metric(declared);
        let id = fresh.identity();
        let slot = match index.get(&id) {
            Some(slot) => {
                trace!("{} {} shares identity {}", fresh.kind(), fresh.name(), id);
                *slot
            }
            None => {
                index.insert(id, metrics.len());
                metrics.push(fresh);
                metrics.len() - 1
            }
        };
        let metric = &mut metrics[slot];
        for value in &declared.points {
            metric.add_point(*value);
        }
    }
    metrics
}

fn main() {
    let args = match telemeter::config::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let level = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let logging = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][{}] {}",
                record.module_path().unwrap_or("-"),
                record.line().unwrap_or(0),
                Utc::now().to_rfc3339(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(e) = logging {
        eprintln!("could not set up logging: {}", e);
        process::exit(1);
    }

    info!("telemeter - {}", args.version);

    let http = args.http_config();
    debug!("{}", http);
    for header in &args.headers {
        match http.header_tag(header) {
            Some(ref tag) if tag.is_empty() => info!("header {} is traced under its default tag", header),
            Some(tag) => info!("header {} is traced as {}", header, tag),
            None => info!("header {} is not traced", header),
        }
    }

    let mut series = Vec::new();
    let mut distributions = Vec::new();
    for metric in populate(&args) {
        let payload = metric.serialize();
        match metric.kind() {
            Kind::Distribution => distributions.push(payload),
            Kind::Count | Kind::Gauge | Kind::Rate => series.push(payload),
        }
    }

    let document = serde_json::json!({
        "series": series,
        "distributions": distributions,
    });
    match serde_json::to_string_pretty(&document) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            error!("could not render payloads: {}", e);
            process::exit(1);
        }
    }
}
