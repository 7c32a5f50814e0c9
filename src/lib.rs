//! Telemeter is the metric core of a tracing library's telemetry reporter. It
//! keeps count, gauge, rate and distribution metrics, applies the reduction
//! policy of each kind to the values observed during a reporting interval and
//! renders them into the JSON payloads expected by the telemetry intake
//! service.
//!
//! Beside the metric core live two small collaborators of the reporter:
//!
//!  * `http::HttpConfig`, the allow-list of HTTP headers turned into trace
//!    tags.
//!  * `prefork::check`, which tells the caller whether instrumentation may be
//!    set up in the current process of a pre-forking application server.
//!
//! Batching metrics across a process and shipping payloads to the intake are
//! left to the caller.
#![allow(unknown_lints)]
#![deny(unstable_features, unused_import_braces)]
extern crate chrono;
extern crate clap;
extern crate seahash;
extern crate serde;
extern crate serde_json;
extern crate toml;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate quickcheck;

pub mod cache;
pub mod config;
pub mod http;
pub mod metric;
pub mod prefork;
pub mod time;
