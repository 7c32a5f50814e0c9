//! Compatibility check for pre-forking application servers.
//!
//! A pre-forking server may load the application once in a coordinating
//! "master" process and then fork workers from it. Instrumentation started in
//! the master does not survive into the workers, so the caller needs to know
//! where it is running before it sets anything up.

use std::collections::HashMap;
use std::error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// A hook run by the host in a worker after fork, or at process exit.
pub type Hook = Box<dyn FnMut() + Send>;

/// Host option: the server runs application threads.
pub const ENABLE_THREADS: &str = "enable-threads";
/// Host option: each worker loads the application itself.
pub const LAZY_APPS: &str = "lazy-apps";
/// Host option: a master process supervises the workers.
pub const MASTER: &str = "master";

/// Outcome of `check` other than "go ahead"
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The host is configured in a way instrumentation cannot work with.
    Config(String),
    /// This is the master process; instrumentation must not be set up here.
    /// Hooks passed to `check` have been installed.
    MasterProcess,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Config(ref reason) => write!(f, "incompatible host configuration: {}", reason),
            Error::MasterProcess => write!(f, "running in the master process"),
        }
    }
}

impl error::Error for Error {}

/// The pre-forking server the process runs under.
pub trait Host {
    /// Whether a boolean option is set.
    fn option(&self, name: &str) -> bool;
    /// The configured number of processes.
    fn process_count(&self) -> usize;
    /// The worker id of the current process; zero in the master.
    fn worker_id(&self) -> usize;
    /// Arrange for `hook` to run in each worker after fork.
    fn register_postfork(&mut self, hook: Hook) -> Result<(), Error>;
    /// Remove and return the installed at-exit hook.
    fn take_atexit(&mut self) -> Option<Hook>;
    /// Install the at-exit hook.
    fn set_atexit(&mut self, hook: Hook);
}

/// Check whether instrumentation may be set up in this process
///
/// `host` is `None` when the process does not run under a pre-forking server,
/// in which case there is nothing to check. In the master of a multi-process
/// server without lazy application loading, `worker_callback` is registered to
/// run in each worker after fork, `atexit` is chained in front of the host's
/// at-exit hook, and `Error::MasterProcess` is returned.
pub fn check<H>(host: Option<&mut H>, worker_callback: Option<Hook>, atexit: Option<Hook>) -> Result<(), Error>
where
    H: Host,
{
    let host = match host {
        Some(host) => host,
        None => return Ok(()),
    };

    if !host.option(ENABLE_THREADS) {
        return Err(Error::Config("enable-threads option must be set to true".into()));
    }

    if host.process_count() > 1 && !host.option(LAZY_APPS) && host.worker_id() == 0 {
        if !host.option(MASTER) {
            return Err(Error::Config(
                "master option must be enabled when multiple processes are used".into(),
            ));
        }

        if let Some(callback) = worker_callback {
            host.register_postfork(callback)?;
        }

        if let Some(atexit) = atexit {
            let original = host.take_atexit();
            host.set_atexit(chain_atexit(atexit, original));
        }

        debug!("pre-fork host master process detected, skipping instrumentation");
        return Err(Error::MasterProcess);
    }

    Ok(())
}

fn chain_atexit(mut first: Hook, mut then: Option<Hook>) -> Hook {
    Box::new(move || {
        if panic::catch_unwind(AssertUnwindSafe(|| first())).is_err() {
            warn!("at-exit hook panicked");
        }
        if let Some(ref mut then) = then {
            then();
        }
    })
}

/// A `Host` described by plain values
///
/// Post-fork hooks are collected in registration order; `run_postfork` and
/// `run_atexit` play the host's part.
#[derive(Default)]
pub struct StaticHost {
    options: HashMap<String, bool>,
    process_count: usize,
    worker_id: usize,
    postfork: Vec<Hook>,
    atexit: Option<Hook>,
}

impl fmt::Debug for StaticHost {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "StaticHost {{ options: {:?}, process_count: {}, worker_id: {}, postfork: {}, atexit: {} }}",
            self.options,
            self.process_count,
            self.worker_id,
            self.postfork.len(),
            self.atexit.is_some()
        )
    }
}

impl StaticHost {
    /// A single-process host with no option set.
    pub fn new() -> StaticHost {
        StaticHost {
            process_count: 1,
            ..StaticHost::default()
        }
    }

    /// Set a boolean option.
    pub fn with_option<S>(mut self, name: S, value: bool) -> StaticHost
    where
        S: Into<String>,
    {
        self.options.insert(name.into(), value);
        self
    }

    pub fn with_process_count(mut self, count: usize) -> StaticHost {
        self.process_count = count;
        self
    }

    pub fn with_worker_id(mut self, id: usize) -> StaticHost {
        self.worker_id = id;
        self
    }

    /// Install an at-exit hook, as the application might have before `check`.
    pub fn with_atexit(mut self, hook: Hook) -> StaticHost {
        self.atexit = Some(hook);
        self
    }

    /// The number of registered post-fork hooks.
    pub fn postfork_len(&self) -> usize {
        self.postfork.len()
    }

    /// Run every post-fork hook, as a freshly forked worker would.
    pub fn run_postfork(&mut self) {
        for hook in &mut self.postfork {
            hook();
        }
    }

    /// Run the at-exit hook, if any.
    pub fn run_atexit(&mut self) {
        if let Some(ref mut hook) = self.atexit {
            hook();
        }
    }
}

impl Host for StaticHost {
    fn option(&self, name: &str) -> bool {
        self.options.get(name).cloned().unwrap_or(false)
    }

    fn process_count(&self) -> usize {
        self.process_count
    }

    fn worker_id(&self) -> usize {
        self.worker_id
    }

    fn register_postfork(&mut self, hook: Hook) -> Result<(), Error> {
        self.postfork.push(hook);
        Ok(())
    }

    fn take_atexit(&mut self) -> Option<Hook> {
        self.atexit.take()
    }

    fn set_atexit(&mut self, hook: Hook) {
        self.atexit = Some(hook);
    }
}
