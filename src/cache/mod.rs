//! A module for caches
//!
//! Some lookups in telemeter are asked the same question many times over the
//! life of a process, header allow-list checks chief among them. The caches
//! here remember the answers until the underlying configuration changes.

pub mod lookup;

pub use self::lookup::Lookup;
