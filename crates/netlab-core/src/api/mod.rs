//! API implementation submodules.
//!
//! Each submodule contains `impl NetLab` blocks that extend the public API
//! with domain-specific methods. The struct definition remains in `lib.rs`.

mod builder;
mod posts;
mod retry;

pub use builder::NetLabBuilder;
