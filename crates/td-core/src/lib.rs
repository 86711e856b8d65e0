//! Core of `td`: checkbox task files bucketed by day, week or month.

pub mod checkbox;
pub mod config;
pub mod list;
pub mod period;
pub mod sessions;
pub mod store;
pub mod timer;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
