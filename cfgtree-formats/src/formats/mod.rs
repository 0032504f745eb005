//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the configuration tree and various text representations.

pub mod ini;
pub mod json;
pub mod treeviz;

pub use ini::IniFormat;
pub use json::JsonFormat;
pub use treeviz::TreevizFormat;
