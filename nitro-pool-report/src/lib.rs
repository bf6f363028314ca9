//! NitroPool rewards report.
//!
//! Prints a NitroPool's configuration, every reward addition, and lifetime
//! added / harvested totals for both reward tokens.

pub mod config;
pub mod render;
