//! CLI command definitions.

pub mod check;
pub mod run;
pub mod serve;
