//! # CLI Behavior
//!
//! One possible UI client for tierz. The CLI is the only place that knows
//! about terminal I/O, exit codes and colors.
//!
//! ## Naked Execution (`tierz`)
//!
//! Running `tierz` with no arguments defaults to `tierz list`.
//!
//! ## Positions
//!
//! The core counts positions from zero. The CLI shows and accepts one-based
//! positions (`tierz move mita ex 1`) and converts at this boundary.
//!
//! ## Data Directory
//!
//! `--data-dir`, else `TIERZ_DATA_DIR`, else the platform data directory.
//!
//! ## Module Structure
//!
//! - `commands`: per-command handlers that call the API and print results
//! - `logging`: `tracing` subscriber setup
//! - `render`: tier rows, messages, colors
//! - `setup`: argument parsing via clap

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
