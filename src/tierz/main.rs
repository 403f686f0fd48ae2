//! # tierz
//!
//! Terminal client for the tierz library. All behavior lives in the library;
//! this binary parses arguments, calls [`tierz::api::TierzApi`] and prints
//! what comes back.
//!
//! Errors are printed as `Error: ...` on stderr with exit code 1. Rejected
//! moves are not errors: they print an informational line and exit 0.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
