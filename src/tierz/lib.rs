//! # Tierz Architecture
//!
//! Tierz is a **UI-agnostic tier-list engine**. It keeps a fixed catalog of
//! items arranged into ranked tiers, applies drag-style moves, and persists
//! each accepted move as a small atomic batch. The `tierz` binary is one
//! client of the library, not the library itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Parses arguments, renders tier rows, exit codes          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) + commands (commands/*.rs)                    │
//! │  - Resolves names, dispatches, returns CmdResult            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs)                                       │
//! │  - plan ─▶ optimistic apply ─▶ commit ─▶ reconcile on error │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                            │
//!                 ▼                            ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Arrangement + Planner        │ │  Storage (store/)         │
//! │  positions, pin rules, deltas │ │  adapter, backends        │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns Rust values. It
//! never prints and never exits. Diagnostics go through `tracing`; installing
//! a subscriber is up to the client.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: one module per user operation
//! - [`session`]: the live arrangement and the move sequence
//! - [`arrangement`]: item placement and the single splice routine
//! - [`planner`]: drop resolution, clamping, pin rules, deltas
//! - [`catalog`], [`tiers`]: the fixed item and tier sets
//! - [`store`]: persistence adapter and storage backends
//! - [`export`]: text renderings and the export bundle
//! - [`config`]: `config.json` handling
//! - [`model`], [`error`]: shared types

pub mod api;
pub mod arrangement;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod planner;
pub mod session;
pub mod store;
pub mod tiers;

mod seed;

#[cfg(test)]
pub(crate) mod test_utils;
