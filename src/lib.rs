//! Core of pawtrack: a pet-care routine registry, the per-day logs derived
//! from it, and the metrics computed over both.
//!
//! [`tracker::Tracker`] is the entry point. It loads state through a
//! [`storage::Persistence`] implementation, reads time from a
//! [`clock::Clock`], and saves after every mutation.

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod log_store;
pub mod materialize;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod seed;
pub mod storage;
pub mod tracker;
