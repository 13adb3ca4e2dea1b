//! Webpilot: an LLM-driven browser automation agent.
//!
//! The workspace crates carry the machinery: `cdp-session` for protocol
//! plumbing, `dom-indexer` for snapshots and handles, `browser-actions` for
//! the executor and session, `agent-runtime` for the bounded control loop.
//! This crate is the thin outer shell: configuration, the interactive
//! console, and process bootstrap.

pub mod config;
pub mod console;

pub use config::{AppConfig, ConfigError};
