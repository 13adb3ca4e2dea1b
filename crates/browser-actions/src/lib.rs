//! Action executor and session manager.
//!
//! [`BrowserService`] is the facade the control loop drives: it owns the
//! browser runtime, the single active page, and that page's handle cache.
//! Primitives follow one shape (resolve, highlight, execute with a bounded
//! timeout, settle, invalidate), and every operation that
//! can mutate the DOM invalidates the whole handle generation before it
//! returns.

pub mod actions;
pub mod config;
pub mod errors;
pub mod port;
pub mod scripts;
pub mod session;

pub use config::ActionConfig;
pub use errors::ActionError;
pub use session::BrowserService;
