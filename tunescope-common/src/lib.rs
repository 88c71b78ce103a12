//! # TuneScope Common Library
//!
//! Shared code for TuneScope crates including:
//! - Error and result types
//! - Configuration loading
//! - Event types and the EventBus
//! - SSE stream helpers
//! - Display text formatting

pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod sse;

pub use error::{Error, Result};
pub use events::{EventBus, TuneScopeEvent};
