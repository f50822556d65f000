//! Common utilities and types shared across DualPass modules.
//!
//! This module provides the error type used by every crate in the workspace
//! and the small value types (password slots, passwords) that flow between them.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Password, Slot};
