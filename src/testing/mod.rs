//! Headless testing support: Harness, snapshot helpers.
//!
//! Use the [`Harness`] to drive a [`Component`](crate::app::Component) with
//! simulated UI events. Use [`render_to_string`] to capture emitted markup as
//! plain text for snapshot-style assertions.

pub mod harness;
pub mod snapshot;

pub use harness::{Harness, QueryError};
pub use snapshot::render_to_string;
