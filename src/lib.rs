//! # bindview
//!
//! A declarative view-binding compiler.
//!
//! Component definitions carry annotated members: fields bound to inputs or
//! repeated over a list, methods bound to taps and checkbox changes, and
//! declarative state mutations (bind, toggle, remove) addressed by path
//! expressions. bindview validates those annotations once, emits the markup
//! the host renders, and at runtime routes each host event through its bound
//! mutations and handler against the component's JSON state.
//!
//! ## Core Systems
//!
//! - **[`syntax`]**: Logos tokenizer and parser for selectors and path expressions
//! - **[`state`]**: State tree, path resolution with iteration placeholders, mutation primitives
//! - **[`binding`]**: Annotation kinds and the (selector, event) binding registry
//! - **[`metadata`]**: Component definitions and annotation extraction/validation
//! - **[`markup`]**: Slotmap-backed markup tree and the emitter that builds it
//! - **[`event`]**: Events, handler table, FIFO dispatcher, state-changed signal
//! - **[`app`]**: Component instance tying everything together
//! - **[`testing`]**: Headless harness and snapshot rendering

// Foundation
pub mod syntax;
pub mod state;

// Declarations
pub mod binding;
pub mod metadata;

// Output
pub mod markup;

// Runtime
pub mod event;
pub mod app;

// Test support
pub mod testing;

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use bindview_macros::component;
