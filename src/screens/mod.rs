//! Presentation state for the three screens of the app.
//!
//! Each model holds an explicit state value. [`QuoteScreen`] publishes its
//! state through a `watch` channel so any number of readers can follow it.

pub mod draft;
pub mod list;
pub mod quote;

pub use draft::{DraftError, DraftPhase, ReflectionDraft};
pub use list::ReflectionList;
pub use quote::{QuoteScreen, QuoteState};
