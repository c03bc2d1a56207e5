//! Fetch coordination around the external schedule backend.
//!
//! Nothing here performs I/O: the caller dispatches requests, reports
//! completions and hands over the records it received.

pub mod bucket;
pub mod debounce;
pub mod sequencer;

pub use bucket::*;
pub use debounce::*;
pub use sequencer::*;
