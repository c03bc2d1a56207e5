// Core data models for rivalcal
// These structs represent the domain entities

pub mod schedule;
pub mod raw;
pub mod pin;
pub mod insight;

pub use schedule::*;
pub use raw::*;
pub use pin::*;
pub use insight::*;
