//! Rule-based advisory engine comparing simulated pins with competitor stages

pub mod engine;
pub mod rules;

pub use engine::*;
pub use rules::*;
