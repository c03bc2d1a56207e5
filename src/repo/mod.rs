pub mod kv;
pub mod pin;

pub use kv::*;
pub use pin::*;
