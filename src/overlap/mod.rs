//! Overlap calculator and intensity mapper for the calendar heatmap

pub mod calculator;
pub mod intensity;

pub use calculator::*;
pub use intensity::*;
