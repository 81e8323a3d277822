#![forbid(unsafe_code)]

pub mod model;
pub mod queue;
pub mod stats;
pub mod time;

pub use time::Clock;
