#![forbid(unsafe_code)]

pub mod model;
pub mod rewards;
pub mod time;
pub mod walkthrough;

pub use time::Clock;
