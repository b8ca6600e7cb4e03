//! Blocks for the sample-by-sample fallback simulator

pub mod delay;
pub mod lag;
pub mod pid;

pub use delay::TransportDelay;
pub use lag::FirstOrderLag;
pub use pid::Pid;
