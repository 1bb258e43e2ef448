//! Parameter automation curves.
//!
//! Beat sounds are shaped by exponential ramps: the gain decays from its start
//! level to near silence, and the woodblock's pitch falls over its first 50 ms.

mod ramp;

pub use ramp::ExponentialRamp;
