//! Oscillators for synthesized beat sounds.

mod sine;
mod square;
mod traits;

pub use sine::SineOscillator;
pub use square::SquareOscillator;
pub use traits::Oscillator;
