mod clock;
pub mod memory;
pub mod postgres;

pub use clock::*;
