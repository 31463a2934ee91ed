//! Logic components: control flow within a workflow

pub mod conditional;
pub mod delay;

pub use conditional::Conditional;
pub use delay::Delay;
