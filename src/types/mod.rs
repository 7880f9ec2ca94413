//! Type definitions

pub mod candidate;
pub mod import;

pub use candidate::*;
pub use import::*;
