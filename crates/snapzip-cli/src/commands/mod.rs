//! Command implementations.

pub mod archive;
pub mod completion;
