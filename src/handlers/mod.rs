//! Handler implementations

pub mod file;
pub mod stream;

pub use file::{FileHandler, FileMode};
pub use stream::{StreamHandler, StreamTarget};

pub use crate::core::Handler;
