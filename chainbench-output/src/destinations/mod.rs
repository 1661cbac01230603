//! Concrete implementations of output destinations

pub mod filesystem;
pub mod stdio;

pub use filesystem::{FilesystemConfig, FilesystemDestination};
pub use stdio::StdioDestination;
