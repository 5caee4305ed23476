//! Backend implementations for different execution contexts
//!
//! Only local process execution is built in. Other contexts can be supported
//! by implementing the [`Launcher`](crate::launcher::Launcher) trait.

pub mod local;
pub use local::{ChunkStream, LocalLauncher, LocalProcessHandle};
