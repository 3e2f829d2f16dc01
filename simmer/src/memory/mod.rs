//! Optional session checkpointing for best-effort resumability.

mod checkpoint;
mod memory_saver;

pub use checkpoint::{CheckpointError, Checkpointer};
pub use memory_saver::MemorySaver;
