pub mod engine;
pub mod memory_index;
