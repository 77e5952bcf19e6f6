mod command;
mod memory;
mod registry;
mod tvm_var;

pub use command::{Command, Operator, UnaryOp};
pub use memory::{MEMORY_SLOTS, MemoryBank};
pub use registry::TvmRegistry;
pub use tvm_var::TvmVar;
