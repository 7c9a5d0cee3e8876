mod file;
mod in_memory;

pub use file::FileMailbox;
pub use in_memory::InMemoryMailbox;
