#[cfg(any(test, feature = "test-util"))]
pub mod in_memory;
pub mod memo_repository;
pub mod profile_repository;

#[cfg(any(test, feature = "test-util"))]
pub use in_memory::{InMemoryContentStore, InMemoryProfileDirectory};
pub use memo_repository::MemoRepository;
pub use profile_repository::ProfileRepository;
