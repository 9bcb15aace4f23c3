//! Storage adapters - in-process implementations of persistence ports.

mod in_memory_comparison_repository;

pub use in_memory_comparison_repository::InMemoryComparisonRepository;
