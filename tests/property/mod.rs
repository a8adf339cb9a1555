//! Property-based tests for lifecycle invariants

mod stack_pruning;
