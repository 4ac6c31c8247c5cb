//! Application layer orchestrating the cleanup run.
//!
//! `cleanup` is the entry point: it applies the safety gate to a
//! `CleanupConfig` and, when cleared, hands a billing client to
//! `CleanupRunner`, which archives products and then deactivates prices.

pub mod cleanup;
