//! Adapter implementations for ledger ports.

pub mod memory;
