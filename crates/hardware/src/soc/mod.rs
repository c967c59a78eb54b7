//! Memory backing stores.
//!
//! The core reaches memory only through the `Mmu` trait. This module holds
//! the implementations a host can plug in without writing its own.

/// Identity-mapped RAM regions.
pub mod ram;

pub use self::ram::FlatMemory;
