//! Command implementations.

pub mod dq_init;
pub mod info;
