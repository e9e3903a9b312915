//! Command implementations.

pub mod check;
pub mod info;
pub mod new;
pub mod sync;
