//! One handler module per route family, mirroring the three endpoints.

pub mod hashes;
pub mod keys;
pub mod lists;
