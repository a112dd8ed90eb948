//! Bank-specific statement layouts.

pub mod banregio;
