//! Modules layer - Infrastructure components outside the feature slices
//!
//! Contains the loader for the one-time catalog seed.

pub mod seed;
