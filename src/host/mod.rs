//! Host-side data model.
//!
//! Values arriving from the host environment are loosely typed: arrays of
//! any element type and memory layout, and mappings whose fields may be
//! integers, floats, lists or arrays.  This module represents them as a
//! small closed set of Rust types that the [`bridge`](crate::bridge)
//! validates and converts.

mod array;
mod dtype;
mod value;

pub use array::*;
pub use dtype::*;
pub use value::*;
