//! Utility types and functions for the converter.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ComponentType`] - Numeric storage type of accessor components
//! - [`AccessorType`] / [`DataType`] - Element shape plus component type
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod pod;
mod data_type;
mod error;
mod math;

pub use pod::*;
pub use data_type::*;
pub use error::*;
pub use math::*;
