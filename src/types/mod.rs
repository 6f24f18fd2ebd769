//! XML value types
//!
//! This module defines the value types attached to XML elements.

pub mod attribute;

pub use attribute::Attribute;
