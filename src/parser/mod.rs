//! Parsers for the three text layers of the reference document: section
//! segmentation, free-text signatures, and free-text type expressions.

pub mod segment;
pub mod signature;
pub mod typeexpr;
