//! Data components

pub mod json_transform;

pub use json_transform::JsonTransform;
