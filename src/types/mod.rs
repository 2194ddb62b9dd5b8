//! Core value types shared across the library

pub mod vector;

pub use vector::{Vector2, Vector3};
