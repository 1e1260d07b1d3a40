//! Concrete document readers

mod json;

pub use json::JsonReader;
