//! Terminal view layer.

pub mod render;
