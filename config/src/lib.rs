//! # Config Crate
//!
//! Centralized configuration constants for the shape mesh engine.
//! Magic numbers shared between the tessellation front end, the mesh
//! aggregator and the rendering consumer are defined here so every crate
//! agrees on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{U16_INDEX_VERTEX_LIMIT, MeshConfig};
//!
//! // Index buffers widen once the vertex count reaches the limit
//! let vertex_count = 70_000;
//! let wide = vertex_count >= U16_INDEX_VERTEX_LIMIT;
//! assert!(wide);
//!
//! // Builders take their default colors from a config snapshot
//! let config = MeshConfig::default();
//! assert_eq!(config.face_color, 0xdedede);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Renderer Contract**: Buffer layout limits match the GPU consumer
//! - **Validated Snapshots**: Runtime overrides go through `MeshConfig::new`

pub mod constants;

#[cfg(test)]
mod tests;
