//! Meshterrain - convert arbitrary meshes into terrain heightmaps

pub mod core;
pub mod math;
pub mod geometry;
pub mod heightmap;
