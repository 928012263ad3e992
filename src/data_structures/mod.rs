//! Engine data structures: the cube primitive, meshes, textures, transforms
//! and the scene graph.
//!
//! - `cube` generates the unit cube primitive and compresses its indices
//! - `instance` holds local/world transformation data
//! - `mesh` is the GPU-side mesh (vertex + compressed index buffer)
//! - `scene_graph` enables hierarchical scene organization and drawing
//! - `texture` contains the cube-map texture wrapper and mip math

pub mod cube;
pub mod instance;
pub mod mesh;
pub mod scene_graph;
pub mod texture;
