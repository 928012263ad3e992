//! sky-ngin
//!
//! A small rendering library for cube-map skyboxes. Six face images are
//! decoded into one mip-mapped cube texture, a unit cube mesh is generated
//! with its winding inverted so the faces are visible from inside, and a
//! scene-graph node draws the cube with a dedicated shader each frame. All
//! GPU resources are shared through a string-keyed resource cache so any
//! number of nodes reuse one mesh, one texture and one pipeline.
//!
//! High-level modules
//! - `camera`: camera and perspective projection for view/projection matrices
//! - `context`: GPU context owning device/queue and the surface configuration
//! - `data_structures`: engine data models (cube primitive, meshes, textures,
//!   transforms, scene graph)
//! - `pipelines`: the sky render pipeline and its uniform/bind group plumbing
//! - `resources`: the keyed resource cache and face-image loading
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod pipelines;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
