//! Render pipeline definitions.
//!
//! `sky` holds the cube-map pipeline and its uniform plumbing.

pub mod sky;
