/**
 * This module contains the keyed resource cache and all logic for loading
 * cube-map faces from external files.
 */
pub mod cache;
pub mod texture;

pub use cache::{ResourceCache, ResourcePolicy};
