//! The keyed store of shared GPU resources.
//!
//! Meshes, textures, shaders and raw buffers are cached under string keys and
//! handed out as [`Arc`] handles, so every node asking for the same key works
//! with the same GPU object. A lookup miss is the expected "build and insert"
//! path, not an error.

use std::{collections::HashMap, sync::Arc};

use crate::{
    data_structures::{mesh::Mesh, texture::Texture},
    pipelines::sky::SkyPipeline,
};

/// Lifecycle policy for a cache entry.
///
/// `Resident` entries live as long as the cache; `Manual` entries stay until
/// the caller releases them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePolicy {
    Resident,
    Manual,
}

struct Entry<T> {
    resource: Arc<T>,
    policy: ResourcePolicy,
}

/// One keyed store per resource kind. Inserting under an existing key
/// replaces the entry, so a key maps to at most one cached instance at a
/// time; earlier handles stay alive until dropped.
struct Store<T> {
    entries: HashMap<String, Entry<T>>,
}

impl<T> Store<T> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.get(key).map(|entry| entry.resource.clone())
    }

    fn insert(&mut self, key: impl Into<String>, resource: T, policy: ResourcePolicy) -> Arc<T> {
        let key = key.into();
        let resource = Arc::new(resource);
        if let Some(previous) = self.entries.insert(
            key.clone(),
            Entry {
                resource: resource.clone(),
                policy,
            },
        ) {
            log::debug!(
                "replaced resource {key:?} (was {:?})",
                previous.policy
            );
        }
        resource
    }

    /// Drop a `Manual` entry. `Resident` entries are kept and `false` is
    /// returned; same for unknown keys.
    fn release(&mut self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.policy == ResourcePolicy::Manual => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }
}

/// The process-wide resource cache used during scene setup.
///
/// Construction and release happen while building or tearing down the scene,
/// never concurrently with drawing, so no locking is involved.
pub struct ResourceCache {
    meshes: Store<Mesh>,
    textures: Store<Texture>,
    shaders: Store<SkyPipeline>,
    buffers: Store<wgpu::Buffer>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self {
            meshes: Store::new(),
            textures: Store::new(),
            shaders: Store::new(),
            buffers: Store::new(),
        }
    }

    pub fn get_mesh(&self, key: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(key)
    }

    pub fn insert_mesh(
        &mut self,
        key: impl Into<String>,
        mesh: Mesh,
        policy: ResourcePolicy,
    ) -> Arc<Mesh> {
        self.meshes.insert(key, mesh, policy)
    }

    pub fn release_mesh(&mut self, key: &str) -> bool {
        self.meshes.release(key)
    }

    pub fn get_texture(&self, key: &str) -> Option<Arc<Texture>> {
        self.textures.get(key)
    }

    pub fn insert_texture(
        &mut self,
        key: impl Into<String>,
        texture: Texture,
        policy: ResourcePolicy,
    ) -> Arc<Texture> {
        self.textures.insert(key, texture, policy)
    }

    pub fn release_texture(&mut self, key: &str) -> bool {
        self.textures.release(key)
    }

    pub fn get_shader(&self, key: &str) -> Option<Arc<SkyPipeline>> {
        self.shaders.get(key)
    }

    pub fn insert_shader(
        &mut self,
        key: impl Into<String>,
        shader: SkyPipeline,
        policy: ResourcePolicy,
    ) -> Arc<SkyPipeline> {
        self.shaders.insert(key, shader, policy)
    }

    pub fn release_shader(&mut self, key: &str) -> bool {
        self.shaders.release(key)
    }

    pub fn get_buffer(&self, key: &str) -> Option<Arc<wgpu::Buffer>> {
        self.buffers.get(key)
    }

    pub fn insert_buffer(
        &mut self,
        key: impl Into<String>,
        buffer: wgpu::Buffer,
        policy: ResourcePolicy,
    ) -> Arc<wgpu::Buffer> {
        self.buffers.insert(key, buffer, policy)
    }

    pub fn release_buffer(&mut self, key: &str) -> bool {
        self.buffers.release(key)
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}
