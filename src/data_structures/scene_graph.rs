//! Scene graph and hierarchical scene organization.
//!
//! Nodes own their children as trait objects and carry a local transform;
//! world transforms are refreshed by a top-down pass before drawing. Drawable
//! nodes register in a [`DrawGroup`] and [`draw_graph`] renders one group per
//! call, handing every node its accumulated camera-relative transform.

use std::sync::Arc;

use cgmath::Matrix4;

use crate::{
    camera::{Camera, Projection},
    context::Context,
    data_structures::{
        cube,
        instance::Instance,
        mesh::{DrawMesh, Mesh},
        texture::Texture,
    },
    pipelines::sky::SkyPipeline,
    resources::{ResourceCache, ResourcePolicy, texture::load_cube_faces},
};

/// Tag deciding which drawables a [`draw_graph`] call renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawGroup(pub u32);

pub trait SceneNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn get_local_transform(&self) -> Instance;

    fn set_local_transform(&mut self, instance: Instance);

    /// The accumulated transform as of the last update pass.
    fn get_world_transform(&self) -> Instance;

    /// Recompute this node's world transform from the parent's and push the
    /// result down to all children.
    fn update_world_transforms(&mut self, parent: &Instance);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    /// The draw group this node is registered in, if it draws at all.
    fn draw_group(&self) -> Option<DrawGroup> {
        None
    }

    /// Issue this node's draw calls.
    ///
    /// `transform` is the node's accumulated transform relative to the
    /// camera, as supplied by [`draw_graph`].
    fn draw(
        &self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        transform: Matrix4<f32>,
        projection: &Projection,
    );
}

/// Render every node of `group` reachable from `root`.
///
/// World transforms are taken as-is; run
/// [`update_world_transform_all`](SceneNode::update_world_transform_all) on
/// the root after moving nodes. Each drawn node receives
/// `view * world` as its transform, so with the projection applied in the
/// node this reproduces the camera's full view-projection chain.
pub fn draw_graph(
    root: &dyn SceneNode,
    camera: &Camera,
    projection: &Projection,
    group: DrawGroup,
    queue: &wgpu::Queue,
    render_pass: &mut wgpu::RenderPass<'_>,
) {
    let view = camera.calc_matrix();
    visit(root, view, projection, group, queue, render_pass);
}

fn visit(
    node: &dyn SceneNode,
    view: Matrix4<f32>,
    projection: &Projection,
    group: DrawGroup,
    queue: &wgpu::Queue,
    render_pass: &mut wgpu::RenderPass<'_>,
) {
    if node.draw_group() == Some(group) {
        let transform = view * node.get_world_transform().to_matrix();
        node.draw(queue, render_pass, transform, projection);
    }
    for child in node.get_children() {
        visit(child.as_ref(), view, projection, group, queue, render_pass);
    }
}

/// A node that only groups children under a shared transform.
pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl ContainerNode {
    pub fn new() -> Self {
        Self {
            children: vec![],
            local: Instance::default(),
            world: Instance::default(),
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for ContainerNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn get_local_transform(&self) -> Instance {
        self.local.clone()
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> Instance {
        self.world.clone()
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in &mut self.children {
            child.update_world_transforms(&self.world);
        }
    }

    fn draw(
        &self,
        _: &wgpu::Queue,
        _: &mut wgpu::RenderPass<'_>,
        _: Matrix4<f32>,
        _: &Projection,
    ) {
    }
}

/// A drawable skybox: a cube mesh, a cube-map texture and the sky shader,
/// all shared through the resource cache.
pub struct SkyboxNode {
    children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
    group: DrawGroup,
    mesh: Arc<Mesh>,
    texture: Arc<Texture>,
    shader: Arc<SkyPipeline>,
    bind_group: wgpu::BindGroup,
}

impl SkyboxNode {
    /// Build a skybox from six face files, ordered +X, -X, +Y, -Y, +Z, -Z.
    ///
    /// Each of the three resources is looked up in the cache first and only
    /// built on a miss: the cube mesh and its buffers stay resident, the
    /// texture and the shader are cached under manual policy so the caller
    /// decides when the cache lets go of them.
    ///
    /// Panics when a face image cannot be read or decoded; a skybox with
    /// missing faces has no usable fallback.
    pub async fn new(
        ctx: &Context,
        cache: &mut ResourceCache,
        faces: &[&str; 6],
        group: DrawGroup,
    ) -> Self {
        // Cube mesh
        let mesh = match cache.get_mesh("cube") {
            Some(mesh) => mesh,
            None => {
                let mut cube_data = cube::solid();
                cube::flip_winding(&mut cube_data.indices);

                let (mesh, vertex_buffer, index_buffer) = Mesh::from_cube(&ctx.device, &cube_data);
                cache.insert_buffer("cube-buffer", vertex_buffer, ResourcePolicy::Resident);
                cache.insert_buffer("cube-index-buffer", index_buffer, ResourcePolicy::Resident);
                cache.insert_mesh("cube", mesh, ResourcePolicy::Resident)
            }
        };

        // Cube map texture
        let texture = match cache.get_texture("texture") {
            Some(texture) => texture,
            None => {
                let images = load_cube_faces(faces).await;
                if let Err(e) = images {
                    panic!("Error failed to load cube map: {}", e);
                }
                let images = images.unwrap();

                let texture =
                    Texture::from_cube_faces(&ctx.device, &ctx.queue, &images, "cube map texture")
                        .expect("Couldn't create cube map texture");
                cache.insert_texture("texture", texture, ResourcePolicy::Manual)
            }
        };

        // Shader
        let shader = match cache.get_shader("shader") {
            Some(shader) => shader,
            None => {
                let shader =
                    SkyPipeline::new(&ctx.device, ctx.config.format, Some(Texture::DEPTH_FORMAT));
                cache.insert_shader("shader", shader, ResourcePolicy::Manual)
            }
        };

        let bind_group = shader.bind(&ctx.device, &texture);

        Self {
            children: vec![],
            local: Instance::default(),
            world: Instance::default(),
            group,
            mesh,
            texture,
            shader,
            bind_group,
        }
    }

    /// Build a skybox and hang it under `parent`.
    pub async fn attach(
        ctx: &Context,
        cache: &mut ResourceCache,
        faces: &[&str; 6],
        parent: &mut dyn SceneNode,
        group: DrawGroup,
    ) {
        let node = Self::new(ctx, cache, faces, group).await;
        parent.add_child(Box::new(node));
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub fn shader(&self) -> &Arc<SkyPipeline> {
        &self.shader
    }
}

impl SceneNode for SkyboxNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn get_local_transform(&self) -> Instance {
        self.local.clone()
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> Instance {
        self.world.clone()
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in &mut self.children {
            child.update_world_transforms(&self.world);
        }
    }

    fn draw_group(&self) -> Option<DrawGroup> {
        Some(self.group)
    }

    fn draw(
        &self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        transform: Matrix4<f32>,
        projection: &Projection,
    ) {
        self.shader
            .set_transformation_projection(queue, projection.calc_matrix() * transform);
        render_pass.set_pipeline(self.shader.pipeline());
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw_mesh(&self.mesh);
    }
}
