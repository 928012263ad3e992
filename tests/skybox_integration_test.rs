//! GPU-bound integration tests for skybox construction and drawing.
//!
//! These need a real adapter, so they stay behind the `integration-tests`
//! feature like the rest of the GPU test suite.
#![cfg(feature = "integration-tests")]

use std::{path::PathBuf, sync::Arc};

use sky_ngin::{
    context::Context,
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, DrawGroup, SceneNode, SkyboxNode, draw_graph},
    },
    resources::ResourceCache,
};

fn write_faces(test_name: &str) -> Vec<String> {
    let dir: PathBuf = std::env::temp_dir().join("sky-ngin-it").join(test_name);
    std::fs::create_dir_all(&dir).unwrap();
    let colours: [[u8; 3]; 6] = [
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
        [0, 255, 255],
        [255, 0, 255],
    ];
    colours
        .iter()
        .enumerate()
        .map(|(i, &[r, g, b])| {
            let path = dir.join(format!("face-{i}.png"));
            image::RgbaImage::from_pixel(8, 8, image::Rgba([r, g, b, 255]))
                .save(&path)
                .unwrap();
            path.to_str().unwrap().to_string()
        })
        .collect()
}

fn as_refs(names: &[String]) -> [&str; 6] {
    std::array::from_fn(|i| names[i].as_str())
}

#[test]
fn two_skyboxes_share_cached_resources() {
    let _ = env_logger::builder().is_test(true).try_init();
    futures::executor::block_on(async {
        let ctx = Context::headless(64, 64).await;
        let mut cache = ResourceCache::new();
        let names = write_faces("sharing");
        let faces = as_refs(&names);

        let first = SkyboxNode::new(&ctx, &mut cache, &faces, DrawGroup(0)).await;
        let second = SkyboxNode::new(&ctx, &mut cache, &faces, DrawGroup(0)).await;

        assert!(Arc::ptr_eq(first.mesh(), second.mesh()));
        assert!(Arc::ptr_eq(first.shader(), second.shader()));
        assert!(Arc::ptr_eq(first.texture(), second.texture()));
        assert!(cache.get_buffer("cube-buffer").is_some());
        assert!(cache.get_buffer("cube-index-buffer").is_some());
    });
}

#[test]
fn cube_texture_has_six_faces_and_a_full_mip_chain() {
    let _ = env_logger::builder().is_test(true).try_init();
    futures::executor::block_on(async {
        let ctx = Context::headless(64, 64).await;
        let mut cache = ResourceCache::new();
        let names = write_faces("texture");
        let faces = as_refs(&names);

        let node = SkyboxNode::new(&ctx, &mut cache, &faces, DrawGroup(0)).await;
        let texture = &node.texture().texture;

        assert_eq!(texture.size().width, 8);
        assert_eq!(texture.size().height, 8);
        assert_eq!(texture.size().depth_or_array_layers, 6);
        // floor(log2(8)) + 1
        assert_eq!(texture.mip_level_count(), 4);
        assert_eq!(texture.dimension(), wgpu::TextureDimension::D2);

        let mesh = node.mesh();
        assert_eq!(mesh.index_format, wgpu::IndexFormat::Uint16);
        assert_eq!(mesh.index_range.clone(), 0..=23);
        assert_eq!(mesh.num_elements, 36);
    });
}

#[test]
fn draw_graph_records_the_skybox_into_a_pass() {
    let _ = env_logger::builder().is_test(true).try_init();
    futures::executor::block_on(async {
        let ctx = Context::headless(64, 64).await;
        let mut cache = ResourceCache::new();
        let names = write_faces("draw");
        let faces = as_refs(&names);

        let mut root = ContainerNode::new();
        SkyboxNode::attach(&ctx, &mut cache, &faces, &mut root, DrawGroup(7)).await;
        root.get_children_mut()[0].set_local_transform(Instance {
            scale: [20.0; 3].into(),
            ..Default::default()
        });
        root.update_world_transform_all();

        let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test target"),
            size: wgpu::Extent3d {
                width: ctx.config.width,
                height: ctx.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("test encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("test pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            draw_graph(
                &root,
                &ctx.camera,
                &ctx.projection,
                DrawGroup(7),
                &ctx.queue,
                &mut pass,
            );
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    });
}
