//! GPU textures and cube-map texture creation.
//!
//! This module provides [`Texture`], a wrapper around WGPU texture resources,
//! the [`CubeFace`] upload order and the mip-chain math used when assembling
//! six face images into one cube-map texture.

use anyhow::*;
use image::{GenericImageView, imageops};

/// The six cube-map faces in upload order.
///
/// The order matches wgpu's cube texture array layers: +X, -X, +Y, -Y, +Z,
/// -Z map to layers 0 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// All faces in the fixed upload order.
    pub const ORDER: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// The texture array layer this face is stored in.
    pub fn layer(self) -> u32 {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }
}

/// Mip levels for a full chain down to 1x1 on the smaller axis.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    width.min(height).max(1).ilog2() + 1
}

/// The size of one mip level, halving per level and clamped at 1.
pub fn mip_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

/// A GPU texture with a view and sampler.
///
/// Wraps WGPU texture objects along with the associated view and sampler.
/// Cube maps are created via [`from_cube_faces`](Self::from_cube_faces),
/// depth buffers via [`create_depth_texture`](Self::create_depth_texture).
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// The returned texture is suitable for use as a `RENDER_ATTACHMENT` in
    /// render passes.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Assemble six decoded face images into one mip-mapped cube-map texture.
    ///
    /// The first face's resolution decides the storage size; mip storage is
    /// allocated for `floor(log2(min(width, height))) + 1` levels. Each face
    /// is uploaded into its array layer in [`CubeFace::ORDER`], then the full
    /// mip chain is generated per face by successive downsampling. The
    /// sampler clamps to the edge on all axes and filters linearly, including
    /// between mips.
    ///
    /// Faces whose size differs from the first face are resized to fit (with
    /// a warning); the original upload would simply be rejected by the GPU.
    pub fn from_cube_faces(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[image::DynamicImage; 6],
        label: &str,
    ) -> Result<Self> {
        let (width, height) = faces[0].dimensions();
        ensure!(width > 0 && height > 0, "cube map face 0 is empty");
        if width != height {
            log::warn!("cube map faces are {width}x{height}, expected square faces");
        }

        let mip_count = mip_level_count(width, height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 6,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (face, image) in CubeFace::ORDER.into_iter().zip(faces.iter()) {
            let mut rgba = image.to_rgba8();
            if image.dimensions() != (width, height) {
                log::warn!(
                    "cube map face {face:?} is {}x{}, resizing to {width}x{height}",
                    rgba.width(),
                    rgba.height(),
                );
                rgba = imageops::resize(&rgba, width, height, imageops::FilterType::Triangle);
            }

            for level in 0..mip_count {
                let (mip_width, mip_height) = mip_dimensions(width, height, level);
                let mip = if level == 0 {
                    rgba.clone()
                } else {
                    imageops::resize(&rgba, mip_width, mip_height, imageops::FilterType::Triangle)
                };

                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        aspect: wgpu::TextureAspect::All,
                        texture: &texture,
                        mip_level: level,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: face.layer(),
                        },
                    },
                    &mip,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * mip_width),
                        rows_per_image: Some(mip_height),
                    },
                    wgpu::Extent3d {
                        width: mip_width,
                        height: mip_height,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_order_matches_array_layers() {
        let layers = CubeFace::ORDER.map(CubeFace::layer);
        assert_eq!(layers, [0, 1, 2, 3, 4, 5]);
        assert_eq!(CubeFace::ORDER[0], CubeFace::PositiveX);
        assert_eq!(CubeFace::ORDER[5], CubeFace::NegativeZ);
    }

    #[test]
    fn mip_count_is_floor_log2_of_min_side_plus_one() {
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(512, 256), 9);
        assert_eq!(mip_level_count(500, 300), 9);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(0, 7), 1);
    }

    #[test]
    fn mip_dimensions_halve_and_clamp() {
        assert_eq!(mip_dimensions(256, 128, 0), (256, 128));
        assert_eq!(mip_dimensions(256, 128, 1), (128, 64));
        assert_eq!(mip_dimensions(256, 128, 7), (2, 1));
        assert_eq!(mip_dimensions(256, 128, 8), (1, 1));
    }
}
