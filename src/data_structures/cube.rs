//! The unit cube primitive and index tooling for it.
//!
//! [`solid`] produces cube geometry with outward-facing winding,
//! [`flip_winding`] turns it inside out for skybox use, and
//! [`compress_indices`] packs the index list into the smallest index width
//! wgpu can draw.

use std::ops::RangeInclusive;

/// Raw cube geometry: positions, an index list and the topology they form.
#[derive(Clone, Debug)]
pub struct CubeData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub topology: wgpu::PrimitiveTopology,
}

/// A solid cube spanning -1..1 on every axis, four vertices per face so the
/// faces stay independent, wound counter-clockwise seen from outside.
pub fn solid() -> CubeData {
    #[rustfmt::skip]
    let positions = vec![
        // +X
        [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
        // -X
        [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
        // +Y
        [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
        // -Y
        [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
        // +Z
        [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
        // -Z
        [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0],
    ];

    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();

    CubeData {
        positions,
        indices,
        topology: wgpu::PrimitiveTopology::TriangleList,
    }
}

/// Reverse the winding of every triangle in a triangle-list index buffer.
///
/// Swapping the last two indices of each triangle flips which side is
/// front-facing, so a cube becomes visible from inside without touching the
/// cull mode.
pub fn flip_winding(indices: &mut [u32]) {
    for triangle in indices.chunks_exact_mut(3) {
        triangle.swap(1, 2);
    }
}

/// Index data packed to its final GPU width.
#[derive(Clone, Debug)]
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

/// The result of [`compress_indices`]: packed index data, the matching wgpu
/// index format and the used index range.
#[derive(Clone, Debug)]
pub struct CompressedIndices {
    pub data: IndexData,
    pub format: wgpu::IndexFormat,
    pub range: RangeInclusive<u32>,
    pub count: u32,
}

impl CompressedIndices {
    /// The packed index bytes, ready for an index buffer upload.
    pub fn contents(&self) -> &[u8] {
        match &self.data {
            IndexData::U16(data) => bytemuck::cast_slice(data),
            IndexData::U32(data) => bytemuck::cast_slice(data),
        }
    }
}

/// Pack an index list into the smallest width wgpu can draw with.
///
/// wgpu only draws 16 and 32 bit indices, so anything with a maximum index
/// below 2^16 becomes u16 and the rest stays u32. The returned range records
/// the smallest and largest index in use.
pub fn compress_indices(indices: &[u32]) -> CompressedIndices {
    let min = indices.iter().copied().min().unwrap_or(0);
    let max = indices.iter().copied().max().unwrap_or(0);
    let count = indices.len() as u32;

    let (data, format) = if max <= u16::MAX as u32 {
        (
            IndexData::U16(indices.iter().map(|&i| i as u16).collect()),
            wgpu::IndexFormat::Uint16,
        )
    } else {
        (IndexData::U32(indices.to_vec()), wgpu::IndexFormat::Uint32)
    };

    CompressedIndices {
        data,
        format,
        range: min..=max,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_cube_has_expected_topology() {
        let cube = solid();
        assert_eq!(cube.positions.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.topology, wgpu::PrimitiveTopology::TriangleList);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.positions.len()));
        for position in &cube.positions {
            assert!(position.iter().all(|c| c.abs() == 1.0));
        }
    }

    #[test]
    fn flip_winding_reverses_every_triangle() {
        let cube = solid();
        let mut flipped = cube.indices.clone();
        flip_winding(&mut flipped);
        for (before, after) in cube.indices.chunks(3).zip(flipped.chunks(3)) {
            assert_eq!(after, [before[0], before[2], before[1]]);
        }
        // Flipping twice restores the original order.
        flip_winding(&mut flipped);
        assert_eq!(flipped, cube.indices);
    }

    #[test]
    fn cube_indices_compress_to_u16() {
        let cube = solid();
        let compressed = compress_indices(&cube.indices);
        assert_eq!(compressed.format, wgpu::IndexFormat::Uint16);
        assert_eq!(compressed.range, 0..=23);
        assert_eq!(compressed.count, 36);
        assert_eq!(compressed.contents().len(), 36 * 2);
    }

    #[test]
    fn large_indices_stay_u32() {
        let compressed = compress_indices(&[3, 70_000, 12]);
        assert_eq!(compressed.format, wgpu::IndexFormat::Uint32);
        assert_eq!(compressed.range, 3..=70_000);
        assert_eq!(compressed.contents().len(), 3 * 4);
    }
}
