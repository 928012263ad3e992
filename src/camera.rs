//! Camera and projection types for view/projection matrices.
//!
//! The [`Camera`] produces a view matrix from a position plus yaw/pitch
//! angles, the [`Projection`] a perspective matrix in wgpu clip space. The
//! skybox draw combines the projection with a node's accumulated transform
//! into one transformation-projection matrix.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};

/// wgpu clip space spans z 0..1 while cgmath produces OpenGL's -1..1, so
/// every projection matrix gets remapped through this.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A free camera described by position and yaw/pitch angles.
#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// The view matrix: world space into camera space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();

        Matrix4::look_to_rh(
            self.position,
            Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize(),
            Vector3::unit_y(),
        )
    }
}

/// Perspective projection parameters, separate from the camera so window
/// resizes only touch the aspect ratio.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, SquareMatrix, Transform};

    #[test]
    fn view_matrix_moves_world_opposite_to_camera() {
        let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        let view = camera.calc_matrix();
        // A point at the camera's position lands at the origin of view space.
        let p = view.transform_point(Point3::new(0.0, 0.0, 10.0));
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5 && p.z.abs() < 1e-5);
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 500.0);
        let m = projection.calc_matrix();
        assert!(m.determinant() != 0.0);
        let near = m * cgmath::Vector4::new(0.0, 0.0, -0.1, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
    }

    #[test]
    fn resize_changes_aspect_only() {
        let mut projection = Projection::new(100, 100, Deg(45.0), 0.1, 500.0);
        let square = projection.calc_matrix();
        projection.resize(200, 100);
        let wide = projection.calc_matrix();
        assert!(square.x.x != wide.x.x);
        assert_eq!(square.y.y, wide.y.y);
    }
}
