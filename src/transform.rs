//! Affine builders and in-place appliers for [`Mat4`].
//!
//! Appliers mutate `self` and return it so calls chain; each has an `_into`
//! twin that leaves `self` alone and writes the result to `out`. Rotations
//! are left-multiplied (world axes), `scale` and `translate` act on the
//! matrix's local axes.

use crate::error::Result;
use crate::mat::Mat4;
use crate::vec::Vec3;

impl Mat4 {
    pub fn scale_matrix(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.scale(x, y, z);
        m
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.translate_world(x, y, z);
        m
    }

    pub fn rotation_x_matrix(radians: f32) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.rotate_x(radians);
        m
    }

    pub fn rotation_y_matrix(radians: f32) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.rotate_y(radians);
        m
    }

    pub fn rotation_z_matrix(radians: f32) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        m.rotate_z(radians);
        m
    }

    /// Rotation of `radians` around `axis` (Rodrigues' formula).
    ///
    /// The axis does not need to be unit length; a normalized copy is used
    /// and the caller's value is never modified. A zero axis is rejected
    /// with [`MathError::DegenerateVector`](crate::MathError::DegenerateVector).
    pub fn rotation_matrix(radians: f32, axis: Vec3) -> Result<Mat4> {
        let Vec3 { x: a, y: b, z: c } = axis.normalize()?;

        let (sin_alpha, cos_alpha) = radians.sin_cos();

        let k = 1. - cos_alpha;

        let mut m = Mat4::IDENTITY;
        m.e[0][0] = a * a * k + cos_alpha;
        m.e[1][1] = b * b * k + cos_alpha;
        m.e[2][2] = c * c * k + cos_alpha;

        m.e[0][1] = a * b * k + c * sin_alpha;
        m.e[0][2] = a * c * k - b * sin_alpha;
        m.e[1][2] = b * c * k + a * sin_alpha;

        m.e[1][0] = a * b * k - c * sin_alpha;
        m.e[2][0] = a * c * k + b * sin_alpha;
        m.e[2][1] = b * c * k - a * sin_alpha;

        Ok(m)
    }

    /// Right-handed perspective projection with OpenGL clip space: the
    /// camera looks down -z, `z = -near` maps to -1 and `z = -far` to +1.
    ///
    /// `fov_x` is the horizontal field of view, `aspect` is width / height.
    pub fn perspective_matrix(fov_x: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_x / 2.).tan();
        let range = near - far;

        let mut m = Mat4::ZERO;
        m.e[0][0] = f;
        m.e[1][1] = f * aspect;
        m.e[2][2] = (far + near) / range;
        m.e[2][3] = -1.0;
        m.e[3][2] = 2.0 * far * near / range;

        m
    }

    /// Scales the local x, y and z axes (`self * scale_matrix(x, y, z)`).
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Mat4 {
        for (col, s) in self.e.iter_mut().zip([x, y, z]) {
            for v in col.iter_mut() {
                *v *= s;
            }
        }
        self
    }

    pub fn scale_into<'a>(&self, x: f32, y: f32, z: f32, out: &'a mut Mat4) -> &'a mut Mat4 {
        *out = *self;
        out.scale(x, y, z)
    }

    /// Adds a world space offset, scaled by the homogeneous `w` (`e[3][3]`),
    /// to the translation column.
    ///
    /// This matches `translation_matrix(x, y, z) * self` only when the last
    /// row is `[0, 0, 0, w]`; projective matrices are not handled.
    pub fn translate_world(&mut self, x: f32, y: f32, z: f32) -> &mut Mat4 {
        let w = self.e[3][3];
        self.e[3][0] += x * w;
        self.e[3][1] += y * w;
        self.e[3][2] += z * w;
        self
    }

    pub fn translate_world_into<'a>(&self, x: f32, y: f32, z: f32, out: &'a mut Mat4) -> &'a mut Mat4 {
        *out = *self;
        out.translate_world(x, y, z)
    }

    /// Translates along the matrix's own basis vectors. Same affine
    /// restriction as [`Mat4::translate_world`], and the resulting offset is
    /// scaled by `w` the same way, so for `w != 1` this is not
    /// `self * translation_matrix(x, y, z)`.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Mat4 {
        let dx = self.col(0).xyz() * x;
        let dy = self.col(1).xyz() * y;
        let dz = self.col(2).xyz() * z;

        self.translate_world(dx.x, dx.y, dx.z)
            .translate_world(dy.x, dy.y, dy.z)
            .translate_world(dz.x, dz.y, dz.z)
    }

    pub fn translate_into<'a>(&self, x: f32, y: f32, z: f32, out: &'a mut Mat4) -> &'a mut Mat4 {
        *out = *self;
        out.translate(x, y, z)
    }

    // Left-multiplies a plane rotation acting on rows `a` and `b`:
    // a' = c * a - s * b, b' = s * a + c * b.
    fn rotate_rows(&mut self, a: usize, b: usize, radians: f32) -> &mut Mat4 {
        let (s, c) = radians.sin_cos();

        let ra = self.row(a);
        let rb = self.row(b);

        for (j, col) in self.e.iter_mut().enumerate() {
            col[a] = c * ra[j] - s * rb[j];
            col[b] = s * ra[j] + c * rb[j];
        }
        self
    }

    /// `rotation_x_matrix(radians) * self`
    pub fn rotate_x(&mut self, radians: f32) -> &mut Mat4 {
        self.rotate_rows(1, 2, radians)
    }

    pub fn rotate_x_into<'a>(&self, radians: f32, out: &'a mut Mat4) -> &'a mut Mat4 {
        *out = *self;
        out.rotate_x(radians)
    }

    /// `rotation_y_matrix(radians) * self`
    pub fn rotate_y(&mut self, radians: f32) -> &mut Mat4 {
        self.rotate_rows(2, 0, radians)
    }

    pub fn rotate_y_into<'a>(&self, radians: f32, out: &'a mut Mat4) -> &'a mut Mat4 {
        *out = *self;
        out.rotate_y(radians)
    }

    /// `rotation_z_matrix(radians) * self`
    pub fn rotate_z(&mut self, radians: f32) -> &mut Mat4 {
        self.rotate_rows(0, 1, radians)
    }

    pub fn rotate_z_into<'a>(&self, radians: f32, out: &'a mut Mat4) -> &'a mut Mat4 {
        *out = *self;
        out.rotate_z(radians)
    }

    /// `rotation_matrix(radians, axis) * self`. On failure `self` is
    /// unchanged.
    pub fn rotate(&mut self, radians: f32, axis: Vec3) -> Result<&mut Mat4> {
        let r = Mat4::rotation_matrix(radians, axis)?;
        *self = r * *self;
        Ok(self)
    }

    pub fn rotate_into<'a>(&self, radians: f32, axis: Vec3, out: &'a mut Mat4) -> Result<&'a mut Mat4> {
        let r = Mat4::rotation_matrix(radians, axis)?;
        Ok(Mat4::multiply_into(&r, self, out))
    }
}
