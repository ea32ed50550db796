use core::ops;

use bytemuck::{Pod, Zeroable};

use crate::error::{check_len, MathError, Result, SINGULAR_EPSILON};
use crate::vec::*;

/// Column-major square matrix: `e[col][row]`, so the linear index of an
/// entry is `col * DIM + row`.
macro_rules! mat_impl {
    ($m: ident, $v: ident, $n: literal, $len: literal) => {

        #[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[repr(C)]
        pub struct $m {
            pub e: [[f32; $n]; $n],
        }

        impl Default for $m {
            #[inline]
            fn default() -> $m {
                $m::IDENTITY
            }
        }

        impl $m {
            pub const DIM: usize = $n;

            pub const IDENTITY: $m = $m::scale_uniform(1.0);

            pub const ZERO: $m = $m { e: [[0.0; $n]; $n] };

            /// A fresh matrix is the identity.
            #[inline]
            pub fn new() -> $m {
                $m::IDENTITY
            }

            #[inline]
            pub fn identity() -> $m {
                $m::IDENTITY
            }

            #[inline]
            pub fn identity_into(out: &mut $m) -> &mut $m {
                *out = $m::IDENTITY;
                out
            }

            #[inline]
            pub const fn scale_uniform(d: f32) -> $m {
                let mut e = [[0.0; $n]; $n];
                let mut i = 0;
                while i < $n {
                    e[i][i] = d;
                    i += 1;
                }
                $m { e }
            }

            #[inline]
            pub fn from_columns(v: &[$v; $n]) -> $m {
                bytemuck::cast(*v)
            }

            #[inline]
            pub fn from_cols_array(a: &[f32; $len]) -> $m {
                bytemuck::cast(*a)
            }

            /// Copies the first entries of `data` in column-major order,
            /// ignoring any excess.
            #[inline]
            pub fn from_slice(data: &[f32]) -> Result<$m> {
                check_len(data, $len)?;
                let mut m = $m::ZERO;
                m.as_array_mut().copy_from_slice(&data[..$len]);
                Ok(m)
            }

            #[inline]
            pub fn as_array(&self) -> &[f32; $len] {
                bytemuck::cast_ref(self)
            }

            #[inline]
            pub fn as_array_mut(&mut self) -> &mut [f32; $len] {
                bytemuck::cast_mut(self)
            }

            #[inline]
            pub fn to_cols_array(&self) -> [f32; $len] {
                *self.as_array()
            }

            /// Raw bytes, ready for a constant buffer upload.
            #[inline]
            pub fn as_bytes(&self) -> &[u8] {
                bytemuck::bytes_of(self)
            }

            #[inline]
            pub fn col(&self, i: usize) -> $v {
                $v::from_array(self.e[i])
            }

            #[inline]
            pub fn row(&self, i: usize) -> $v {
                let mut r = [0.0; $n];
                for j in 0..$n {
                    r[j] = self.e[j][i];
                }
                $v::from_array(r)
            }

            #[inline]
            pub fn transpose(&self) -> $m {
                let mut m = $m::ZERO;

                for j in 0..$n {
                    for i in 0..$n {
                        m.e[j][i] = self.e[i][j];
                    }
                }
                m
            }

            #[inline]
            pub fn to_columns(&self) -> [$v; $n] {
                bytemuck::cast(*self)
            }

            #[inline]
            pub fn to_rows(&self) -> [$v; $n] {
                self.transpose().to_columns()
            }

            /// Exact entrywise comparison, no tolerance.
            #[inline]
            pub fn equals(a: &$m, b: &$m) -> bool {
                a.as_array() == b.as_array()
            }

            #[inline]
            pub fn add(a: &$m, b: &$m) -> $m {
                let mut m = *a;
                for (x, y) in m.as_array_mut().iter_mut().zip(b.as_array()) {
                    *x += *y;
                }
                m
            }

            #[inline]
            pub fn add_into<'a>(a: &$m, b: &$m, out: &'a mut $m) -> &'a mut $m {
                *out = $m::add(a, b);
                out
            }

            #[inline]
            pub fn subtract(a: &$m, b: &$m) -> $m {
                let mut m = *a;
                for (x, y) in m.as_array_mut().iter_mut().zip(b.as_array()) {
                    *x -= *y;
                }
                m
            }

            #[inline]
            pub fn subtract_into<'a>(a: &$m, b: &$m, out: &'a mut $m) -> &'a mut $m {
                *out = $m::subtract(a, b);
                out
            }

            /// Matrix product `a * b`.
            #[inline]
            pub fn multiply(a: &$m, b: &$m) -> $m {
                let mut m = $m::ZERO;

                let rows = a.to_rows();
                let cols = b.to_columns();

                for j in 0..$n {
                    for i in 0..$n {
                        m.e[j][i] = $v::dot(rows[i], cols[j]);
                    }
                }
                m
            }

            /// Matrix product `a * b` written to `out`. The product is
            /// accumulated in a temporary, `out` is only assigned at the end.
            #[inline]
            pub fn multiply_into<'a>(a: &$m, b: &$m, out: &'a mut $m) -> &'a mut $m {
                *out = $m::multiply(a, b);
                out
            }

            #[inline]
            fn max_abs(&self) -> f32 {
                self.as_array().iter().fold(0.0f32, |acc, x| acc.max(x.abs()))
            }

            /// Inverse by adjugate over determinant.
            ///
            /// The matrix is divided by its largest absolute entry before the
            /// cofactors are formed and the result is divided by it again, so
            /// the determinant neither overflows nor underflows for finite
            /// input. Fails with [`MathError::SingularMatrix`] when the
            /// determinant of the scaled matrix is below [`SINGULAR_EPSILON`],
            /// and with [`MathError::Overflow`] when an entry of the inverse
            /// is not a finite f32.
            pub fn invert(&self) -> Result<$m> {
                let s = self.max_abs();
                if s == 0.0 {
                    log::debug!("{} is not invertible, all entries are zero", stringify!($m));
                    return Err(MathError::SingularMatrix { det: 0.0 });
                }

                let mut unit = *self;
                for x in unit.as_array_mut() {
                    *x /= s;
                }

                let mut inv = unit.adjugate_inverse()?;
                for x in inv.as_array_mut() {
                    *x /= s;
                }

                if inv.as_array().iter().any(|x| !x.is_finite()) {
                    log::debug!("{} inverse is not representable, scale = {}", stringify!($m), s);
                    return Err(MathError::Overflow);
                }
                Ok(inv)
            }

            /// `out` is left untouched on failure.
            #[inline]
            pub fn invert_into<'a>(m: &$m, out: &'a mut $m) -> Result<&'a mut $m> {
                *out = m.invert()?;
                Ok(out)
            }

            #[inline]
            pub fn invert_in_place(&mut self) -> Result<&mut $m> {
                *self = self.invert()?;
                Ok(self)
            }
        }

        impl ops::Index<usize> for $m {
            type Output = f32;

            #[inline]
            fn index(&self, i: usize) -> &f32 {
                &self.as_array()[i]
            }
        }

        impl ops::IndexMut<usize> for $m {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut f32 {
                &mut self.as_array_mut()[i]
            }
        }

        impl From<[f32; $len]> for $m {
            #[inline]
            fn from(a: [f32; $len]) -> $m {
                $m::from_cols_array(&a)
            }
        }

        impl TryFrom<&[f32]> for $m {
            type Error = MathError;

            #[inline]
            fn try_from(data: &[f32]) -> Result<$m> {
                $m::from_slice(data)
            }
        }

        impl ops::Add<$m> for $m {
            type Output = $m;

            #[inline]
            fn add(self, rhs: $m) -> $m {
                $m::add(&self, &rhs)
            }
        }

        impl ops::Sub<$m> for $m {
            type Output = $m;

            #[inline]
            fn sub(self, rhs: $m) -> $m {
                $m::subtract(&self, &rhs)
            }
        }

        impl ops::Mul<$m> for $m {
            type Output = $m;

            #[inline]
            fn mul(self, rhs: $m) -> $m {
                $m::multiply(&self, &rhs)
            }
        }

        impl ops::MulAssign<$m> for $m {
            #[inline]
            fn mul_assign(&mut self, rhs: $m) {
                *self = $m::multiply(self, &rhs);
            }
        }

        impl ops::Mul<$v> for $m {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: $v) -> $v {
                let mut v = [0.0; $n];

                let a = self.to_rows();

                for i in 0..$n {
                    v[i] = a[i].dot(rhs);
                }
                $v::from_array(v)
            }
        }
    }
}

mat_impl!(Mat4, Vec4, 4, 16);
mat_impl!(Mat2, Vec2, 2, 4);

impl Mat2 {
    /// Entries in storage order: (col0 row0, col0 row1, col1 row0, col1 row1).
    #[inline]
    pub fn from_values(m11: f32, m21: f32, m12: f32, m22: f32) -> Mat2 {
        Mat2 { e: [[m11, m21], [m12, m22]] }
    }

    #[inline]
    pub fn det(&self) -> f32 {
        let [a, b] = self.e[0];
        let [c, d] = self.e[1];
        a * d - b * c
    }

    // Adjugate over determinant, for a matrix already scaled into [-1, 1].
    fn adjugate_inverse(&self) -> Result<Mat2> {
        let [a, b] = self.e[0];
        let [c, d] = self.e[1];

        let det = a * d - b * c;
        if det.abs() < SINGULAR_EPSILON {
            log::debug!("Mat2 is not invertible, det = {}", det);
            return Err(MathError::SingularMatrix { det });
        }
        let inv = 1.0 / det;

        Ok(Mat2 { e: [[d * inv, -b * inv], [-c * inv, a * inv]] })
    }
}

// 2x2 minors of a column pair: rows (0,1) (0,2) (0,3) (1,2) (1,3) (2,3).
#[inline]
fn minors(c0: [f32; 4], c1: [f32; 4]) -> [f32; 6] {
    [
        c0[0] * c1[1] - c0[1] * c1[0],
        c0[0] * c1[2] - c0[2] * c1[0],
        c0[0] * c1[3] - c0[3] * c1[0],
        c0[1] * c1[2] - c0[2] * c1[1],
        c0[1] * c1[3] - c0[3] * c1[1],
        c0[2] * c1[3] - c0[3] * c1[2],
    ]
}

impl Mat4 {
    /// Entries in row-major reading order: `mRC` is row `R`, column `C`.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn from_values(
        m00: f32, m01: f32, m02: f32, m03: f32,
        m10: f32, m11: f32, m12: f32, m13: f32,
        m20: f32, m21: f32, m22: f32, m23: f32,
        m30: f32, m31: f32, m32: f32, m33: f32,
    ) -> Mat4 {
        Mat4 {
            e: [
                [m00, m10, m20, m30],
                [m01, m11, m21, m31],
                [m02, m12, m22, m32],
                [m03, m13, m23, m33],
            ],
        }
    }

    /// Block matrix `[m11 m12; m21 m22]`.
    pub fn from_mat2s(m11: &Mat2, m21: &Mat2, m12: &Mat2, m22: &Mat2) -> Mat4 {
        let mut m = Mat4::ZERO;
        for c in 0..2 {
            for r in 0..2 {
                m.e[c][r] = m11.e[c][r];
                m.e[c][r + 2] = m21.e[c][r];
                m.e[c + 2][r] = m12.e[c][r];
                m.e[c + 2][r + 2] = m22.e[c][r];
            }
        }
        m
    }

    /// Laplace expansion over the 2x2 minors of columns (0, 1) and (2, 3).
    pub fn det(&self) -> f32 {
        let s = minors(self.e[0], self.e[1]);
        let t = minors(self.e[2], self.e[3]);

        s[0] * t[5] - s[1] * t[4] + s[2] * t[3] + s[3] * t[2] - s[4] * t[1] + s[5] * t[0]
    }

    // Adjugate over determinant, for a matrix already scaled into [-1, 1].
    // All sixteen cofactors are computed before anything is written.
    fn adjugate_inverse(&self) -> Result<Mat4> {
        let [a00, a01, a02, a03] = self.e[0];
        let [a10, a11, a12, a13] = self.e[1];
        let [a20, a21, a22, a23] = self.e[2];
        let [a30, a31, a32, a33] = self.e[3];

        let s = minors(self.e[0], self.e[1]);
        let t = minors(self.e[2], self.e[3]);

        let mut adj = Mat4::ZERO;
        adj.e[0] = [
            a11 * t[5] - a12 * t[4] + a13 * t[3],
            a02 * t[4] - a01 * t[5] - a03 * t[3],
            a31 * s[5] - a32 * s[4] + a33 * s[3],
            a22 * s[4] - a21 * s[5] - a23 * s[3],
        ];
        adj.e[1] = [
            a12 * t[2] - a10 * t[5] - a13 * t[1],
            a00 * t[5] - a02 * t[2] + a03 * t[1],
            a32 * s[2] - a30 * s[5] - a33 * s[1],
            a20 * s[5] - a22 * s[2] + a23 * s[1],
        ];
        adj.e[2] = [
            a10 * t[4] - a11 * t[2] + a13 * t[0],
            a01 * t[2] - a00 * t[4] - a03 * t[0],
            a30 * s[4] - a31 * s[2] + a33 * s[0],
            a21 * s[2] - a20 * s[4] - a23 * s[0],
        ];
        adj.e[3] = [
            a11 * t[1] - a10 * t[3] - a12 * t[0],
            a00 * t[3] - a01 * t[1] + a02 * t[0],
            a31 * s[1] - a30 * s[3] - a32 * s[0],
            a20 * s[3] - a21 * s[1] + a22 * s[0],
        ];

        // First input column against the cofactors of that column.
        let det = a00 * adj.e[0][0] + a01 * adj.e[1][0] + a02 * adj.e[2][0] + a03 * adj.e[3][0];
        if det.abs() < SINGULAR_EPSILON {
            log::debug!("Mat4 is not invertible, det = {}", det);
            return Err(MathError::SingularMatrix { det });
        }

        let inv = 1.0 / det;
        for x in adj.as_array_mut() {
            *x *= inv;
        }
        Ok(adj)
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.col(3).xyz()
    }

    /// Copies the translation column of `src` into `out`, keeping the rest
    /// of `out`.
    #[inline]
    pub fn copy_translation<'a>(src: &Mat4, out: &'a mut Mat4) -> &'a mut Mat4 {
        out.e[3][0..3].copy_from_slice(&src.e[3][0..3]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_mat4_near(a: &Mat4, b: &Mat4, eps: f32) {
        for (x, y) in a.as_array().iter().zip(b.as_array()) {
            assert_relative_eq!(*x, *y, epsilon = eps, max_relative = eps);
        }
    }

    // Diagonally dominant, so well conditioned.
    fn random_mat4(rng: &mut StdRng) -> Mat4 {
        let mut m = Mat4::ZERO;
        for x in m.as_array_mut() {
            *x = rng.random_range(-1.0..1.0);
        }
        for i in 0..4 {
            m.e[i][i] += if rng.random_bool(0.5) { 5.0 } else { -5.0 };
        }
        m
    }

    fn random_mat2(rng: &mut StdRng) -> Mat2 {
        Mat2::from_values(
            rng.random_range(2.0..4.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(2.0..4.0),
        )
    }

    fn sample() -> Mat4 {
        Mat4::from_values(
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            2.0, 6.0, 4.0, 8.0,
            3.0, 1.0, 1.0, 2.0,
        )
    }

    #[test]
    fn test_identity_layout() {
        assert_eq!(
            Mat4::identity().to_cols_array(),
            [1., 0., 0., 0., 0., 1., 0., 0., 0., 0., 1., 0., 0., 0., 0., 1.]
        );
        assert_eq!(Mat4::new(), Mat4::identity());
        assert_eq!(Mat4::default(), Mat4::identity());
        assert_eq!(Mat2::new().to_cols_array(), [1., 0., 0., 1.]);

        let mut m = sample();
        Mat4::identity_into(&mut m);
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn test_scale_uniform() {
        let m = Mat4::scale_uniform(3.0);
        assert_eq!(m.to_cols_array(), [3., 0., 0., 0., 0., 3., 0., 0., 0., 0., 3., 0., 0., 0., 0., 3.]);
    }

    #[test]
    fn test_from_values_is_row_major() {
        let m = sample();
        // linear index = col * 4 + row
        assert_eq!(m[1], 5.0);
        assert_eq!(m[4], 2.0);
        assert_eq!(m[12], 4.0);
        assert_eq!(m.e[3][0], 4.0);
        assert_eq!(m.row(0), Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(m.col(0), Vec4::new(1.0, 5.0, 2.0, 3.0));

        let m2 = Mat2::from_values(1.0, 2.0, 3.0, 4.0);
        assert_eq!(m2.to_cols_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m2.row(0), Vec2::new(1.0, 3.0));
    }

    #[test]
    fn test_from_slice() -> Result<()> {
        let data: Vec<f32> = (0..20).map(|x| x as f32).collect();
        let m = Mat4::from_slice(&data)?;
        assert_eq!(m[15], 15.0);
        assert_eq!(m.e[1][2], 6.0);

        let m2: Mat2 = data.as_slice().try_into()?;
        assert_eq!(m2.to_cols_array(), [0.0, 1.0, 2.0, 3.0]);

        assert_eq!(
            Mat4::from_slice(&data[..9]),
            Err(MathError::InsufficientInput {
                expected: 16,
                actual: 9
            })
        );
        Ok(())
    }

    #[test]
    fn test_clone_is_independent() {
        let a = sample();
        let mut b = a;
        b[0] = 100.0;
        assert_eq!(a[0], 1.0);
        assert!(!Mat4::equals(&a, &b));
    }

    #[test]
    fn test_equals_is_exact() {
        let a = sample();
        let mut b = a;
        assert!(Mat4::equals(&a, &b));
        b[7] += 1e-6;
        assert!(!Mat4::equals(&a, &b));
    }

    #[test]
    fn test_from_mat2s() {
        let m = Mat4::from_mat2s(
            &Mat2::from_values(1.0, 2.0, 3.0, 4.0),
            &Mat2::from_values(5.0, 6.0, 7.0, 8.0),
            &Mat2::from_values(9.0, 10.0, 11.0, 12.0),
            &Mat2::from_values(13.0, 14.0, 15.0, 16.0),
        );
        let expected = Mat4::from_values(
            1.0, 3.0, 9.0, 11.0,
            2.0, 4.0, 10.0, 12.0,
            5.0, 7.0, 13.0, 15.0,
            6.0, 8.0, 14.0, 16.0,
        );
        assert_eq!(m, expected);

        let i = Mat2::identity();
        let z = Mat2::ZERO;
        assert_eq!(Mat4::from_mat2s(&i, &z, &z, &i), Mat4::identity());
    }

    #[test]
    fn test_bytes() {
        let m = Mat4::identity();
        assert_eq!(m.as_bytes().len(), 64);
        assert_eq!(&m.as_bytes()[0..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn test_add_subtract() {
        let a = Mat2::from_values(1.0, 2.0, 3.0, 4.0);
        let b = Mat2::from_values(4.0, 3.0, 2.0, 1.0);
        assert_eq!(a + b, Mat2::from_values(5.0, 5.0, 5.0, 5.0));
        assert_eq!(a - b, Mat2::from_values(-3.0, -1.0, 1.0, 3.0));

        let mut out = Mat4::ZERO;
        Mat4::add_into(&Mat4::identity(), &Mat4::identity(), &mut out);
        assert_eq!(out, Mat4::scale_uniform(2.0));
        Mat4::subtract_into(&Mat4::identity(), &Mat4::identity(), &mut out);
        assert_eq!(out, Mat4::ZERO);
    }

    #[test]
    fn test_mat2_multiply() {
        let a = Mat2::from_values(1.0, 3.0, 2.0, 4.0); // rows [1 2; 3 4]
        let b = Mat2::from_values(5.0, 7.0, 6.0, 8.0); // rows [5 6; 7 8]
        // [1 2; 3 4] * [5 6; 7 8] = [19 22; 43 50]
        assert_eq!(a * b, Mat2::from_values(19.0, 43.0, 22.0, 50.0));
        assert_eq!(a * Vec2::new(1.0, 1.0), Vec2::new(3.0, 7.0));
    }

    #[test]
    fn test_mat4_multiply() {
        let m = sample();
        let t = Mat4::from_values(
            1.0, 0.0, 0.0, 10.0,
            0.0, 1.0, 0.0, 20.0,
            0.0, 0.0, 1.0, 30.0,
            0.0, 0.0, 0.0, 1.0,
        );
        let p = t * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(p, Vec4::new(11.0, 22.0, 33.0, 1.0));

        // Last column of m * t is m * (10, 20, 30, 1).
        let mt = m * t;
        assert_eq!(mt.col(3), m * Vec4::new(10.0, 20.0, 30.0, 1.0));
        assert_eq!(mt.col(0), m.col(0));
    }

    #[test]
    fn test_identity_is_neutral() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let m = random_mat4(&mut rng);
            assert_eq!(Mat4::identity() * m, m);
            assert_eq!(m * Mat4::identity(), m);

            let m2 = random_mat2(&mut rng);
            assert_eq!(Mat2::identity() * m2, m2);
            assert_eq!(m2 * Mat2::identity(), m2);
        }
    }

    #[test]
    fn test_multiply_aliased() {
        let a = sample();
        let expected = Mat4::multiply(&a, &a);

        let mut out = Mat4::ZERO;
        Mat4::multiply_into(&a, &a, &mut out);
        assert_eq!(out, expected);

        let mut m = a;
        m *= m;
        assert_eq!(m, expected);

        let mut m = a;
        m *= Mat4::identity();
        assert_eq!(m, a);
    }

    #[test]
    fn test_det() {
        assert_eq!(Mat4::identity().det(), 1.0);
        assert_eq!(Mat4::scale_uniform(2.0).det(), 16.0);
        assert_eq!(Mat2::from_values(1.0, 2.0, 3.0, 4.0).det(), -2.0);
        assert_eq!(Mat2::identity().det(), 1.0);
    }

    #[test]
    fn test_det_general() {
        // Last row is not [0, 0, 0, 1].
        assert_relative_eq!(sample().det(), 72.0, epsilon = 1e-3);
        assert_relative_eq!(sample().transpose().det(), 72.0, epsilon = 1e-3);

        let b = Mat4::from_values(
            2.0, 0.0, 0.0, 1.0,
            0.0, 3.0, 0.0, 2.0,
            1.0, 0.0, 4.0, 3.0,
            0.0, 1.0, 0.0, 1.0,
        );
        assert_relative_eq!(b.det(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_det_multiplicative() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let a = random_mat4(&mut rng);
            let b = random_mat4(&mut rng);
            assert_relative_eq!((a * b).det(), a.det() * b.det(), max_relative = 1e-4);

            let a = random_mat2(&mut rng);
            let b = random_mat2(&mut rng);
            assert_relative_eq!((a * b).det(), a.det() * b.det(), max_relative = 1e-4);
        }
    }

    #[test]
    fn test_mat2_invert() -> Result<()> {
        assert_eq!(Mat2::from_values(1.0, 0.0, 0.0, 1.0).invert()?, Mat2::identity());

        let m = Mat2::from_values(4.0, 2.0, 7.0, 6.0);
        let inv = m.invert()?;
        // det = 10
        assert_relative_eq!(inv[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(inv[1], -0.2, epsilon = 1e-6);
        assert_relative_eq!(inv[2], -0.7, epsilon = 1e-6);
        assert_relative_eq!(inv[3], 0.4, epsilon = 1e-6);

        let p = m * inv;
        for (x, y) in p.as_array().iter().zip(Mat2::identity().as_array()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_mat2_invert_singular() {
        let m = Mat2::from_values(1.0, 2.0, 2.0, 4.0);
        assert_eq!(m.invert(), Err(MathError::SingularMatrix { det: 0.0 }));

        let mut out = Mat2::scale_uniform(7.0);
        assert!(Mat2::invert_into(&m, &mut out).is_err());
        assert_eq!(out, Mat2::scale_uniform(7.0));
    }

    #[test]
    fn test_mat2_invert_aliased() -> Result<()> {
        let m = Mat2::from_values(4.0, 2.0, 7.0, 6.0);
        let mut out = Mat2::ZERO;
        Mat2::invert_into(&m, &mut out)?;

        let mut a = m;
        a.invert_in_place()?;
        assert_eq!(a, out);
        Ok(())
    }

    #[test]
    fn test_mat4_invert() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let m = random_mat4(&mut rng);
            let inv = m.invert()?;
            assert_mat4_near(&(m * inv), &Mat4::identity(), 1e-5);
            assert_mat4_near(&(inv * m), &Mat4::identity(), 1e-5);
            assert_mat4_near(&inv.invert()?, &m, 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_mat4_invert_general() -> Result<()> {
        let m = sample();
        let inv = m.invert()?;
        assert_mat4_near(&(m * inv), &Mat4::identity(), 1e-5);
        Ok(())
    }

    #[test]
    fn test_mat4_invert_aliased() -> Result<()> {
        let m = sample();
        let mut out = Mat4::ZERO;
        Mat4::invert_into(&m, &mut out)?;

        let mut a = m;
        a.invert_in_place()?;
        assert_eq!(a, out);
        Ok(())
    }

    #[test]
    fn test_mat4_invert_singular() {
        let mut m = sample();
        // Duplicate a row.
        for c in 0..4 {
            m.e[c][3] = m.e[c][0];
        }
        assert!(matches!(m.invert(), Err(MathError::SingularMatrix { .. })));
        assert!(matches!(Mat4::ZERO.invert(), Err(MathError::SingularMatrix { .. })));

        let mut out = Mat4::scale_uniform(2.0);
        assert!(Mat4::invert_into(&Mat4::ZERO, &mut out).is_err());
        assert_eq!(out, Mat4::scale_uniform(2.0));

        let mut a = Mat4::ZERO;
        assert!(a.invert_in_place().is_err());
        assert_eq!(a, Mat4::ZERO);
    }

    #[test]
    fn test_invert_extreme_magnitudes() -> Result<()> {
        let inv = Mat2::from_values(1e20, 0.0, 0.0, 1e20).invert()?;
        assert_relative_eq!(inv.e[0][0], 1e-20, max_relative = 1e-6);
        assert_relative_eq!(inv.e[1][1], 1e-20, max_relative = 1e-6);
        assert_eq!(inv.e[0][1], 0.0);

        let inv = Mat4::scale_uniform(1e20).invert()?;
        for c in 0..4 {
            assert_relative_eq!(inv.e[c][c], 1e-20, max_relative = 1e-6);
        }
        let inv = Mat4::scale_uniform(1e-30).invert()?;
        for c in 0..4 {
            assert_relative_eq!(inv.e[c][c], 1e30, max_relative = 1e-6);
        }

        let mut big = sample();
        for x in big.as_array_mut() {
            *x *= 1e18;
        }
        let expected = sample().invert()?;
        let inv = big.invert()?;
        for (a, b) in inv.as_array().iter().zip(expected.as_array()) {
            assert_relative_eq!(*a, b * 1e-18, max_relative = 1e-4);
        }
        Ok(())
    }

    #[test]
    fn test_invert_extreme_singular() {
        assert!(matches!(
            Mat2::from_values(1e20, 1e20, 1e20, 1e20).invert(),
            Err(MathError::SingularMatrix { .. })
        ));
        assert!(matches!(
            Mat4::from_cols_array(&[1e20; 16]).invert(),
            Err(MathError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_invert_overflow() {
        // The inverse of a subnormal diagonal exceeds f32::MAX.
        assert_eq!(Mat2::scale_uniform(1e-39).invert(), Err(MathError::Overflow));
        assert_eq!(Mat4::scale_uniform(1e-39).invert(), Err(MathError::Overflow));

        let mut m = Mat4::scale_uniform(1e-39);
        assert!(m.invert_in_place().is_err());
        assert_eq!(m, Mat4::scale_uniform(1e-39));
    }

    #[test]
    fn test_copy_translation() {
        let src = Mat4::from_values(
            1.0, 0.0, 0.0, 10.0,
            0.0, 1.0, 0.0, 20.0,
            0.0, 0.0, 1.0, 30.0,
            0.0, 0.0, 0.0, 1.0,
        );
        let mut out = Mat4::scale_uniform(2.0);
        Mat4::copy_translation(&src, &mut out);
        assert_eq!(out.translation(), Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(out.e[3][3], 2.0);
        assert_eq!(out.e[0][0], 2.0);
    }

    #[test]
    fn test_transpose() {
        let m = sample();
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().row(0), m.col(0));
        assert_eq!(Mat4::from_columns(&m.to_rows()), m.transpose());
        assert_eq!(Mat4::from_columns(&m.to_columns()), m);
    }
}
