use core::ops;
use core::fmt;

use bytemuck::{Pod, Zeroable};

use crate::error::{check_len, MathError, Result};

macro_rules! vec_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: ops::$trait::$func(self.$e, rhs.$e), )* }
            }
        }
    }
}

macro_rules! vec_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            #[inline]
            fn $func(&mut self, rhs: $v) {
                $( ops::$trait::$func(&mut self.$e, rhs.$e); )*
            }
        }
    }
}

macro_rules! scalar_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {

        impl ops::$trait<f32> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: f32) -> $v {
                $v { $( $e: ops::$trait::$func(self.$e, rhs), )* }
            }
        }

        impl ops::$trait<$v> for f32 {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: ops::$trait::$func(self, rhs.$e), )* }
            }
        }
    }
}

macro_rules! scalar_assign_op_impl {
    ($trait: ident, $func: ident, $v: ident, $($e: ident),*) => {

        impl ops::$trait<f32> for $v {
            #[inline]
            fn $func(&mut self, rhs: f32) {
                $( ops::$trait::$func(&mut self.$e, rhs); )*
            }
        }
    }
}

/// Elementwise arithmetic with an explicit output target.
///
/// Every `*_into` function computes the full result before touching `out`,
/// and returns `out` so calls can be chained. The plain versions allocate.
macro_rules! vec_arith_impl {
    ($v: ident, $($e: ident),*) => {
        impl $v {
            #[inline]
            pub fn add(a: $v, b: $v) -> $v {
                a + b
            }

            #[inline]
            pub fn add_into(a: $v, b: $v, out: &mut $v) -> &mut $v {
                *out = a + b;
                out
            }

            #[inline]
            pub fn subtract(a: $v, b: $v) -> $v {
                a - b
            }

            #[inline]
            pub fn subtract_into(a: $v, b: $v, out: &mut $v) -> &mut $v {
                *out = a - b;
                out
            }

            /// Elementwise (Hadamard) product.
            #[inline]
            pub fn multiply(a: $v, b: $v) -> $v {
                a * b
            }

            #[inline]
            pub fn multiply_into(a: $v, b: $v, out: &mut $v) -> &mut $v {
                *out = a * b;
                out
            }

            #[inline]
            pub fn multiply_scalar(a: $v, s: f32) -> $v {
                a * s
            }

            #[inline]
            pub fn multiply_scalar_into(a: $v, s: f32, out: &mut $v) -> &mut $v {
                *out = a * s;
                out
            }
        }
    }
}

macro_rules! vec_float_utils_impl {
    ($v: ident, $($e: ident),*) => {
        impl $v {
            #[inline]
            pub fn dot(self, b: $v) -> f32 {
                // Start from -0.0 so the fold is a nop on negative zero.
                $( self.$e * b.$e + )* (-0.0)
            }

            #[inline]
            pub fn norm_squared(self) -> f32 {
                $v::dot(self, self)
            }

            #[inline]
            pub fn norm(self) -> f32 {
                $v::norm_squared(self).sqrt()
            }

            #[inline]
            pub fn max_abs(self) -> f32 {
                0.0f32 $( .max(self.$e.abs()) )*
            }

            /// Scales the vector by the reciprocal of its norm.
            ///
            /// The vector is first divided by its largest absolute component so
            /// the squared norm cannot overflow or underflow. Fails with
            /// [`MathError::DegenerateVector`] for the zero vector and for
            /// non-finite components.
            #[inline]
            pub fn normalize(self) -> Result<$v> {
                let m = $v::max_abs(self);
                if m == 0.0 || !m.is_finite() {
                    let norm = $v::norm(self);
                    log::debug!("refusing to normalize {} with norm {}", stringify!($v), norm);
                    return Err(MathError::DegenerateVector { norm });
                }
                let unit = self / m;
                Ok(unit * (1.0 / $v::norm(unit)))
            }

            /// Writes the normalized vector to `out`. `out` is left untouched
            /// on failure.
            #[inline]
            pub fn normalize_into(v: $v, out: &mut $v) -> Result<&mut $v> {
                *out = v.normalize()?;
                Ok(out)
            }

            #[inline]
            pub fn normalize_in_place(&mut self) -> Result<&mut $v> {
                *self = self.normalize()?;
                Ok(self)
            }

            #[inline]
            pub fn lerp(self, b: $v, t: f32) -> $v {
                $v { $( $e: self.$e * (1.0 - t) + b.$e * t, )* }
            }
        }

        impl ops::Neg for $v {
            type Output = $v;

            #[inline]
            fn neg(self) -> $v {
                $v { $( $e: -self.$e, )* }
            }
        }
    }
}

macro_rules! vec_impl {
    ($v: ident, $n: expr, $($e: ident),*) => {

        #[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[repr(C)]
        pub struct $v {
            $( pub $e : f32, )*
        }

        impl $v {
            pub const DIM: usize = $n;

            pub const ZERO: $v = $v { $( $e: 0.0, )* };

            #[inline]
            pub fn new($( $e: f32, )*) -> $v {
                $v { $( $e, )* }
            }

            /// Overwrites every component of `out`.
            #[inline]
            pub fn from_values_into($( $e: f32, )* out: &mut $v) -> &mut $v {
                $( out.$e = $e; )*
                out
            }

            #[inline]
            pub fn from_scalar(a: f32) -> $v {
                $v { $( $e : a, )* }
            }

            #[inline]
            pub fn from_array(a: [f32; $n]) -> $v {
                bytemuck::cast(a)
            }

            /// Copies the first components of `data`, ignoring any excess.
            #[inline]
            pub fn from_slice(data: &[f32]) -> Result<$v> {
                check_len(data, $n)?;
                let mut v = $v::ZERO;
                v.as_array_mut().copy_from_slice(&data[..$n]);
                Ok(v)
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                bytemuck::cast(self)
            }

            /// Indexed view over the same storage as the named components.
            #[inline]
            pub fn as_array(&self) -> &[f32; $n] {
                bytemuck::cast_ref(self)
            }

            #[inline]
            pub fn as_array_mut(&mut self) -> &mut [f32; $n] {
                bytemuck::cast_mut(self)
            }

            #[inline]
            pub fn clamp(a: $v, min: $v, max: $v) -> $v {
                $v { $( $e: a.$e.clamp(min.$e, max.$e),)* }
            }

            #[inline]
            pub fn min(a: $v, b: $v) -> $v {
                $v { $( $e: a.$e.min(b.$e),)* }
            }

            #[inline]
            pub fn max(a: $v, b: $v) -> $v {
                $v { $( $e: a.$e.max(b.$e),)* }
            }
        }

        impl ops::Index<usize> for $v {
            type Output = f32;

            #[inline]
            fn index(&self, i: usize) -> &f32 {
                &self.as_array()[i]
            }
        }

        impl ops::IndexMut<usize> for $v {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut f32 {
                &mut self.as_array_mut()[i]
            }
        }

        impl From<[f32; $n]> for $v {
            #[inline]
            fn from(a: [f32; $n]) -> $v {
                $v::from_array(a)
            }
        }

        impl From<$v> for [f32; $n] {
            #[inline]
            fn from(v: $v) -> [f32; $n] {
                v.to_array()
            }
        }

        impl TryFrom<&[f32]> for $v {
            type Error = MathError;

            #[inline]
            fn try_from(data: &[f32]) -> Result<$v> {
                $v::from_slice(data)
            }
        }

        impl fmt::Display for $v {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($v),
                        [$(
                           format!("{:.prec$}", self.$e, prec = f.precision().unwrap_or(3)),
                        )*].join(", "))
            }
        }

        vec_op_impl!(Add, add, $v, $($e),*);
        vec_op_impl!(Sub, sub, $v, $($e),*);
        vec_op_impl!(Mul, mul, $v, $($e),*);
        vec_op_impl!(Div, div, $v, $($e),*);

        vec_assign_op_impl!(AddAssign, add_assign, $v, $($e),*);
        vec_assign_op_impl!(SubAssign, sub_assign, $v, $($e),*);
        vec_assign_op_impl!(MulAssign, mul_assign, $v, $($e),*);
        vec_assign_op_impl!(DivAssign, div_assign, $v, $($e),*);

        scalar_op_impl!(Add, add, $v, $($e),*);
        scalar_op_impl!(Sub, sub, $v, $($e),*);
        scalar_op_impl!(Mul, mul, $v, $($e),*);
        scalar_op_impl!(Div, div, $v, $($e),*);

        scalar_assign_op_impl!(AddAssign, add_assign, $v, $($e),*);
        scalar_assign_op_impl!(SubAssign, sub_assign, $v, $($e),*);
        scalar_assign_op_impl!(MulAssign, mul_assign, $v, $($e),*);
        scalar_assign_op_impl!(DivAssign, div_assign, $v, $($e),*);

        vec_arith_impl!($v, $($e),*);
        vec_float_utils_impl!($v, $($e),*);
    }
}

vec_impl!(Vec2, 2, x, y);
vec_impl!(Vec3, 3, x, y, z);
vec_impl!(Vec4, 4, x, y, z, w);

impl Vec3 {
    /// Right-handed cross product.
    #[inline]
    pub fn cross(self, b: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * b.z - self.z * b.y,
            y: self.z * b.x - self.x * b.z,
            z: self.x * b.y - self.y * b.x,
        }
    }

    #[inline]
    pub fn cross_into(a: Vec3, b: Vec3, out: &mut Vec3) -> &mut Vec3 {
        *out = a.cross(b);
        out
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

impl Vec4 {
    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}
