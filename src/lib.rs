//! Fixed-size f32 linear algebra for rendering: `Vec2`/`Vec3`/`Vec4`,
//! `Mat2` and `Mat4` with column-major storage, cofactor inversion and
//! affine transform composition.

mod error;
pub mod vec;
pub mod mat;
mod transform;

pub use error::{MathError, Result, SINGULAR_EPSILON};
pub use mat::{Mat2, Mat4};
pub use vec::{Vec2, Vec3, Vec4};
