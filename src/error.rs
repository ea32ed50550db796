/// Determinants of magnitude below this, taken after a matrix is scaled so
/// its largest entry is 1, are treated as zero.
pub const SINGULAR_EPSILON: f32 = f32::MIN_POSITIVE;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// `det` is the determinant after the matrix was divided by its
    /// largest absolute entry.
    #[error("Matrix is not invertible (determinant {det})")]
    SingularMatrix { det: f32 },

    #[error("Result is not representable as a finite f32")]
    Overflow,

    #[error("Cannot normalize a vector of norm {norm}")]
    DegenerateVector { norm: f32 },

    #[error("Expected at least {expected} elements, got {actual}")]
    InsufficientInput { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, MathError>;

#[inline]
pub(crate) fn check_len(data: &[f32], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(MathError::InsufficientInput {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
