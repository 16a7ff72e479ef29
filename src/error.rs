use thiserror::Error;

pub type GResult<T> = Result<T, GError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GError {
    #[error("index out of bounds: {op} index {index:?} not within {bounds:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        bounds: Vec<usize>,
        op: &'static str,
    },
    #[error("incompatible vector lengths: {left} vs {right}")]
    IncompatibleLengths { left: usize, right: usize },
    #[error("incompatible matrix shapes for {op}: {lhs:?} x {rhs:?}")]
    IncompatibleShapes {
        lhs: (usize, usize),
        rhs: (usize, usize),
        op: &'static str,
    },
    #[error("invalid dimensions: {rows} x {cols}")]
    InvalidDimensions { rows: isize, cols: isize },
    #[error("incorrect number of coefficients: expected {expected}, got {got}")]
    WrongCoefficientCount { expected: usize, got: usize },
    #[error("buffer is borrowed by a live slice or iterator, cannot {op}")]
    BufferBorrowed { op: &'static str },
}

impl From<GError> for String {
    fn from(e: GError) -> Self {
        format!("{}", e)
    }
}
