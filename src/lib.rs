mod error;
mod matrix;
mod op;
mod shape;
mod vector;

pub use crate::error::{GError, GResult};
pub use crate::matrix::Matrix;
pub use crate::shape::{Axis, Dim};
pub use crate::vector::{Contiguous, Vector, VectorIter};
pub use half::f16;

use num_traits::Float;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Element buffer shared by a matrix and every row, column and transpose
/// derived from it.
pub(crate) type SharedData<A> = Rc<RefCell<Vec<A>>>;

#[macro_export]
macro_rules! mat {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::Matrix::from_rows(vec![$(vec![$($x,)*],)*])
    }};
}

#[macro_export]
macro_rules! arr {
    ($($x:expr),* $(,)*) => {{
        $crate::Vector::from_vec(vec![$($x,)*])
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    F16,
    F32,
    F64,
}

pub trait TensorType: Float + fmt::Debug + fmt::Display + 'static {
    const DTYPE: DType;
}

impl TensorType for f16 {
    const DTYPE: DType = DType::F16;
}

impl TensorType for f32 {
    const DTYPE: DType = DType::F32;
}

impl TensorType for f64 {
    const DTYPE: DType = DType::F64;
}
