use super::error::{GError, GResult};

pub(crate) const MAX_DIM: usize = 2;

pub type Layout = [usize; MAX_DIM];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Axis::Row => 0,
            Axis::Col => 1,
        }
    }
}

#[inline(always)]
pub fn compute_stride_offset(n: usize, stride: usize) -> usize {
    n * stride
}

/// Geometry of a 2D strided view: logical shape plus the number of buffer
/// elements to skip per step along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dim {
    pub(crate) s: Layout,
    pub(crate) stride: Layout,
}

impl Dim {
    // [rows, cols] => strides [cols, 1]
    pub fn row_major(rows: usize, cols: usize) -> Dim {
        Dim {
            s: [rows, cols],
            stride: [cols, 1],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.s
    }

    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    pub fn dim2(&self) -> (usize, usize) {
        dims2(&self.s)
    }

    pub fn stride_2d(&self) -> (usize, usize) {
        dims2(&self.stride)
    }

    pub(crate) fn elem_count(&self) -> usize {
        self.s.iter().product()
    }

    pub fn transpose(&self) -> Dim {
        let mut s = self.s;
        let mut stride = self.stride;
        s.swap(0, 1);
        stride.swap(0, 1);
        Dim { s, stride }
    }

    /// Physical offset of `(i, j)` relative to the view start.
    #[inline]
    pub(crate) fn offset(&self, i: usize, j: usize) -> usize {
        compute_stride_offset(i, self.stride[0]) + compute_stride_offset(j, self.stride[1])
    }

    #[inline]
    pub(crate) fn check_index(&self, i: usize, j: usize, op: &'static str) -> GResult<usize> {
        let (rows, cols) = self.dim2();
        if i >= rows || j >= cols {
            return Err(GError::IndexOutOfBounds {
                index: vec![i, j],
                bounds: vec![rows, cols],
                op,
            });
        }
        Ok(self.offset(i, j))
    }

    /// Fixes `index` along `a` and returns `(start_offset, len, stride)` of
    /// the remaining axis.
    pub(crate) fn select_axis(&self, a: Axis, index: usize) -> GResult<(usize, usize, usize)> {
        let bound = self.s[a.index()];
        if index >= bound {
            return Err(GError::IndexOutOfBounds {
                index: vec![index],
                bounds: vec![bound],
                op: match a {
                    Axis::Row => "row",
                    Axis::Col => "col",
                },
            });
        }
        let other = 1 - a.index();
        Ok((
            compute_stride_offset(index, self.stride[a.index()]),
            self.s[other],
            self.stride[other],
        ))
    }

    //内存是否连续
    pub fn is_contiguous(&self) -> bool {
        let mut acc = 1;
        for (&stride, &dim) in self.stride.iter().zip(self.s.iter()).rev() {
            if dim > 1 && stride != acc {
                return false;
            }
            acc *= dim;
        }
        true
    }
}

#[inline]
pub fn dims2(s: &[usize]) -> (usize, usize) {
    assert!(s.len() >= 2);
    (s[0], s[1])
}
