use crate::error::{GError, GResult};
use crate::shape::{Axis, Dim};
use crate::vector::Vector;
use crate::{SharedData, TensorType};
use log::{debug, trace};
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::mem::size_of;
use std::rc::Rc;

/// A 2D strided view over a shared element buffer.
///
/// `transpose`, `row` and `col` never copy: they hand out new headers over
/// the same buffer, so a write through any of them is observed by all.
#[derive(Clone)]
pub struct Matrix<A> {
    pub(crate) data: SharedData<A>,
    pub(crate) dim: Dim,
}

impl<A: TensorType> Matrix<A> {
    /// Checked constructor. Negative dimensions, or a size that does not fit
    /// in memory, are rejected.
    pub fn new(rows: isize, cols: isize) -> GResult<Self> {
        if rows < 0 || cols < 0 {
            return Err(GError::InvalidDimensions { rows, cols });
        }
        let (r, c) = (rows as usize, cols as usize);
        let fits = r
            .checked_mul(c)
            .and_then(|n| n.checked_mul(size_of::<A>()))
            .filter(|&b| b <= isize::MAX as usize);
        if fits.is_none() {
            return Err(GError::InvalidDimensions { rows, cols });
        }
        Ok(Self::zeros(r, c))
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_elem(A::zero(), rows, cols)
    }

    pub fn from_elem(s: A, rows: usize, cols: usize) -> Self {
        //申请内存
        let v = vec![s; rows * cols];
        debug!("allocate {}x{} matrix ({:?})", rows, cols, A::DTYPE);
        Self {
            data: Rc::new(RefCell::new(v)),
            dim: Dim::row_major(rows, cols),
        }
    }

    pub fn from_vec(rows: usize, cols: usize, v: Vec<A>) -> GResult<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or(GError::InvalidDimensions {
                rows: rows as isize,
                cols: cols as isize,
            })?;
        if v.len() != expected {
            return Err(GError::WrongCoefficientCount {
                expected,
                got: v.len(),
            });
        }
        debug!("wrap {}x{} matrix ({:?})", rows, cols, A::DTYPE);
        Ok(Self {
            data: Rc::new(RefCell::new(v)),
            dim: Dim::row_major(rows, cols),
        })
    }

    pub fn from_rows(xs: Vec<Vec<A>>) -> GResult<Self> {
        let rows = xs.len();
        let cols = xs.first().map_or(0, |r| r.len());
        let mut v = Vec::with_capacity(rows * cols);
        for r in xs {
            if r.len() != cols {
                return Err(GError::WrongCoefficientCount {
                    expected: cols,
                    got: r.len(),
                });
            }
            v.extend(r);
        }
        Self::from_vec(rows, cols, v)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.dim.dim2()
    }

    pub fn strides(&self) -> (usize, usize) {
        self.dim.stride_2d()
    }

    pub fn dim(&self) -> &Dim {
        &self.dim
    }

    pub fn size(&self) -> usize {
        self.dim.elem_count()
    }

    pub fn is_contiguous(&self) -> bool {
        self.dim.is_contiguous()
    }

    pub fn same_buffer(&self, other: &Matrix<A>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn get(&self, i: usize, j: usize) -> GResult<A> {
        let p = self.dim.check_index(i, j, "get")?;
        Ok(self.data.borrow()[p])
    }

    /// # Safety
    ///
    /// `i` and `j` must be within `self.shape()`.
    pub unsafe fn get_unchecked(&self, i: usize, j: usize) -> A {
        *self.data.borrow().get_unchecked(self.dim.offset(i, j))
    }

    /// Fails with `BufferBorrowed` while a `Contiguous` slice or a
    /// `VectorIter` over the same buffer is alive.
    pub fn set(&self, i: usize, j: usize, v: A) -> GResult<()> {
        let p = self.dim.check_index(i, j, "set")?;
        borrow_buffer_mut(&self.data, "set")?[p] = v;
        Ok(())
    }

    fn axis_index(&self, a: Axis, index: usize) -> GResult<Vector<A>> {
        let (offset, len, stride) = self.dim.select_axis(a, index)?;
        trace!("{:?} {} of {:?}", a, index, self.shape());
        Ok(Vector::view(self.data.clone(), offset, len, stride))
    }

    /// Row `i` as a view of length `cols` stepping by the column stride.
    pub fn row(&self, i: usize) -> GResult<Vector<A>> {
        self.axis_index(Axis::Row, i)
    }

    /// Column `j` as a view of length `rows` stepping by the row stride.
    pub fn col(&self, j: usize) -> GResult<Vector<A>> {
        self.axis_index(Axis::Col, j)
    }

    pub fn transpose(&self) -> Matrix<A> {
        trace!("transpose {:?}", self.shape());
        Self {
            data: self.data.clone(),
            dim: self.dim.transpose(),
        }
    }

    /// Overwrites every element, in row-major logical order.
    pub fn fill(&self, coeff: &[A]) -> GResult<()> {
        let (n, m) = self.shape();
        if coeff.len() != n * m {
            return Err(GError::WrongCoefficientCount {
                expected: n * m,
                got: coeff.len(),
            });
        }
        let mut data = borrow_buffer_mut(&self.data, "fill")?;
        let mut k = 0;
        for i in 0..n {
            for j in 0..m {
                data[self.dim.offset(i, j)] = coeff[k];
                k += 1;
            }
        }
        Ok(())
    }

    /// Logical elements gathered in row-major order.
    pub fn to_vec(&self) -> Vec<A> {
        let (n, m) = self.shape();
        let data = self.data.borrow();
        let mut v = Vec::with_capacity(n * m);
        for i in 0..n {
            for j in 0..m {
                v.push(data[self.dim.offset(i, j)]);
            }
        }
        v
    }

    /// Copies into a fresh row-major buffer that aliases nothing.
    pub fn to_contiguous(&self) -> Matrix<A> {
        let (n, m) = self.shape();
        debug!("copy {}x{} view into contiguous buffer", n, m);
        Self {
            data: Rc::new(RefCell::new(self.to_vec())),
            dim: Dim::row_major(n, m),
        }
    }

    pub fn print(&self) {
        println!("{}", self);
    }
}

pub(crate) fn borrow_buffer_mut<'a, A>(
    data: &'a SharedData<A>,
    op: &'static str,
) -> GResult<RefMut<'a, Vec<A>>> {
    data.try_borrow_mut()
        .map_err(|_| GError::BufferBorrowed { op })
}

impl<A: TensorType> PartialEq for Matrix<A> {
    fn eq(&self, other: &Matrix<A>) -> bool {
        self.shape() == other.shape() && self.to_vec() == other.to_vec()
    }
}

impl<A: TensorType> fmt::Display for Matrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, m) = self.shape();
        let data = self.data.borrow();
        for i in 0..n {
            for j in 0..m {
                write!(f, " {:>5}", data[self.dim.offset(i, j)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<A: TensorType> fmt::Debug for Matrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("data", &self.to_vec())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat;

    fn fixture_a() -> Matrix<f64> {
        let a = Matrix::new(4, 5).unwrap();
        a.fill(&[
            4.0, 2.0, 7.0, 9.0, 1.0, //
            5.0, 0.0, 1.0, 8.0, 3.0, //
            5.0, 6.0, 3.0, 2.0, 1.0, //
            7.0, 9.0, 0.0, 1.0, 2.0,
        ])
        .unwrap();
        a
    }

    #[test]
    fn test_new() {
        let m = Matrix::<f64>::new(2, 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.strides(), (3, 1));
        assert_eq!(m.to_vec(), vec![0.0; 6]);

        let empty = Matrix::<f64>::new(0, 3).unwrap();
        assert_eq!(empty.size(), 0);
    }

    #[test]
    fn test_new_invalid_dimensions() {
        assert_eq!(
            Matrix::<f64>::new(-1, 3),
            Err(GError::InvalidDimensions { rows: -1, cols: 3 })
        );
        assert!(Matrix::<f64>::new(2, -5).is_err());
        assert!(Matrix::<f64>::new(isize::MAX, isize::MAX).is_err());
        // element count fits in usize, byte count does not
        assert_eq!(
            Matrix::<f64>::new(1 << 31, 1 << 31),
            Err(GError::InvalidDimensions {
                rows: 1 << 31,
                cols: 1 << 31
            })
        );
        assert!(Matrix::<f64>::new(1 << 30, 1 << 30).is_err());
    }

    #[test]
    fn test_set_while_slice_borrowed() {
        let m = fixture_a();
        let row0 = m.row(0).unwrap();
        let c = row0.as_contiguous();
        assert!(c.is_borrowed());
        assert_eq!(m.set(1, 1, 5.0), Err(GError::BufferBorrowed { op: "set" }));
        assert_eq!(
            m.transpose().fill(&[0.0; 20]),
            Err(GError::BufferBorrowed { op: "fill" })
        );
        // reads still go through
        assert_eq!(m.get(1, 1), Ok(0.0));
        assert_eq!(&c[..2], &[4.0, 2.0]);
        drop(c);

        let col = m.col(1).unwrap();
        let mut it = col.iter();
        assert_eq!(it.next(), Some(2.0));
        assert!(m.row(1).unwrap().set(1, 5.0).is_err());
        drop(it);

        m.set(1, 1, 5.0).unwrap();
        assert_eq!(m.get(1, 1), Ok(5.0));
    }

    #[test]
    fn test_get_unchecked() {
        let a = fixture_a();
        let t = a.transpose();
        unsafe {
            assert_eq!(a.get_unchecked(2, 3), 2.0);
            assert_eq!(t.get_unchecked(3, 2), 2.0);
        }
    }

    #[test]
    fn test_fill_wrong_count() {
        let m = Matrix::<f64>::zeros(2, 2);
        assert_eq!(
            m.fill(&[1.0, 2.0, 3.0]),
            Err(GError::WrongCoefficientCount {
                expected: 4,
                got: 3
            })
        );
        assert_eq!(m.to_vec(), vec![0.0; 4]);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let m = mat![[1.0, 2.0], [3.0, 4.0]].unwrap();
        assert!(matches!(
            m.get(2, 0),
            Err(GError::IndexOutOfBounds { op: "get", .. })
        ));
        assert!(matches!(
            m.get(0, 2),
            Err(GError::IndexOutOfBounds { op: "get", .. })
        ));
        assert!(m.set(0, 2, 1.0).is_err());
        assert!(m.row(2).is_err());
        assert!(m.col(2).is_err());
    }

    #[test]
    fn test_row_col_views() {
        let a = fixture_a();
        let (n, m) = a.shape();
        for i in 0..n {
            let r = a.row(i).unwrap();
            assert_eq!(r.len(), m);
            for j in 0..m {
                assert_eq!(r.get(j), a.get(i, j));
            }
        }
        for j in 0..m {
            let c = a.col(j).unwrap();
            assert_eq!(c.len(), n);
            assert_eq!(c.stride(), 5);
            for i in 0..n {
                assert_eq!(c.get(i), a.get(i, j));
            }
        }
        assert_eq!(a.row(1).unwrap().to_vec(), vec![5.0, 0.0, 1.0, 8.0, 3.0]);
        assert_eq!(a.col(3).unwrap().to_vec(), vec![9.0, 8.0, 2.0, 1.0]);
        assert!(a.row(3).unwrap().as_contiguous().is_borrowed());
    }

    #[test]
    fn test_transpose() {
        let a = fixture_a();
        let t = a.transpose();
        assert_eq!(t.shape(), (5, 4));
        assert_eq!(t.strides(), (1, 5));
        assert!(!t.is_contiguous());
        assert!(t.same_buffer(&a));
        for i in 0..4 {
            for j in 0..5 {
                assert_eq!(t.get(j, i), a.get(i, j));
            }
        }
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_transpose_aliasing() {
        let a = fixture_a();
        let t = a.transpose();
        t.set(4, 2, 42.0).unwrap();
        assert_eq!(a.get(2, 4), Ok(42.0));
        a.set(0, 1, -1.0).unwrap();
        assert_eq!(t.get(1, 0), Ok(-1.0));
    }

    #[test]
    fn test_view_aliasing() {
        let a = fixture_a();
        let t = a.transpose();
        t.row(3).unwrap().set(0, 100.0).unwrap();
        assert_eq!(a.get(0, 3), Ok(100.0));
        a.col(0).unwrap().set(2, 200.0).unwrap();
        assert_eq!(t.get(0, 2), Ok(200.0));
        // rows of the transpose are strided, columns are contiguous
        assert_eq!(t.row(0).unwrap().stride(), 5);
        assert_eq!(t.col(0).unwrap().stride(), 1);
        assert_eq!(t.col(1).unwrap().to_vec(), a.row(1).unwrap().to_vec());
    }

    #[test]
    fn test_view_outlives_matrix() {
        let r = {
            let a = fixture_a();
            a.row(2).unwrap()
        };
        assert_eq!(r.to_vec(), vec![5.0, 6.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_fill_through_transpose() {
        let m = Matrix::<f64>::zeros(2, 3);
        let t = m.transpose();
        t.fill(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.to_vec(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_to_contiguous() {
        let a = fixture_a();
        let t = a.transpose().to_contiguous();
        assert!(t.is_contiguous());
        assert!(!t.same_buffer(&a));
        assert_eq!(t, a.transpose());
        t.set(0, 0, 0.0).unwrap();
        assert_eq!(a.get(0, 0), Ok(4.0));
    }

    #[test]
    fn test_display() {
        let m = mat![[107.0, 61.0], [88.0, 5.5]].unwrap();
        assert_eq!(format!("{}", m), "   107    61\n    88   5.5\n");
    }
}
