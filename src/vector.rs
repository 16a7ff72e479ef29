use crate::error::{GError, GResult};
use crate::matrix::borrow_buffer_mut;
use crate::shape::compute_stride_offset;
use crate::{SharedData, TensorType};
use log::trace;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// A strided, bounds-checked 1D view over a shared buffer.
///
/// Logical index `i` lives at `offset + i * stride` in the buffer. Writes are
/// visible through every other view of the same buffer.
#[derive(Clone)]
pub struct Vector<A> {
    data: SharedData<A>,
    offset: usize,
    len: usize,
    stride: usize,
}

impl<A: TensorType> Vector<A> {
    pub(crate) fn view(data: SharedData<A>, offset: usize, len: usize, stride: usize) -> Self {
        trace!(
            "vector view offset={} len={} stride={} over buffer of {}",
            offset,
            len,
            stride,
            data.borrow().len()
        );
        Self {
            data,
            offset,
            len,
            stride,
        }
    }

    pub fn from_vec(v: Vec<A>) -> Self {
        let len = v.len();
        Self::view(Rc::new(RefCell::new(v)), 0, len, 1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn addr(&self, i: usize) -> usize {
        self.offset + compute_stride_offset(i, self.stride)
    }

    #[inline]
    fn check_index(&self, i: usize, op: &'static str) -> GResult<usize> {
        if i >= self.len {
            return Err(GError::IndexOutOfBounds {
                index: vec![i],
                bounds: vec![self.len],
                op,
            });
        }
        Ok(self.addr(i))
    }

    pub fn get(&self, i: usize) -> GResult<A> {
        let p = self.check_index(i, "get")?;
        Ok(self.data.borrow()[p])
    }

    /// # Safety
    ///
    /// `i` must be less than `self.len()`.
    pub unsafe fn get_unchecked(&self, i: usize) -> A {
        *self.data.borrow().get_unchecked(self.addr(i))
    }

    /// Fails with `BufferBorrowed` while a `Contiguous` slice or a
    /// `VectorIter` over the same buffer is alive.
    pub fn set(&self, i: usize, v: A) -> GResult<()> {
        let p = self.check_index(i, "set")?;
        borrow_buffer_mut(&self.data, "set")?[p] = v;
        Ok(())
    }

    pub fn iter(&self) -> VectorIter<'_, A> {
        VectorIter {
            data: self.data.borrow(),
            next: self.offset,
            remaining: self.len,
            stride: self.stride,
        }
    }

    pub fn dot(&self, other: &Vector<A>) -> GResult<A> {
        if self.len != other.len {
            return Err(GError::IncompatibleLengths {
                left: self.len,
                right: other.len,
            });
        }
        Ok(self
            .iter()
            .zip(other.iter())
            .fold(A::zero(), |t, (x, y)| t + x * y))
    }

    /// Contiguous elements of the view. Borrows the buffer directly when the
    /// stride is 1 and gathers into a new `Vec` otherwise. Writes to the
    /// buffer fail while a borrowed result is alive.
    pub fn as_contiguous(&self) -> Contiguous<'_, A> {
        if self.len == 0 {
            return Contiguous::Owned(Vec::new());
        }
        if self.stride == 1 {
            let (start, end) = (self.offset, self.offset + self.len);
            Contiguous::Borrowed(Ref::map(self.data.borrow(), |v| &v[start..end]))
        } else {
            Contiguous::Owned(self.iter().collect())
        }
    }

    pub fn to_vec(&self) -> Vec<A> {
        self.iter().collect()
    }

    pub fn same_buffer(&self, other: &Vector<A>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

pub enum Contiguous<'a, A> {
    Borrowed(Ref<'a, [A]>),
    Owned(Vec<A>),
}

impl<'a, A> Contiguous<'a, A> {
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Contiguous::Borrowed(_))
    }
}

impl<'a, A> Deref for Contiguous<'a, A> {
    type Target = [A];

    fn deref(&self) -> &[A] {
        match self {
            Contiguous::Borrowed(r) => &**r,
            Contiguous::Owned(v) => v.as_slice(),
        }
    }
}

pub struct VectorIter<'a, A> {
    data: Ref<'a, Vec<A>>,
    next: usize,
    remaining: usize,
    stride: usize,
}

impl<'a, A: Copy> Iterator for VectorIter<'a, A> {
    type Item = A;

    #[inline]
    fn next(&mut self) -> Option<A> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.data[self.next];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next += self.stride;
        }
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, A: Copy> ExactSizeIterator for VectorIter<'a, A> {}

impl<A: TensorType> PartialEq for Vector<A> {
    fn eq(&self, other: &Vector<A>) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(x, y)| x == y)
    }
}

impl<A: TensorType> fmt::Display for Vector<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", x)?;
        }
        f.write_str("]")
    }
}

impl<A: TensorType> fmt::Debug for Vector<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("len", &self.len)
            .field("stride", &self.stride)
            .field("data", &self.to_vec())
            .finish()
    }
}
