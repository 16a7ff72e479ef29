use crate::error::{GError, GResult};
use crate::{Matrix, TensorType};
use log::debug;

#[inline]
fn check_matmul(a: (usize, usize), b: (usize, usize), op: &'static str) -> GResult<()> {
    if a.1 != b.0 {
        return Err(GError::IncompatibleShapes {
            lhs: a,
            rhs: b,
            op,
        });
    }
    debug!("{} {}x{} * {}x{}", op, a.0, a.1, b.0, b.1);
    Ok(())
}

impl<A: TensorType> Matrix<A> {
    /// Naive triple loop over the strided buffers.
    ///
    /// `c[i, j]` accumulates `a[i, k] * b[k, j]` for `k` ascending, the same
    /// order `matmul_dot` uses, so both produce identical results.
    pub fn matmul(&self, b: &Matrix<A>) -> GResult<Matrix<A>> {
        let (n, m) = self.shape();
        let (o, p) = b.shape();
        check_matmul((n, m), (o, p), "matmul")?;
        let mut v = Vec::with_capacity(n * p);
        {
            let (ad, bd) = (self.dim(), b.dim());
            let a_data = self.data.borrow();
            let b_data = b.data.borrow();
            for i in 0..n {
                for j in 0..p {
                    let mut t = A::zero();
                    for k in 0..m {
                        t = t + a_data[ad.offset(i, k)] * b_data[bd.offset(k, j)];
                    }
                    v.push(t);
                }
            }
        }
        Matrix::from_vec(n, p, v)
    }

    /// Same product, each cell computed as `self.row(i) . b.col(j)`.
    pub fn matmul_dot(&self, b: &Matrix<A>) -> GResult<Matrix<A>> {
        let (n, m) = self.shape();
        let (o, p) = b.shape();
        check_matmul((n, m), (o, p), "matmul_dot")?;
        let c = Matrix::zeros(n, p);
        for i in 0..n {
            let row = self.row(i)?;
            for j in 0..p {
                c.set(i, j, row.dot(&b.col(j)?)?)?;
            }
        }
        Ok(c)
    }
}
