//! Dense, fixed-size matrices.
//!
//! Dimensions are const generics, so a product with mismatched inner
//! dimensions does not type-check. Every operation returns a fresh value and
//! leaves NaN/Inf to propagate through plain float arithmetic.

use core::ops::{Index, Mul};

/// A row-major `R × C` matrix of `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    data: [[f64; C]; R],
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    /// Construct a matrix from its rows.
    pub const fn new(data: [[f64; C]; R]) -> Self {
        Matrix { data }
    }

    /// A matrix filled with zeros.
    pub const fn zeros() -> Self {
        Matrix {
            data: [[0.0; C]; R],
        }
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        R
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        C
    }

    /// Returns row `i` by value.
    ///
    /// # Panics
    ///
    /// Panics if `i >= R`.
    pub fn row(&self, i: usize) -> [f64; C] {
        self.data[i]
    }

    /// Borrow the underlying rows.
    pub fn as_rows(&self) -> &[[f64; C]; R] {
        &self.data
    }

    /// Standard matrix product `self · rhs`.
    ///
    /// # Arguments
    ///
    /// * `rhs`: A `C × P` matrix. Its row count must equal this matrix's column
    ///   count, which the type parameters enforce.
    ///
    /// # Returns
    ///
    /// A new `R × P` matrix.
    pub fn multiply<const P: usize>(&self, rhs: &Matrix<C, P>) -> Matrix<R, P> {
        let mut out = Matrix::<R, P>::zeros();
        for i in 0..R {
            for j in 0..P {
                for k in 0..C {
                    out.data[i][j] += self.data[i][k] * rhs.data[k][j];
                }
            }
        }
        out
    }

    /// Returns the `C × R` transpose.
    pub fn transpose(&self) -> Matrix<C, R> {
        let mut out = Matrix::<C, R>::zeros();
        for i in 0..R {
            for j in 0..C {
                out.data[j][i] = self.data[i][j];
            }
        }
        out
    }
}

impl<const N: usize> Matrix<1, N> {
    /// A single-row matrix holding `values`.
    pub const fn row_vector(values: [f64; N]) -> Self {
        Matrix { data: [values] }
    }
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const R: usize, const C: usize> From<[[f64; C]; R]> for Matrix<R, C> {
    fn from(data: [[f64; C]; R]) -> Self {
        Matrix { data }
    }
}

impl<const R: usize, const C: usize> Index<(usize, usize)> for Matrix<R, C> {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i][j]
    }
}

impl<const R: usize, const C: usize, const P: usize> Mul<&Matrix<C, P>> for &Matrix<R, C> {
    type Output = Matrix<R, P>;

    fn mul(self, rhs: &Matrix<C, P>) -> Matrix<R, P> {
        self.multiply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_known_values() {
        let a = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let b = Matrix::new([[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]);
        let c = a.multiply(&b);
        assert_eq!(c, Matrix::new([[58.0, 64.0], [139.0, 154.0]]));
        assert_eq!(&a * &b, c);
    }

    #[test]
    fn test_multiply_by_identity() {
        let a = Matrix::new([[1.5, -2.0], [0.25, 4.0]]);
        let identity = Matrix::new([[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(a.multiply(&identity), a);
        assert_eq!(identity.multiply(&a), a);
    }

    #[test]
    fn test_transpose() {
        let a = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t, Matrix::new([[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]));
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_row_vector_as_column() {
        let v = Matrix::row_vector([1.0, 2.0, 3.0, 4.0]).transpose();
        assert_eq!(v.rows(), 4);
        assert_eq!(v[(2, 0)], 3.0);
    }

    #[test]
    fn test_nan_propagates() {
        let a = Matrix::new([[f64::NAN, 1.0]]);
        let b = Matrix::new([[1.0], [1.0]]);
        assert!(a.multiply(&b)[(0, 0)].is_nan());
    }
}
