//! Dense LU decomposition with partial pivoting.

use ndarray::{Array1, Array2};

/// LU decomposition of a square matrix.
///
/// Decomposes once, then answers singularity queries and solves `A x = b`
/// for arbitrary right-hand sides. A singular matrix is a normal outcome
/// here, not an error: the trainer responds to it by escalating damping.
pub struct LuDecomposition {
    lu: Array2<f64>,
    pivot: Vec<usize>,
}

impl LuDecomposition {
    /// Decompose `matrix` with partial pivoting.
    ///
    /// # Panics
    ///
    /// Panics if `matrix` is not square.
    pub fn new(matrix: &Array2<f64>) -> Self {
        assert_eq!(
            matrix.nrows(),
            matrix.ncols(),
            "LU decomposition needs a square matrix"
        );
        let n = matrix.nrows();
        let mut lu = matrix.clone();
        let mut pivot: Vec<usize> = (0..n).collect();

        for col in 0..n {
            // Move the largest remaining entry of this column onto the diagonal.
            let mut max_row = col;
            for row in (col + 1)..n {
                if lu[[row, col]].abs() > lu[[max_row, col]].abs() {
                    max_row = row;
                }
            }
            if max_row != col {
                for k in 0..n {
                    lu.swap([col, k], [max_row, k]);
                }
                pivot.swap(col, max_row);
            }

            let pivot_value = lu[[col, col]];
            if pivot_value == 0.0 || !pivot_value.is_finite() {
                continue;
            }
            for row in (col + 1)..n {
                let factor = lu[[row, col]] / pivot_value;
                lu[[row, col]] = factor;
                for k in (col + 1)..n {
                    let update = factor * lu[[col, k]];
                    lu[[row, k]] -= update;
                }
            }
        }

        Self { lu, pivot }
    }

    /// Whether every pivot is finite and nonzero.
    pub fn is_nonsingular(&self) -> bool {
        (0..self.lu.nrows()).all(|i| {
            let diagonal = self.lu[[i, i]];
            diagonal != 0.0 && diagonal.is_finite()
        })
    }

    /// Solve `A x = b`, or `None` when the matrix is singular.
    ///
    /// # Panics
    ///
    /// Panics if `b` does not match the matrix dimension.
    pub fn solve(&self, b: &Array1<f64>) -> Option<Array1<f64>> {
        let n = self.lu.nrows();
        assert_eq!(
            b.len(),
            n,
            "right-hand side length must match the matrix"
        );
        if !self.is_nonsingular() {
            return None;
        }

        // Permuted right-hand side.
        let mut x = Array1::zeros(n);
        for i in 0..n {
            x[i] = b[self.pivot[i]];
        }

        // Forward substitution against the unit lower triangle.
        for i in 1..n {
            let mut sum = x[i];
            for j in 0..i {
                sum -= self.lu[[i, j]] * x[j];
            }
            x[i] = sum;
        }

        // Back substitution against the upper triangle.
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum -= self.lu[[i, j]] * x[j];
            }
            x[i] = sum / self.lu[[i, i]];
        }

        Some(x)
    }
}
