use itertools::Itertools;
use num_traits::{One, Zero};
use std::fmt;
use std::ops;
use thiserror::Error;

use crate::matrix::element::Element;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("matrix is {rows}x{cols}, expected square")]
    NotSquare { rows: usize, cols: usize },
    #[error("negative exponent {0}")]
    InvalidExponent(i64),
    #[error("matrix is singular")]
    Singular,
}

/// Dense row-major matrix over any `Element` type. Shape is fixed at
/// construction; every operation returns a freshly allocated result.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Element> Matrix<T> {
    pub fn empty() -> Matrix<T> {
        Matrix {
            rows: 0,
            cols: 0,
            cells: vec![],
        }
    }

    pub fn new(rows: usize, cols: usize) -> Matrix<T> {
        Matrix {
            rows,
            cols,
            cells: (0..(rows * cols)).map(|_| T::zero()).collect(),
        }
    }

    /// Build from nested rows. All rows must have the same length; a
    /// zero-row grid yields the empty matrix.
    pub fn from_rows(grid: Vec<Vec<T>>) -> Result<Matrix<T>, MatrixError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, |row| row.len());

        for row in &grid {
            if row.len() != cols {
                return Err(MatrixError::ShapeMismatch {
                    left: (rows, cols),
                    right: (rows, row.len()),
                });
            }
        }

        Ok(Matrix {
            rows,
            cols,
            cells: grid.into_iter().flatten().collect(),
        })
    }

    pub fn identity(n: usize) -> Matrix<T> {
        Matrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { T::one() } else { T::zero() }))
                .collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.cols == 0 {
            return (0..self.rows).map(|_| vec![]).collect();
        }
        self.cells
            .chunks(self.cols)
            .map(|line| line.into())
            .collect()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&T, MatrixError> {
        self.check_index(row, col)?;
        Ok(&self.cells[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        self.check_index(row, col)?;
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    /// Borrow a full row.
    pub fn row(&self, index: usize) -> Result<&[T], MatrixError> {
        if index >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                row: index,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(&self.cells[index * self.cols..(index + 1) * self.cols])
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    // In-bounds cloning accessor for the algorithms, after shape validation.
    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col].clone()
    }

    pub fn scale(&self, scalar: &T) -> Matrix<T> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.clone() * scalar.clone())
                .collect(),
        }
    }

    pub fn transpose(&self) -> Matrix<T> {
        Matrix {
            rows: self.cols,
            cols: self.rows,
            cells: (0..self.cols)
                .map(|c| (0..self.rows).map(move |r| self.at(r, c)))
                .flatten()
                .collect(),
        }
    }

    /// The minor grid: everything except the given row and column, relative
    /// order preserved.
    pub fn submatrix(&self, row: usize, col: usize) -> Result<Matrix<T>, MatrixError> {
        self.check_index(row, col)?;

        Ok(Matrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            cells: (0..self.rows)
                .filter(|&r| r != row)
                .flat_map(|r| {
                    (0..self.cols)
                        .filter(move |&c| c != col)
                        .map(move |c| self.at(r, c))
                })
                .collect(),
        })
    }

    /// Cofactor expansion along the first row. Exponential in the size, fine
    /// for the small matrices this crate targets.
    pub fn determinant(&self) -> Result<T, MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows == 1 {
            return Ok(self.at(0, 0));
        }
        if self.rows == 2 {
            return Ok(self.at(0, 0) * self.at(1, 1) - self.at(0, 1) * self.at(1, 0));
        }

        let mut det = T::zero();
        for i in 0..self.cols {
            let cofactor = self.at(0, i) * self.submatrix(0, i)?.determinant()?;
            // signs alternate +, -, +, ... along the first row
            det = if i % 2 == 0 {
                det + cofactor
            } else {
                det - cofactor
            };
        }
        Ok(det)
    }

    /// Non-negative integer power by repeated multiplication. Exponent 0
    /// gives the identity of the same size.
    pub fn pow(&self, exponent: i64) -> Result<Matrix<T>, MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if exponent < 0 {
            return Err(MatrixError::InvalidExponent(exponent));
        }
        if exponent == 0 {
            return Ok(Matrix::identity(self.rows));
        }

        let mut result = self.clone();
        for _ in 1..exponent {
            result = (&result * self)?;
        }
        Ok(result)
    }

    /// Gauss-Jordan elimination on the augmented grid `[A | I]`. Pivots are
    /// tested against exact zero, so this is only as good as the element
    /// type's arithmetic.
    pub fn inverse(&self) -> Result<Matrix<T>, MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let n = self.rows;
        let mut aug: Matrix<T> = Matrix::new(n, 2 * n);
        for r in 0..n {
            for c in 0..n {
                aug.cells[r * aug.cols + c] = self.at(r, c);
            }
            aug.cells[r * aug.cols + n + r] = T::one();
        }

        for col in 0..n {
            let pivot_row = (col..n)
                .find(|&r| aug.at(r, col) != T::zero())
                .ok_or(MatrixError::Singular)?;

            if pivot_row != col {
                for k in 0..aug.cols {
                    aug.cells.swap(col * aug.cols + k, pivot_row * aug.cols + k);
                }
            }

            let pivot = aug.at(col, col);
            for k in 0..aug.cols {
                let idx = col * aug.cols + k;
                aug.cells[idx] = aug.cells[idx].clone() / pivot.clone();
            }

            for r in 0..n {
                if r == col || aug.at(r, col) == T::zero() {
                    continue;
                }
                let factor = aug.at(r, col);
                for k in 0..aug.cols {
                    let value = aug.at(r, k) - aug.at(col, k) * factor.clone();
                    aug.cells[r * aug.cols + k] = value;
                }
            }
        }

        Ok(Matrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|r| (n..2 * n).map(|c| aug.at(r, c)).collect::<Vec<T>>())
                .collect(),
        })
    }
}

impl<T: Element> ops::Add<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>, MatrixError>;

    fn add(self, rhs: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        if self.cols != rhs.cols || self.rows != rhs.rows {
            return Err(MatrixError::ShapeMismatch {
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| a.to_owned() + b.to_owned())
                .collect(),
        })
    }
}

impl<T: Element> ops::Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>, MatrixError>;

    fn sub(self, rhs: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        if self.cols != rhs.cols || self.rows != rhs.rows {
            return Err(MatrixError::ShapeMismatch {
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| a.to_owned() - b.to_owned())
                .collect(),
        })
    }
}

impl<T: Element> ops::Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>, MatrixError>;

    fn mul(self, rhs: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        if self.cols != rhs.rows {
            return Err(MatrixError::ShapeMismatch {
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        Ok(Matrix {
            rows: self.rows,
            cols: rhs.cols,
            cells: (0..self.rows)
                .flat_map(|i| {
                    (0..rhs.cols)
                        .map(move |j| (0..self.cols).map(|k| self.at(i, k) * rhs.at(k, j)).sum())
                })
                .collect(),
        })
    }
}

impl<T: Element> ops::Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, scalar: T) -> Matrix<T> {
        self.scale(&scalar)
    }
}

// Coherence forbids `impl Mul<&Matrix<T>> for T` with a generic T, so the
// scalar-on-the-left form is provided per primitive numeric type.
macro_rules! impl_left_scalar {
    ($($t:ty),*) => {$(
        impl ops::Mul<&Matrix<$t>> for $t {
            type Output = Matrix<$t>;

            fn mul(self, matrix: &Matrix<$t>) -> Matrix<$t> {
                matrix.scale(&self)
            }
        }
    )*};
}

impl_left_scalar!(f32, f64, i32, i64, i128);

impl<T: Element> fmt::Display for Matrix<T> {
    /// Space-separated cells, one line per row. A requested precision is
    /// forwarded to every cell, so `{:.2}` renders two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision();
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(self.cols) {
            writeln!(
                f,
                "{}",
                row.iter().format_with(" ", |cell, g| match precision {
                    Some(p) => g(&format_args!("{:.*}", p, cell)),
                    None => g(cell),
                })
            )?;
        }
        Ok(())
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
