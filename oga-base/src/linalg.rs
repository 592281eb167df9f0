//! Closed-form determinant/adjoint for small matrices, plus a generic
//! dense matrix for the fallback cofactor expansion (spec §4.4). This is
//! the only inversion path used by the reference-coordinate solver: it
//! deliberately bypasses `cgmath`'s own `SquareMatrix::invert` so the
//! Jacobian inverse is available as `adj(J) / det(J)` pieces separately,
//! which the reference-coordinate solver needs for its clamp-and-stall
//! variant.
use crate::cgmath64::*;

/// Determinant of a 2x2 matrix, columns `m.x`, `m.y`.
pub fn det2(m: Matrix2) -> f64 { m.x.x * m.y.y - m.x.y * m.y.x }

/// Adjoint (here equal to the transpose-of-cofactor, which for 2x2 is the
/// classical swap-and-negate adjugate) of a 2x2 matrix.
pub fn adj2(m: Matrix2) -> Matrix2 {
    Matrix2::new(m.y.y, -m.x.y, -m.y.x, m.x.x)
}

/// Determinant of a 3x3 matrix via cofactor expansion along the first column.
pub fn det3(m: Matrix3) -> f64 {
    m.x.x * (m.y.y * m.z.z - m.y.z * m.z.y) - m.x.y * (m.y.x * m.z.z - m.y.z * m.z.x)
        + m.x.z * (m.y.x * m.z.y - m.y.y * m.z.x)
}

/// Adjugate of a 3x3 matrix: the transpose of the cofactor matrix.
/// Contract: `adj3(m) * m == det3(m) * Matrix3::identity()`.
pub fn adj3(m: Matrix3) -> Matrix3 {
    let cofactor = Matrix3::new(
        m.y.y * m.z.z - m.y.z * m.z.y,
        -(m.y.x * m.z.z - m.y.z * m.z.x),
        m.y.x * m.z.y - m.y.y * m.z.x,
        -(m.x.y * m.z.z - m.x.z * m.z.y),
        m.x.x * m.z.z - m.x.z * m.z.x,
        -(m.x.x * m.z.y - m.x.y * m.z.x),
        m.x.y * m.y.z - m.x.z * m.y.y,
        -(m.x.x * m.y.z - m.x.z * m.y.x),
        m.x.x * m.y.y - m.x.y * m.y.x,
    );
    cofactor.transpose()
}

/// Determinant of a 4x4 matrix via cofactor expansion along the first column.
pub fn det4(m: Matrix4) -> f64 {
    let minor = |skip_row: usize| -> f64 {
        let rows: [[f64; 4]; 4] = [
            [m.x.x, m.y.x, m.z.x, m.w.x],
            [m.x.y, m.y.y, m.z.y, m.w.y],
            [m.x.z, m.y.z, m.z.z, m.w.z],
            [m.x.w, m.y.w, m.z.w, m.w.w],
        ];
        let mut sub = [[0.0; 3]; 3];
        let mut r = 0;
        for i in 0..4 {
            if i == skip_row {
                continue;
            }
            sub[r] = [rows[i][1], rows[i][2], rows[i][3]];
            r += 1;
        }
        sub[0][0] * (sub[1][1] * sub[2][2] - sub[1][2] * sub[2][1])
            - sub[0][1] * (sub[1][0] * sub[2][2] - sub[1][2] * sub[2][0])
            + sub[0][2] * (sub[1][0] * sub[2][1] - sub[1][1] * sub[2][0])
    };
    let rows: [[f64; 4]; 4] = [
        [m.x.x, m.y.x, m.z.x, m.w.x],
        [m.x.y, m.y.y, m.z.y, m.w.y],
        [m.x.z, m.y.z, m.z.z, m.w.z],
        [m.x.w, m.y.w, m.z.w, m.w.w],
    ];
    (0..4).fold(0.0, |acc, i| {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        acc + sign * rows[i][0] * minor(i)
    })
}

/// A dense row-major matrix of arbitrary size, used only by the generic
/// fallback determinant/adjoint for sizes the closed forms don't cover.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Builds a matrix from `n` rows of `n` values each. Panics if any row
    /// has the wrong length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let n = rows.len();
        assert!(rows.iter().all(|r| r.len() == n), "DenseMatrix must be square");
        let mut data = Vec::with_capacity(n * n);
        rows.iter().for_each(|r| data.extend_from_slice(r));
        Self { n, data }
    }

    /// Side length.
    pub fn size(&self) -> usize { self.n }

    fn get(&self, i: usize, j: usize) -> f64 { self.data[i * self.n + j] }

    /// The `(n-1)x(n-1)` submatrix obtained by deleting `skip_row`/`skip_col`.
    pub fn minor(&self, skip_row: usize, skip_col: usize) -> DenseMatrix {
        let n = self.n;
        let mut rows = Vec::with_capacity(n - 1);
        for i in 0..n {
            if i == skip_row {
                continue;
            }
            let row: Vec<f64> = (0..n).filter(|&j| j != skip_col).map(|j| self.get(i, j)).collect();
            rows.push(row);
        }
        DenseMatrix::from_rows(&rows)
    }

    /// Determinant. Never call this on a `size() == 0` matrix (spec §4.4).
    /// Dispatches to the closed forms for `size() <= 4`, and to cofactor
    /// expansion along column 0 otherwise.
    pub fn det(&self) -> f64 {
        assert!(self.n > 0, "determinant undefined for a 0x0 matrix");
        match self.n {
            1 => self.data[0],
            2 => det2(Matrix2::new(self.get(0, 0), self.get(1, 0), self.get(0, 1), self.get(1, 1))),
            3 => det3(Matrix3::new(
                self.get(0, 0), self.get(1, 0), self.get(2, 0),
                self.get(0, 1), self.get(1, 1), self.get(2, 1),
                self.get(0, 2), self.get(1, 2), self.get(2, 2),
            )),
            4 => {
                let m = Matrix4::new(
                    self.get(0, 0), self.get(1, 0), self.get(2, 0), self.get(3, 0),
                    self.get(0, 1), self.get(1, 1), self.get(2, 1), self.get(3, 1),
                    self.get(0, 2), self.get(1, 2), self.get(2, 2), self.get(3, 2),
                    self.get(0, 3), self.get(1, 3), self.get(2, 3), self.get(3, 3),
                );
                det4(m)
            }
            _ => (0..self.n).fold(0.0, |acc, i| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                acc + sign * self.get(i, 0) * self.minor(i, 0).det()
            }),
        }
    }

    /// The adjugate: the transpose of the matrix of cofactors, with the
    /// contract `adj(M) * M == det(M) * I`. Dispatches to [`adj2`] for
    /// `size() == 2`, mirroring [`DenseMatrix::det`]'s closed-form dispatch.
    pub fn adjugate(&self) -> DenseMatrix {
        let n = self.n;
        if n == 2 {
            let a = adj2(Matrix2::new(self.get(0, 0), self.get(1, 0), self.get(0, 1), self.get(1, 1)));
            return DenseMatrix::from_rows(&[vec![a.x.x, a.y.x], vec![a.x.y, a.y.y]]);
        }
        let mut cofactor = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                cofactor[i][j] = sign * self.minor(i, j).det();
            }
        }
        // transpose while building
        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                rows[i][j] = cofactor[j][i];
            }
        }
        DenseMatrix::from_rows(&rows)
    }
}
