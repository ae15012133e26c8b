use ndarray::Array2;

use crate::{LogGrid, Result, TableError};

/// Inverse-CDF table of an emitted quantum, stored as fractions of the
/// parent quantum parameter.
///
/// Rows follow the parent χ axis, columns a uniform grid of the cumulative
/// variate `u ∈ [0, 1]`. Each row must be non-decreasing with entries in
/// `(0, 1]`, so the sampled child value can never exceed its parent.
#[derive(Debug, Clone)]
pub(crate) struct FractionCdf {
    table: Array2<f64>,
    inv_u_step: f64,
}

impl FractionCdf {
    pub(crate) fn new(grid: &LogGrid, table: Array2<f64>) -> Result<Self> {
        let (rows, cols) = table.dim();
        if rows != grid.len() {
            return Err(TableError::ShapeMismatch {
                expected: grid.len(),
                found: rows,
            });
        }
        if cols < 2 {
            return Err(TableError::ShapeMismatch {
                expected: 2,
                found: cols,
            });
        }
        for (r, row) in table.rows().into_iter().enumerate() {
            let valid = row.iter().all(|&x| x > 0.0 && x <= 1.0)
                && row.iter().zip(row.iter().skip(1)).all(|(a, b)| a <= b);
            if !valid {
                return Err(TableError::InvalidCdfRow { row: r });
            }
        }
        Ok(Self {
            inv_u_step: (cols - 1) as f64,
            table,
        })
    }

    /// Bilinear inverse-transform lookup: the emitted fraction for a parent
    /// at grid position `(row, row_frac)` and uniform variate `u ∈ (0, 1)`.
    ///
    /// Monotone non-decreasing in `u` for a fixed parent, since each row is
    /// and the row blend does not depend on `u`.
    #[inline]
    pub(crate) fn sample(&self, row: usize, row_frac: f64, u: f64) -> f64 {
        let cols = self.table.ncols();
        let t = u.clamp(0.0, 1.0) * self.inv_u_step;
        let j = (t as usize).min(cols - 2);
        let u_frac = t - j as f64;

        let lo = self.table[[row, j]] + u_frac * (self.table[[row, j + 1]] - self.table[[row, j]]);
        let hi = self.table[[row + 1, j]]
            + u_frac * (self.table[[row + 1, j + 1]] - self.table[[row + 1, j]]);
        lo + row_frac * (hi - lo)
    }

    pub(crate) fn table(&self) -> &Array2<f64> {
        &self.table
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    fn grid() -> LogGrid {
        LogGrid::new(1e-2, 1e2, 3).unwrap()
    }

    #[test]
    fn test_cdf_validation() {
        // Shape mismatch: 2 rows for a 3-node axis.
        let bad = Array2::from_elem((2, 4), 0.5);
        FractionCdf::new(&grid(), bad).unwrap_err();

        // Decreasing row.
        let bad = array![[0.5, 0.4], [0.1, 0.2], [0.1, 0.2]];
        FractionCdf::new(&grid(), bad).unwrap_err();

        // Entry outside (0, 1].
        let bad = array![[0.0, 0.5], [0.1, 0.2], [0.1, 0.2]];
        FractionCdf::new(&grid(), bad).unwrap_err();
    }

    #[test]
    fn test_sample_is_monotone_in_u() {
        let table = array![
            [0.01, 0.05, 0.30, 1.0],
            [0.02, 0.10, 0.50, 1.0],
            [0.05, 0.20, 0.80, 1.0],
        ];
        let cdf = FractionCdf::new(&grid(), table).unwrap();

        for row in 0..2 {
            let mut previous = 0.0;
            for k in 0..=100 {
                let u = k as f64 / 100.0;
                let x = cdf.sample(row, 0.3, u);
                assert!(x >= previous, "not monotone at u = {u}");
                previous = x;
            }
        }
    }

    #[test]
    fn test_sample_interpolates_rows() {
        let table = array![[0.2, 0.2], [0.4, 0.4], [0.8, 0.8]];
        let cdf = FractionCdf::new(&grid(), table).unwrap();
        assert!((cdf.sample(0, 0.0, 0.5) - 0.2).abs() < 1e-12);
        assert!((cdf.sample(0, 1.0, 0.5) - 0.4).abs() < 1e-12);
        assert!((cdf.sample(0, 0.5, 0.5) - 0.3).abs() < 1e-12);
    }
}
