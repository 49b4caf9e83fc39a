//! Closed-form determinants for small square matrices

/// Largest matrix order with a closed-form determinant.
pub const MAX_SUPPORTED_ORDER: usize = 3;

/// Outcome of [`determinant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determinant {
    Value(i128),
    /// The order has no closed form here (above [`MAX_SUPPORTED_ORDER`],
    /// or an empty matrix); callers skip the invertibility check instead
    /// of failing.
    Unsupported { order: usize },
}

impl Determinant {
    pub fn value(self) -> Option<i128> {
        match self {
            Determinant::Value(v) => Some(v),
            Determinant::Unsupported { .. } => None,
        }
    }
}

/// Determinant of a square matrix given as rows.
///
/// Callers guarantee the shape: `rows.len()` rows of `rows.len()` entries
/// each. Orders 1 to 3 are computed in closed form (cofactor expansion
/// along the first row for order 3).
pub fn determinant(rows: &[Vec<i32>]) -> Determinant {
    let n = rows.len();
    debug_assert!(rows.iter().all(|r| r.len() == n), "matrix must be square");

    let m = |r: usize, c: usize| i128::from(rows[r][c]);
    match n {
        1 => Determinant::Value(m(0, 0)),
        2 => Determinant::Value(m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0)),
        3 => Determinant::Value(
            m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
                - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
                + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0)),
        ),
        order => Determinant::Unsupported { order },
    }
}
