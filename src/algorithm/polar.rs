//! # Polar decomposition
//!
//! Factor a square matrix `M = QS` into an orthogonal `Q` and a symmetric `S`, using the Newton
//! iteration `Q' = ½(Q + (Q⁻¹)ᵗ)` starting at `M`.
use crate::algorithm::{Hints, Iterated};
use crate::algorithm::lower_upper::LowerUpper;
use crate::data::linear_algebra::matrix::Matrix;
use crate::error::{Error, Result};
use crate::operator::Operator;

/// Factors `M = QS`.
#[derive(Clone, Debug)]
pub struct PolarDecomposition {
    /// `Q`, tagged `Orthogonal`.
    pub orthogonal: Matrix,
    /// `S`, tagged `Symmetric`.
    pub symmetric: Matrix,
}

/// Polar decomposition of the matrix of `hints`.
///
/// # Errors
///
/// See `decompose_with_report`.
pub fn decompose(hints: &Hints) -> Result<PolarDecomposition> {
    decompose_with_report(hints).map(|report| report.value)
}

/// Polar decomposition of the matrix of `hints`, with the number of Newton steps.
///
/// A matrix that is tagged `Orthogonal` is returned as `Q` with `S` the identity, and a matrix
/// tagged `Symmetric` is returned as `S` with `Q` the identity; the values are not inspected.
///
/// The iteration stops when the column sum norm of the change in `Q` is at most the margin times
/// the column sum norm of `Q`. The reported residual is the ratio of these norms.
///
/// # Errors
///
/// If the matrix is not square, or an iterate is singular within the margin.
pub fn decompose_with_report(hints: &Hints) -> Result<Iterated<PolarDecomposition>> {
    let matrix = hints.matrix;
    let n = matrix.rows();
    if !matrix.is_square() {
        return Err(Error::TagMismatch { required: Operator::Square, actual: matrix.operator() });
    }

    if Operator::Orthogonal.matches(matrix) {
        return Ok(immediate(matrix.clone(), Matrix::identity(n)));
    }
    if Operator::Symmetric.matches(matrix) {
        return Ok(immediate(Matrix::identity(n), matrix.clone()));
    }

    let mut orthogonal = matrix.clone().with_operator(Operator::Square);
    let mut change = f64::INFINITY;
    let mut converged = false;
    let mut iterations = 0;
    while iterations < hints.max_loops {
        iterations += 1;

        let inverse = LowerUpper::new(&orthogonal, hints.margin)?.inverse()?;
        let next = orthogonal.add(&inverse.transpose())?.scale(0.5_f64);
        let norm = orthogonal.one_norm();
        change = next.subtract(&orthogonal)?.one_norm() / norm;
        orthogonal = next;
        log::trace!("polar decomposition step {}: relative change {:e}", iterations, change);

        if change <= hints.margin {
            converged = true;
            break;
        }
    }
    if converged {
        log::debug!("polar decomposition converged after {} steps", iterations);
    } else {
        log::warn!("polar decomposition reached the cap of {} steps with relative change {:e}", iterations, change);
    }

    let product = orthogonal.transpose().multiply(matrix)?;
    let symmetric = product.add(&product.transpose())?.scale(0.5_f64);

    Ok(Iterated {
        value: PolarDecomposition {
            orthogonal: orthogonal.with_operator(Operator::Orthogonal),
            symmetric: symmetric.with_operator(Operator::Symmetric),
        },
        iterations,
        residual: change,
        converged,
    })
}

fn immediate(orthogonal: Matrix, symmetric: Matrix) -> Iterated<PolarDecomposition> {
    Iterated {
        value: PolarDecomposition {
            orthogonal: orthogonal.with_operator(Operator::Orthogonal),
            symmetric: symmetric.with_operator(Operator::Symmetric),
        },
        iterations: 0,
        residual: 0_f64,
        converged: true,
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::Hints;
    use crate::algorithm::polar::{decompose, decompose_with_report};
    use crate::data::linear_algebra::matrix::Matrix;
    use crate::error::Error;
    use crate::operator::Operator;

    fn assert_polar(matrix: &Matrix, margin: f64, tolerance: f64) {
        let result = decompose(&Hints::new(matrix).with_margin(margin)).unwrap();
        let (q, s) = (&result.orthogonal, &result.symmetric);

        assert!(q.transpose().multiply(q).unwrap().approximately_equals(&Matrix::identity(matrix.rows()), tolerance));
        assert!(q.multiply(s).unwrap().approximately_equals(matrix, tolerance));
        assert!(Operator::Symmetric.allows(s, tolerance));
    }

    #[test]
    fn newton() {
        let matrix = Matrix::from_rows(vec![
            vec![4_f64, 1_f64, 2_f64],
            vec![0.5_f64, 3_f64, 1_f64],
            vec![1_f64, -1_f64, 5_f64],
        ]).unwrap();
        assert_polar(&matrix, 1e-10, 1e-8);

        let report = decompose_with_report(&Hints::new(&matrix)).unwrap();
        assert!(report.converged);
        assert!(report.iterations > 1 && report.iterations < 20);
        assert!(report.residual <= 1e-4);
    }

    #[test]
    fn random() {
        for seed in 0..5 {
            let matrix = Matrix::seeded(5, 5, seed).add(&Matrix::identity(5).scale(3_f64)).unwrap();
            assert_polar(&matrix, 1e-10, 1e-8);
        }
    }

    #[test]
    fn short_circuits() {
        let (c, s) = (0.6_f64, 0.8_f64);
        let rotation = Matrix::from_rows(vec![vec![c, -s], vec![s, c]]).unwrap().with_operator(Operator::Orthogonal);
        let report = decompose_with_report(&Hints::new(&rotation)).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(report.value.orthogonal, rotation);
        assert_eq!(report.value.symmetric, Matrix::identity(2));

        let symmetric = Matrix::from_rows(vec![vec![2_f64, 1_f64], vec![1_f64, 2_f64]]).unwrap()
            .with_operator(Operator::Symmetric);
        let result = decompose(&Hints::new(&symmetric)).unwrap();
        assert_eq!(result.orthogonal, Matrix::identity(2));
        assert_eq!(result.symmetric, symmetric);
    }

    #[test]
    fn failures() {
        let wide = Matrix::zeros(2, 3);
        assert!(matches!(decompose(&Hints::new(&wide)), Err(Error::TagMismatch { .. })));

        let singular = Matrix::from_rows(vec![vec![1_f64, 2_f64], vec![2_f64, 4_f64]]).unwrap();
        assert!(matches!(decompose(&Hints::new(&singular)), Err(Error::NotInvertible { .. })));
    }
}
