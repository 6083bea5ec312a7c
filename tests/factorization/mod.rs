//! # Factorizations and iterations
//!
//! The algorithms reproduce their input from the factors they compute, and converge within the
//! requested margin.
use approx::assert_relative_eq;

use strata::algorithm::{EigenPair, Hints};
use strata::algorithm::eigen::{EigenSolver, RayleighIteration};
use strata::algorithm::lower_upper::LowerUpper;
use strata::algorithm::polar::decompose;
use strata::algorithm::reflector::householder;
use strata::algorithm::tridiagonal::tridiagonalize;
use strata::data::linear_algebra::matrix::Matrix;
use strata::data::linear_algebra::vector::Vector;
use strata::operator::{Operator, Triangle};

const SEEDS: std::ops::Range<u64> = 0..6;

/// Random values, moved away from singularity.
fn well_conditioned(size: usize, seed: u64) -> Matrix {
    Matrix::seeded(size, size, seed).add(&Matrix::identity(size).scale(size as f64)).unwrap()
}

#[test]
fn lower_upper_solves() {
    for seed in SEEDS {
        let matrix = well_conditioned(6, seed);
        let decomposition = LowerUpper::new(&matrix, 1e-10).unwrap();
        assert!(decomposition.is_invertible());

        let rhs = Matrix::seeded(6, 2, seed + 10);
        let x = decomposition.solve(&rhs).unwrap();
        assert!(matrix.multiply(&x).unwrap().approximately_equals(&rhs, 1e-10));

        let inverse = decomposition.inverse().unwrap();
        assert!(inverse.multiply(&matrix).unwrap().approximately_equals(&Matrix::identity(6), 1e-10));

        assert_eq!(decomposition.lower().operator(), Operator::Triangular(Triangle::Lower));
        assert_eq!(decomposition.upper().operator(), Operator::Triangular(Triangle::Upper));
    }
}

#[test]
fn polar_reproduces() {
    for seed in SEEDS {
        let matrix = well_conditioned(4, seed);
        let result = decompose(&Hints::new(&matrix).with_margin(1e-12)).unwrap();
        let (q, s) = (&result.orthogonal, &result.symmetric);

        assert!(q.transpose().multiply(q).unwrap().approximately_equals(&Matrix::identity(4), 1e-9));
        assert!(q.multiply(s).unwrap().approximately_equals(&matrix, 1e-9));
        assert!(Operator::Symmetric.allows(s, 1e-9));
    }
}

#[test]
fn rayleigh_converges() {
    let margin = 1e-5;
    for seed in SEEDS {
        let matrix = Matrix::seeded(5, 5, seed);
        let matrix = matrix.add(&matrix.transpose()).unwrap();
        let start = EigenPair::new(Vector::new(vec![1_f64, 0.5_f64, -0.25_f64, 0.75_f64, 1_f64]), 0.1_f64);

        let report = RayleighIteration.refine_with_report(&Hints::new(&matrix).with_margin(margin), start).unwrap();
        assert!(report.converged);
        assert!(report.residual <= 20_f64 * f64::EPSILON);
        let EigenPair { vector, value } = report.value;
        assert_relative_eq!(vector.norm(), 1_f64, epsilon = 1e-12);

        let image = Vector::try_from(matrix.multiply(vector.as_matrix()).unwrap()).unwrap();
        let residual = image.subtract(&vector.scale(value)).unwrap().norm();
        assert!(residual <= 1e-10 * value.abs().max(1_f64));
    }
}

#[test]
fn tridiagonal_similarity() {
    for seed in SEEDS {
        let matrix = Matrix::seeded(6, 6, seed);
        let matrix = matrix.add(&matrix.transpose()).unwrap();
        let result = tridiagonalize(&Hints::new(&matrix).with_margin(1e-12)).unwrap();

        assert!(Operator::Tridiagonal.allows(&result.tridiagonal, 0_f64));
        let u = &result.orthogonal;
        let restored = u.multiply(&result.tridiagonal).unwrap().multiply(&u.transpose()).unwrap();
        assert!(restored.approximately_equals(&matrix, 1e-10));
    }
}

#[test]
fn reflections_are_involutions() {
    for seed in SEEDS {
        let vector = Vector::try_from(Matrix::seeded(5, 1, seed)).unwrap();
        let reflection = householder(&vector, 0).unwrap();
        assert!(Operator::Reflection.allows(&reflection, 1e-12));
        assert!(reflection.multiply(&reflection).unwrap().approximately_equals(&Matrix::identity(5), 1e-12));
    }
}
