//! # Eigenpair refinement
//!
//! Iterative improvement of an approximate eigenvector and eigenvalue.
//!
//! Each solver stops when the next normalized iterate `v'` barely leaves the direction of the
//! current one `v`: the residual `‖v' - (v'·v)v‖` is at most `margin⁴`. A bound below the rounding
//! of an `n`-vector can't be reached, so it is never taken smaller than `4nε`. The iteration cap
//! also ends the loop. Hitting the cap is not an error: the last estimate is returned, and the
//! report says it didn't converge.
use crate::algorithm::{EigenPair, Hints, Iterated};
use crate::algorithm::lower_upper::LowerUpper;
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::vector::Vector;
use crate::error::{Error, Result};
use crate::operator::Operator;

/// Improves an approximate eigenpair.
pub trait EigenSolver {
    /// Refine `initial` until it is accurate within the margin of `hints`, or the cap is reached.
    ///
    /// # Arguments
    ///
    /// * `hints`: Matrix, margin and iteration cap.
    /// * `initial`: Starting estimate. Solvers that shift use its value as the first shift.
    ///
    /// # Errors
    ///
    /// If the matrix isn't square, or the vector has the wrong length or is zero.
    fn refine_with_report(&self, hints: &Hints, initial: EigenPair) -> Result<Iterated<EigenPair>>;

    /// Like `refine_with_report`, without the report.
    ///
    /// # Errors
    ///
    /// See `refine_with_report`.
    fn refine(&self, hints: &Hints, initial: EigenPair) -> Result<EigenPair> {
        self.refine_with_report(hints, initial).map(|report| report.value)
    }
}

/// Repeated multiplication, converges to the eigenvalue of largest magnitude.
#[derive(Copy, Clone, Debug, Default)]
pub struct PowerIteration;

/// Repeated solving against the matrix shifted by the initial value, converges to the eigenvalue
/// closest to that value.
///
/// If the shift is an eigenvalue, the shifted matrix can't be solved against and the starting
/// estimate is returned, reported as not converged.
#[derive(Copy, Clone, Debug, Default)]
pub struct InverseIteration;

/// Inverse iteration that moves the shift to the Rayleigh quotient after each step.
///
/// Converges cubically near a simple eigenvalue, but factorizes the shifted matrix every step.
/// Close to convergence the Rayleigh quotient often is an eigenvalue in floating point; such a
/// shift is moved by a relative `√ε` before factorizing.
#[derive(Copy, Clone, Debug, Default)]
pub struct RayleighIteration;

impl EigenSolver for PowerIteration {
    fn refine_with_report(&self, hints: &Hints, initial: EigenPair) -> Result<Iterated<EigenPair>> {
        let matrix = hints.matrix;
        let threshold = threshold(hints.margin, matrix.rows());
        let mut vector = start(matrix, &initial)?;
        let mut image = multiply(matrix, &vector)?;
        let mut value = vector.dot(&image)?;
        let mut residual = f64::INFINITY;

        for iteration in 1..=hints.max_loops {
            let norm = image.norm();
            if norm == 0_f64 {
                // The estimate is in the null space, so it is an eigenvector for zero
                return Ok(finish("power iteration", vector, 0_f64, iteration, 0_f64, true));
            }
            let next = image.scale(1_f64 / norm);
            residual = step(&vector, &next)?;
            vector = next;
            image = multiply(matrix, &vector)?;
            value = vector.dot(&image)?;
            log::trace!("power iteration {}: value {}, residual {:e}", iteration, value, residual);

            if residual <= threshold {
                return Ok(finish("power iteration", vector, value, iteration, residual, true));
            }
        }

        Ok(capped("power iteration", vector, value, hints.max_loops, residual))
    }
}

impl EigenSolver for InverseIteration {
    fn refine_with_report(&self, hints: &Hints, initial: EigenPair) -> Result<Iterated<EigenPair>> {
        let matrix = hints.matrix;
        let threshold = threshold(hints.margin, matrix.rows());
        let mut vector = start(matrix, &initial)?;
        let mut value = rayleigh_quotient(matrix, &vector)?;
        let mut residual = f64::INFINITY;

        let shift = initial.value;
        let decomposition = LowerUpper::new(shifted(matrix, shift)?.destructible(), 0_f64)?;
        for iteration in 1..=hints.max_loops {
            let Some(next) = solve(&decomposition, &vector) else {
                log::warn!("inverse iteration: shift {} is an eigenvalue, returning the current estimate", shift);
                return Ok(finish("inverse iteration", vector, value, iteration, residual, false));
            };
            residual = step(&vector, &next)?;
            vector = next;
            value = rayleigh_quotient(matrix, &vector)?;
            log::trace!("inverse iteration {}: value {}, residual {:e}", iteration, value, residual);

            if residual <= threshold {
                return Ok(finish("inverse iteration", vector, value, iteration, residual, true));
            }
        }

        Ok(capped("inverse iteration", vector, value, hints.max_loops, residual))
    }
}

impl EigenSolver for RayleighIteration {
    fn refine_with_report(&self, hints: &Hints, initial: EigenPair) -> Result<Iterated<EigenPair>> {
        let matrix = hints.matrix;
        let threshold = threshold(hints.margin, matrix.rows());
        let mut vector = start(matrix, &initial)?;
        let mut value = rayleigh_quotient(matrix, &vector)?;
        let mut residual = f64::INFINITY;

        let mut shift = initial.value;
        for iteration in 1..=hints.max_loops {
            let mut decomposition = LowerUpper::new(shifted(matrix, shift)?.destructible(), 0_f64)?;
            if !decomposition.is_invertible() {
                let nudged = shift + f64::EPSILON.sqrt() * shift.abs().max(1_f64);
                log::debug!("Rayleigh iteration: shift {} is an eigenvalue, moving it to {}", shift, nudged);
                decomposition = LowerUpper::new(shifted(matrix, nudged)?.destructible(), 0_f64)?;
            }
            let Some(next) = solve(&decomposition, &vector) else {
                log::warn!("Rayleigh iteration: shift {} is an eigenvalue, returning the current estimate", shift);
                return Ok(finish("Rayleigh iteration", vector, value, iteration, residual, false));
            };
            residual = step(&vector, &next)?;
            vector = next;
            value = rayleigh_quotient(matrix, &vector)?;
            log::trace!("Rayleigh iteration {}: value {}, residual {:e}", iteration, value, residual);

            if residual <= threshold {
                return Ok(finish("Rayleigh iteration", vector, value, iteration, residual, true));
            }
            shift = value;
        }

        Ok(capped("Rayleigh iteration", vector, value, hints.max_loops, residual))
    }
}

/// Check the input and normalize the initial vector.
fn start(matrix: &Matrix, initial: &EigenPair) -> Result<Vector> {
    if !matrix.is_square() {
        return Err(Error::TagMismatch { required: Operator::Square, actual: matrix.operator() });
    }
    if initial.vector.len() != matrix.rows() {
        return Err(Error::dimensions(
            "eigenpair refinement",
            &[matrix.rows(), matrix.columns()],
            &[initial.vector.len(), 1],
        ));
    }
    if initial.vector.norm() == 0_f64 {
        return Err(Error::InvalidArgument {
            argument: "initial",
            reason: "the initial vector is zero".to_string(),
        });
    }

    Ok(initial.vector.normalized())
}

fn multiply(matrix: &Matrix, vector: &Vector) -> Result<Vector> {
    Vector::try_from(matrix.multiply(vector.as_matrix())?)
}

/// `vᵗMv` for a normalized `v`.
fn rayleigh_quotient(matrix: &Matrix, vector: &Vector) -> Result<f64> {
    vector.dot(&multiply(matrix, vector)?)
}

/// Part of the normalized `next` iterate that is orthogonal to the normalized `current` one.
fn step(current: &Vector, next: &Vector) -> Result<f64> {
    let along = next.dot(current)?;
    Ok(next.subtract(&current.scale(along))?.norm())
}

/// Largest step residual that counts as converged for vectors of length `size`.
fn threshold(margin: f64, size: usize) -> f64 {
    margin.powi(4).max(4_f64 * size as f64 * f64::EPSILON)
}

/// `M - σI`.
fn shifted(matrix: &Matrix, shift: f64) -> Result<Matrix> {
    matrix.add(&Matrix::identity(matrix.rows()).scale(-shift))
}

/// Normalized solution of the shifted system, `None` if it is singular.
fn solve(decomposition: &LowerUpper, vector: &Vector) -> Option<Vector> {
    let solution = decomposition.solve_vector(vector).ok()?;
    let norm = solution.norm();
    if norm.is_finite() && norm > 0_f64 {
        Some(solution.scale(1_f64 / norm))
    } else {
        None
    }
}

fn finish(
    name: &str,
    vector: Vector,
    value: f64,
    iterations: u64,
    residual: f64,
    converged: bool,
) -> Iterated<EigenPair> {
    log::debug!("{} stopped after {} iterations: value {}, residual {:e}", name, iterations, value, residual);

    Iterated { value: EigenPair::new(vector, value), iterations, residual, converged }
}

fn capped(name: &str, vector: Vector, value: f64, max_loops: u64, residual: f64) -> Iterated<EigenPair> {
    log::warn!("{} reached the cap of {} iterations with residual {:e}", name, max_loops, residual);

    Iterated { value: EigenPair::new(vector, value), iterations: max_loops, residual, converged: false }
}
