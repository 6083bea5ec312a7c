//! Helper methods for the accuracy of floating point calculations.
use num_traits::Float;

/// Whether `value` is within `margin` of zero.
pub fn within<F: Float>(value: F, margin: F) -> bool {
    debug_assert!(margin >= F::zero());

    value.abs() <= margin
}

/// Whether two values differ by at most `margin`.
pub fn close<F: Float>(left: F, right: F, margin: F) -> bool {
    within(left - right, margin)
}

/// Sign of a value, with zero counted as positive.
///
/// Used when choosing the direction of a reflection, where a zero must not cancel the norm.
pub fn sign<F: Float>(value: F) -> F {
    if value < F::zero() { -F::one() } else { F::one() }
}

/// Cosine and sine of a plane rotation that maps `(a, b)` onto `(r, 0)`.
///
/// The pair satisfies `c * a - s * b = r` and `s * a + c * b = 0`. The larger of the two inputs
/// in magnitude is used as the divisor, so no intermediate value overflows.
pub fn rotation<F: Float>(a: F, b: F) -> (F, F) {
    if b.is_zero() {
        (F::one(), F::zero())
    } else if b.abs() > a.abs() {
        let tau = -a / b;
        let s = F::one() / (F::one() + tau * tau).sqrt();
        (s * tau, s)
    } else {
        let tau = -b / a;
        let c = F::one() / (F::one() + tau * tau).sqrt();
        (c, c * tau)
    }
}

/// Euclidean norm of a sequence of values.
pub fn euclidean_norm<F: Float>(values: impl Iterator<Item=F>) -> F {
    values.fold(F::zero(), |total, value| total + value * value).sqrt()
}
