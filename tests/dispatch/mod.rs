//! # Dispatch and qualification
//!
//! Operations give the same values whichever operand drives them, a tighter structure is never
//! more expensive, and qualification agrees with the structure each tag describes.
use strata::data::linear_algebra::matrix::Matrix;
use strata::operator::{Operator, Triangle};
use strata::operator::operation::Operation;
use strata::operator::qualify::Qualification;
use strata::operator::tag;

const SEEDS: std::ops::Range<u64> = 0..8;

/// A random matrix with zeros outside of the band, tagged with that band.
fn banded(size: usize, lower: usize, upper: usize, seed: u64) -> Matrix {
    let mut matrix = Matrix::seeded(size, size, seed);
    for i in 0..size {
        for j in 0..size {
            if i > j + lower || j > i + upper {
                matrix.set(i, j, 0_f64);
            }
        }
    }
    matrix.with_operator(Operator::from_bands(lower, upper, (size, size)))
}

fn symmetric(size: usize, seed: u64) -> Matrix {
    let matrix = Matrix::seeded(size, size, seed);
    matrix.add(&matrix.transpose()).unwrap()
}

#[test]
fn drivers_agree() {
    for seed in SEEDS {
        let left = banded(6, 1, 2, seed);
        let right = Matrix::seeded(6, 4, seed + 100);
        let dense = left.clone().with_operator(Operator::General);

        assert_eq!(left.multiply(&right).unwrap(), dense.multiply(&right).unwrap());
        assert_eq!(right.transpose().multiply(&left).unwrap(), right.transpose().multiply(&dense).unwrap());

        let other = Matrix::seeded(6, 6, seed + 200);
        assert_eq!(left.add(&other).unwrap(), dense.add(&other).unwrap());
        assert_eq!(left.dot(&other).unwrap(), dense.dot(&other).unwrap());
        assert_eq!(left.transpose(), dense.transpose());
    }
}

#[test]
fn banded_cost_is_monotone() {
    let other = Matrix::seeded(8, 8, 1);
    let general = Matrix::seeded(8, 8, 2);
    let cost = |operator: Operator| operator.instance(&general).left_multiply(&other).cost();

    let dense = cost(Operator::General);
    let mut previous = cost(Operator::Diagonal);
    for width in 1..8 {
        let current = cost(Operator::from_bands(width, width, (8, 8)));
        assert!(previous <= current);
        assert!(current <= dense);
        previous = current;
    }
    assert!(cost(Operator::Identity) <= cost(Operator::Diagonal));
}

#[test]
fn identity_is_cheapest() {
    let identity = Matrix::identity(5);
    let other = Matrix::seeded(5, 5, 3);
    let product = identity.multiply(&other).unwrap();
    assert_eq!(product, other);
    assert_eq!(other.multiply(&identity).unwrap(), other);
}

/// Values of a matrix, row by row.
fn entries(matrix: &Matrix) -> Vec<Vec<f64>> {
    (0..matrix.rows()).map(|i| (0..matrix.columns()).map(|j| matrix.get(i, j)).collect()).collect()
}

/// A dense copy of `matrix` with `delta` added to one entry.
fn perturbed(matrix: &Matrix, (row, column): (usize, usize), delta: f64) -> Matrix {
    let mut values = entries(matrix);
    values[row][column] += delta;
    Matrix::from_rows(values).unwrap()
}

/// `I - 2vvᵗ / vᵗv`.
fn reflection(v: &[f64]) -> Matrix {
    let squared = v.iter().map(|x| x * x).sum::<f64>();
    let rows = (0..v.len())
        .map(|i| (0..v.len())
            .map(|j| (if i == j { 1_f64 } else { 0_f64 }) - 2_f64 * v[i] * v[j] / squared)
            .collect())
        .collect();
    Matrix::from_rows(rows).unwrap()
}

/// A rotation in the plane of the second and third coordinate.
fn rotation(size: usize, cosine: f64, sine: f64) -> Matrix {
    let mut rows = (0..size)
        .map(|i| (0..size).map(|j| if i == j { 1_f64 } else { 0_f64 }).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    rows[1][1] = cosine;
    rows[1][2] = -sine;
    rows[2][1] = sine;
    rows[2][2] = cosine;
    Matrix::from_rows(rows).unwrap()
}

/// Whether `M · Mᵗ` (or `M · M`) is within `margin` of the identity, computed entry by entry.
fn product_is_identity(m: &[Vec<f64>], transposed: bool, margin: f64) -> bool {
    let n = m.len();
    (0..n).all(|i| (0..n).all(|j| {
        let value = (0..n)
            .map(|k| m[i][k] * if transposed { m[j][k] } else { m[k][j] })
            .sum::<f64>();
        let expected = if i == j { 1_f64 } else { 0_f64 };
        (value - expected).abs() <= margin
    }))
}

/// Whether every entry outside of the band is within `margin` of zero.
fn inside_band(m: &[Vec<f64>], lower: usize, upper: usize, margin: f64) -> bool {
    m.iter().enumerate().all(|(i, row)| row.iter().enumerate().all(|(j, value)| {
        (j + lower >= i && i + upper >= j) || value.abs() <= margin
    }))
}

/// The structure a tag describes, written out on the values.
fn has_structure(operator: Operator, matrix: &Matrix, margin: f64) -> bool {
    let m = entries(matrix);
    let (rows, columns) = matrix.shape();
    let square = rows == columns;
    let symmetric = square && (0..rows).all(|i| (0..i).all(|j| (m[i][j] - m[j][i]).abs() <= margin));
    let orthogonal = square && product_is_identity(&m, true, margin);
    let involutory = square && product_is_identity(&m, false, margin);
    let banded = |lower, upper| square && inside_band(&m, lower, upper, margin);

    match operator {
        Operator::General => true,
        Operator::Wide => rows <= columns,
        Operator::Tall => rows >= columns,
        Operator::Square => square,
        Operator::Symmetric => symmetric,
        Operator::Orthogonal => orthogonal,
        Operator::Involutory => involutory,
        Operator::Banded { lower, upper } => banded(lower, upper),
        Operator::Triangular(Triangle::Upper) => banded(0, columns - 1),
        Operator::Triangular(Triangle::Lower) => banded(rows - 1, 0),
        Operator::Tridiagonal => banded(1, 1),
        Operator::Diagonal => banded(0, 0) && symmetric,
        Operator::Identity => {
            banded(0, 0) && symmetric && orthogonal && involutory
                && (0..rows).all(|i| (m[i][i] - 1_f64).abs() <= margin)
        },
        Operator::Reflection => symmetric && orthogonal && involutory,
    }
}

#[test]
fn qualification_matches_the_definitions() {
    let size = 4;
    let margin = 1e-6;
    let tags = [
        Operator::Wide,
        Operator::Tall,
        Operator::Square,
        Operator::Symmetric,
        Operator::Orthogonal,
        Operator::Involutory,
        Operator::Banded { lower: 1, upper: 0 },
        Operator::Banded { lower: 0, upper: 2 },
        Operator::Triangular(Triangle::Upper),
        Operator::Triangular(Triangle::Lower),
        Operator::Tridiagonal,
        Operator::Diagonal,
        Operator::Identity,
        Operator::Reflection,
    ];

    let identity = Matrix::identity(size);
    let bases = SEEDS
        .flat_map(|seed| [
            Matrix::seeded(size, size, seed),
            symmetric(size, seed),
            banded(size, 1, 0, seed),
            banded(size, 0, 2, seed),
            banded(size, 1, 1, seed),
            banded(size, 0, 0, seed),
            banded(size, 3, 0, seed),
        ])
        .chain([
            identity.clone(),
            reflection(&[1_f64, 2_f64, -1_f64, 0.5_f64]),
            rotation(size, 0.6_f64, 0.8_f64),
        ])
        .collect::<Vec<_>>();

    // Each entry moved by less and by more than the margin
    let mut candidates = bases.clone();
    for base in &bases {
        for position in [(0, 3), (2, 1), (1, 1)] {
            for delta in [0.4_f64 * margin, -3_f64 * margin] {
                candidates.push(perturbed(base, position, delta));
            }
        }
    }
    candidates.extend([Matrix::seeded(size, size + 1, 1), Matrix::seeded(size + 1, size, 2)]);

    let mut outcomes = tags.map(|_| (0, 0));
    for matrix in &candidates {
        for (operator, (held, failed)) in tags.iter().zip(&mut outcomes) {
            let expected = has_structure(*operator, matrix, margin);
            assert_eq!(operator.allows(matrix, margin), expected, "{} on\n{}", operator, matrix);
            assert_eq!(operator.allows(matrix, 0_f64), has_structure(*operator, matrix, 0_f64));
            if expected { *held += 1 } else { *failed += 1 }
        }
    }

    // Every tag was seen to hold and to fail
    for (operator, (held, failed)) in tags.iter().zip(outcomes) {
        assert!(held > 0 && failed > 0, "{}: {} held, {} failed", operator, held, failed);
    }

    // The tag assigned to a matrix plays no part
    let mislabeled = Matrix::seeded(size, size, 3).with_operator(Operator::Identity);
    assert!(!Operator::Identity.allows(&mislabeled, margin));
    assert!(Operator::Identity.allows(&identity.with_operator(Operator::General), 0_f64));
}

#[test]
fn assumptions() {
    for seed in SEEDS {
        let matrix = symmetric(4, seed);
        let assumed = matrix.clone().assume(tag::Symmetric, 0_f64).unwrap();
        assert_eq!(assumed.operator(), Operator::Symmetric);
        assert_eq!(assumed.into_inner().with_operator(Operator::General), matrix);

        assert!(Matrix::seeded(4, 4, seed).assume(tag::Symmetric, 1e-10).is_err());
    }
}

#[test]
fn result_tags_are_sound() {
    for seed in SEEDS {
        let first = symmetric(5, seed).with_operator(Operator::Symmetric);
        let second = symmetric(5, seed + 50).with_operator(Operator::Symmetric);

        let sum = first.add(&second).unwrap();
        assert!(Operator::Symmetric.matches(&sum));
        assert!(Qualification::new(sum.operator(), &sum, 1e-12).holds());

        let scaled = first.scale(-2.5_f64);
        assert!(Operator::Symmetric.matches(&scaled));

        let product = banded(5, 1, 0, seed).multiply(&banded(5, 0, 1, seed)).unwrap();
        assert!(Qualification::new(product.operator(), &product, 0_f64).holds());
    }
}
