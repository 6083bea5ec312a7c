//! # Operator tags
//!
//! An operator tag records the algebraic structure of a matrix. Tags form a lattice by structural
//! implication: `Identity` implies `Orthogonal`, `Diagonal` and `Involutory`, all of which imply
//! `Square`, which in turn is both `Wide` and `Tall`. The untagged `General` is implied by
//! everything.
//!
//! A tag can
//!
//! * be bound to a concrete matrix to supply specialized operations (`instance`),
//! * tell whether the tag currently assigned to a tensor is itself or a refinement (`matches`),
//! * verify that the numeric contents of a matrix have the structure (`allows`).
use std::fmt;

use enum_map::Enum;

use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::tensor::Tensor;
use crate::operator::kernel::Layout;
use crate::operator::qualify::Qualification;

pub mod cost;
pub mod kernel;
pub mod operation;
pub mod qualify;
pub mod tag;

/// Which side of the diagonal holds the values of a triangular matrix.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Triangle {
    Upper,
    Lower,
}

/// Structural capability assigned to a tensor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operator {
    /// No known structure.
    General,
    /// At most as many rows as columns.
    Wide,
    /// At least as many rows as columns.
    Tall,
    /// As many rows as columns.
    Square,
    /// Equal to its transpose.
    Symmetric,
    /// Transpose is the inverse.
    Orthogonal,
    /// Its own inverse.
    Involutory,
    /// All nonzeros are at most `lower` rows below and `upper` columns right of the diagonal.
    #[allow(missing_docs)]
    Banded { lower: usize, upper: usize },
    /// All nonzeros on one side of the diagonal, or on it.
    Triangular(Triangle),
    /// Banded with one band on both sides.
    Tridiagonal,
    /// Only the diagonal is nonzero.
    Diagonal,
    /// The identity matrix.
    Identity,
    /// A Householder reflection: symmetric, orthogonal and involutory.
    Reflection,
}

/// Tag without its parameters, used as a key for per-tag configuration.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Enum)]
pub enum TagKind {
    General,
    Wide,
    Tall,
    Square,
    Symmetric,
    Orthogonal,
    Involutory,
    Banded,
    Triangular,
    Tridiagonal,
    Diagonal,
    Identity,
    Reflection,
}

impl Operator {
    /// The tag without parameters.
    pub fn kind(self) -> TagKind {
        match self {
            Operator::General => TagKind::General,
            Operator::Wide => TagKind::Wide,
            Operator::Tall => TagKind::Tall,
            Operator::Square => TagKind::Square,
            Operator::Symmetric => TagKind::Symmetric,
            Operator::Orthogonal => TagKind::Orthogonal,
            Operator::Involutory => TagKind::Involutory,
            Operator::Banded { .. } => TagKind::Banded,
            Operator::Triangular(_) => TagKind::Triangular,
            Operator::Tridiagonal => TagKind::Tridiagonal,
            Operator::Diagonal => TagKind::Diagonal,
            Operator::Identity => TagKind::Identity,
            Operator::Reflection => TagKind::Reflection,
        }
    }

    /// Immediate ancestors in the lattice for a matrix of the given shape.
    ///
    /// The band-shaped tags depend on the shape: an upper triangular matrix is banded with as many
    /// upper bands as there are columns, minus one.
    pub fn parents(self, (rows, columns): (usize, usize)) -> Vec<Operator> {
        match self {
            Operator::General => vec![],
            Operator::Wide | Operator::Tall => vec![Operator::General],
            Operator::Square => vec![Operator::Wide, Operator::Tall],
            Operator::Symmetric
            | Operator::Orthogonal
            | Operator::Involutory
            | Operator::Banded { .. } => vec![Operator::Square],
            Operator::Triangular(Triangle::Upper) => vec![Operator::Banded {
                lower: 0,
                upper: columns.saturating_sub(1),
            }],
            Operator::Triangular(Triangle::Lower) => vec![Operator::Banded {
                lower: rows.saturating_sub(1),
                upper: 0,
            }],
            Operator::Tridiagonal => vec![Operator::Banded { lower: 1, upper: 1 }],
            Operator::Diagonal => vec![Operator::Banded { lower: 0, upper: 0 }, Operator::Symmetric],
            Operator::Identity => vec![Operator::Orthogonal, Operator::Diagonal, Operator::Involutory],
            Operator::Reflection => vec![Operator::Symmetric, Operator::Orthogonal, Operator::Involutory],
        }
    }

    /// Number of bands below and above the diagonal, if this tag restricts them.
    pub fn bands(self, (rows, columns): (usize, usize)) -> Option<(usize, usize)> {
        match self {
            Operator::Banded { lower, upper } => Some((lower, upper)),
            Operator::Triangular(Triangle::Upper) => Some((0, columns.saturating_sub(1))),
            Operator::Triangular(Triangle::Lower) => Some((rows.saturating_sub(1), 0)),
            Operator::Tridiagonal => Some((1, 1)),
            Operator::Diagonal | Operator::Identity => Some((0, 0)),
            _ => None,
        }
    }

    fn is_band_shaped(self) -> bool {
        matches!(
            self,
            Operator::Banded { .. } | Operator::Triangular(_) | Operator::Tridiagonal | Operator::Diagonal,
        )
    }

    /// Loop structure that operations driven by this tag may use.
    pub fn layout(self, shape: (usize, usize)) -> Layout {
        match self {
            Operator::Identity => Layout::Identity,
            _ => match self.bands(shape) {
                Some((lower, upper)) => Layout::Banded { lower, upper },
                None => Layout::Dense,
            },
        }
    }

    /// Whether a matrix carrying this tag necessarily has the structure of `other`.
    ///
    /// A tag that only restricts bands has everything the strongest tag with those bands has, so
    /// `Banded { lower: 0, upper: 0 }` implies `Symmetric` through `Diagonal`.
    pub fn implies(self, other: Operator, shape: (usize, usize)) -> bool {
        if self.reaches(other, shape) {
            return true;
        }

        match self.bands(shape) {
            Some((lower, upper)) => {
                let strongest = Operator::from_bands(lower, upper, shape);
                strongest != self && strongest.reaches(other, shape)
            },
            None => false,
        }
    }

    /// Walk up the lattice from `self`, looking for `other`.
    fn reaches(self, other: Operator, shape: (usize, usize)) -> bool {
        if self == other || other == Operator::General {
            return true;
        }

        if other.is_band_shaped() {
            if let (Some((lower, upper)), Some((other_lower, other_upper))) = (self.bands(shape), other.bands(shape)) {
                if lower <= other_lower && upper <= other_upper {
                    return true;
                }
            }
        }

        self.parents(shape).into_iter().any(|parent| parent.reaches(other, shape))
    }

    /// Whether the tag currently assigned to `tensor` is this tag or a refinement of it.
    ///
    /// Only the assigned tag is looked at, not the values.
    pub fn matches(self, tensor: &impl AsRef<Tensor>) -> bool {
        let tensor = tensor.as_ref();
        match tensor.dimensions() {
            &[rows, columns] => tensor.operator().implies(self, (rows, columns)),
            _ => self == Operator::General || tensor.operator() == self,
        }
    }

    /// Whether the values of `matrix` have this structure within `margin`.
    ///
    /// Independent of the tag currently assigned to the matrix.
    pub fn allows(self, matrix: &Matrix, margin: f64) -> bool {
        Qualification::new(self, matrix, margin).holds()
    }

    /// `Square` for square shapes, `General` otherwise.
    pub fn shaped((rows, columns): (usize, usize)) -> Operator {
        if rows == columns { Operator::Square } else { Operator::General }
    }

    /// Strongest band-shaped tag for the given bands.
    pub fn from_bands(lower: usize, upper: usize, shape: (usize, usize)) -> Operator {
        let (rows, columns) = shape;
        if rows != columns {
            return Operator::General;
        }

        let full_lower = lower + 1 >= rows;
        let full_upper = upper + 1 >= columns;
        match (lower, upper) {
            (0, 0) => Operator::Diagonal,
            (1, 1) if rows > 2 => Operator::Tridiagonal,
            _ if full_lower && full_upper => Operator::Square,
            (0, _) if full_upper => Operator::Triangular(Triangle::Upper),
            (_, 0) if full_lower => Operator::Triangular(Triangle::Lower),
            _ => Operator::Banded { lower: lower.min(rows - 1), upper: upper.min(columns - 1) },
        }
    }

    /// Tag of the sum of matrices tagged `self` and `other`.
    pub fn sum(self, other: Operator, shape: (usize, usize)) -> Operator {
        let banded = match (self.bands(shape), other.bands(shape)) {
            (Some((lower, upper)), Some((other_lower, other_upper))) => {
                Some(Operator::from_bands(lower.max(other_lower), upper.max(other_upper), shape))
            },
            _ => None,
        };
        let symmetric = self.implies(Operator::Symmetric, shape) && other.implies(Operator::Symmetric, shape);

        match banded {
            Some(operator) if operator != Operator::Square && operator != Operator::General => operator,
            _ if symmetric => Operator::Symmetric,
            _ => Operator::shaped(shape),
        }
    }

    /// Tag of the product `self · other`, where `self` has shape `left` and `other` has `right`.
    pub fn product(self, other: Operator, left: (usize, usize), right: (usize, usize)) -> Operator {
        let shape = (left.0, right.1);
        if self == Operator::Identity && right == shape {
            return other;
        }
        if other == Operator::Identity && left == shape {
            return self;
        }
        if self.implies(Operator::Orthogonal, left) && other.implies(Operator::Orthogonal, right) {
            return Operator::Orthogonal;
        }

        match (self.bands(left), other.bands(right)) {
            (Some((lower, upper)), Some((other_lower, other_upper))) => {
                Operator::from_bands(lower + other_lower, upper + other_upper, shape)
            },
            _ => Operator::shaped(shape),
        }
    }

    /// Tag of the transpose.
    pub fn transposed(self) -> Operator {
        match self {
            Operator::Wide => Operator::Tall,
            Operator::Tall => Operator::Wide,
            Operator::Banded { lower, upper } => Operator::Banded { lower: upper, upper: lower },
            Operator::Triangular(Triangle::Upper) => Operator::Triangular(Triangle::Lower),
            Operator::Triangular(Triangle::Lower) => Operator::Triangular(Triangle::Upper),
            other => other,
        }
    }

    /// Tag of a scalar multiple.
    pub fn scaled(self, factor: f64) -> Operator {
        if factor == 1_f64 {
            return self;
        }

        match self {
            Operator::Identity => Operator::Diagonal,
            Operator::Orthogonal | Operator::Involutory => Operator::Square,
            Operator::Reflection => Operator::Symmetric,
            other => other,
        }
    }

    /// Tag of the inverse.
    pub fn inverted(self) -> Operator {
        match self {
            Operator::Identity
            | Operator::Diagonal
            | Operator::Orthogonal
            | Operator::Reflection
            | Operator::Involutory
            | Operator::Symmetric
            | Operator::Triangular(_) => self,
            _ => Operator::Square,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Banded { lower, upper } => write!(f, "Banded({}, {})", lower, upper),
            Operator::Triangular(Triangle::Upper) => f.write_str("UpperTriangular"),
            Operator::Triangular(Triangle::Lower) => f.write_str("LowerTriangular"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::Matrix;
    use crate::operator::{Operator, Triangle};

    const SQUARE: (usize, usize) = (4, 4);

    #[test]
    fn lattice() {
        assert!(Operator::Identity.implies(Operator::Orthogonal, SQUARE));
        assert!(Operator::Identity.implies(Operator::Involutory, SQUARE));
        assert!(Operator::Identity.implies(Operator::Symmetric, SQUARE));
        assert!(Operator::Identity.implies(Operator::Tridiagonal, SQUARE));
        assert!(Operator::Identity.implies(Operator::Wide, SQUARE));
        assert!(Operator::Reflection.implies(Operator::Involutory, SQUARE));
        assert!(Operator::Square.implies(Operator::Tall, SQUARE));
        assert!(Operator::Diagonal.implies(Operator::Triangular(Triangle::Lower), SQUARE));
        assert!(Operator::Tridiagonal.implies(Operator::Banded { lower: 2, upper: 1 }, SQUARE));
        assert!(Operator::Triangular(Triangle::Upper).implies(Operator::Banded { lower: 0, upper: 3 }, SQUARE));
        assert!(Operator::Banded { lower: 0, upper: 0 }.implies(Operator::Diagonal, SQUARE));
        assert!(Operator::Banded { lower: 0, upper: 0 }.implies(Operator::Symmetric, SQUARE));
        assert!(Operator::Banded { lower: 1, upper: 1 }.implies(Operator::Tridiagonal, SQUARE));
        assert!(Operator::Banded { lower: 0, upper: 5 }.implies(Operator::Triangular(Triangle::Upper), SQUARE));
        assert!(Operator::Triangular(Triangle::Lower).implies(Operator::Symmetric, (1, 1)));
        assert!(Operator::Tridiagonal.implies(Operator::Banded { lower: 1, upper: 1 }, (2, 2)));

        assert!(!Operator::Square.implies(Operator::Symmetric, SQUARE));
        assert!(!Operator::Orthogonal.implies(Operator::Symmetric, SQUARE));
        assert!(!Operator::Triangular(Triangle::Upper).implies(Operator::Banded { lower: 0, upper: 2 }, SQUARE));
        assert!(!Operator::Tridiagonal.implies(Operator::Symmetric, SQUARE));
        assert!(!Operator::Wide.implies(Operator::Tall, SQUARE));
        assert!(!Operator::Banded { lower: 0, upper: 1 }.implies(Operator::Symmetric, SQUARE));
        assert!(!Operator::Banded { lower: 0, upper: 0 }.implies(Operator::Orthogonal, SQUARE));
    }

    #[test]
    fn implication_is_transitive() {
        let tags = [
            Operator::General,
            Operator::Wide,
            Operator::Tall,
            Operator::Square,
            Operator::Symmetric,
            Operator::Orthogonal,
            Operator::Involutory,
            Operator::Banded { lower: 0, upper: 0 },
            Operator::Banded { lower: 1, upper: 1 },
            Operator::Banded { lower: 2, upper: 1 },
            Operator::Banded { lower: 0, upper: 3 },
            Operator::Triangular(Triangle::Upper),
            Operator::Triangular(Triangle::Lower),
            Operator::Tridiagonal,
            Operator::Diagonal,
            Operator::Identity,
            Operator::Reflection,
        ];
        for shape in [(1, 1), (2, 2), SQUARE] {
            for a in tags {
                for b in tags.iter().copied().filter(|&b| a.implies(b, shape)) {
                    for c in tags.iter().copied().filter(|&c| b.implies(c, shape)) {
                        assert!(a.implies(c, shape), "{} implies {} implies {} in {:?}", a, b, c, shape);
                    }
                }
            }
        }
    }

    #[test]
    fn matches_looks_at_the_tag_only() {
        let mut matrix = Matrix::identity(3);
        assert!(Operator::Orthogonal.matches(&matrix));
        assert!(Operator::Banded { lower: 1, upper: 1 }.matches(&matrix));

        matrix.assign(Operator::General);
        assert!(!Operator::Orthogonal.matches(&matrix));
        assert!(Operator::Orthogonal.allows(&matrix, 1e-10));
    }

    #[test]
    fn from_bands() {
        assert_eq!(Operator::from_bands(0, 0, SQUARE), Operator::Diagonal);
        assert_eq!(Operator::from_bands(1, 1, SQUARE), Operator::Tridiagonal);
        assert_eq!(Operator::from_bands(0, 3, SQUARE), Operator::Triangular(Triangle::Upper));
        assert_eq!(Operator::from_bands(5, 0, SQUARE), Operator::Triangular(Triangle::Lower));
        assert_eq!(Operator::from_bands(3, 7, SQUARE), Operator::Square);
        assert_eq!(Operator::from_bands(2, 1, SQUARE), Operator::Banded { lower: 2, upper: 1 });
        assert_eq!(Operator::from_bands(1, 1, (3, 4)), Operator::General);
    }

    #[test]
    fn result_tags() {
        assert_eq!(Operator::Identity.sum(Operator::Identity, SQUARE), Operator::Diagonal);
        assert_eq!(Operator::Symmetric.sum(Operator::Diagonal, SQUARE), Operator::Symmetric);
        assert_eq!(Operator::Orthogonal.sum(Operator::Symmetric, SQUARE), Operator::Square);
        assert_eq!(Operator::Banded { lower: 0, upper: 0 }.sum(Operator::Symmetric, SQUARE), Operator::Symmetric);
        assert_eq!(
            Operator::Tridiagonal.product(Operator::Tridiagonal, SQUARE, SQUARE),
            Operator::Banded { lower: 2, upper: 2 },
        );
        assert_eq!(Operator::Reflection.product(Operator::Orthogonal, SQUARE, SQUARE), Operator::Orthogonal);
        assert_eq!(Operator::Identity.product(Operator::Symmetric, SQUARE, SQUARE), Operator::Symmetric);
        assert_eq!(Operator::General.product(Operator::General, (2, 3), (3, 2)), Operator::Square);
        assert_eq!(Operator::Banded { lower: 2, upper: 0 }.transposed(), Operator::Banded { lower: 0, upper: 2 });
        assert_eq!(Operator::Identity.scaled(2_f64), Operator::Diagonal);
        assert_eq!(Operator::Tridiagonal.inverted(), Operator::Square);
    }

    #[test]
    fn display() {
        assert_eq!(Operator::Banded { lower: 1, upper: 2 }.to_string(), "Banded(1, 2)");
        assert_eq!(Operator::Triangular(Triangle::Lower).to_string(), "LowerTriangular");
        assert_eq!(Operator::Square.to_string(), "Square");
    }
}
