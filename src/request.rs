//! Validated inputs: the 2×2 transform and the vectors it is applied to.

use cgmath::{Matrix2, Vector2};

use crate::error::{ParseError, ShapeError};

pub const DIM: usize = 2;

/// A 2×2 matrix stored row-major, as it is written on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    rows: [[f64; DIM]; DIM],
}

impl TransformMatrix {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0], [0.0, 1.0]],
    };

    pub fn new(rows: [[f64; DIM]; DIM]) -> Self {
        Self { rows }
    }

    /// Validates the row count first, then every row length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        if rows.len() != DIM {
            return Err(ShapeError::RowCount {
                found: rows.len(),
                expected: DIM,
            });
        }

        let mut out = [[0.0; DIM]; DIM];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != DIM {
                return Err(ShapeError::RowLength {
                    row: i,
                    found: row.len(),
                    expected: DIM,
                });
            }
            out[i].copy_from_slice(row);
        }
        Ok(Self { rows: out })
    }

    pub fn rows(&self) -> [[f64; DIM]; DIM] {
        self.rows
    }

    pub fn determinant(&self) -> f64 {
        let [[a, b], [c, d]] = self.rows;
        a * d - b * c
    }

    pub fn apply(&self, v: [f64; DIM]) -> [f64; DIM] {
        let [[a, b], [c, d]] = self.rows;
        [a * v[0] + b * v[1], c * v[0] + d * v[1]]
    }

    /// cgmath matrices are column-major, so the rows are transposed here.
    pub fn to_cgmath(&self) -> Matrix2<f32> {
        let [[a, b], [c, d]] = self.rows;
        Matrix2::new(a as f32, c as f32, b as f32, d as f32)
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An ordered list of 2D vectors. May be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorList {
    vectors: Vec<[f64; DIM]>,
}

impl VectorList {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let vectors = rows
            .into_iter()
            .enumerate()
            .map(|(index, v)| {
                <[f64; DIM]>::try_from(v.as_slice()).map_err(|_| ShapeError::VectorLength {
                    index,
                    found: v.len(),
                    expected: DIM,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector2<f32>> + '_ {
        self.vectors
            .iter()
            .map(|&[x, y]| Vector2::new(x as f32, y as f32))
    }
}

impl From<Vec<[f64; DIM]>> for VectorList {
    fn from(vectors: Vec<[f64; DIM]>) -> Self {
        Self { vectors }
    }
}

fn parse_nested(what: &'static str, input: &str) -> Result<Vec<Vec<f64>>, ParseError> {
    serde_json::from_str(input).map_err(|source| ParseError {
        what,
        input: input.to_owned(),
        source,
    })
}

/// Parses `[[a, b], [c, d]]` into raw rows without validating the shape.
pub fn parse_matrix(input: &str) -> Result<Vec<Vec<f64>>, ParseError> {
    parse_nested("transform matrix", input)
}

/// Parses `[[x, y], ...]` into raw vectors without validating the shape.
pub fn parse_vectors(input: &str) -> Result<Vec<Vec<f64>>, ParseError> {
    parse_nested("vector list", input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_square_matrix() {
        let m = TransformMatrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(m.rows(), [[2.0, 0.0], [0.0, 1.0]]);
        assert_eq!(m.determinant(), 2.0);
    }

    #[test]
    fn rejects_wrong_row_count() {
        for n in [0, 1, 3, 4] {
            let rows = vec![vec![1.0, 0.0]; n];
            assert_eq!(
                TransformMatrix::from_rows(rows),
                Err(ShapeError::RowCount {
                    found: n,
                    expected: 2
                })
            );
        }
    }

    #[test]
    fn rejects_short_or_long_rows() {
        let err = TransformMatrix::from_rows(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])
            .unwrap_err();
        assert_eq!(
            err,
            ShapeError::RowLength {
                row: 0,
                found: 3,
                expected: 2
            }
        );

        let err = TransformMatrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::RowLength {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn one_bad_vector_rejects_the_list() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7], vec![0.7, 0.7]];
        assert_eq!(
            VectorList::from_rows(rows),
            Err(ShapeError::VectorLength {
                index: 2,
                found: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn empty_vector_list_is_valid() {
        let list = VectorList::from_rows(Vec::new()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn cgmath_conversion_keeps_row_semantics() {
        let m = TransformMatrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let v = m.to_cgmath() * Vector2::new(1.0, 1.0);
        assert_eq!((v.x, v.y), (3.0, 7.0));
        assert_eq!(m.apply([1.0, 1.0]), [3.0, 7.0]);
    }

    #[test]
    fn parses_cli_literals() {
        let m = parse_matrix("[[2, 0], [0, 1]]").unwrap();
        assert_eq!(m, vec![vec![2.0, 0.0], vec![0.0, 1.0]]);

        let v = parse_vectors("[[1, 0], [0, 1], [0.7, 0.7]]").unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v[2], vec![0.7, 0.7]);
    }

    #[test]
    fn parse_rejects_non_numeric_input() {
        let err = parse_matrix("[[a, 0], [0, 1]]").unwrap_err();
        assert_eq!(err.what, "transform matrix");
        assert!(parse_vectors("1, 2").is_err());
    }
}
