//! Dense tensor shapes exchanged between effects and the broadcasting engine.
//!
//! Purpose
//! -------
//! Effects consume and produce exactly two dense layouts: a panel block
//! `(series, time, features)` and a single-series block `(time, features)`.
//! [`Tensor`] makes the distinction explicit as a tagged union so shape
//! contracts are checked by matching on the variant instead of by inspecting
//! raw dimension counts.
//!
//! Key behaviors
//! -------------
//! - Dimension accessors (`dims`, `rows`, `features`, `series_count`) are
//!   total over both variants.
//! - [`Tensor::conform`] squeezes a unit series axis so single-series
//!   pipelines always see `(time, features)` tensors.
//! - [`Tensor::stack_series`] reassembles per-series outputs along a new
//!   leading axis in the order given.
//! - Elementwise arithmetic (`checked_add`, `sum_of`, `zip_apply`) fails with
//!   [`DataError::TensorShapeMismatch`] instead of panicking on disagreement.
//!
//! Conventions
//! -----------
//! - Contribution tensors are the `features == 1` case; the engine enforces
//!   that at its boundary, not here.
use crate::data::errors::{DataError, DataResult};
use ndarray::{stack, Array2, Array3, Axis};

/// Dense payload exchanged through the effect lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    /// Single-series block shaped `(time, features)`.
    Single(Array2<f64>),
    /// Panel block shaped `(series, time, features)`.
    Panel(Array3<f64>),
}

impl Tensor {
    /// Zero tensor of the pipeline contribution shape: `(series, rows, 1)`
    /// when `series > 1`, otherwise `(rows, 1)`.
    pub fn zeros(series: usize, rows: usize) -> Tensor {
        if series > 1 {
            Tensor::Panel(Array3::zeros((series, rows, 1)))
        } else {
            Tensor::Single(Array2::zeros((rows, 1)))
        }
    }

    /// Dimensions as a vector: `[time, features]` or `[series, time, features]`.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            Tensor::Single(arr) => arr.shape().to_vec(),
            Tensor::Panel(arr) => arr.shape().to_vec(),
        }
    }

    /// Length of the time axis.
    pub fn rows(&self) -> usize {
        match self {
            Tensor::Single(arr) => arr.dim().0,
            Tensor::Panel(arr) => arr.dim().1,
        }
    }

    /// Length of the trailing feature axis.
    pub fn features(&self) -> usize {
        match self {
            Tensor::Single(arr) => arr.dim().1,
            Tensor::Panel(arr) => arr.dim().2,
        }
    }

    /// Length of the series axis for panel tensors, `None` for single-series
    /// tensors.
    pub fn series_count(&self) -> Option<usize> {
        match self {
            Tensor::Single(_) => None,
            Tensor::Panel(arr) => Some(arr.dim().0),
        }
    }

    /// Whether this is the panel variant.
    pub fn is_panel(&self) -> bool {
        matches!(self, Tensor::Panel(_))
    }

    /// Apply `f` to every element, preserving the variant.
    pub fn mapv(&self, f: impl Fn(f64) -> f64) -> Tensor {
        match self {
            Tensor::Single(arr) => Tensor::Single(arr.mapv(&f)),
            Tensor::Panel(arr) => Tensor::Panel(arr.mapv(&f)),
        }
    }

    /// Conform to the pipeline shape for a run over `series` series: a panel
    /// tensor with a unit series axis is squeezed to `(time, features)` when
    /// the run is single-series; everything else passes through unchanged.
    pub fn conform(self, series: usize) -> Tensor {
        match self {
            Tensor::Panel(arr) if series == 1 && arr.dim().0 == 1 => {
                Tensor::Single(arr.index_axis_move(Axis(0), 0))
            }
            other => other,
        }
    }

    /// Elementwise sum of two tensors of identical variant and shape.
    ///
    /// # Errors
    /// - [`DataError::TensorShapeMismatch`] when variants or dimensions
    ///   disagree.
    pub fn checked_add(&self, other: &Tensor) -> DataResult<Tensor> {
        match (self, other) {
            (Tensor::Single(a), Tensor::Single(b)) if a.dim() == b.dim() => {
                Ok(Tensor::Single(a + b))
            }
            (Tensor::Panel(a), Tensor::Panel(b)) if a.dim() == b.dim() => Ok(Tensor::Panel(a + b)),
            _ => Err(DataError::TensorShapeMismatch {
                expected: self.dims(),
                actual: other.dims(),
            }),
        }
    }

    /// Elementwise sum of a non-empty set of same-shape tensors.
    ///
    /// # Errors
    /// - [`DataError::EmptyStack`] when `parts` is empty.
    /// - [`DataError::TensorShapeMismatch`] when any part disagrees with the
    ///   first.
    pub fn sum_of(parts: Vec<Tensor>) -> DataResult<Tensor> {
        let mut iter = parts.into_iter();
        let first = match iter.next() {
            Some(tensor) => tensor,
            None => return Err(DataError::EmptyStack),
        };
        iter.try_fold(first, |acc, part| acc.checked_add(&part))
    }

    /// Stack single-series tensors along a new leading series axis, preserving
    /// the order given.
    ///
    /// # Errors
    /// - [`DataError::EmptyStack`] when `parts` is empty.
    /// - [`DataError::TensorShapeMismatch`] when a part is a panel tensor or
    ///   disagrees in shape with the first part.
    pub fn stack_series(parts: &[Tensor]) -> DataResult<Tensor> {
        let mut views = Vec::with_capacity(parts.len());
        let mut dims: Option<(usize, usize)> = None;
        for part in parts {
            match part {
                Tensor::Single(arr) => {
                    let d = arr.dim();
                    match dims {
                        None => dims = Some(d),
                        Some(expected) if expected == d => {}
                        Some(expected) => {
                            return Err(DataError::TensorShapeMismatch {
                                expected: vec![expected.0, expected.1],
                                actual: vec![d.0, d.1],
                            });
                        }
                    }
                    views.push(arr.view());
                }
                Tensor::Panel(arr) => {
                    let d = arr.dim();
                    return Err(DataError::TensorShapeMismatch {
                        expected: vec![d.1, d.2],
                        actual: vec![d.0, d.1, d.2],
                    });
                }
            }
        }
        if views.is_empty() {
            return Err(DataError::EmptyStack);
        }
        let stacked = stack(Axis(0), &views).map_err(|_| DataError::EmptyStack)?;
        Ok(Tensor::Panel(stacked))
    }

    /// Apply `f` to every element pair of two tensors of identical variant and
    /// shape, mutating `self` in place.
    ///
    /// # Errors
    /// - [`DataError::TensorShapeMismatch`] when variants or dimensions
    ///   disagree.
    pub fn zip_apply(&mut self, other: &Tensor, f: impl Fn(&mut f64, f64)) -> DataResult<()> {
        let (own, theirs) = (self.dims(), other.dims());
        match (self, other) {
            (Tensor::Single(a), Tensor::Single(b)) if own == theirs => {
                a.zip_mut_with(b, |x, &y| f(x, y));
                Ok(())
            }
            (Tensor::Panel(a), Tensor::Panel(b)) if own == theirs => {
                a.zip_mut_with(b, |x, &y| f(x, y));
                Ok(())
            }
            _ => Err(DataError::TensorShapeMismatch { expected: own, actual: theirs }),
        }
    }
}
