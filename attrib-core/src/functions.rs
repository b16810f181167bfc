//! Named function handles for baselines and feature masks.
//!
//! Perturbation-based explainers and the pixel-flipping metrics take a
//! baseline generator and a feature-mask function. Both are carried as
//! cloneable handles wrapping an `Arc<dyn Fn>`, tagged with a stable name so
//! configuration code and tests can identify which canonical default was
//! resolved without calling the function.

use crate::model::{MaskTensor, Tensor};
use ndarray::{Axis, IxDyn};
use std::fmt;
use std::sync::Arc;

/// Produces a reference/neutral input from an actual input.
#[derive(Clone)]
pub struct BaselineFn {
    name: String,
    f: Arc<dyn Fn(&Tensor) -> Tensor + Send + Sync>,
}

impl BaselineFn {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Tensor) -> Tensor + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Stable name identifying the generator (e.g. `"zeros"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, input: &Tensor) -> Tensor {
        (self.f)(input)
    }

    /// All-zeros baseline, the canonical image default.
    pub fn zeros() -> Self {
        Self::new("zeros", |input: &Tensor| Tensor::zeros(input.raw_dim()))
    }

    /// Fills every position with a mask token id, the canonical text default.
    pub fn token_fill(mask_token_id: i64) -> Self {
        Self::new("mask_token", move |input: &Tensor| {
            Tensor::from_elem(input.raw_dim(), mask_token_id as f32)
        })
    }

    /// Per-feature mean of a background sample, broadcast to the input shape.
    /// Used for tabular models when background data is available.
    pub fn background_mean(background: &Tensor) -> Self {
        let means: Vec<f32> = match background.ndim() {
            0 => Vec::new(),
            _ => {
                let feature_axis = Axis(background.ndim() - 1);
                let n_features = background.len_of(feature_axis);
                (0..n_features)
                    .map(|i| {
                        let column = background.index_axis(feature_axis, i);
                        let count = column.len();
                        if count == 0 {
                            0.0
                        } else {
                            column.sum() / count as f32
                        }
                    })
                    .collect()
            }
        };
        Self::new("background_mean", move |input: &Tensor| {
            let nd = input.ndim();
            if nd == 0 || means.is_empty() {
                return Tensor::zeros(input.raw_dim());
            }
            Tensor::from_shape_fn(input.raw_dim(), |ix: IxDyn| {
                means.get(ix[nd - 1] % means.len().max(1)).copied().unwrap_or(0.0)
            })
        })
    }
}

impl fmt::Debug for BaselineFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaselineFn").field("name", &self.name).finish()
    }
}

/// Partitions an input into maskable feature groups.
///
/// The output assigns an integer group id to every input position; groups
/// are perturbed together by sampling-based methods.
#[derive(Clone)]
pub struct FeatureMaskFn {
    name: String,
    f: Arc<dyn Fn(&Tensor) -> MaskTensor + Send + Sync>,
}

impl FeatureMaskFn {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Tensor) -> MaskTensor + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, input: &Tensor) -> MaskTensor {
        (self.f)(input)
    }

    /// Square-grid segmentation over the trailing two axes, the canonical
    /// image default.
    pub fn grid(cell: usize) -> Self {
        let cell = cell.max(1);
        Self::new(format!("grid{}", cell), move |input: &Tensor| {
            let nd = input.ndim();
            if nd < 2 {
                return MaskTensor::zeros(input.raw_dim());
            }
            let width = input.shape()[nd - 1];
            let cells_per_row = width.div_ceil(cell);
            MaskTensor::from_shape_fn(input.raw_dim(), |ix: IxDyn| {
                let row = ix[nd - 2] / cell;
                let col = ix[nd - 1] / cell;
                (row * cells_per_row + col) as i64
            })
        })
    }

    /// One group per position along the trailing axis, the canonical
    /// tabular/text default (columns and tokens perturb independently).
    pub fn feature_units() -> Self {
        Self::new("feature_units", |input: &Tensor| {
            let nd = input.ndim();
            if nd == 0 {
                return MaskTensor::zeros(input.raw_dim());
            }
            MaskTensor::from_shape_fn(input.raw_dim(), |ix: IxDyn| ix[nd - 1] as i64)
        })
    }
}

impl fmt::Debug for FeatureMaskFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureMaskFn")
            .field("name", &self.name)
            .finish()
    }
}
