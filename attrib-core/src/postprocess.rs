//! Attribution postprocessors: channel pooling followed by normalization.
//!
//! The loader has no selection logic; it always returns the full fixed
//! catalog, each entry configured with the caller's channel dimension.

use crate::model::Tensor;
use ndarray::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduction applied over the channel axis of a raw attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingMethod {
    SumPos,
    SumAbs,
    L1Norm,
    L2Norm,
    MaxAbs,
}

impl PoolingMethod {
    pub const ALL: [PoolingMethod; 5] = [
        PoolingMethod::SumPos,
        PoolingMethod::SumAbs,
        PoolingMethod::L1Norm,
        PoolingMethod::L2Norm,
        PoolingMethod::MaxAbs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolingMethod::SumPos => "sumpos",
            PoolingMethod::SumAbs => "sumabs",
            PoolingMethod::L1Norm => "l1norm",
            PoolingMethod::L2Norm => "l2norm",
            PoolingMethod::MaxAbs => "maxabs",
        }
    }
}

/// Rescaling applied after pooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    MinMax,
    Identity,
}

impl NormalizationMethod {
    pub const ALL: [NormalizationMethod; 2] =
        [NormalizationMethod::MinMax, NormalizationMethod::Identity];

    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "minmax",
            NormalizationMethod::Identity => "identity",
        }
    }
}

/// A configured postprocessor: one pooling method, one normalization
/// method, and the channel axis to pool over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostProcessor {
    pooling: PoolingMethod,
    normalization: NormalizationMethod,
    channel_dim: i64,
}

impl PostProcessor {
    pub fn new(
        pooling: PoolingMethod,
        normalization: NormalizationMethod,
        channel_dim: i64,
    ) -> Self {
        Self {
            pooling,
            normalization,
            channel_dim,
        }
    }

    pub fn pooling(&self) -> PoolingMethod {
        self.pooling
    }

    pub fn normalization(&self) -> NormalizationMethod {
        self.normalization
    }

    pub fn channel_dim(&self) -> i64 {
        self.channel_dim
    }

    /// Stable identifier, e.g. `"sumabs_minmax"`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.pooling.as_str(), self.normalization.as_str())
    }

    /// Pool the attribution over the channel axis, then normalize.
    ///
    /// A negative channel dimension indexes from the end; out-of-range
    /// values clamp to the nearest valid axis.
    pub fn apply(&self, attribution: &Tensor) -> Tensor {
        if attribution.ndim() == 0 {
            return attribution.clone();
        }
        let axis = Axis(resolve_axis(self.channel_dim, attribution.ndim()));
        let pooled = match self.pooling {
            PoolingMethod::SumPos => attribution.mapv(|v| v.max(0.0)).sum_axis(axis),
            // L1Norm pools identically to SumAbs but keeps its own catalog id.
            PoolingMethod::SumAbs | PoolingMethod::L1Norm => {
                attribution.mapv(f32::abs).sum_axis(axis)
            }
            PoolingMethod::L2Norm => attribution.mapv(|v| v * v).sum_axis(axis).mapv(f32::sqrt),
            PoolingMethod::MaxAbs => {
                attribution.fold_axis(axis, 0.0f32, |acc, v| acc.max(v.abs()))
            }
        };
        match self.normalization {
            NormalizationMethod::Identity => pooled,
            NormalizationMethod::MinMax => {
                let min = pooled.iter().copied().fold(f32::INFINITY, f32::min);
                let max = pooled.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let range = max - min;
                if !range.is_finite() || range == 0.0 {
                    return Tensor::zeros(pooled.raw_dim());
                }
                pooled.mapv(|v| (v - min) / range)
            }
        }
    }
}

impl fmt::Display for PostProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

fn resolve_axis(channel_dim: i64, ndim: usize) -> usize {
    let nd = ndim as i64;
    let axis = if channel_dim < 0 {
        nd + channel_dim
    } else {
        channel_dim
    };
    axis.clamp(0, nd - 1) as usize
}

/// The full fixed postprocessor catalog for a channel dimension: every
/// pooling method crossed with every normalization method.
pub fn all_postprocessors(channel_dim: i64) -> Vec<PostProcessor> {
    let mut out = Vec::with_capacity(PoolingMethod::ALL.len() * NormalizationMethod::ALL.len());
    for pooling in PoolingMethod::ALL {
        for normalization in NormalizationMethod::ALL {
            out.push(PostProcessor::new(pooling, normalization, channel_dim));
        }
    }
    out
}
