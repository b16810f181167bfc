//! Model and data-source abstractions.
//!
//! The configuration layer never inspects model internals; the model
//! participates as an opaque forward-pass handle plus an optional target
//! layer reference supplied by the caller.

use ndarray::ArrayD;
use std::sync::Arc;

/// Dense tensor of activations, inputs, or attributions.
pub type Tensor = ArrayD<f32>;

/// Integer tensor of feature-group assignments.
pub type MaskTensor = ArrayD<i64>;

/// Opaque handle to a trained model.
///
/// Architecture detection is out of scope here; explainer selection is
/// driven by modality alone, so the only required capability is a forward
/// pass.
pub trait Model: Send + Sync {
    /// Run a forward pass on a batch of inputs.
    fn forward(&self, inputs: &Tensor) -> Tensor;

    /// Stable name used in logs.
    fn name(&self) -> &str {
        "model"
    }
}

/// Reference to a layer inside a model, addressed by dotted path
/// (e.g. `"encoder.embeddings.word_embeddings"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TargetLayer {
    path: String,
}

impl TargetLayer {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for TargetLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// One batch drawn from a data source.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Tensor,
    pub labels: Vec<i64>,
}

/// Source of batches for an experiment.
pub trait DataSource: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn batch(&self, index: usize) -> Option<Batch>;
}

/// In-memory data source backed by a vector of batches.
#[derive(Debug, Clone, Default)]
pub struct InMemoryData {
    batches: Vec<Batch>,
}

impl InMemoryData {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self { batches }
    }
}

impl DataSource for InMemoryData {
    fn len(&self) -> usize {
        self.batches.len()
    }

    fn batch(&self, index: usize) -> Option<Batch> {
        self.batches.get(index).cloned()
    }
}

/// Extracts extra positional forward arguments from a batch
/// (e.g. attention masks for transformer models).
pub type ForwardArgExtractor = Arc<dyn Fn(&Batch) -> Vec<Tensor> + Send + Sync>;

/// Extracts the model input from a batch.
pub type InputExtractor = Arc<dyn Fn(&Batch) -> Tensor + Send + Sync>;

/// Extracts labels or prediction targets from a batch.
pub type LabelExtractor = Arc<dyn Fn(&Batch) -> Vec<i64> + Send + Sync>;

/// Renders a tensor for display; the payload shape is caller-defined.
pub type Visualizer = Arc<dyn Fn(&Tensor) -> serde_json::Value + Send + Sync>;
