//! Dense single-vector retrieval family (DPR-style bi-encoders).

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::models::{PoolingStrategy, Projection};

/// Configuration for dense retrieval models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DprConfig {
    /// Maximum query length in tokens.
    pub query_length: usize,
    /// Maximum document length in tokens.
    pub doc_length: usize,
    /// Whether the pooled embedding is L2-normalized.
    pub normalize: bool,
    /// Projection on top of the pooled embedding (`None` = identity).
    pub projection: Option<Projection>,
    /// Pooling applied to query token representations.
    pub query_pooling_strategy: PoolingStrategy,
    /// Pooling applied to document token representations.
    pub doc_pooling_strategy: PoolingStrategy,
}

impl Default for DprConfig {
    fn default() -> Self {
        Self {
            query_length: 32,
            doc_length: 512,
            normalize: false,
            projection: Some(Projection::Linear),
            query_pooling_strategy: PoolingStrategy::First,
            doc_pooling_strategy: PoolingStrategy::First,
        }
    }
}

impl DprConfig {
    /// Builder: set projection
    pub fn projection(mut self, projection: Option<Projection>) -> Self {
        self.projection = projection;
        self
    }

    /// Builder: set query pooling strategy
    pub fn query_pooling_strategy(mut self, strategy: PoolingStrategy) -> Self {
        self.query_pooling_strategy = strategy;
        self
    }

    /// Builder: set document pooling strategy
    pub fn doc_pooling_strategy(mut self, strategy: PoolingStrategy) -> Self {
        self.doc_pooling_strategy = strategy;
        self
    }
}

/// A loaded dense retrieval model.
#[derive(Debug, Clone)]
pub struct DprModel {
    /// Family configuration.
    pub config: DprConfig,
    /// Input token embedding table, `[vocab, hidden]`.
    pub embeddings: Array2<f32>,
}

impl DprModel {
    /// Create a model from its embedding table.
    pub fn new(config: DprConfig, embeddings: Array2<f32>) -> Self {
        Self { config, embeddings }
    }
}
