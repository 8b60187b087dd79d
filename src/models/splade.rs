//! Sparse lexical retrieval family (SPLADE-style).

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::models::PoolingStrategy;

/// Configuration for sparse retrieval models.
///
/// SPLADE scores over MLM logits with max pooling on both sides; the
/// defaults reflect that and registered checkpoints rarely override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpladeConfig {
    /// Maximum query length in tokens.
    pub query_length: usize,
    /// Maximum document length in tokens.
    pub doc_length: usize,
    /// Pooling applied to query term logits.
    pub query_pooling_strategy: PoolingStrategy,
    /// Pooling applied to document term logits.
    pub doc_pooling_strategy: PoolingStrategy,
}

impl Default for SpladeConfig {
    fn default() -> Self {
        Self {
            query_length: 32,
            doc_length: 512,
            query_pooling_strategy: PoolingStrategy::Max,
            doc_pooling_strategy: PoolingStrategy::Max,
        }
    }
}

/// A loaded sparse retrieval model.
#[derive(Debug, Clone)]
pub struct SpladeModel {
    /// Family configuration.
    pub config: SpladeConfig,
    /// Input token embedding table, `[vocab, hidden]`.
    pub embeddings: Array2<f32>,
}

impl SpladeModel {
    /// Create a model from its embedding table.
    pub fn new(config: SpladeConfig, embeddings: Array2<f32>) -> Self {
        Self { config, embeddings }
    }
}
