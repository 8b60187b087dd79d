//! Cross-encoder re-ranking family (monoT5, RankT5, monoBERT).

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::models::{Linear, PoolingStrategy, ScoringStrategy};

/// Prompt template for mono-style true/false scoring.
pub const MONO_T5_PATTERN: &str = "Query: {query} Document: {doc} Relevant:";

/// Prompt template for rank-style single-logit scoring.
pub const RANK_T5_PATTERN: &str = "Query: {query} Document: {doc}";

/// Configuration for cross-encoder re-ranking models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonoConfig {
    /// Maximum query length in tokens.
    pub query_length: usize,
    /// Maximum document length in tokens.
    pub doc_length: usize,
    /// How the relevance score is produced.
    pub scoring_strategy: ScoringStrategy,
    /// Template used to format a (query, document) pair into a scoring
    /// prompt. `None` for checkpoints whose tokenizer needs no template.
    pub tokenizer_pattern: Option<String>,
    /// Whether the scoring linear layer carries a bias.
    pub linear_bias: bool,
    /// Pooling over the encoder output before the scoring head.
    pub pooling_strategy: PoolingStrategy,
}

impl Default for MonoConfig {
    fn default() -> Self {
        Self {
            query_length: 32,
            doc_length: 512,
            scoring_strategy: ScoringStrategy::Mono,
            tokenizer_pattern: None,
            linear_bias: false,
            pooling_strategy: PoolingStrategy::First,
        }
    }
}

impl MonoConfig {
    /// Builder: set scoring strategy
    pub fn scoring_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.scoring_strategy = strategy;
        self
    }

    /// Builder: set tokenizer pattern
    pub fn tokenizer_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.tokenizer_pattern = Some(pattern.into());
        self
    }

    /// Builder: enable the scoring-layer bias
    pub fn linear_bias(mut self) -> Self {
        self.linear_bias = true;
        self
    }

    /// Builder: set pooling strategy
    pub fn pooling_strategy(mut self, strategy: PoolingStrategy) -> Self {
        self.pooling_strategy = strategy;
        self
    }
}

/// A loaded cross-encoder re-ranking model.
///
/// Holds the tensors the linear-head extractors operate on: the shared token
/// embedding matrix and the relevance-scoring head.
#[derive(Debug, Clone)]
pub struct MonoModel {
    /// Family configuration.
    pub config: MonoConfig,
    /// Shared token embedding matrix, `[vocab, hidden]`.
    pub shared: Array2<f32>,
    /// Relevance-scoring linear head. Constructed uninitialized by the
    /// architecture; checkpoints registered here fill it from `shared`.
    pub linear: Linear,
}

impl MonoModel {
    /// Create a model from its shared embedding matrix and scoring head.
    pub fn new(config: MonoConfig, shared: Array2<f32>, linear: Linear) -> Self {
        Self {
            config,
            shared,
            linear,
        }
    }
}
