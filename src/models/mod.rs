//! Model family configurations and minimal model structures.
//!
//! One module per architecture family:
//! - [`col`]: multi-vector late-interaction retrieval (ColBERT-style)
//! - [`dpr`]: dense single-vector retrieval
//! - [`splade`]: sparse lexical retrieval
//! - [`mono`]: cross-encoder re-ranking
//!
//! Each family declares an immutable config record with the family's literal
//! defaults and a model struct holding the tensors the post-load callbacks
//! operate on. Everything downstream of tokenization and scoring lives in the
//! consuming pipeline, not here.

mod col;
mod dpr;
mod mono;
mod splade;

pub use col::{ColConfig, ColModel};
pub use dpr::{DprConfig, DprModel};
pub use mono::{MonoConfig, MonoModel, MONO_T5_PATTERN, RANK_T5_PATTERN};
pub use splade::{SpladeConfig, SpladeModel};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Projection applied on top of the backbone's hidden states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Linear layer with bias.
    Linear,
    /// Linear layer without bias.
    LinearNoBias,
    /// Masked-language-model head.
    Mlm,
}

/// Pooling applied to per-token representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingStrategy {
    /// First token (CLS).
    First,
    /// Mean over tokens.
    Mean,
    /// Elementwise max over tokens.
    Max,
    /// Elementwise sum over tokens.
    Sum,
    /// BERT pooler (dense + tanh over the first token).
    BertPool,
}

/// Relevance scoring strategy for cross-encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Binary true/false token scoring (monoT5, monoBERT).
    Mono,
    /// Single-logit ranking score (RankT5).
    Rank,
}

/// Token classes masked out of multi-vector document scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskScoringTokens {
    /// Mask punctuation tokens.
    Punctuation,
}

/// Linear layer weights as loaded from a checkpoint.
///
/// Weight layout is `[out_features, in_features]`, matching safetensors
/// exports of `torch.nn.Linear`.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    /// Weight matrix.
    pub weight: Array2<f32>,
    /// Optional bias vector.
    pub bias: Option<Array1<f32>>,
}

impl Linear {
    /// Create a linear layer from raw tensors.
    pub fn new(weight: Array2<f32>, bias: Option<Array1<f32>>) -> Self {
        Self { weight, bias }
    }
}

/// A loaded model of any supported family.
///
/// Post-load callbacks dispatch over this enum; applying a callback to the
/// wrong family is a [`FamilyMismatch`](crate::CheckpointError::FamilyMismatch)
/// error rather than a panic.
#[derive(Debug, Clone)]
pub enum IrModel {
    /// Multi-vector retrieval model.
    Col(ColModel),
    /// Dense retrieval model.
    Dpr(DprModel),
    /// Sparse retrieval model.
    Splade(SpladeModel),
    /// Cross-encoder re-ranking model.
    Mono(MonoModel),
}

impl IrModel {
    /// Family name for diagnostics.
    pub fn family(&self) -> &'static str {
        match self {
            IrModel::Col(_) => "col",
            IrModel::Dpr(_) => "dpr",
            IrModel::Splade(_) => "splade",
            IrModel::Mono(_) => "mono",
        }
    }
}

/// Grow an embedding table to `new_size` rows, zero-filling new rows and
/// padding the row count up to a multiple of `pad_multiple`.
///
/// Existing rows are preserved. Returns the padded table; callers update
/// their vocabulary size to `new_size` (the padding rows are never addressed
/// as tokens).
pub(crate) fn grow_embedding_table(
    embeddings: &Array2<f32>,
    new_size: usize,
    pad_multiple: usize,
) -> Array2<f32> {
    let hidden = embeddings.ncols();
    let padded = new_size.div_ceil(pad_multiple) * pad_multiple;
    let mut grown = Array2::zeros((padded, hidden));
    grown
        .slice_mut(ndarray::s![..embeddings.nrows(), ..])
        .assign(embeddings);
    grown
}
