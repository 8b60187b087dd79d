//! Multi-vector late-interaction retrieval family (ColBERT-style).

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::models::{grow_embedding_table, Linear, MaskScoringTokens, Projection};

/// Configuration for multi-vector retrieval models.
///
/// Defaults match the family's published training setup; registered
/// checkpoints override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColConfig {
    /// Maximum query length in tokens.
    pub query_length: usize,
    /// Maximum document length in tokens.
    pub doc_length: usize,
    /// Whether dedicated query/document marker tokens are prepended.
    pub add_marker_tokens: bool,
    /// Whether token embeddings are L2-normalized before scoring.
    pub normalize: bool,
    /// Whether queries are expanded with mask tokens to `query_length`.
    pub query_expansion: bool,
    /// Document tokens masked out of late-interaction scoring.
    pub doc_mask_scoring_tokens: Option<MaskScoringTokens>,
    /// Projection on top of the backbone hidden states (`None` = identity).
    pub projection: Option<Projection>,
}

impl Default for ColConfig {
    fn default() -> Self {
        Self {
            query_length: 32,
            doc_length: 512,
            add_marker_tokens: false,
            normalize: false,
            query_expansion: false,
            doc_mask_scoring_tokens: None,
            projection: Some(Projection::Linear),
        }
    }
}

impl ColConfig {
    /// Builder: set query length
    pub fn query_length(mut self, query_length: usize) -> Self {
        self.query_length = query_length;
        self
    }

    /// Builder: set document length
    pub fn doc_length(mut self, doc_length: usize) -> Self {
        self.doc_length = doc_length;
        self
    }

    /// Builder: enable marker tokens
    pub fn add_marker_tokens(mut self) -> Self {
        self.add_marker_tokens = true;
        self
    }

    /// Builder: enable embedding normalization
    pub fn normalize(mut self) -> Self {
        self.normalize = true;
        self
    }

    /// Builder: enable query expansion
    pub fn query_expansion(mut self) -> Self {
        self.query_expansion = true;
        self
    }

    /// Builder: set document mask scoring tokens
    pub fn doc_mask_scoring_tokens(mut self, tokens: MaskScoringTokens) -> Self {
        self.doc_mask_scoring_tokens = Some(tokens);
        self
    }

    /// Builder: set projection
    pub fn projection(mut self, projection: Option<Projection>) -> Self {
        self.projection = projection;
        self
    }
}

/// A loaded multi-vector retrieval model.
///
/// Holds the tensors the marker-token installers patch: the input embedding
/// table and the optional dense projection.
#[derive(Debug, Clone)]
pub struct ColModel {
    /// Family configuration.
    pub config: ColConfig,
    /// Backbone vocabulary size. Rows at and beyond this index are padding
    /// or freshly installed marker tokens.
    pub vocab_size: usize,
    /// Input token embedding table, `[vocab, hidden]`.
    pub embeddings: Array2<f32>,
    /// Dense projection layer, if the checkpoint carries one.
    pub projection: Option<Linear>,
}

impl ColModel {
    /// Create a model from its embedding table.
    pub fn new(config: ColConfig, embeddings: Array2<f32>) -> Self {
        let vocab_size = embeddings.nrows();
        Self {
            config,
            vocab_size,
            embeddings,
            projection: None,
        }
    }

    /// Resize the token embedding table to `new_size` rows, zero-filling new
    /// rows and padding the physical row count to a multiple of
    /// `pad_multiple` for hardware alignment.
    pub fn resize_token_embeddings(&mut self, new_size: usize, pad_multiple: usize) {
        self.embeddings = grow_embedding_table(&self.embeddings, new_size, pad_multiple);
        self.vocab_size = new_size;
    }
}
