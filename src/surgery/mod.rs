//! Post-load weight patching for registered checkpoints.
//!
//! Some published checkpoints cannot be loaded by key renaming alone: their
//! released weights are missing tensors the target architecture expects.
//! The callbacks here rebuild those tensors after the checkpoint is loaded:
//!
//! - **Marker-token installers** grow the input embedding table by two rows
//!   (query marker, document marker) and initialize them by copying fixed
//!   placeholder rows rather than random initialization.
//! - **Linear-head extractors** fill a cross-encoder's scoring head by
//!   slicing rows out of the shared token embedding matrix at fixed,
//!   architecture-specific token indices.
//!
//! The placeholder indices are checkpoint-specific literals tied to concrete
//! tokenizer vocabularies. They are documented constants, deliberately not
//! generalized.

use ndarray::{Array2, Axis};
use safetensors::SafeTensors;

use crate::error::{CheckpointError, Result};
use crate::hub::HubClient;
use crate::models::{ColModel, IrModel, Linear, MonoModel};

/// BERT `[unused0]` row copied into the query marker embedding.
pub const COLBERT_QUERY_MARKER_SOURCE: usize = 1;
/// BERT `[unused1]` row copied into the document marker embedding.
pub const COLBERT_DOC_MARKER_SOURCE: usize = 2;

/// ModernBERT `[unused0]` row copied into the query marker embedding.
pub const MODERN_COLBERT_QUERY_MARKER_SOURCE: usize = 50368;
/// ModernBERT `[unused1]` row copied into the document marker embedding.
pub const MODERN_COLBERT_DOC_MARKER_SOURCE: usize = 50369;

/// Repository hosting the ModernColBERT dense projection weights.
pub const MODERN_COLBERT_REPO: &str = "lightonai/GTE-ModernColBERT-v1";
/// Projection weight file within [`MODERN_COLBERT_REPO`].
pub const MODERN_COLBERT_PROJECTION_FILE: &str = "1_Dense/model.safetensors";

/// T5 token id for "false"; first row of the monoT5 scoring head.
pub const MONO_T5_FALSE_TOKEN: usize = 6136;
/// T5 token id for "true"; second row of the monoT5 scoring head.
pub const MONO_T5_TRUE_TOKEN: usize = 1176;
/// T5 token id for `<extra_id_10>`; sole row of the RankT5 scoring head.
pub const RANK_T5_SCORE_TOKEN: usize = 32089;

/// Embedding tables are padded to a multiple of 8 rows for hardware alignment.
const EMBEDDING_PAD_MULTIPLE: usize = 8;

/// Weight patch applied to a model after its checkpoint is loaded.
///
/// A closed set of named transformations dispatched explicitly, so every
/// registered behavior is enumerable and unit-testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostLoadCallback {
    /// Install BERT-family query/document marker token embeddings.
    ColbertMarkerTokens,
    /// Install ModernBERT-family marker token embeddings and load the
    /// separately hosted dense projection.
    ModernColbertMarkerTokens,
    /// Fill the scoring head from the true/false token embeddings.
    MonoT5LinearHead,
    /// Fill the scoring head from the `<extra_id_10>` token embedding.
    RankT5LinearHead,
}

impl PostLoadCallback {
    /// Apply this patch to a freshly loaded model, in place.
    ///
    /// Invoked once per model load, after weights are loaded and before the
    /// model is returned to the caller. Applying a patch to a model of the
    /// wrong family is an error.
    pub fn apply(self, model: &mut IrModel, hub: &HubClient) -> Result<()> {
        match (self, model) {
            (PostLoadCallback::ColbertMarkerTokens, IrModel::Col(col)) => install_marker_tokens(
                col,
                COLBERT_QUERY_MARKER_SOURCE,
                COLBERT_DOC_MARKER_SOURCE,
            ),
            (PostLoadCallback::ModernColbertMarkerTokens, IrModel::Col(col)) => {
                install_marker_tokens(
                    col,
                    MODERN_COLBERT_QUERY_MARKER_SOURCE,
                    MODERN_COLBERT_DOC_MARKER_SOURCE,
                )?;
                load_modern_colbert_projection(col, hub)
            }
            (PostLoadCallback::MonoT5LinearHead, IrModel::Mono(mono)) => {
                extract_linear_head(mono, &[MONO_T5_FALSE_TOKEN, MONO_T5_TRUE_TOKEN])
            }
            (PostLoadCallback::RankT5LinearHead, IrModel::Mono(mono)) => {
                extract_linear_head(mono, &[RANK_T5_SCORE_TOKEN])
            }
            (callback, model) => Err(CheckpointError::FamilyMismatch {
                expected: callback.expected_family(),
                got: model.family(),
            }),
        }
    }

    /// Model family this patch operates on.
    pub fn expected_family(self) -> &'static str {
        match self {
            PostLoadCallback::ColbertMarkerTokens
            | PostLoadCallback::ModernColbertMarkerTokens => "col",
            PostLoadCallback::MonoT5LinearHead | PostLoadCallback::RankT5LinearHead => "mono",
        }
    }
}

/// Extend the embedding table by two marker rows copied from fixed
/// placeholder indices.
///
/// Row `vocab_size` becomes the query marker (copy of `query_source`), row
/// `vocab_size + 1` the document marker (copy of `doc_source`). The table is
/// padded to a multiple of 8 rows.
pub fn install_marker_tokens(
    model: &mut ColModel,
    query_source: usize,
    doc_source: usize,
) -> Result<()> {
    let vocab_size = model.vocab_size;
    for index in [query_source, doc_source] {
        if index >= vocab_size {
            return Err(CheckpointError::IndexOutOfRange { index, vocab_size });
        }
    }

    let query_token_id = vocab_size;
    let doc_token_id = vocab_size + 1;
    model.resize_token_embeddings(vocab_size + 2, EMBEDDING_PAD_MULTIPLE);

    let query_row = model.embeddings.row(query_source).to_owned();
    let doc_row = model.embeddings.row(doc_source).to_owned();
    model.embeddings.row_mut(query_token_id).assign(&query_row);
    model.embeddings.row_mut(doc_token_id).assign(&doc_row);

    Ok(())
}

/// Overwrite the scoring head's weight with the shared embedding rows at
/// `token_ids`, in order.
pub fn extract_linear_head(model: &mut MonoModel, token_ids: &[usize]) -> Result<()> {
    let vocab_size = model.shared.nrows();
    for &index in token_ids {
        if index >= vocab_size {
            return Err(CheckpointError::IndexOutOfRange { index, vocab_size });
        }
    }

    tracing::warn!(
        "The preceding warning that the linear layer is not initialized is expected and can be \
         ignored. The weights are initialized here from the shared embedding matrix."
    );

    model.linear.weight = model.shared.select(Axis(0), token_ids);
    Ok(())
}

/// Download the ModernColBERT dense projection and install it, renaming its
/// single `linear.weight` key.
fn load_modern_colbert_projection(model: &mut ColModel, hub: &HubClient) -> Result<()> {
    let path = hub.download(MODERN_COLBERT_REPO, MODERN_COLBERT_PROJECTION_FILE)?;
    let data = crate::hub::read_file(&path)?;

    let tensors = SafeTensors::deserialize(&data)
        .map_err(|e| CheckpointError::ModelLoad(format!("Failed to parse safetensors: {e}")))?;

    // The hosted file stores the projection under "linear.weight".
    let weight = load_tensor_2d(&tensors, "linear.weight")?;
    model.projection = Some(Linear::new(weight, None));

    Ok(())
}

fn load_tensor_2d(tensors: &SafeTensors, name: &str) -> Result<Array2<f32>> {
    let view = tensors
        .tensor(name)
        .map_err(|e| CheckpointError::ModelLoad(format!("Tensor '{name}' not found: {e}")))?;

    let shape = view.shape().to_vec();
    if shape.len() != 2 {
        return Err(CheckpointError::ModelLoad(format!(
            "Expected 2D tensor for '{name}', got {shape:?}"
        )));
    }

    let data: Vec<f32> = view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Array2::from_shape_vec((shape[0], shape[1]), data)
        .map_err(|e| CheckpointError::ModelLoad(format!("Shape mismatch for '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColConfig, MonoConfig};

    fn col_model(vocab: usize, hidden: usize) -> ColModel {
        let embeddings = Array2::from_shape_fn((vocab, hidden), |(i, j)| (i * hidden + j) as f32);
        ColModel::new(ColConfig::default(), embeddings)
    }

    fn mono_model(vocab: usize, hidden: usize) -> MonoModel {
        let shared = Array2::from_shape_fn((vocab, hidden), |(i, j)| (i * hidden + j) as f32);
        let linear = Linear::new(Array2::zeros((2, hidden)), None);
        MonoModel::new(MonoConfig::default(), shared, linear)
    }

    #[test]
    fn test_install_marker_tokens() {
        let mut model = col_model(10, 4);
        let unused0 = model.embeddings.row(1).to_owned();
        let unused1 = model.embeddings.row(2).to_owned();

        install_marker_tokens(&mut model, 1, 2).unwrap();

        assert_eq!(model.vocab_size, 12);
        assert_eq!(model.embeddings.nrows(), 16); // padded to a multiple of 8
        assert_eq!(model.embeddings.row(10), unused0.view());
        assert_eq!(model.embeddings.row(11), unused1.view());
    }

    #[test]
    fn test_install_marker_tokens_source_out_of_range() {
        let mut model = col_model(10, 4);
        let err = install_marker_tokens(&mut model, 1, 50368).unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::IndexOutOfRange {
                index: 50368,
                vocab_size: 10
            }
        ));
        // Precondition failure leaves the table untouched.
        assert_eq!(model.vocab_size, 10);
        assert_eq!(model.embeddings.nrows(), 10);
    }

    #[test]
    fn test_extract_mono_head_row_order() {
        let mut model = mono_model(7000, 3);
        extract_linear_head(&mut model, &[MONO_T5_FALSE_TOKEN, MONO_T5_TRUE_TOKEN]).unwrap();

        assert_eq!(model.linear.weight.nrows(), 2);
        // Row 0 is "false" (6136), row 1 is "true" (1176).
        assert_eq!(
            model.linear.weight.row(0),
            model.shared.row(MONO_T5_FALSE_TOKEN)
        );
        assert_eq!(
            model.linear.weight.row(1),
            model.shared.row(MONO_T5_TRUE_TOKEN)
        );
    }

    #[test]
    fn test_extract_rank_head() {
        let mut model = mono_model(32100, 3);
        extract_linear_head(&mut model, &[RANK_T5_SCORE_TOKEN]).unwrap();

        assert_eq!(model.linear.weight.nrows(), 1);
        assert_eq!(
            model.linear.weight.row(0),
            model.shared.row(RANK_T5_SCORE_TOKEN)
        );
    }

    #[test]
    fn test_extract_head_out_of_range() {
        let mut model = mono_model(100, 3);
        let err = extract_linear_head(&mut model, &[RANK_T5_SCORE_TOKEN]).unwrap_err();
        assert!(matches!(err, CheckpointError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_apply_dispatches_colbert_markers() {
        let mut model = IrModel::Col(col_model(10, 4));
        let hub = HubClient::new();

        PostLoadCallback::ColbertMarkerTokens
            .apply(&mut model, &hub)
            .unwrap();

        let IrModel::Col(col) = model else {
            unreachable!()
        };
        assert_eq!(col.vocab_size, 12);
        assert_eq!(col.embeddings.row(10), col.embeddings.row(1));
        assert_eq!(col.embeddings.row(11), col.embeddings.row(2));
    }

    #[test]
    fn test_apply_rejects_wrong_family() {
        let mut model = IrModel::Mono(mono_model(100, 3));
        let hub = HubClient::new();

        let err = PostLoadCallback::ColbertMarkerTokens
            .apply(&mut model, &hub)
            .unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::FamilyMismatch {
                expected: "col",
                got: "mono"
            }
        ));
    }

    #[test]
    fn test_mono_head_hidden_dim_matches_shared() {
        let mut model = mono_model(7000, 5);
        extract_linear_head(&mut model, &[MONO_T5_FALSE_TOKEN, MONO_T5_TRUE_TOKEN]).unwrap();
        assert_eq!(model.linear.weight.ncols(), 5);
        assert_eq!(model.linear.bias, None);
    }
}
