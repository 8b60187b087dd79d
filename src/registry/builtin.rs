//! Builtin checkpoint entries.
//!
//! Hand-maintained literal table of known public checkpoints, each entry
//! matching that checkpoint's published training setup. There is no dynamic
//! discovery; adding a checkpoint means adding a literal here.

use crate::models::{
    ColConfig, DprConfig, MaskScoringTokens, MonoConfig, PoolingStrategy, Projection,
    ScoringStrategy, SpladeConfig, MONO_T5_PATTERN, RANK_T5_PATTERN,
};
use crate::registry::{CheckpointConfig, CheckpointRegistry};
use crate::surgery::PostLoadCallback;

/// Populate the registry with the builtin entries.
///
/// Idempotent: every entry is an insert of the same literal value, so
/// registering twice yields identical tables.
pub(crate) fn register(registry: &mut CheckpointRegistry) {
    register_configs(registry);
    register_key_mappings(registry);
    register_callbacks(registry);
}

fn register_configs(registry: &mut CheckpointRegistry) {
    // Multi-vector retrieval
    registry.insert_config(
        "colbert-ir/colbertv2.0",
        CheckpointConfig::Col(
            ColConfig::default()
                .query_length(32)
                .doc_length(184)
                .add_marker_tokens()
                .normalize()
                .query_expansion()
                .doc_mask_scoring_tokens(MaskScoringTokens::Punctuation),
        ),
    );
    registry.insert_config(
        "lightonai/GTE-ModernColBERT-v1",
        CheckpointConfig::Col(
            ColConfig::default()
                .query_length(32)
                .doc_length(296)
                .add_marker_tokens()
                .normalize()
                .query_expansion()
                .projection(Some(Projection::LinearNoBias))
                .doc_mask_scoring_tokens(MaskScoringTokens::Punctuation),
        ),
    );

    // Sparse retrieval
    registry.insert_config(
        "naver/splade-v3",
        CheckpointConfig::Splade(SpladeConfig::default()),
    );

    // Dense retrieval
    for id in [
        "sentence-transformers/msmarco-bert-base-dot-v5",
        "sentence-transformers/msmarco-distilbert-dot-v5",
        "sentence-transformers/msmarco-MiniLM-L-6-v3",
    ] {
        registry.insert_config(
            id,
            CheckpointConfig::Dpr(
                DprConfig::default()
                    .projection(None)
                    .query_pooling_strategy(PoolingStrategy::Mean)
                    .doc_pooling_strategy(PoolingStrategy::Mean),
            ),
        );
    }

    // Cross-encoder re-ranking
    for id in [
        "castorini/monot5-base-msmarco-10k",
        "castorini/monot5-base-msmarco",
        "castorini/monot5-large-msmarco-10k",
        "castorini/monot5-large-msmarco",
        "castorini/monot5-3b-msmarco-10k",
        "castorini/monot5-3b-msmarco",
    ] {
        registry.insert_config(
            id,
            CheckpointConfig::Mono(
                MonoConfig::default()
                    .scoring_strategy(ScoringStrategy::Mono)
                    .tokenizer_pattern(MONO_T5_PATTERN),
            ),
        );
    }
    for id in [
        "Soyoung97/RankT5-base",
        "Soyoung97/RankT5-large",
        "Soyoung97/RankT5-3b",
    ] {
        registry.insert_config(
            id,
            CheckpointConfig::Mono(
                MonoConfig::default()
                    .scoring_strategy(ScoringStrategy::Rank)
                    .tokenizer_pattern(RANK_T5_PATTERN),
            ),
        );
    }
    for id in [
        "castorini/monobert-large-msmarco-finetune-only",
        "castorini/monobert-large-msmarco",
    ] {
        registry.insert_config(
            id,
            CheckpointConfig::Mono(
                MonoConfig::default()
                    .scoring_strategy(ScoringStrategy::Mono)
                    .linear_bias()
                    .pooling_strategy(PoolingStrategy::BertPool),
            ),
        );
    }
}

fn register_key_mappings(registry: &mut CheckpointRegistry) {
    registry.insert_key_mapping(
        "colbert-ir/colbertv2.0",
        &[("linear.weight", "bert.projection.weight")],
    );

    const MONOBERT_MAPPING: &[(&str, &str)] = &[
        ("classifier.weight", "bert.linear.weight"),
        ("classifier.bias", "bert.linear.bias"),
        ("bert.pooler.dense.weight", "bert.bert_pool.0.weight"),
        ("bert.pooler.dense.bias", "bert.bert_pool.0.bias"),
    ];
    registry.insert_key_mapping(
        "castorini/monobert-large-msmarco-finetune-only",
        MONOBERT_MAPPING,
    );
    registry.insert_key_mapping("castorini/monobert-large-msmarco", MONOBERT_MAPPING);
}

fn register_callbacks(registry: &mut CheckpointRegistry) {
    registry.insert_callback(
        "colbert-ir/colbertv2.0",
        PostLoadCallback::ColbertMarkerTokens,
    );
    registry.insert_callback(
        "lightonai/GTE-ModernColBERT-v1",
        PostLoadCallback::ModernColbertMarkerTokens,
    );

    for id in [
        "castorini/monot5-base-msmarco-10k",
        "castorini/monot5-base-msmarco",
        "castorini/monot5-large-msmarco-10k",
        "castorini/monot5-large-msmarco",
        "castorini/monot5-3b-msmarco-10k",
        "castorini/monot5-3b-msmarco",
    ] {
        registry.insert_callback(id, PostLoadCallback::MonoT5LinearHead);
    }
    for id in [
        "Soyoung97/RankT5-base",
        "Soyoung97/RankT5-large",
        "Soyoung97/RankT5-3b",
    ] {
        registry.insert_callback(id, PostLoadCallback::RankT5LinearHead);
    }
}
