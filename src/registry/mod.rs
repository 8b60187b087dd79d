//! Checkpoint registry for pretrained IR model lookups.
//!
//! The registry maps hosted checkpoint identifiers to three independent
//! tables:
//! 1. Configuration overrides: per-family hyperparameters of the published
//!    training setup
//! 2. State-dict key mappings: ordered renames applied when loading raw
//!    checkpoint tensors
//! 3. Post-load callbacks: weight patches applied after loading
//!
//! An identifier may appear in any subset of the tables; absence means "use
//! defaults / no remap / no callback". The tables are populated once at
//! construction from a hand-maintained literal list and are read-only
//! afterward.
//!
//! # Example
//! ```
//! use ir_registry::{CheckpointRegistry, ScoringStrategy};
//!
//! let registry = CheckpointRegistry::new();
//!
//! let config = registry.config("castorini/monot5-base-msmarco").unwrap();
//! let mono = config.as_mono().unwrap();
//! assert_eq!(mono.scoring_strategy, ScoringStrategy::Mono);
//!
//! // Never-registered identifiers are absent from all three tables.
//! assert!(registry.config("unknown/model").is_none());
//! assert!(registry.key_mapping("unknown/model").is_none());
//! assert!(registry.callback("unknown/model").is_none());
//! ```

mod builtin;

use std::collections::HashMap;

use crate::error::Result;
use crate::hub::HubClient;
use crate::models::{ColConfig, DprConfig, IrModel, MonoConfig, SpladeConfig};
use crate::surgery::PostLoadCallback;

/// Configuration override for a registered checkpoint, tagged by family.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckpointConfig {
    /// Multi-vector retrieval configuration.
    Col(ColConfig),
    /// Dense retrieval configuration.
    Dpr(DprConfig),
    /// Sparse retrieval configuration.
    Splade(SpladeConfig),
    /// Cross-encoder re-ranking configuration.
    Mono(MonoConfig),
}

impl CheckpointConfig {
    /// Family name of this configuration.
    pub fn family(&self) -> &'static str {
        match self {
            CheckpointConfig::Col(_) => "col",
            CheckpointConfig::Dpr(_) => "dpr",
            CheckpointConfig::Splade(_) => "splade",
            CheckpointConfig::Mono(_) => "mono",
        }
    }

    /// Multi-vector configuration, if this is one.
    pub fn as_col(&self) -> Option<&ColConfig> {
        match self {
            CheckpointConfig::Col(config) => Some(config),
            _ => None,
        }
    }

    /// Dense configuration, if this is one.
    pub fn as_dpr(&self) -> Option<&DprConfig> {
        match self {
            CheckpointConfig::Dpr(config) => Some(config),
            _ => None,
        }
    }

    /// Sparse configuration, if this is one.
    pub fn as_splade(&self) -> Option<&SpladeConfig> {
        match self {
            CheckpointConfig::Splade(config) => Some(config),
            _ => None,
        }
    }

    /// Cross-encoder configuration, if this is one.
    pub fn as_mono(&self) -> Option<&MonoConfig> {
        match self {
            CheckpointConfig::Mono(config) => Some(config),
            _ => None,
        }
    }
}

/// Ordered (source key, destination key) rename pairs for one checkpoint.
pub type KeyMapping = Vec<(String, String)>;

/// Registry of known pretrained checkpoints.
pub struct CheckpointRegistry {
    /// Checkpoint id -> configuration override
    configs: HashMap<String, CheckpointConfig>,

    /// Checkpoint id -> state-dict key renames
    key_mappings: HashMap<String, KeyMapping>,

    /// Checkpoint id -> post-load weight patch
    callbacks: HashMap<String, PostLoadCallback>,
}

impl Default for CheckpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckpointRegistry {
    /// Create a registry populated with the builtin checkpoint entries.
    pub fn new() -> Self {
        let mut registry = Self {
            configs: HashMap::new(),
            key_mappings: HashMap::new(),
            callbacks: HashMap::new(),
        };

        builtin::register(&mut registry);
        registry
    }

    /// Configuration override for a checkpoint, if registered.
    pub fn config(&self, checkpoint: &str) -> Option<&CheckpointConfig> {
        self.configs.get(checkpoint)
    }

    /// State-dict key renames for a checkpoint, if registered.
    pub fn key_mapping(&self, checkpoint: &str) -> Option<&[(String, String)]> {
        self.key_mappings.get(checkpoint).map(Vec::as_slice)
    }

    /// Post-load weight patch for a checkpoint, if registered.
    pub fn callback(&self, checkpoint: &str) -> Option<PostLoadCallback> {
        self.callbacks.get(checkpoint).copied()
    }

    /// Check if a checkpoint appears in any of the three tables.
    pub fn contains(&self, checkpoint: &str) -> bool {
        self.configs.contains_key(checkpoint)
            || self.key_mappings.contains_key(checkpoint)
            || self.callbacks.contains_key(checkpoint)
    }

    /// All checkpoint identifiers with a configuration override.
    pub fn ids(&self) -> Vec<&str> {
        self.configs.keys().map(String::as_str).collect()
    }

    /// Number of checkpoints with a configuration override.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Check if the configuration table is empty.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Apply the registered key renames to a loaded state dict, in place.
    ///
    /// Renames are applied in registration order; identifiers with no
    /// registered mapping leave the state dict untouched.
    pub fn remap_state_dict<T>(&self, checkpoint: &str, state_dict: &mut HashMap<String, T>) {
        let Some(mapping) = self.key_mappings.get(checkpoint) else {
            return;
        };
        for (source, destination) in mapping {
            if let Some(tensor) = state_dict.remove(source) {
                state_dict.insert(destination.clone(), tensor);
            }
        }
    }

    /// Apply the registered post-load patch to a freshly loaded model.
    ///
    /// A no-op for identifiers with no registered callback.
    pub fn post_load(&self, checkpoint: &str, model: &mut IrModel, hub: &HubClient) -> Result<()> {
        match self.callback(checkpoint) {
            Some(callback) => callback.apply(model, hub),
            None => Ok(()),
        }
    }

    pub(crate) fn insert_config(&mut self, checkpoint: &str, config: CheckpointConfig) {
        self.configs.insert(checkpoint.to_string(), config);
    }

    pub(crate) fn insert_key_mapping(&mut self, checkpoint: &str, mapping: &[(&str, &str)]) {
        self.key_mappings.insert(
            checkpoint.to_string(),
            mapping
                .iter()
                .map(|(source, destination)| (source.to_string(), destination.to_string()))
                .collect(),
        );
    }

    pub(crate) fn insert_callback(&mut self, checkpoint: &str, callback: PostLoadCallback) {
        self.callbacks.insert(checkpoint.to_string(), callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaskScoringTokens, PoolingStrategy, Projection, ScoringStrategy};
    use crate::models::{MONO_T5_PATTERN, RANK_T5_PATTERN};

    #[test]
    fn test_registry_creation() {
        let registry = CheckpointRegistry::new();
        assert_eq!(registry.len(), 16);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_colbertv2_config() {
        let registry = CheckpointRegistry::new();
        let config = registry.config("colbert-ir/colbertv2.0").unwrap();
        let col = config.as_col().expect("colbertv2 is a col checkpoint");

        assert_eq!(col.query_length, 32);
        assert_eq!(col.doc_length, 184);
        assert!(col.add_marker_tokens);
        assert!(col.normalize);
        assert!(col.query_expansion);
        assert_eq!(
            col.doc_mask_scoring_tokens,
            Some(MaskScoringTokens::Punctuation)
        );
        // Projection stays at the family default.
        assert_eq!(col.projection, Some(Projection::Linear));
    }

    #[test]
    fn test_modern_colbert_config() {
        let registry = CheckpointRegistry::new();
        let col = registry
            .config("lightonai/GTE-ModernColBERT-v1")
            .and_then(CheckpointConfig::as_col)
            .unwrap();

        assert_eq!(col.doc_length, 296);
        assert_eq!(col.projection, Some(Projection::LinearNoBias));
    }

    #[test]
    fn test_splade_defaults() {
        let registry = CheckpointRegistry::new();
        let config = registry.config("naver/splade-v3").unwrap();
        let splade = config.as_splade().expect("splade-v3 is a sparse checkpoint");

        assert_eq!(*splade, crate::models::SpladeConfig::default());
    }

    #[test]
    fn test_dpr_entries() {
        let registry = CheckpointRegistry::new();
        for id in [
            "sentence-transformers/msmarco-bert-base-dot-v5",
            "sentence-transformers/msmarco-distilbert-dot-v5",
            "sentence-transformers/msmarco-MiniLM-L-6-v3",
        ] {
            let dpr = registry
                .config(id)
                .and_then(CheckpointConfig::as_dpr)
                .unwrap_or_else(|| panic!("{id} should be a dense checkpoint"));
            assert_eq!(dpr.projection, None);
            assert_eq!(dpr.query_pooling_strategy, PoolingStrategy::Mean);
            assert_eq!(dpr.doc_pooling_strategy, PoolingStrategy::Mean);
        }
    }

    #[test]
    fn test_monot5_config() {
        let registry = CheckpointRegistry::new();
        let mono = registry
            .config("castorini/monot5-base-msmarco")
            .and_then(CheckpointConfig::as_mono)
            .unwrap();

        assert_eq!(mono.scoring_strategy, ScoringStrategy::Mono);
        assert_eq!(
            mono.tokenizer_pattern.as_deref(),
            Some("Query: {query} Document: {doc} Relevant:")
        );
        assert_eq!(mono.tokenizer_pattern.as_deref(), Some(MONO_T5_PATTERN));
    }

    #[test]
    fn test_rankt5_config() {
        let registry = CheckpointRegistry::new();
        let mono = registry
            .config("Soyoung97/RankT5-base")
            .and_then(CheckpointConfig::as_mono)
            .unwrap();

        assert_eq!(mono.scoring_strategy, ScoringStrategy::Rank);
        assert_eq!(mono.tokenizer_pattern.as_deref(), Some(RANK_T5_PATTERN));
    }

    #[test]
    fn test_monobert_config() {
        let registry = CheckpointRegistry::new();
        let mono = registry
            .config("castorini/monobert-large-msmarco")
            .and_then(CheckpointConfig::as_mono)
            .unwrap();

        assert_eq!(mono.scoring_strategy, ScoringStrategy::Mono);
        assert!(mono.linear_bias);
        assert_eq!(mono.pooling_strategy, PoolingStrategy::BertPool);
    }

    #[test]
    fn test_key_mappings() {
        let registry = CheckpointRegistry::new();

        let colbert = registry.key_mapping("colbert-ir/colbertv2.0").unwrap();
        assert_eq!(
            colbert,
            [("linear.weight".to_string(), "bert.projection.weight".to_string())]
        );

        let monobert = registry
            .key_mapping("castorini/monobert-large-msmarco")
            .unwrap();
        assert_eq!(monobert.len(), 4);
        assert_eq!(monobert[0].0, "classifier.weight");
        assert_eq!(monobert[0].1, "bert.linear.weight");
        assert_eq!(monobert[3].0, "bert.pooler.dense.bias");
        assert_eq!(monobert[3].1, "bert.bert_pool.0.bias");
    }

    #[test]
    fn test_callback_entries() {
        let registry = CheckpointRegistry::new();

        assert_eq!(
            registry.callback("colbert-ir/colbertv2.0"),
            Some(PostLoadCallback::ColbertMarkerTokens)
        );
        assert_eq!(
            registry.callback("lightonai/GTE-ModernColBERT-v1"),
            Some(PostLoadCallback::ModernColbertMarkerTokens)
        );
        for id in [
            "castorini/monot5-base-msmarco-10k",
            "castorini/monot5-base-msmarco",
            "castorini/monot5-large-msmarco-10k",
            "castorini/monot5-large-msmarco",
            "castorini/monot5-3b-msmarco-10k",
            "castorini/monot5-3b-msmarco",
        ] {
            assert_eq!(
                registry.callback(id),
                Some(PostLoadCallback::MonoT5LinearHead),
                "{id}"
            );
        }
        for id in [
            "Soyoung97/RankT5-base",
            "Soyoung97/RankT5-large",
            "Soyoung97/RankT5-3b",
        ] {
            assert_eq!(registry.callback(id), Some(PostLoadCallback::RankT5LinearHead), "{id}");
        }
        // DPR and SPLADE checkpoints load without patching.
        assert_eq!(registry.callback("naver/splade-v3"), None);
    }

    #[test]
    fn test_unknown_checkpoint_absent_everywhere() {
        let registry = CheckpointRegistry::new();

        assert!(registry.config("unknown/model").is_none());
        assert!(registry.key_mapping("unknown/model").is_none());
        assert!(registry.callback("unknown/model").is_none());
        assert!(!registry.contains("unknown/model"));
    }

    #[test]
    fn test_registration_idempotent() {
        let mut registry = CheckpointRegistry::new();
        let configs_before = registry.configs.clone();
        let key_mappings_before = registry.key_mappings.clone();
        let callbacks_before = registry.callbacks.clone();

        builtin::register(&mut registry);

        assert_eq!(registry.configs, configs_before);
        assert_eq!(registry.key_mappings, key_mappings_before);
        assert_eq!(registry.callbacks, callbacks_before);
    }

    #[test]
    fn test_remap_state_dict() {
        let registry = CheckpointRegistry::new();
        let mut state_dict: HashMap<String, u32> = HashMap::from([
            ("linear.weight".to_string(), 7),
            ("embeddings.weight".to_string(), 3),
        ]);

        registry.remap_state_dict("colbert-ir/colbertv2.0", &mut state_dict);

        assert_eq!(state_dict.get("bert.projection.weight"), Some(&7));
        assert!(!state_dict.contains_key("linear.weight"));
        // Unmapped keys pass through.
        assert_eq!(state_dict.get("embeddings.weight"), Some(&3));
    }

    #[test]
    fn test_remap_state_dict_unknown_checkpoint() {
        let registry = CheckpointRegistry::new();
        let mut state_dict: HashMap<String, u32> =
            HashMap::from([("linear.weight".to_string(), 7)]);

        registry.remap_state_dict("unknown/model", &mut state_dict);

        assert_eq!(state_dict.get("linear.weight"), Some(&7));
    }
}
