//! # ir-registry - Pretrained IR Checkpoint Registry
//!
//! Maps named pretrained information-retrieval checkpoints to the pieces a
//! model loader needs to reconstruct them faithfully:
//!
//! - **Configuration overrides**: per-family hyperparameters matching each
//!   checkpoint's published training setup
//! - **State-dict key mappings**: renames between a checkpoint's saved
//!   parameter names and the target module hierarchy
//! - **Post-load callbacks**: weight patches (marker-token embeddings,
//!   scoring heads sliced from shared embeddings) applied after loading
//!
//! ## Model Families
//!
//! | Family   | Architecture                       | Example checkpoint              |
//! |----------|------------------------------------|---------------------------------|
//! | `col`    | Multi-vector late interaction      | `colbert-ir/colbertv2.0`        |
//! | `dpr`    | Dense single-vector bi-encoder     | `sentence-transformers/msmarco-bert-base-dot-v5` |
//! | `splade` | Sparse lexical                     | `naver/splade-v3`               |
//! | `mono`   | Cross-encoder re-ranking           | `castorini/monot5-base-msmarco` |
//!
//! ## Quick Start
//!
//! ```
//! use ir_registry::{CheckpointRegistry, ScoringStrategy};
//!
//! let registry = CheckpointRegistry::new();
//!
//! // Configuration override for a registered checkpoint
//! let config = registry.config("castorini/monot5-base-msmarco").unwrap();
//! let mono = config.as_mono().unwrap();
//! assert_eq!(mono.scoring_strategy, ScoringStrategy::Mono);
//! assert_eq!(
//!     mono.tokenizer_pattern.as_deref(),
//!     Some("Query: {query} Document: {doc} Relevant:")
//! );
//!
//! // Unregistered checkpoints fall back to defaults everywhere
//! assert!(registry.config("some/other-model").is_none());
//! ```
//!
//! Applying a post-load patch:
//!
//! ```rust,ignore
//! use ir_registry::{CheckpointRegistry, HubClient, IrModel};
//!
//! let registry = CheckpointRegistry::new();
//! let hub = HubClient::from_env();
//!
//! let mut model = IrModel::Col(load_colbert()?);
//! registry.post_load("colbert-ir/colbertv2.0", &mut model, &hub)?;
//! ```
//!
//! ## Modules
//!
//! - [`registry`]: checkpoint identifier lookups over the three tables
//! - [`models`]: per-family configuration and model structures
//! - [`surgery`]: post-load weight patching
//! - [`hub`]: cached download of hosted checkpoint files
//! - [`error`]: error types and result alias

pub mod error;
pub mod hub;
pub mod models;
pub mod registry;
pub mod surgery;

// Re-exports for convenience
pub use error::{CheckpointError, Result};
pub use hub::HubClient;
pub use models::{
    ColConfig, ColModel, DprConfig, DprModel, IrModel, Linear, MaskScoringTokens, MonoConfig,
    MonoModel, PoolingStrategy, Projection, ScoringStrategy, SpladeConfig, SpladeModel,
    MONO_T5_PATTERN, RANK_T5_PATTERN,
};
pub use registry::{CheckpointConfig, CheckpointRegistry, KeyMapping};
pub use surgery::PostLoadCallback;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
