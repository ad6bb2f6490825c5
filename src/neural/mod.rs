//! Neural timbre-transfer path
//!
//! This module provides:
//! - `InferenceModel` / `ModelLoader` traits implemented by the external runtime
//! - The forward-then-legacy calling-convention probe
//! - The offline resynthesis pipeline
//! - The demo model catalog
//! - Mock runtime for testing

mod mock;
mod model;
mod pipeline;
mod registry;
mod tensor;

pub use mock::{MockConvention, MockLoader, MockModel, MOCK_GAIN};
pub use model::{
    resynthesize, CallingConvention, InferenceError, InferenceModel, ModelLoader, ModelOutput,
    Resynthesis,
};
pub use pipeline::{NeuralPipeline, NeuralReport, OUTPUT_PEAK};
pub use registry::{
    discover_checkpoints, CatalogEntry, InstalledModel, ModelCatalog, CHECKPOINT_EXTENSION,
};
pub use tensor::Tensor;
