//! The ML half of the pipeline (spec section 4.6): a small feedforward net
//! trained on rule-verdict-labeled and synthetic data, run in shadow mode
//! alongside the deterministic rule detectors.

pub mod bundle;
pub mod model;
pub mod predictor;

pub use bundle::ModelBundle;
pub use model::{CheatNet, CheatNetConfig, InferenceBackend, TrainBackend};
pub use predictor::{MlSignal, Predictor, NO_MODEL_PROBABILITY};
