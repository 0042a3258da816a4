pub mod settings;
pub mod types;
pub mod verdict;

pub use settings::Settings;
pub use types::{EvaluationRequest, RiskTier, SuppressionPolicy, TabId, TriggerKind};
pub use verdict::{SuspicionDetail, Verdict};
