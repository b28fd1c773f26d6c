use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Each part succeeds or fails on its own; the run keeps going.
    #[default]
    PerPart,
    /// The first failing part stops the whole run.
    AbortOnFirstError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    pub failure_policy: FailurePolicy,
    pub skip_grace_notes: bool,
}
