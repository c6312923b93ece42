use serde::Deserialize;

/// One transcript line. Only the record kinds that mark a human/assistant
/// exchange matter here; every other kind (summaries, snapshots, progress
/// markers, kinds added by future tool versions) folds into `Unknown` and
/// is ignored rather than rejected.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ClaudeRecord {
    User(ExchangeRecord),
    Assistant(ExchangeRecord),
    #[serde(other)]
    Unknown,
}

/// The exact field subset this pipeline trusts from an exchange line.
/// Everything else in the record is tool-version-specific noise. All fields
/// are optional so drifted records still classify as exchanges.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExchangeRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    /// Subagent branches carry their parent's session and are not
    /// independent sessions.
    #[serde(default)]
    pub is_sidechain: bool,
}
