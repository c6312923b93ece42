use serde::Deserialize;

/// JSON value behind a `composerData:<composer>` row. The IDE stores much
/// more; only the creation time matters here. `createdAt` is a millisecond
/// epoch and may arrive as a float.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ComposerData {
    #[serde(default)]
    pub created_at: Option<f64>,
}
