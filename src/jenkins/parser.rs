use crate::app::Build;
use crate::jenkins::error::{FetchError, Result};

#[derive(serde::Deserialize)]
struct HistoryResponse {
    #[serde(rename = "appData")]
    app_data: AppData,
}

#[derive(serde::Deserialize)]
struct AppData {
    info: BuildInfo,
}

#[derive(serde::Deserialize)]
struct BuildInfo {
    builds: Vec<serde_json::Value>,
}

/// Extracts `appData.info.builds` from a history response body.
///
/// The envelope must be present. Records decode field by field, so a bad value
/// only blanks its own cell; a record that is not an object becomes an empty row.
pub fn parse_history(json: &str) -> Result<Vec<Build>> {
    let resp: HistoryResponse = serde_json::from_str(json)
        .map_err(|e| FetchError::MalformedResponse(format!("expected appData.info.builds: {e}")))?;
    Ok(resp
        .app_data
        .info
        .builds
        .into_iter()
        .enumerate()
        .map(|(idx, value)| decode_build(idx, value))
        .collect())
}

fn decode_build(idx: usize, value: serde_json::Value) -> Build {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("build record {idx} could not be decoded: {e}");
        Build::default()
    })
}
