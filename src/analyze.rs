//! Vibe-check upload boundary: multipart PDF upload to the analysis
//! endpoint, returning the ATS scoring report.
//!
//! This is a thin HTTP call, deliberately outside the export pipeline: the
//! endpoint owns the scoring, this side only ships bytes and decodes JSON.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Scoring report returned by the analysis endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsReport {
    pub ats_score: i32,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub fixes: Vec<String>,
}

/// Client for the resume analysis endpoint.
pub struct AtsClient {
    http: Client,
    endpoint: Url,
}

impl AtsClient {
    pub fn new(endpoint: &str, timeout_ms: u64) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::ConfigError(format!("invalid analysis endpoint: {}", e)))?;
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, endpoint })
    }

    /// Upload PDF bytes for scoring.
    ///
    /// The whole document goes up in one multipart request; uploads are
    /// neither resumable nor streamed.
    pub fn analyze_bytes(&self, filename: &str, bytes: Vec<u8>) -> Result<AtsReport> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| Error::UploadError(format!("{}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .map_err(|e| Error::UploadError(format!("{}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UploadError(format!("analysis endpoint returned {}", status)));
        }
        response
            .json::<AtsReport>()
            .map_err(|e| Error::UploadError(format!("malformed analysis response: {}", e)))
    }

    /// Upload a PDF file from disk for scoring.
    pub fn analyze_file(&self, path: &Path) -> Result<AtsReport> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Other(format!("failed to read {}: {}", path.display(), e)))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        self.analyze_bytes(&filename, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_uses_camel_case_wire_names() {
        let json = r#"{"atsScore": 82, "strengths": ["clear impact"], "gaps": [], "fixes": ["add metrics"]}"#;
        let report: AtsReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.ats_score, 82);
        assert_eq!(report.strengths, vec!["clear impact"]);
        assert_eq!(report.fixes.len(), 1);
    }

    #[test]
    fn missing_fields_default() {
        let report: AtsReport = serde_json::from_str(r#"{"atsScore": 40}"#).unwrap();
        assert_eq!(report.ats_score, 40);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn bad_endpoint_is_a_config_error() {
        assert!(matches!(AtsClient::new("not a url", 1000), Err(Error::ConfigError(_))));
    }
}
