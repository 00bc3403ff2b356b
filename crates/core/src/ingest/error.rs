use std::fmt;

/// A data source answered, but not with something we can use.
#[derive(Debug, Clone)]
pub struct SourceError {
    pub provider: &'static str,
    pub stage: &'static str,
    pub detail: String,
    pub body: Option<String>,
}

impl SourceError {
    pub fn http(provider: &'static str, status: reqwest::StatusCode, body: String) -> Self {
        Self {
            provider,
            stage: "http",
            detail: format!("status={status}"),
            body: Some(body),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data source error (provider={}, stage={}): {}",
            self.provider, self.stage, self.detail
        )
    }
}

impl std::error::Error for SourceError {}
