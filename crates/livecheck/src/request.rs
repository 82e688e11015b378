use std::fmt;

/// Instruction sent with every check request.
pub const DEFAULT_CONDITION: &str = "Analyze this sports match and predict win probabilities. \
1) Identify teams by their jersey colors/uniforms. \
2) Observe the current score and player performance (momentum, energy level, skill display). \
3) Predict which team has a higher probability of winning. \
Unless there is absolutely no game footage in the stream, provide your probability prediction - \
use your best judgment and reasoning to estimate win rates even with limited information. \
Be specific about which team (identified by color) you predict will win.";

/// Bearer token for the analysis service.
///
/// Held in memory only. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// JSON body of `POST /api/check-once`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CheckRequest {
    pub condition: String,
    pub stream_url: String,
    pub include_frame: bool,
}

impl CheckRequest {
    /// Builds a request for `stream_url`; frames are always included.
    pub fn new(condition: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            stream_url: stream_url.into(),
            include_frame: true,
        }
    }
}

/// Typed view of a successful check response.
///
/// Every field is optional; unknown keys are kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CheckReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
