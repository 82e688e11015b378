use crate::errors::CheckError;
use crate::request::CheckReport;

pub(crate) const CONNECTING_NOTICE: &str = "Connecting to API...\n";
pub(crate) const CANCELLED_NOTICE: &str = "\nConnection stopped.";

/// Result state of the most recent submission.
///
/// Exactly one outcome is current per controller. Each transition replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AnalysisOutcome {
    /// Nothing submitted yet.
    #[default]
    Empty,
    /// Request dispatched, no answer yet.
    Connecting,
    /// Service answered with a success status and a JSON body.
    Succeeded {
        /// `explanation` when present and non-empty, else the pretty body.
        display_text: String,
        body: serde_json::Value,
    },
    /// Service answered with a non-success status.
    HttpRejected { status_code: u16, body_text: String },
    /// Network failure or unreadable response.
    TransportFailed { message: String },
    /// Cancelled by the caller, superseded, or torn down.
    Cancelled,
    /// No base address configured; nothing was sent.
    Misconfigured { message: String },
}

impl AnalysisOutcome {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Connecting)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Empty | Self::Connecting)
    }

    /// Typed view of a success body. `None` for other outcomes or when the
    /// body does not fit [`CheckReport`].
    pub fn report(&self) -> Option<CheckReport> {
        match self {
            Self::Succeeded { body, .. } => serde_json::from_value(body.clone()).ok(),
            _ => None,
        }
    }

    /// Converts a terminal outcome into the display text or an error.
    pub fn into_result(self) -> Result<String, CheckError> {
        match self {
            Self::Succeeded { display_text, .. } => Ok(display_text),
            Self::HttpRejected {
                status_code,
                body_text,
            } => Err(CheckError::HttpRejected {
                status_code,
                body_text,
            }),
            Self::TransportFailed { message } => Err(CheckError::Transport(message)),
            Self::Cancelled => Err(CheckError::Cancelled),
            Self::Misconfigured { message } => Err(CheckError::Config(message)),
            Self::Empty | Self::Connecting => Err(CheckError::Transport(
                "check did not reach a terminal outcome".into(),
            )),
        }
    }

    /// Outcome for a success-status body.
    pub(crate) fn from_success_body(body: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                return Self::TransportFailed {
                    message: format!("invalid JSON response: {e}"),
                };
            }
        };
        let display_text = match value.get("explanation").and_then(|v| v.as_str()) {
            Some(explanation) if !explanation.is_empty() => explanation.to_string(),
            _ => pretty_json(&value),
        };
        Self::Succeeded {
            display_text,
            body: value,
        }
    }

    /// Outcome for a non-success status. JSON bodies are pretty-printed,
    /// anything else is kept verbatim.
    pub(crate) fn from_rejection(status_code: u16, body: &str) -> Self {
        let body_text = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => pretty_json(&value),
            Err(_) => body.to_string(),
        };
        Self::HttpRejected {
            status_code,
            body_text,
        }
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Text shown to the operator for the current submission.
///
/// Failures and cancellation append to what is already shown, so the
/// connecting notice survives. Results replace it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputPanel {
    text: String,
}

impl OutputPanel {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
    }

    /// Updates the text for a transition into `outcome`.
    pub(crate) fn apply(&mut self, outcome: &AnalysisOutcome) {
        match outcome {
            AnalysisOutcome::Empty => self.text.clear(),
            AnalysisOutcome::Connecting => self.text.push_str(CONNECTING_NOTICE),
            AnalysisOutcome::Succeeded { display_text, .. } => {
                self.text = display_text.clone();
            }
            AnalysisOutcome::HttpRejected {
                status_code,
                body_text,
            } => {
                self.text = format!("API Error: {status_code}\n{body_text}");
            }
            AnalysisOutcome::TransportFailed { message } => {
                self.text.push_str("\nError: ");
                self.text.push_str(message);
            }
            AnalysisOutcome::Cancelled => self.text.push_str(CANCELLED_NOTICE),
            AnalysisOutcome::Misconfigured { message } => {
                self.text = format!("Error: {message}");
            }
        }
    }
}
