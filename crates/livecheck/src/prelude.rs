//! Common imports for typical livecheck usage.
//!
//! Re-exports the controller, its configuration, and the resolver so callers
//! need fewer import lines.
pub use crate::{
    AnalysisController, AnalysisOutcome, CheckError, Credential, ServiceConfig, StreamKind,
    StreamReference, Submission, preview_url, resolve,
};
