//! Live stream preview resolution and one-shot remote analysis.
//!
//! Two pieces do the work:
//!
//! - [`stream_ref::resolve`] turns a pasted video-platform URL into an
//!   embeddable preview reference.
//! - [`AnalysisController`] sends at most one analysis request at a time to
//!   the remote service and keeps the current outcome for display.
//!
//! # Usage
//!
//! ```no_run
//! use livecheck::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), CheckError> {
//! let controller = AnalysisController::builder(ServiceConfig::from_env()?).build()?;
//!
//! if let Some(preview) = preview_url("https://www.youtube.com/live/2q0JpKkhIYk") {
//!     println!("preview: {preview}");
//! }
//!
//! let submission = controller.submit(
//!     "https://www.youtube.com/live/2q0JpKkhIYk",
//!     &Credential::new("secret"),
//! )?;
//! let outcome = submission.wait().await;
//! println!("{}", controller.output());
//! let _ = outcome.into_result()?;
//! # Ok(())
//! # }
//! ```

/// Process-wide service settings.
pub mod config;
/// Single-flight request lifecycle controller.
pub mod controller;
/// Public error types.
pub mod errors;
/// Tracing subscriber setup.
pub mod observability;
/// Outcome variants and the output panel text.
pub mod outcome;
/// Common imports for typical usage.
pub mod prelude;
/// Request and response payloads for the check-once endpoint.
pub mod request;
/// Remote analysis service seam and its HTTP implementation.
pub mod service;
/// Stream URL normalization into embeddable references.
pub mod stream_ref;

pub use config::ServiceConfig;
pub use controller::{AbortHandle, AnalysisController, ControllerBuilder, Submission};
pub use errors::{CheckError, ServiceError};
pub use outcome::{AnalysisOutcome, OutputPanel};
pub use request::{CheckReport, CheckRequest, Credential, DEFAULT_CONDITION};
pub use service::{AnalysisService, HttpAnalysisService, ServiceResponse};
pub use stream_ref::{StreamKind, StreamReference, preview_url, resolve};
