pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures reported to the caller. Provider failures never appear here; they degrade to
/// fallbacks inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not configured: {message}")]
	NotConfigured { message: String },
}
