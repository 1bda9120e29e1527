use std::fmt::{Display, Formatter};

use tokio::time::error::Elapsed;

/// Outcome of an external call. A failure is a reason to fall back, never an error.
#[derive(Debug)]
pub enum Fetched<T> {
	Ok(T),
	Fallback(FallbackReason),
}
impl<T> Fetched<T> {
	/// Folds a timed provider call into an outcome.
	pub(crate) fn settle(outcome: Result<finder_providers::Result<T>, Elapsed>) -> Self {
		match outcome {
			Ok(Ok(value)) => Self::Ok(value),
			Ok(Err(err)) => Self::Fallback(FallbackReason::Provider(err.to_string())),
			Err(_) => Self::Fallback(FallbackReason::Timeout),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
	NotConfigured,
	Timeout,
	Provider(String),
	Empty,
}
impl Display for FallbackReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotConfigured => write!(f, "provider is not configured"),
			Self::Timeout => write!(f, "provider call timed out"),
			Self::Provider(message) => write!(f, "provider call failed: {message}"),
			Self::Empty => write!(f, "provider returned an empty result"),
		}
	}
}
