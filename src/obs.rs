//! Optional observability helpers for resource operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `appstoreconnect_provider.operation` with the
//!   `resource` (type name) and `operation` fields.
//! - Enable `metrics` to increment the `appstoreconnect_provider_operation_total` counter for every
//!   attempt/success/failure, labeled by `resource` + `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a controller operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps a finished operation's result onto [`Success`](Self::Success) or
	/// [`Failure`](Self::Failure).
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => OperationOutcome::Success,
			Err(_) => OperationOutcome::Failure,
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
