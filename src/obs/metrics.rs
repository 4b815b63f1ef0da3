// self
use crate::{obs::OperationOutcome, resource::Operation};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(
	resource: &'static str,
	operation: Operation,
	outcome: OperationOutcome,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"appstoreconnect_provider_operation_total",
			"resource" => resource,
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (resource, operation, outcome);
	}
}
