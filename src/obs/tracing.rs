//! Spans wrapping each controller operation.
//!
//! Every span is named `appstoreconnect_provider.operation` and carries the resource type
//! name, the lifecycle operation, and (once known) the remote identifier of the record.
//! Without the `tracing` feature the types are zero-sized and futures pass through as-is.

// self
use crate::{_prelude::*, resource::Operation};

/// Future returned by [`OperationSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; unchanged without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Span covering one `resource` × `operation` call.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens a span for `operation` on the `resource` type; `id` starts out empty.
	pub fn new(resource: &'static str, operation: Operation) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"appstoreconnect_provider.operation",
					resource,
					operation = operation.as_str(),
					id = tracing::field::Empty,
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (resource, operation);

			Self {}
		}
	}

	/// Records the remote identifier the operation addresses.
	pub fn with_id(self, id: Option<&str>) -> Self {
		#[cfg(feature = "tracing")]
		if let Some(id) = id {
			self.span.record("id", id);
		}
		#[cfg(not(feature = "tracing"))]
		let _ = id;

		self
	}

	/// Enters the span for a synchronous operation such as validation.
	pub fn entered(self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { _entered: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OperationSpanGuard {}
		}
	}

	/// Attaches the span to an operation future; it is entered on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Keeps an [`OperationSpan`] entered until dropped.
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OperationSpanGuard").finish_non_exhaustive()
	}
}
