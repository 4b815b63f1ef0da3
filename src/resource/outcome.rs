//! Results that carry non-fatal warnings alongside success or failure.

// self
use crate::_prelude::*;

/// Non-fatal message surfaced to the operator next to an operation's result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
	/// Short headline.
	pub summary: String,
	/// Full explanation.
	pub detail: String,
	/// Attribute the message is attached to, if any.
	pub attribute: Option<&'static str>,
}
impl Diagnostic {
	/// Creates a resource-level warning.
	pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self { summary: summary.into(), detail: detail.into(), attribute: None }
	}

	/// Attaches the warning to an attribute path.
	pub fn at(mut self, attribute: &'static str) -> Self {
		self.attribute = Some(attribute);

		self
	}
}
impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.attribute {
			Some(attribute) => write!(f, "{} ({attribute}): {}", self.summary, self.detail),
			None => write!(f, "{}: {}", self.summary, self.detail),
		}
	}
}

/// Operation result paired with zero or more warnings.
///
/// Warnings survive failures too; callers fold them into their own collection with
/// [`Outcome::merge_into`] before acting on the result.
#[derive(Debug)]
pub struct Outcome<T> {
	/// Success value or fatal error.
	pub result: Result<T>,
	/// Non-fatal diagnostics raised along the way.
	pub warnings: Vec<Diagnostic>,
}
impl<T> Outcome<T> {
	/// Successful outcome without warnings.
	pub fn ok(value: T) -> Self {
		Self { result: Ok(value), warnings: Vec::new() }
	}

	/// Failed outcome without warnings.
	pub fn err(error: impl Into<Error>) -> Self {
		Self { result: Err(error.into()), warnings: Vec::new() }
	}

	/// Appends a warning.
	pub fn with_warning(mut self, warning: Diagnostic) -> Self {
		self.warnings.push(warning);

		self
	}

	/// Moves the warnings into `sink` and returns the result.
	pub fn merge_into(self, sink: &mut Vec<Diagnostic>) -> Result<T> {
		sink.extend(self.warnings);

		self.result
	}

	/// Splits the outcome into its result and warnings.
	pub fn into_parts(self) -> (Result<T>, Vec<Diagnostic>) {
		(self.result, self.warnings)
	}
}
impl<T> From<Result<T>> for Outcome<T> {
	fn from(result: Result<T>) -> Self {
		Self { result, warnings: Vec::new() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ValidationError;

	#[test]
	fn merge_into_keeps_warnings_on_failure() {
		let outcome = <Outcome<()>>::err(ValidationError::new("roles", "bad"))
			.with_warning(Diagnostic::warning("Heads up", "first"));
		let mut sink = vec![Diagnostic::warning("Earlier", "zero")];
		let result = outcome.merge_into(&mut sink);

		assert!(result.is_err());
		assert_eq!(sink.len(), 2);
		assert_eq!(sink[1].detail, "first");
	}

	#[test]
	fn diagnostic_display_includes_attribute() {
		let warning = Diagnostic::warning("Cannot modify user", "details").at("email");

		assert_eq!(warning.to_string(), "Cannot modify user (email): details");
	}
}
