//! Declared attribute values that may still be unresolved while planning.

// self
use crate::{_prelude::*, error::ValidationError};

/// Attribute value as declared by the operator.
///
/// `Unknown` marks values the engine can only resolve during apply (e.g. references to
/// other resources); `Null` marks optional attributes the operator left unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Attr<T> {
	/// Fully resolved value.
	Known(T),
	/// Value not yet known while planning.
	Unknown,
	/// Attribute left unset.
	#[default]
	Null,
}
impl<T> Attr<T> {
	/// Returns the value when it is known.
	pub fn known(&self) -> Option<&T> {
		match self {
			Self::Known(value) => Some(value),
			_ => None,
		}
	}

	/// Returns true for [`Attr::Unknown`].
	pub fn is_unknown(&self) -> bool {
		matches!(self, Self::Unknown)
	}

	/// Returns true for [`Attr::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Resolves a required attribute, rejecting unknown and unset values.
	pub fn require(&self, attribute: &'static str) -> Result<T, ValidationError>
	where
		T: Clone,
	{
		match self {
			Self::Known(value) => Ok(value.clone()),
			Self::Unknown => Err(ValidationError::new(
				attribute,
				"value must be known before it can be applied",
			)),
			Self::Null => Err(ValidationError::new(attribute, "a value is required")),
		}
	}

	/// Resolves an optional attribute, substituting the default for unset values.
	pub fn or_default(&self, attribute: &'static str) -> Result<T, ValidationError>
	where
		T: Clone + Default,
	{
		match self {
			Self::Null => Ok(T::default()),
			_ => self.require(attribute),
		}
	}

	/// Compares against an observed value, treating unset as the default.
	///
	/// Unknown values always count as a change.
	pub fn differs_from(&self, observed: &T) -> bool
	where
		T: Default + PartialEq,
	{
		match self {
			Self::Known(value) => value != observed,
			Self::Unknown => true,
			Self::Null => *observed != T::default(),
		}
	}
}
impl<T> From<T> for Attr<T> {
	fn from(value: T) -> Self {
		Self::Known(value)
	}
}
