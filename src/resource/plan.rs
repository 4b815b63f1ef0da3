//! Planned change reported by [`Resource::plan_change`](crate::resource::Resource).

/// Action the engine should take to reconcile a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanAction {
	/// Nothing is tracked yet; create the resource.
	Create,
	/// Declared and observed state already agree.
	NoOp,
	/// Apply the change with an in-place update.
	UpdateInPlace,
	/// Destroy the resource and create it again.
	Replace,
}

/// Planned change for one resource instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedChange {
	/// Chosen action.
	pub action: PlanAction,
	/// Attributes whose declared value differs from observed state.
	pub changed: Vec<&'static str>,
	/// Attributes flagged as forcing replacement when they change.
	pub requires_replace: Vec<&'static str>,
}
impl PlannedChange {
	/// Plan with nothing to do.
	pub fn no_op() -> Self {
		Self { action: PlanAction::NoOp, changed: Vec::new(), requires_replace: Vec::new() }
	}

	/// Returns true when the engine must destroy and recreate the resource.
	pub fn requires_replacement(&self) -> bool {
		self.action == PlanAction::Replace
	}
}
