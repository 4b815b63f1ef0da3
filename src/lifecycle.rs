//! Engine-side sequencing of one resource instance.
//!
//! [`ResourceInstance`] tracks the state the engine would persist for a single declared
//! resource and drives it through Validate → Plan → Apply. Controllers only signal
//! replacement; the instance performs it as Delete followed by Create.

// self
use crate::{
	_prelude::*,
	resource::{Diagnostic, PlanAction, PlannedChange, Resource},
};

/// Where a resource instance stands in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
	/// Not yet validated or planned.
	#[default]
	Unknown,
	/// Validated and planned; waiting for apply.
	Planned(PlanAction),
	/// Remote record matches the last applied configuration.
	Applied,
	/// Remote record deleted, or found missing on refresh.
	Removed,
}

/// A single declared resource plus the state tracked for it.
pub struct ResourceInstance<R>
where
	R: ?Sized + Resource,
{
	resource: Arc<R>,
	state: Option<R::State>,
	lifecycle: LifecycleState,
	planned: Option<(R::Config, PlannedChange)>,
	warnings: Vec<Diagnostic>,
}
impl<R> ResourceInstance<R>
where
	R: ?Sized + Resource,
	R::Config: Clone + PartialEq,
{
	/// Starts tracking a resource that does not exist yet.
	pub fn new(resource: Arc<R>) -> Self {
		Self {
			resource,
			state: None,
			lifecycle: LifecycleState::Unknown,
			planned: None,
			warnings: Vec::new(),
		}
	}

	/// Resumes tracking from previously persisted state.
	pub fn with_state(resource: Arc<R>, state: R::State) -> Self {
		Self { state: Some(state), lifecycle: LifecycleState::Applied, ..Self::new(resource) }
	}

	/// Adopts an existing remote record by identifier.
	pub async fn import(resource: Arc<R>, id: &str) -> Result<Self> {
		let state = resource.import_by_id(id).await?;

		Ok(Self::with_state(resource, state))
	}

	/// Tracked state, if any.
	pub fn state(&self) -> Option<&R::State> {
		self.state.as_ref()
	}

	/// Remote identifier of the tracked state.
	pub fn id(&self) -> Option<&str> {
		self.state.as_ref().map(|state| self.resource.state_id(state))
	}

	/// Current lifecycle position.
	pub fn lifecycle(&self) -> LifecycleState {
		self.lifecycle
	}

	/// Warnings collected so far.
	pub fn warnings(&self) -> &[Diagnostic] {
		&self.warnings
	}

	/// Drains the collected warnings.
	pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
		std::mem::take(&mut self.warnings)
	}

	/// Validates `config` and plans the change against tracked state.
	pub async fn plan(&mut self, config: &R::Config) -> Result<PlannedChange> {
		self.planned = None;
		self.resource.validate(config)?;

		let change = match &self.state {
			Some(prior) =>
				self.resource.plan_change(prior, config).await.merge_into(&mut self.warnings)?,
			None => PlannedChange {
				action: PlanAction::Create,
				changed: self.resource.schema().attribute_names().collect(),
				requires_replace: Vec::new(),
			},
		};

		self.lifecycle = LifecycleState::Planned(change.action);
		self.planned = Some((config.clone(), change.clone()));

		Ok(change)
	}

	/// Applies the pending plan for `config`, re-planning when none is pending or the
	/// pending one was computed for a different configuration.
	pub async fn apply(&mut self, config: &R::Config) -> Result<Option<&R::State>> {
		let change = match self.planned.take() {
			Some((planned_for, change)) if planned_for == *config => change,
			_ => self.plan(config).await?,
		};

		match (change.action, self.tracked_id()) {
			(PlanAction::NoOp, Some(_)) => {},
			(PlanAction::UpdateInPlace, Some(id)) => {
				let state = self.resource.update(&id, config).await?;

				self.state = Some(state);
			},
			(PlanAction::Replace, Some(id)) => {
				self.resource.delete(&id).await?;
				self.state = None;
				self.lifecycle = LifecycleState::Removed;

				let state = self.resource.create(config).await?;

				self.state = Some(state);
			},
			(PlanAction::Create, _) | (_, None) => {
				let state = self.resource.create(config).await?;

				self.state = Some(state);
			},
		}

		self.lifecycle = LifecycleState::Applied;

		Ok(self.state.as_ref())
	}

	/// Re-reads tracked state; a missing remote record stops tracking it.
	pub async fn refresh(&mut self) -> Result<Option<&R::State>> {
		let Some(id) = self.tracked_id() else {
			return Ok(None);
		};

		match self.resource.read(&id).await? {
			Some(state) => self.state = Some(state),
			None => {
				self.state = None;
				self.lifecycle = LifecycleState::Removed;
			},
		}

		Ok(self.state.as_ref())
	}

	/// Deletes the remote record. Failures leave the state tracked.
	pub async fn destroy(&mut self) -> Result<()> {
		if let Some(id) = self.tracked_id() {
			self.resource.delete(&id).await?;
		}

		self.state = None;
		self.planned = None;
		self.lifecycle = LifecycleState::Removed;

		Ok(())
	}

	fn tracked_id(&self) -> Option<String> {
		self.id().map(ToOwned::to_owned)
	}
}
impl<R> Debug for ResourceInstance<R>
where
	R: ?Sized + Resource,
	R::State: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResourceInstance")
			.field("type_name", &self.resource.type_name())
			.field("state", &self.state)
			.field("lifecycle", &self.lifecycle)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, api::ApiCall, user::UserResource};

	#[tokio::test]
	async fn first_apply_creates_and_second_plan_is_a_no_op() {
		let (resource, _api) = memory_user_resource();
		let mut instance = ResourceInstance::new(Arc::new(resource));
		let config = john_smith("x@y.com", "MARKETING");
		let change = instance.plan(&config).await.expect("Planning a new user should succeed.");

		assert_eq!(change.action, PlanAction::Create);
		assert_eq!(instance.lifecycle(), LifecycleState::Planned(PlanAction::Create));

		instance.apply(&config).await.expect("Create should succeed.");

		assert_eq!(instance.lifecycle(), LifecycleState::Applied);

		let change = instance.plan(&config).await.expect("Re-planning should succeed.");

		assert_eq!(change.action, PlanAction::NoOp);
		// Pending invitations always warn.
		assert_eq!(instance.take_warnings().len(), 1);
		assert!(instance.warnings().is_empty());
	}

	#[tokio::test]
	async fn replacement_deletes_before_creating() {
		let (resource, api) = memory_user_resource();
		let mut instance = ResourceInstance::new(Arc::new(resource));

		instance.apply(&john_smith("x@y.com", "MARKETING")).await.expect("Create should succeed.");

		let old_id = instance.id().expect("State should be tracked.").to_owned();

		api.set_invite_accepted(&old_id, true);
		api.clear_calls();

		let change = instance
			.plan(&john_smith("new@y.com", "MARKETING"))
			.await
			.expect("Planning should succeed.");

		assert_eq!(change.action, PlanAction::Replace);

		instance
			.apply(&john_smith("new@y.com", "MARKETING"))
			.await
			.expect("Replace should succeed.");

		assert_eq!(api.calls(), [
			ApiCall::Get(old_id.clone()),
			ApiCall::Delete(old_id.clone()),
			ApiCall::Create("new@y.com".into()),
		]);
		assert_ne!(instance.id(), Some(old_id.as_str()));
	}

	#[tokio::test]
	async fn apply_replans_when_the_configuration_changed_since_planning() {
		let (resource, api) = memory_user_resource();
		let mut instance = ResourceInstance::new(Arc::new(resource));
		let marketing = john_smith("x@y.com", "MARKETING");

		instance.apply(&marketing).await.expect("Create should succeed.");
		api.set_invite_accepted(instance.id().expect("State should be tracked."), true);

		let change = instance.plan(&marketing).await.expect("Planning should succeed.");

		assert_eq!(change.action, PlanAction::NoOp);

		let state = instance
			.apply(&john_smith("x@y.com", "DEVELOPER"))
			.await
			.expect("Apply should re-plan and update.")
			.expect("State should remain tracked.");

		assert_eq!(state.roles, [crate::user::UserRole::Developer].into_iter().collect());
		assert_eq!(api.call_count(crate::api::ApiCallKind::Modify), 1);
		assert_eq!(instance.lifecycle(), LifecycleState::Applied);
	}

	#[tokio::test]
	async fn refresh_drops_records_deleted_out_of_band() {
		let (resource, api) = memory_user_resource();
		let mut instance = ResourceInstance::new(Arc::new(resource));

		instance.apply(&john_smith("x@y.com", "MARKETING")).await.expect("Create should succeed.");

		api.remove(instance.id().expect("State should be tracked."));

		assert!(instance.refresh().await.expect("Refresh should succeed.").is_none());
		assert_eq!(instance.lifecycle(), LifecycleState::Removed);
	}

	#[tokio::test]
	async fn trait_objects_drive_the_same_lifecycle() {
		let (resource, _api) = memory_user_resource();
		let resource: Arc<
			dyn Resource<
				Config = crate::user::UserConfig,
				State = crate::user::UserObservedState,
			>,
		> = Arc::new(resource);
		let mut instance = ResourceInstance::new(resource.clone());

		instance.apply(&john_smith("x@y.com", "MARKETING")).await.expect("Create should succeed.");

		let id = instance.id().expect("State should be tracked.").to_owned();
		let imported =
			ResourceInstance::import(resource, &id).await.expect("Import should succeed.");

		assert_eq!(imported.state(), instance.state());

		instance.destroy().await.expect("Destroy should succeed.");

		assert!(instance.state().is_none());
		assert_eq!(instance.lifecycle(), LifecycleState::Removed);
	}

	#[test]
	fn debug_names_the_resource_type() {
		let (resource, _api) = memory_user_resource();
		let instance: ResourceInstance<UserResource> = ResourceInstance::new(Arc::new(resource));

		assert!(format!("{instance:?}").contains("appstoreconnect_user"));
	}
}
