//! `appstoreconnect_user` resource controller.
//!
//! [`UserResource`] maps the declarative lifecycle onto [`UserApi`] calls. It keeps no
//! state of its own beyond the shared API handle; every value it returns is whatever the
//! service echoed back.

pub mod model;
pub mod plan;

pub use model::*;
pub use plan::*;

// self
use crate::{
	_prelude::*,
	api::{ApiError, UserApi},
	error::{ClientError, ValidationError},
	obs::{self, OperationOutcome, OperationSpan},
	resource::{Operation, Outcome, PlanFuture, PlannedChange, Resource, ResourceFuture},
	schema::{ResourceSchema, USER_SCHEMA},
};

/// Controller for App Store Connect team members.
#[derive(Clone)]
pub struct UserResource {
	api: Arc<dyn UserApi>,
}
impl UserResource {
	/// Binds the controller to the shared API handle produced by provider configuration.
	pub fn new(api: Arc<dyn UserApi>) -> Self {
		Self { api }
	}

	async fn fetch_plan(
		&self,
		prior: &UserObservedState,
		config: &UserConfig,
	) -> Outcome<PlannedChange> {
		match self.api.get_user(&prior.id).await {
			Ok(fetched) => plan_user_change(prior, config, &fetched),
			Err(source) => Outcome::err(Error::Fetch { id: prior.id.clone(), source }),
		}
	}

	async fn create_now(&self, config: &UserConfig) -> Result<UserObservedState> {
		let desired = config.resolve()?;
		let created = self
			.api
			.create_user(&desired.to_api_user())
			.await
			.map_err(|e| ClientError::new(Operation::Create, None, e))?;

		#[cfg(feature = "tracing")]
		tracing::trace!(id = %created.id, "created a new user");

		Ok(created.into())
	}

	async fn read_now(&self, id: &str) -> Result<Option<UserObservedState>> {
		match self.api.get_user(id).await {
			Ok(user) => Ok(Some(user.into())),
			Err(ApiError::NotFound { .. }) => {
				#[cfg(feature = "tracing")]
				tracing::trace!(id, "user no longer exists");

				Ok(None)
			},
			Err(e) => Err(ClientError::new(Operation::Read, Some(id), e).into()),
		}
	}

	async fn update_now(&self, id: &str, config: &UserConfig) -> Result<UserObservedState> {
		let desired = config.resolve()?;
		let modified = self
			.api
			.modify_user(id, &desired.to_api_user())
			.await
			.map_err(|e| ClientError::new(Operation::Update, Some(id), e))?;

		#[cfg(feature = "tracing")]
		tracing::trace!(id, "modified user");

		Ok(modified.into())
	}

	async fn delete_now(&self, id: &str) -> Result<()> {
		self.api
			.delete_user(id)
			.await
			.map_err(|e| ClientError::new(Operation::Delete, Some(id), e))?;

		Ok(())
	}

	async fn import_now(&self, id: &str) -> Result<UserObservedState> {
		let user = self
			.api
			.get_user(id)
			.await
			.map_err(|e| ClientError::new(Operation::Import, Some(id), e))?;

		Ok(user.into())
	}
}
impl Debug for UserResource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserResource").finish_non_exhaustive()
	}
}
impl Resource for UserResource {
	type Config = UserConfig;
	type State = UserObservedState;

	fn type_name(&self) -> &'static str {
		USER_SCHEMA.type_name
	}

	fn schema(&self) -> &'static ResourceSchema {
		&USER_SCHEMA
	}

	fn state_id<'s>(&self, state: &'s Self::State) -> &'s str {
		&state.id
	}

	fn validate(&self, config: &Self::Config) -> Result<(), ValidationError> {
		let _guard = OperationSpan::new(USER_SCHEMA.type_name, Operation::Validate).entered();

		observed(Operation::Validate, || config.validate())
	}

	fn plan_change<'a>(
		&'a self,
		prior: &'a Self::State,
		config: &'a Self::Config,
	) -> PlanFuture<'a> {
		let span =
			OperationSpan::new(USER_SCHEMA.type_name, Operation::Plan).with_id(Some(&prior.id));

		obs::record_operation_outcome(
			USER_SCHEMA.type_name,
			Operation::Plan,
			OperationOutcome::Attempt,
		);

		Box::pin(async move {
			let outcome = span.instrument(self.fetch_plan(prior, config)).await;

			obs::record_operation_outcome(
				USER_SCHEMA.type_name,
				Operation::Plan,
				OperationOutcome::of(&outcome.result),
			);

			outcome
		})
	}

	fn create<'a>(&'a self, config: &'a Self::Config) -> ResourceFuture<'a, Self::State> {
		instrumented(Operation::Create, None, self.create_now(config))
	}

	fn read<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, Option<Self::State>> {
		instrumented(Operation::Read, Some(id), self.read_now(id))
	}

	fn update<'a>(
		&'a self,
		id: &'a str,
		config: &'a Self::Config,
	) -> ResourceFuture<'a, Self::State> {
		instrumented(Operation::Update, Some(id), self.update_now(id, config))
	}

	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()> {
		instrumented(Operation::Delete, Some(id), self.delete_now(id))
	}

	fn import_by_id<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, Self::State> {
		instrumented(Operation::Import, Some(id), self.import_now(id))
	}
}

fn observed<T, E>(operation: Operation, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
	obs::record_operation_outcome(USER_SCHEMA.type_name, operation, OperationOutcome::Attempt);

	let result = f();
	let outcome = OperationOutcome::of(&result);

	obs::record_operation_outcome(USER_SCHEMA.type_name, operation, outcome);

	result
}

fn instrumented<'a, T, F>(
	operation: Operation,
	id: Option<&str>,
	fut: F,
) -> ResourceFuture<'a, T>
where
	T: 'a,
	F: 'a + Send + Future<Output = Result<T>>,
{
	let span = OperationSpan::new(USER_SCHEMA.type_name, operation).with_id(id);

	obs::record_operation_outcome(USER_SCHEMA.type_name, operation, OperationOutcome::Attempt);

	Box::pin(async move {
		let result = span.instrument(fut).await;

		obs::record_operation_outcome(
			USER_SCHEMA.type_name,
			operation,
			OperationOutcome::of(&result),
		);

		result
	})
}
