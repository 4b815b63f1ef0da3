//! Resource capability consumed by the declarative engine.
//!
//! The engine holds every managed resource as a [`Resource`] trait object and drives it
//! through Validate → Plan → Apply. Controllers receive their API handle at construction
//! time; nothing here reaches for ambient state.

pub mod attr;
pub mod outcome;
pub mod plan;

pub use attr::*;
pub use outcome::*;
pub use plan::*;

// self
use crate::{_prelude::*, error::ValidationError, schema::ResourceSchema};

/// Boxed future returned by fallible resource operations.
pub type ResourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Boxed future returned by [`Resource::plan_change`].
pub type PlanFuture<'a> = Pin<Box<dyn Future<Output = Outcome<PlannedChange>> + 'a + Send>>;

/// Lifecycle operations a resource controller performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Static configuration checks.
	Validate,
	/// Change planning against prior state.
	Plan,
	/// Remote creation.
	Create,
	/// Remote fetch.
	Read,
	/// In-place remote modification.
	Update,
	/// Remote removal.
	Delete,
	/// Adoption of an existing remote record.
	Import,
}
impl Operation {
	/// Returns a stable label suitable for messages, span fields, and metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Validate => "validate",
			Operation::Plan => "plan",
			Operation::Create => "create",
			Operation::Read => "read",
			Operation::Update => "update",
			Operation::Delete => "delete",
			Operation::Import => "import",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Lifecycle contract every managed resource type satisfies.
///
/// Each instance's calls arrive sequentially from the engine; separate instances may run
/// concurrently, so implementations only share read-only state (typically an
/// `Arc<dyn UserApi>`).
pub trait Resource
where
	Self: Send + Sync,
{
	/// Declared configuration, possibly containing unknown values while planning.
	type Config: Send + Sync;
	/// Observed state persisted by the engine.
	type State: Send + Sync;

	/// Fully qualified resource type name (e.g. `appstoreconnect_user`).
	fn type_name(&self) -> &'static str;

	/// Attribute schema for this resource type.
	fn schema(&self) -> &'static ResourceSchema;

	/// Remote identifier recorded in `state`.
	fn state_id<'s>(&self, state: &'s Self::State) -> &'s str;

	/// Checks static invariants of the declared configuration. Never touches the network.
	fn validate(&self, config: &Self::Config) -> Result<(), ValidationError>;

	/// Decides between no-op, in-place update, and replacement for an existing resource.
	fn plan_change<'a>(&'a self, prior: &'a Self::State, config: &'a Self::Config)
	-> PlanFuture<'a>;

	/// Creates the remote record and returns the state the service reported.
	fn create<'a>(&'a self, config: &'a Self::Config) -> ResourceFuture<'a, Self::State>;

	/// Fetches current state; `None` means the service reported the record missing.
	fn read<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, Option<Self::State>>;

	/// Applies an in-place update planned by [`Resource::plan_change`].
	fn update<'a>(
		&'a self,
		id: &'a str,
		config: &'a Self::Config,
	) -> ResourceFuture<'a, Self::State>;

	/// Deletes the remote record.
	fn delete<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, ()>;

	/// Adopts an existing remote record given only its identifier.
	fn import_by_id<'a>(&'a self, id: &'a str) -> ResourceFuture<'a, Self::State>;
}
