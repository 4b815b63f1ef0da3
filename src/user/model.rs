//! Declared, resolved, and observed shapes of an App Store Connect user.

// self
use crate::{_prelude::*, api::User, error::ValidationError, resource::Attr};

/// Roles App Store Connect can grant to a team member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
	/// `ADMIN`
	Admin,
	/// `FINANCE`
	Finance,
	/// `ACCOUNT_HOLDER`
	AccountHolder,
	/// `SALES`
	Sales,
	/// `MARKETING`
	Marketing,
	/// `APP_MANAGER`
	AppManager,
	/// `DEVELOPER`
	Developer,
	/// `ACCESS_TO_REPORTS`
	AccessToReports,
	/// `CUSTOMER_SUPPORT`
	CustomerSupport,
	/// `CREATE_APPS`
	CreateApps,
	/// `CLOUD_MANAGED_DEVELOPER_ID`
	CloudManagedDeveloperId,
	/// `CLOUD_MANAGED_APP_DISTRIBUTION`
	CloudManagedAppDistribution,
	/// `GENERATE_INDIVIDUAL_KEYS`
	GenerateIndividualKeys,
}
impl UserRole {
	/// Every role, in wire-name order of declaration.
	pub const ALL: [UserRole; 13] = [
		UserRole::Admin,
		UserRole::Finance,
		UserRole::AccountHolder,
		UserRole::Sales,
		UserRole::Marketing,
		UserRole::AppManager,
		UserRole::Developer,
		UserRole::AccessToReports,
		UserRole::CustomerSupport,
		UserRole::CreateApps,
		UserRole::CloudManagedDeveloperId,
		UserRole::CloudManagedAppDistribution,
		UserRole::GenerateIndividualKeys,
	];

	/// Wire name used by the API and in declared configuration.
	pub const fn as_str(self) -> &'static str {
		match self {
			UserRole::Admin => "ADMIN",
			UserRole::Finance => "FINANCE",
			UserRole::AccountHolder => "ACCOUNT_HOLDER",
			UserRole::Sales => "SALES",
			UserRole::Marketing => "MARKETING",
			UserRole::AppManager => "APP_MANAGER",
			UserRole::Developer => "DEVELOPER",
			UserRole::AccessToReports => "ACCESS_TO_REPORTS",
			UserRole::CustomerSupport => "CUSTOMER_SUPPORT",
			UserRole::CreateApps => "CREATE_APPS",
			UserRole::CloudManagedDeveloperId => "CLOUD_MANAGED_DEVELOPER_ID",
			UserRole::CloudManagedAppDistribution => "CLOUD_MANAGED_APP_DISTRIBUTION",
			UserRole::GenerateIndividualKeys => "GENERATE_INDIVIDUAL_KEYS",
		}
	}
}
impl Display for UserRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for UserRole {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|role| role.as_str() == s)
			.ok_or_else(|| UnknownRole(s.to_owned()))
	}
}

/// Role name App Store Connect does not recognize.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("`{0}` is not a recognized App Store Connect role")]
pub struct UnknownRole(pub String);

/// Declared `appstoreconnect_user` configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserConfig {
	/// Given name. Changing it recreates the user.
	pub first_name: Attr<String>,
	/// Family name. Changing it recreates the user.
	pub last_name: Attr<String>,
	/// Invitation email. Changing it recreates the user.
	pub email: Attr<String>,
	/// Role names as written by the operator.
	pub roles: Attr<BTreeSet<String>>,
	/// Grants visibility of every app; excludes `visible_apps`.
	pub all_apps_visible: Attr<bool>,
	/// App identifiers the user may see.
	pub visible_apps: Attr<BTreeSet<String>>,
	/// Allows creating provisioning profiles.
	pub provisioning_allowed: Attr<bool>,
}
impl UserConfig {
	/// Checks static invariants. Unknown values skip the checks that depend on them.
	pub fn validate(&self) -> Result<(), ValidationError> {
		let all_visible = matches!(self.all_apps_visible, Attr::Known(true));
		let lists_apps = self.visible_apps.known().is_some_and(|apps| !apps.is_empty());

		if all_visible && lists_apps {
			return Err(ValidationError::new(
				"visible_apps",
				"all_apps_visible and visible_apps are mutually exclusive",
			));
		}
		if let Attr::Known(roles) = &self.roles {
			parse_roles(roles)?;
		}

		Ok(())
	}

	/// Validates and resolves every attribute into the shape the API accepts.
	pub fn resolve(&self) -> Result<UserDesiredState, ValidationError> {
		self.validate()?;

		Ok(UserDesiredState {
			first_name: self.first_name.require("first_name")?,
			last_name: self.last_name.require("last_name")?,
			email: self.email.require("email")?,
			roles: parse_roles(&self.roles.require("roles")?)?,
			all_apps_visible: self.all_apps_visible.or_default("all_apps_visible")?,
			visible_apps: self.visible_apps.or_default("visible_apps")?,
			provisioning_allowed: self.provisioning_allowed.require("provisioning_allowed")?,
		})
	}

	/// Declared roles parsed into [`UserRole`]s.
	///
	/// Unparseable names yield [`Attr::Unknown`] so that they always register as a change.
	pub fn declared_roles(&self) -> Attr<BTreeSet<UserRole>> {
		match &self.roles {
			Attr::Known(names) => parse_roles(names).map(Attr::Known).unwrap_or(Attr::Unknown),
			Attr::Unknown => Attr::Unknown,
			Attr::Null => Attr::Null,
		}
	}
}
impl From<&UserDesiredState> for UserConfig {
	fn from(desired: &UserDesiredState) -> Self {
		Self {
			first_name: desired.first_name.clone().into(),
			last_name: desired.last_name.clone().into(),
			email: desired.email.clone().into(),
			roles: Attr::Known(
				desired.roles.iter().map(|role| role.as_str().to_owned()).collect(),
			),
			all_apps_visible: desired.all_apps_visible.into(),
			visible_apps: desired.visible_apps.clone().into(),
			provisioning_allowed: desired.provisioning_allowed.into(),
		}
	}
}

/// Fully known user configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDesiredState {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Invitation email.
	pub email: String,
	/// Granted roles.
	pub roles: BTreeSet<UserRole>,
	/// Whether every app is visible.
	pub all_apps_visible: bool,
	/// Visible app identifiers.
	pub visible_apps: BTreeSet<String>,
	/// Whether provisioning profiles may be created.
	pub provisioning_allowed: bool,
}
impl UserDesiredState {
	/// Wire payload for create and modify calls; `id` is left empty.
	pub fn to_api_user(&self) -> User {
		User {
			id: String::new(),
			first_name: self.first_name.clone(),
			last_name: self.last_name.clone(),
			username: self.email.clone(),
			roles: self.roles.clone(),
			all_apps_visible: self.all_apps_visible,
			visible_app_ids: self.visible_apps.clone(),
			provisioning_allowed: self.provisioning_allowed,
			has_accepted_invite: false,
		}
	}
}

/// State recorded after a successful remote call; values are whatever the service echoed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserObservedState {
	/// Service-assigned identifier.
	pub id: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Email (the username once the invite is accepted).
	pub email: String,
	/// Granted roles.
	pub roles: BTreeSet<UserRole>,
	/// Whether every app is visible.
	pub all_apps_visible: bool,
	/// Visible app identifiers.
	pub visible_apps: BTreeSet<String>,
	/// Whether provisioning profiles may be created.
	pub provisioning_allowed: bool,
	/// False while the user is still a pending invitation.
	pub has_accepted_invite: bool,
}
impl From<User> for UserObservedState {
	fn from(user: User) -> Self {
		Self {
			id: user.id,
			first_name: user.first_name,
			last_name: user.last_name,
			email: user.username,
			roles: user.roles,
			all_apps_visible: user.all_apps_visible,
			visible_apps: user.visible_app_ids,
			provisioning_allowed: user.provisioning_allowed,
			has_accepted_invite: user.has_accepted_invite,
		}
	}
}

fn parse_roles(names: &BTreeSet<String>) -> Result<BTreeSet<UserRole>, ValidationError> {
	names
		.iter()
		.map(|name| {
			UserRole::from_str(name).map_err(|e| ValidationError::new("roles", e.to_string()))
		})
		.collect()
}
