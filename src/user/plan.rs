//! Change planning for `appstoreconnect_user`.

// self
use crate::{
	_prelude::*,
	api::User,
	resource::{Diagnostic, Outcome, PlanAction, PlannedChange},
	schema::USER_SCHEMA,
	user::{UserConfig, UserObservedState},
};

pub(crate) const PENDING_INVITE_SUMMARY: &str = "Cannot modify user";
pub(crate) const PENDING_INVITE_DETAIL: &str = "Users cannot be modified until they have accepted \
	their email invite to App Store Connect. This resource will be destroyed and recreated.";

/// Declared attributes whose value differs from `prior`, in schema order.
pub fn changed_attributes(prior: &UserObservedState, config: &UserConfig) -> Vec<&'static str> {
	let checks = [
		("first_name", config.first_name.differs_from(&prior.first_name)),
		("last_name", config.last_name.differs_from(&prior.last_name)),
		("email", config.email.differs_from(&prior.email)),
		("roles", config.declared_roles().differs_from(&prior.roles)),
		("all_apps_visible", config.all_apps_visible.differs_from(&prior.all_apps_visible)),
		("visible_apps", config.visible_apps.differs_from(&prior.visible_apps)),
		(
			"provisioning_allowed",
			config.provisioning_allowed.differs_from(&prior.provisioning_allowed),
		),
	];

	checks.into_iter().filter_map(|(name, changed)| changed.then_some(name)).collect()
}

/// Plans the change for an existing user given the record just fetched from the service.
pub fn plan_user_change(
	prior: &UserObservedState,
	config: &UserConfig,
	fetched: &User,
) -> Outcome<PlannedChange> {
	let changed = changed_attributes(prior, config);

	if !fetched.has_accepted_invite {
		let action = if changed.is_empty() { PlanAction::NoOp } else { PlanAction::Replace };
		let requires_replace = USER_SCHEMA.attribute_names().collect();

		return Outcome::ok(PlannedChange { action, changed, requires_replace })
			.with_warning(Diagnostic::warning(PENDING_INVITE_SUMMARY, PENDING_INVITE_DETAIL));
	}

	let requires_replace = changed
		.iter()
		.copied()
		.filter(|name| USER_SCHEMA.attribute(name).is_some_and(|schema| schema.requires_replace))
		.collect::<Vec<_>>();
	let action = if !requires_replace.is_empty() {
		PlanAction::Replace
	} else if !changed.is_empty() {
		PlanAction::UpdateInPlace
	} else {
		PlanAction::NoOp
	};

	Outcome::ok(PlannedChange { action, changed, requires_replace })
}
