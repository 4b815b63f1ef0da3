//! Attribute schemas for the provider block and the resources it manages.

/// Value type of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
	/// UTF-8 string.
	String,
	/// Boolean flag.
	Bool,
	/// Unordered set of strings.
	StringSet,
}

/// Who supplies an attribute's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeMode {
	/// Operator must set it.
	Required,
	/// Operator may set it.
	Optional,
	/// Remote service assigns it.
	Computed,
}

/// Description of a single attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeSchema {
	/// Attribute name as written in configuration.
	pub name: &'static str,
	/// Value type.
	pub kind: AttributeKind,
	/// Required/optional/computed.
	pub mode: AttributeMode,
	/// Changing the value destroys and recreates the resource.
	pub requires_replace: bool,
	/// Value must be redacted from plan output and logs.
	pub sensitive: bool,
	/// Operator-facing description (Markdown).
	pub description: &'static str,
}
impl AttributeSchema {
	const fn new(
		name: &'static str,
		kind: AttributeKind,
		mode: AttributeMode,
		description: &'static str,
	) -> Self {
		Self { name, kind, mode, requires_replace: false, sensitive: false, description }
	}

	const fn replaced_on_change(mut self) -> Self {
		self.requires_replace = true;

		self
	}

	const fn sensitive(mut self) -> Self {
		self.sensitive = true;

		self
	}
}

/// Schema of a resource type or of the provider block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSchema {
	/// Type name (`appstoreconnect` for the provider block).
	pub type_name: &'static str,
	/// Operator-facing description (Markdown).
	pub description: &'static str,
	/// Declared attributes in display order.
	pub attributes: &'static [AttributeSchema],
}
impl ResourceSchema {
	/// Looks up an attribute by name.
	pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
		self.attributes.iter().find(|attribute| attribute.name == name)
	}

	/// Names of every declared attribute.
	pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.attributes.iter().map(|attribute| attribute.name)
	}
}

/// Provider type name used as the prefix of every resource type.
pub const PROVIDER_TYPE_NAME: &str = "appstoreconnect";

/// Provider block schema.
pub static PROVIDER_SCHEMA: ResourceSchema = ResourceSchema {
	type_name: PROVIDER_TYPE_NAME,
	description: "Interact with Apple Developer Program resources using the App Store Connect API.",
	attributes: &[
		AttributeSchema::new(
			"issuer_id",
			AttributeKind::String,
			AttributeMode::Required,
			"The issuer ID of the App Store Connect API key.",
		),
		AttributeSchema::new(
			"key_id",
			AttributeKind::String,
			AttributeMode::Required,
			"The key ID of the App Store Connect API key.",
		),
		AttributeSchema::new(
			"private_key",
			AttributeKind::String,
			AttributeMode::Required,
			"The private key of the App Store Connect API key.",
		)
		.sensitive(),
	],
};

/// `appstoreconnect_user` resource schema.
pub static USER_SCHEMA: ResourceSchema = ResourceSchema {
	type_name: "appstoreconnect_user",
	description: "Manage users in the Apple Developer Program using the App Store Connect API.",
	attributes: &[
		AttributeSchema::new(
			"id",
			AttributeKind::String,
			AttributeMode::Computed,
			"User identifier",
		),
		AttributeSchema::new(
			"first_name",
			AttributeKind::String,
			AttributeMode::Required,
			"User's first name",
		)
		.replaced_on_change(),
		AttributeSchema::new(
			"last_name",
			AttributeKind::String,
			AttributeMode::Required,
			"User's last name",
		)
		.replaced_on_change(),
		AttributeSchema::new(
			"email",
			AttributeKind::String,
			AttributeMode::Required,
			"User's email address",
		)
		.replaced_on_change(),
		AttributeSchema::new(
			"roles",
			AttributeKind::StringSet,
			AttributeMode::Required,
			"User's roles in the Apple Developer Program",
		),
		AttributeSchema::new(
			"all_apps_visible",
			AttributeKind::Bool,
			AttributeMode::Optional,
			"Whether the user can see all apps",
		),
		AttributeSchema::new(
			"visible_apps",
			AttributeKind::StringSet,
			AttributeMode::Optional,
			"A list of IDs for the apps that the user has permission to see",
		),
		AttributeSchema::new(
			"provisioning_allowed",
			AttributeKind::Bool,
			AttributeMode::Required,
			"Whether the user is allowed to create new provisioning profiles",
		),
	],
};
