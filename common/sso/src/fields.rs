use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

pub const FIELD_EXTERNAL_ID: &str = "external_id";
pub const FIELD_LOCALE: &str = "locale";
pub const FIELD_LOCALE_ID: &str = "locale_id";
pub const FIELD_ORGANIZATION: &str = "organization";
pub const FIELD_ORGANIZATION_ID: &str = "organization_id";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_REMOTE_PHOTO_URL: &str = "remote_photo_url";
pub const FIELD_ROLE: &str = "role";
pub const FIELD_CUSTOM_ROLE_ID: &str = "custom_role_id";
pub const FIELD_USER_FIELDS: &str = "user_fields";

/// Optional JWT fields accepted by the Zendesk SSO endpoint, in documented order.
pub const OPTIONAL_FIELDS: &[&str] = &[
    FIELD_EXTERNAL_ID,
    FIELD_LOCALE,
    FIELD_LOCALE_ID,
    FIELD_ORGANIZATION,
    FIELD_ORGANIZATION_ID,
    FIELD_PHONE,
    FIELD_TAGS,
    FIELD_REMOTE_PHOTO_URL,
    FIELD_ROLE,
    FIELD_CUSTOM_ROLE_ID,
    FIELD_USER_FIELDS,
];

/// A claim key outside the four required ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalField {
    ExternalId,
    Locale,
    LocaleId,
    Organization,
    OrganizationId,
    Phone,
    Tags,
    RemotePhotoUrl,
    Role,
    CustomRoleId,
    UserFields,
}

impl OptionalField {
    pub const ALL: [OptionalField; 11] = [
        OptionalField::ExternalId,
        OptionalField::Locale,
        OptionalField::LocaleId,
        OptionalField::Organization,
        OptionalField::OrganizationId,
        OptionalField::Phone,
        OptionalField::Tags,
        OptionalField::RemotePhotoUrl,
        OptionalField::Role,
        OptionalField::CustomRoleId,
        OptionalField::UserFields,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionalField::ExternalId => FIELD_EXTERNAL_ID,
            OptionalField::Locale => FIELD_LOCALE,
            OptionalField::LocaleId => FIELD_LOCALE_ID,
            OptionalField::Organization => FIELD_ORGANIZATION,
            OptionalField::OrganizationId => FIELD_ORGANIZATION_ID,
            OptionalField::Phone => FIELD_PHONE,
            OptionalField::Tags => FIELD_TAGS,
            OptionalField::RemotePhotoUrl => FIELD_REMOTE_PHOTO_URL,
            OptionalField::Role => FIELD_ROLE,
            OptionalField::CustomRoleId => FIELD_CUSTOM_ROLE_ID,
            OptionalField::UserFields => FIELD_USER_FIELDS,
        }
    }
}

impl fmt::Display for OptionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a key is not on the allow-list; carries the rejected key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl FromStr for OptionalField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OptionalField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

impl Serialize for OptionalField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
