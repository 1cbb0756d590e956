use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::InvalidInput;
use crate::fields::OptionalField;

/// Value carried by a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClaimValue {
    String(String),
    Integer(i64),
    List(Vec<String>),
    Map(BTreeMap<String, ClaimValue>),
}

impl ClaimValue {
    /// Strings and integers are scalar; lists and maps are not.
    pub fn is_scalar(&self) -> bool {
        matches!(self, ClaimValue::String(_) | ClaimValue::Integer(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ClaimValue::String(value) => value.is_empty(),
            ClaimValue::Integer(_) => false,
            ClaimValue::List(items) => items.is_empty(),
            ClaimValue::Map(entries) => entries.is_empty(),
        }
    }

    fn scalar_text(&self) -> Option<String> {
        match self {
            ClaimValue::String(value) => Some(value.trim().to_string()),
            ClaimValue::Integer(value) => Some(value.to_string()),
            ClaimValue::List(_) | ClaimValue::Map(_) => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<&String> for ClaimValue {
    fn from(value: &String) -> Self {
        ClaimValue::String(value.clone())
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Integer(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Integer(value.into())
    }
}

impl From<u32> for ClaimValue {
    fn from(value: u32) -> Self {
        ClaimValue::Integer(value.into())
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(value: Vec<String>) -> Self {
        ClaimValue::List(value)
    }
}

impl From<Vec<&str>> for ClaimValue {
    fn from(value: Vec<&str>) -> Self {
        ClaimValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeMap<String, ClaimValue>> for ClaimValue {
    fn from(value: BTreeMap<String, ClaimValue>) -> Self {
        ClaimValue::Map(value)
    }
}

/// Caller-supplied optional attributes keyed by claim name.
///
/// Keys are checked against the allow-list when claims are built, not on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsoOptions {
    entries: BTreeMap<String, ClaimValue>,
}

impl SsoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ClaimValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for SsoOptions
where
    K: Into<String>,
    V: Into<ClaimValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = SsoOptions::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

impl From<BTreeMap<String, ClaimValue>> for SsoOptions {
    fn from(entries: BTreeMap<String, ClaimValue>) -> Self {
        Self { entries }
    }
}

/// Payload signed into the SSO token.
///
/// Only the four required claims and allow-listed optional fields can be
/// represented, so the serialized object never carries any other key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    jti: String,
    iat: i64,
    name: String,
    email: String,
    #[serde(flatten)]
    optional: BTreeMap<OptionalField, ClaimValue>,
}

impl Claims {
    /// Validate the user and options and build claims issued at `issued_at`.
    pub fn build(
        name: ClaimValue,
        email: ClaimValue,
        options: &SsoOptions,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, InvalidInput> {
        let name = name.scalar_text().ok_or(InvalidInput::NameNotString)?;
        if name.is_empty() {
            return Err(InvalidInput::EmptyName);
        }

        let email = email.scalar_text().ok_or(InvalidInput::EmailNotString)?;
        if !is_email_address(&email) {
            return Err(InvalidInput::InvalidEmail);
        }

        let optional = parse_options(options)?;

        Ok(Self {
            jti: Uuid::now_v7().to_string(),
            iat: issued_at.timestamp(),
            name,
            email,
            optional,
        })
    }

    pub fn jti(&self) -> &str {
        &self.jti
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn optional(&self, field: OptionalField) -> Option<&ClaimValue> {
        self.optional.get(&field)
    }

    /// Claim names in serialization order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = vec!["jti", "iat", "name", "email"];
        keys.extend(self.optional.keys().map(OptionalField::as_str));
        keys
    }
}

/// HTML5 address check plus the dot-atom rules it skips: no empty labels in
/// the local part and a dotted domain.
fn is_email_address(email: &str) -> bool {
    if email.is_empty() || !email.validate_email() {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let dot_atoms = |part: &str| part.split('.').all(|atom| !atom.is_empty());
    dot_atoms(local) && domain.contains('.') && dot_atoms(domain)
}

fn parse_options(
    options: &SsoOptions,
) -> Result<BTreeMap<OptionalField, ClaimValue>, InvalidInput> {
    let mut accepted = BTreeMap::new();
    let mut rejected = Vec::new();

    for (key, value) in options.iter() {
        match key.parse::<OptionalField>() {
            Ok(field) => {
                accepted.insert(field, value.clone());
            }
            Err(unknown) => rejected.push(unknown.0),
        }
    }

    if rejected.is_empty() {
        Ok(accepted)
    } else {
        Err(InvalidInput::UnsupportedFields(rejected))
    }
}
