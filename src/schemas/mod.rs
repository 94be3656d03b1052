//! Request validation layer.
//!
//! Bodies are first parsed as a JSON object, then each input schema reads its
//! fields through a [`Payload`], which records every violation instead of
//! stopping at the first one. Handlers only ever see fully valid inputs.

pub mod auth;
pub mod case_study;
pub mod note;
pub mod requirement;
pub mod service;
pub mod site_content;
pub mod testimonial;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ApiError;

/// Ordered list of `field path: message` violations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(String, String)>);

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push((field.into(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(field, _)| field.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

/// Partial-update field: distinguishes "omitted" from "set to a value".
///
/// For nullable columns use `Patch<Option<T>>`, where an explicit JSON `null`
/// becomes `Patch::Set(None)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unchanged,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

impl<T> Patch<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unchanged => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Unchanged => Patch::Unchanged,
        }
    }

    /// Overwrite `target` when a value was supplied
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Set(value) = self {
            *target = value;
        }
    }
}

/// Field reader over a JSON object that accumulates violations.
///
/// Readers return a placeholder (`Default`, `None`, `Unchanged`) for a bad
/// field so a schema can keep reading; [`Payload::finish`] reports them all.
/// Violations inside list items are reported under `field.index.subfield`.
pub struct Payload<'a> {
    body: &'a Map<String, Value>,
    prefix: String,
    errors: FieldErrors,
}

impl<'a> Payload<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self::nested(body, String::new())
    }

    fn nested(body: &'a Map<String, Value>, prefix: String) -> Self {
        Self {
            body,
            prefix,
            errors: FieldErrors::default(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.body.contains_key(key)
    }

    pub fn required<T: DeserializeOwned + Default>(&mut self, key: &str) -> T {
        match self.body.get(key) {
            None => {
                self.push(key, "field required");
                T::default()
            }
            Some(value) => self.decode(key, value).unwrap_or_default(),
        }
    }

    /// Required string that must contain something other than whitespace
    pub fn required_text(&mut self, key: &str) -> String {
        let present = self.body.contains_key(key);
        let value: String = self.required(key);
        if present && value.trim().is_empty() && self.body.get(key).map_or(false, Value::is_string) {
            self.push(key, "must not be empty");
        }
        value
    }

    pub fn optional<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        match self.body.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.decode(key, value),
        }
    }

    pub fn optional_or<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        self.optional(key).unwrap_or(default)
    }

    pub fn patch<T: DeserializeOwned>(&mut self, key: &str) -> Patch<T> {
        match self.body.get(key) {
            None => Patch::Unchanged,
            Some(value) => match self.decode(key, value) {
                Some(v) => Patch::Set(v),
                None => Patch::Unchanged,
            },
        }
    }

    /// Optional list of objects, each item read as its own schema
    pub fn optional_items<T: FromPayload>(&mut self, key: &str) -> Option<Vec<T>> {
        match self.body.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.items(key, value),
        }
    }

    /// Optional list of plain values, checked item by item
    pub fn optional_values<T: DeserializeOwned>(&mut self, key: &str) -> Option<Vec<T>> {
        match self.body.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.values(key, value),
        }
    }

    /// Non-nullable list patch: `null` is a violation
    pub fn patch_items<T: FromPayload>(&mut self, key: &str) -> Patch<Vec<T>> {
        match self.body.get(key) {
            None => Patch::Unchanged,
            Some(value) => match self.items(key, value) {
                Some(items) => Patch::Set(items),
                None => Patch::Unchanged,
            },
        }
    }

    /// Nullable list patch: `null` clears the stored list
    pub fn patch_optional_items<T: FromPayload>(&mut self, key: &str) -> Patch<Option<Vec<T>>> {
        match self.body.get(key) {
            None => Patch::Unchanged,
            Some(Value::Null) => Patch::Set(None),
            Some(value) => match self.items(key, value) {
                Some(items) => Patch::Set(Some(items)),
                None => Patch::Unchanged,
            },
        }
    }

    pub fn patch_optional_values<T: DeserializeOwned>(&mut self, key: &str) -> Patch<Option<Vec<T>>> {
        match self.body.get(key) {
            None => Patch::Unchanged,
            Some(Value::Null) => Patch::Set(None),
            Some(value) => match self.values(key, value) {
                Some(values) => Patch::Set(Some(values)),
                None => Patch::Unchanged,
            },
        }
    }

    /// Record `message` against `key` unless `ok` holds
    pub fn check(&mut self, key: &str, ok: bool, message: impl Into<String>) {
        if !ok {
            self.push(key, message);
        }
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn push(&mut self, key: &str, message: impl Into<String>) {
        let path = self.path(key);
        self.errors.push(path, message);
    }

    fn decode<T: DeserializeOwned>(&mut self, key: &str, value: &Value) -> Option<T> {
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(key, e.to_string());
                None
            }
        }
    }

    fn items<T: FromPayload>(&mut self, key: &str, value: &Value) -> Option<Vec<T>> {
        let Some(entries) = value.as_array() else {
            self.push(key, "must be a list");
            return None;
        };
        let before = self.errors.len();
        let mut items = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let item_path = self.path(&format!("{}.{}", key, index));
            match entry.as_object() {
                Some(object) => {
                    let mut nested = Payload::nested(object, item_path);
                    items.push(T::from_payload(&mut nested));
                    self.errors.0.extend(nested.errors.0);
                }
                None => self.errors.push(item_path, "must be an object"),
            }
        }
        (self.errors.len() == before).then_some(items)
    }

    fn values<T: DeserializeOwned>(&mut self, key: &str, value: &Value) -> Option<Vec<T>> {
        let Some(entries) = value.as_array() else {
            self.push(key, "must be a list");
            return None;
        };
        let before = self.errors.len();
        let values: Vec<T> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| self.decode(&format!("{}.{}", key, index), entry))
            .collect();
        (self.errors.len() == before).then_some(values)
    }
}

/// An input schema that can be read from a request body.
pub trait FromPayload: Sized {
    fn from_payload(payload: &mut Payload<'_>) -> Self;
}

/// Parse a JSON value into `T`, returning every violation at once.
pub fn parse_payload<T: FromPayload>(value: &Value) -> Result<T, FieldErrors> {
    let Some(body) = value.as_object() else {
        let mut errors = FieldErrors::default();
        errors.push("body", "must be a JSON object");
        return Err(errors);
    };
    let mut payload = Payload::new(body);
    let parsed = T::from_payload(&mut payload);
    payload.finish()?;
    Ok(parsed)
}

/// Extractor yielding a validated input schema or a single aggregated 400.
#[derive(Debug)]
pub struct Valid<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Valid(parse_payload(&value)?))
    }
}

pub fn is_valid_email(raw: &str) -> bool {
    email_address::EmailAddress::is_valid(raw)
}

/// Slugs are lowercase ASCII words joined by single hyphens (`fintech-platform`).
pub fn is_valid_slug(raw: &str) -> bool {
    !raw.is_empty()
        && raw.split('-').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

pub(crate) const SLUG_RULE: &str = "must contain only lowercase letters, digits and single hyphens";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Contact {
        name: String,
        count: i32,
        nickname: Option<String>,
        color: Patch<Option<String>>,
    }

    impl FromPayload for Contact {
        fn from_payload(p: &mut Payload<'_>) -> Self {
            let name = p.required_text("name");
            let count = p.required("count");
            p.check("count", (0..=10).contains(&count), "must be between 0 and 10");
            Self {
                name,
                count,
                nickname: p.optional("nickname"),
                color: p.patch("color"),
            }
        }
    }

    #[test]
    fn aggregates_every_violation() {
        let errors = parse_payload::<Contact>(&json!({ "name": "  ", "nickname": 3 })).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["name", "count", "nickname"]);
        assert!(errors.to_string().starts_with("name: must not be empty; count: field required"));
    }

    #[test]
    fn range_checks_run_after_type_checks() {
        let errors = parse_payload::<Contact>(&json!({ "name": "x", "count": 150 })).unwrap_err();
        assert_eq!(errors.to_string(), "count: must be between 0 and 10");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let absent = parse_payload::<Contact>(&json!({ "name": "x", "count": 1 })).unwrap();
        assert_eq!(absent.color, Patch::Unchanged);

        let cleared = parse_payload::<Contact>(&json!({ "name": "x", "count": 1, "color": null })).unwrap();
        assert_eq!(cleared.color, Patch::Set(None));

        let set = parse_payload::<Contact>(&json!({ "name": "x", "count": 1, "color": "red" })).unwrap();
        assert_eq!(set.color, Patch::Set(Some("red".to_string())));
        assert_eq!(set.name, "x");
        assert_eq!(set.count, 1);
        assert!(set.nickname.is_none());
    }

    #[test]
    fn rejects_non_object_bodies() {
        let errors = parse_payload::<Contact>(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.to_string(), "body: must be a JSON object");
    }

    #[test]
    fn patch_apply_only_touches_set_fields() {
        let mut value = 5;
        Patch::Unchanged.apply_to(&mut value);
        assert_eq!(value, 5);
        Patch::Set(7).apply_to(&mut value);
        assert_eq!(value, 7);
    }

    #[test]
    fn slug_shape() {
        assert!(is_valid_slug("fintech-platform"));
        assert!(is_valid_slug("hit2"));
        assert!(!is_valid_slug("Fintech"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("not-an-email"));
    }
}
