//! Résumé Record — the JSON shape posted by the CV form.
//!
//! Every field except `name` is optional. Absent keys and explicit `null`s both
//! decode to empty values so the layout engine only ever has to test for emptiness.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::AppError;

pub const NAME_REQUIRED: &str = "Name is required";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "text_field")]
    pub name: String,
    #[serde(deserialize_with = "text_field")]
    pub city: String,
    #[serde(deserialize_with = "text_field")]
    pub state: String,
    #[serde(deserialize_with = "text_field")]
    pub email: String,
    #[serde(deserialize_with = "text_field")]
    pub phone_number: String,
    #[serde(deserialize_with = "text_field")]
    pub linkedin: String,

    #[serde(deserialize_with = "text_field")]
    pub career_objective: String,

    #[serde(deserialize_with = "text_field")]
    pub technical_skills: String,
    #[serde(deserialize_with = "text_field")]
    pub technical_level: String,
    #[serde(deserialize_with = "text_field")]
    pub transferable_skills: String,

    #[serde(deserialize_with = "list_field")]
    pub educations: Vec<EducationEntry>,
    #[serde(deserialize_with = "list_field")]
    pub achievements: Vec<AchievementEntry>,
    #[serde(deserialize_with = "list_field")]
    pub certificates: Vec<CertificateEntry>,

    #[serde(deserialize_with = "text_field")]
    pub reference_name: String,
    #[serde(deserialize_with = "text_field")]
    pub reference_role: String,
    #[serde(deserialize_with = "text_field")]
    pub reference_department: String,
    #[serde(deserialize_with = "text_field")]
    pub reference_institution: String,
    #[serde(deserialize_with = "text_field")]
    pub reference_email: String,
    #[serde(deserialize_with = "text_field")]
    pub reference_phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "text_field")]
    pub education_title: String,
    #[serde(deserialize_with = "text_field")]
    pub education_years: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementEntry {
    #[serde(deserialize_with = "text_field")]
    pub achievement_title: String,
    #[serde(deserialize_with = "text_field")]
    pub achievement_year: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateEntry {
    #[serde(deserialize_with = "text_field")]
    pub certificate_title: String,
    #[serde(deserialize_with = "text_field")]
    pub certificate_year: String,
}

impl ResumeRecord {
    pub fn has_skills(&self) -> bool {
        !(self.technical_skills.is_empty()
            && self.technical_level.is_empty()
            && self.transferable_skills.is_empty())
    }
}

/// Checks the raw payload for a usable `name` before any decoding or rendering happens.
///
/// Absent, non-string, empty and whitespace-only names are all rejected.
pub fn validate_name(payload: &Value) -> Result<&str, AppError> {
    payload
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::Validation(NAME_REQUIRED.to_string()))
}

/// Accepts strings, numbers and booleans (form builders send years as numbers).
/// `null` becomes the empty string; objects and arrays are rejected.
fn text_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {}",
            kind_of(&other)
        ))),
    }
}

fn list_field<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
