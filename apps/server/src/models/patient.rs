//! Patient documents and their embedded test results

use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

/// A newly added test reading above this value marks the patient critical.
pub const ADD_TEST_CRITICAL_THRESHOLD: f64 = 5.0;

/// An updated test reading above this value marks the patient critical.
pub const UPDATE_TEST_CRITICAL_THRESHOLD: f64 = 6.0;

/// Required fields for `POST /patients`, in check order.
pub const CREATE_PATIENT_FIELDS: [(&str, &str); 5] = [
    ("name", "name must be supplied"),
    ("age", "age must be supplied"),
    ("email", "email must be supplied"),
    ("phone_number", "phone_number must be supplied"),
    ("house_address", "house_address must be supplied"),
];

/// Required fields for `PUT /patients/:id`, in check order.
pub const UPDATE_PATIENT_FIELDS: [(&str, &str); 5] = [
    ("name", "name must be supplied"),
    ("age", "age must be supplied"),
    ("email", "email must be supplied"),
    ("phone_number", "phone number must be supplied"),
    ("house_address", "house address must be supplied"),
];

pub const TEST_FIELDS_MESSAGE: &str = "name and value must be supplied";

lazy_static! {
    static ref FLOAT_PREFIX: Regex =
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("float prefix pattern is valid");
}

/// Patient status derived from the latest test reading.
///
/// `PUT /patients/:id` stores whatever literal the client sends, so values
/// outside `normal`/`critical` are kept verbatim in [`Condition::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    #[default]
    Normal,
    Critical,
    Other(String),
}

impl Condition {
    /// Derive the condition from a test value against `threshold` (strictly greater).
    pub fn from_reading(value: Option<&str>, threshold: f64) -> Self {
        if parse_float_prefix(value.unwrap_or_default()) > threshold {
            Condition::Critical
        } else {
            Condition::Normal
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Normal => "normal",
            Condition::Critical => "critical",
            Condition::Other(s) => s,
        }
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        match value.as_str() {
            "normal" => Condition::Normal,
            "critical" => Condition::Critical,
            _ => Condition::Other(value),
        }
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        match value {
            Condition::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic measurement embedded in a patient document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub name: Option<String>,
    pub value: Option<String>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    #[serde(serialize_with = "serialize_number")]
    pub age: Option<f64>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub house_address: Option<String>,
    /// `None` only after a `PUT` that sent `"condition": null`.
    pub condition: Option<Condition>,
    /// Newest first.
    #[serde(default)]
    pub tests: Vec<Test>,
}

impl Patient {
    pub fn new(id: impl Into<String>, fields: PatientFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            age: fields.age,
            email: fields.email,
            phone_number: fields.phone_number,
            house_address: fields.house_address,
            condition: Some(Condition::Normal),
            tests: Vec::new(),
        }
    }

    /// Prepend a test with a fresh id and re-derive the condition.
    pub fn add_test(&mut self, fields: TestFields) -> &Test {
        let test = Test {
            name: fields.name,
            value: fields.value,
            id: Uuid::new_v4().to_string(),
        };
        self.condition = Some(Condition::from_reading(
            test.value.as_deref(),
            ADD_TEST_CRITICAL_THRESHOLD,
        ));
        self.tests.insert(0, test);
        &self.tests[0]
    }

    /// Update the named test in place, keeping its id and position.
    ///
    /// Returns `None` (and leaves the patient untouched) when no test has `test_id`.
    pub fn update_test(&mut self, test_id: &str, fields: TestFields) -> Option<&Test> {
        let test = self.tests.iter_mut().find(|t| t.id == test_id)?;
        test.name = fields.name;
        test.value = fields.value;
        self.condition = Some(Condition::from_reading(
            test.value.as_deref(),
            UPDATE_TEST_CRITICAL_THRESHOLD,
        ));
        Some(test)
    }

    /// Apply a full field replacement from `PUT /patients/:id`.
    pub fn apply_update(&mut self, update: PatientUpdate) {
        let PatientUpdate { fields, condition } = update;
        self.name = fields.name;
        self.age = fields.age;
        self.email = fields.email;
        self.phone_number = fields.phone_number;
        self.house_address = fields.house_address;
        if let Some(condition) = condition {
            self.condition = condition;
        }
    }
}

/// Scalar patient fields accepted on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientFields {
    pub name: Option<String>,
    #[serde(serialize_with = "serialize_number")]
    pub age: Option<f64>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub house_address: Option<String>,
}

impl PatientFields {
    /// Cast the body's values into document fields. Presence is checked separately.
    pub fn from_body(body: &JsonValue) -> Result<Self> {
        Ok(Self {
            name: cast_string("name", body.get("name"))?,
            age: cast_number("age", body.get("age"))?,
            email: cast_string("email", body.get("email"))?,
            phone_number: cast_string("phone_number", body.get("phone_number"))?,
            house_address: cast_string("house_address", body.get("house_address"))?,
        })
    }
}

/// Field replacement for `PUT /patients/:id`.
///
/// Serializes to the JSON merged into the stored document. `condition` is
/// `None` when the key was absent (omitted, the stored one survives) and
/// `Some(None)` when the client sent `null` (written as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientUpdate {
    #[serde(flatten)]
    pub fields: PatientFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Option<Condition>>,
}

impl PatientUpdate {
    pub fn from_body(body: &JsonValue) -> Result<Self> {
        Ok(Self {
            fields: PatientFields::from_body(body)?,
            condition: match body.get("condition") {
                None => None,
                Some(value) => Some(cast_string("condition", Some(value))?.map(Condition::from)),
            },
        })
    }
}

/// Name and value of a test, as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestFields {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl TestFields {
    pub fn from_body(body: &JsonValue) -> Result<Self> {
        if body.get("name").is_none() || body.get("value").is_none() {
            return Err(Error::Validation(TEST_FIELDS_MESSAGE.to_string()));
        }

        Ok(Self {
            name: cast_string("name", body.get("name"))?,
            value: cast_string("value", body.get("value"))?,
        })
    }
}

/// Fail with the message of the first absent key. `null` counts as present.
pub fn require_fields(body: &JsonValue, fields: &[(&str, &str)]) -> Result<()> {
    match fields.iter().find(|(key, _)| body.get(*key).is_none()) {
        Some((_, message)) => Err(Error::Validation((*message).to_string())),
        None => Ok(()),
    }
}

fn cast_string(field: &'static str, value: Option<&JsonValue>) -> Result<Option<String>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(Error::Cast {
            field,
            expected: "String",
            reason: format!("{other} is not a scalar value"),
        }),
    }
}

fn cast_number(field: &'static str, value: Option<&JsonValue>) -> Result<Option<f64>> {
    let cast_error = |reason: String| Error::Cast {
        field,
        expected: "Number",
        reason,
    };

    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| cast_error(format!("{n} is out of range"))),
        Some(JsonValue::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(cast_error(format!("\"{s}\" is not a number"))),
            }
        }
        Some(JsonValue::Bool(b)) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Some(other) => Err(cast_error(format!("{other} is not a number"))),
    }
}

/// Parse the longest numeric prefix of `s`, skipping leading whitespace.
///
/// Returns NaN when there is no numeric prefix, so comparisons against a
/// threshold are always false.
pub fn parse_float_prefix(s: &str) -> f64 {
    FLOAT_PREFIX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Whole numbers go out as JSON integers (`30`, not `30.0`).
fn serialize_number<S>(value: &Option<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    match value {
        Some(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
            serializer.serialize_i64(*n as i64)
        }
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}
