use chrono::{SecondsFormat, TimeZone, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME_MIN_LEN: usize = 1;
pub const NAME_MAX_LEN: usize = 200;

/// Documento da collection "users"
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub age: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
    #[serde(rename = "__v", default)]
    pub version: i32,
}

/// A record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub age: f64,
    pub created_at: Option<DateTime>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, age: f64) -> Self {
        Self {
            name: name.into(),
            age,
            created_at: None,
        }
    }

    /// Shape checks applied by every store before a record is written.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.name.chars().count();
        if len < NAME_MIN_LEN {
            return Err("name is required".to_string());
        }
        if len > NAME_MAX_LEN {
            return Err(format!(
                "name is longer than the maximum allowed length ({})",
                NAME_MAX_LEN
            ));
        }
        if !self.age.is_finite() {
            return Err(format!("age must be a number, got {}", self.age));
        }
        Ok(())
    }

    pub fn into_record(self) -> UserRecord {
        UserRecord {
            id: ObjectId::new(),
            name: self.name,
            age: self.age,
            created_at: self.created_at.unwrap_or_else(DateTime::now),
            version: 0,
        }
    }
}

/// JSON form of a stored record as returned by `GET /fetchUser`.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[schema(value_type = f64)]
    pub age: Value,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "__v")]
    pub version: i32,
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            name: record.name.clone(),
            age: number_to_json(record.age),
            created_at: format_timestamp(record.created_at),
            version: record.version,
        }
    }
}

/// Integral values are emitted as JSON integers (`30`, not `30.0`).
pub fn number_to_json(value: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(timestamp: DateTime) -> String {
    match Utc.timestamp_millis_opt(timestamp.timestamp_millis()).single() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => timestamp.to_string(),
    }
}
