// ==================== USER REGISTRATION ====================
// Validação, checagem de duplicidade e listagem de usuários

use crate::{
    database::{StoreError, UserStore},
    models::{number_to_json, NewUser, UserRecord},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==================== REQUEST/RESPONSE MODELS ====================

/// Body of `POST /addUser`. Fields stay untyped until the required-field
/// check has run, so `{"age": "30"}` and `{"age": 0}` reach the pipeline.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AddUserRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Ada")]
    pub name: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 30)]
    pub age: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum AddUserError {
    #[error("Both name and age are required.")]
    MissingFields,
    #[error("User already exists.")]
    AlreadyExists,
    #[error("cast to {expected} failed for field '{field}'")]
    Cast {
        field: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ==================== SERVICE FUNCTIONS ====================

/// Required-field check, duplicate check, then insert.
///
/// The lookup and the insert are separate round-trips: two concurrent
/// requests for the same unused name can both pass the lookup. Only a unique
/// index (surfaced as `StoreError::Duplicate`) closes that window.
pub async fn add_user(
    store: &dyn UserStore,
    request: AddUserRequest,
) -> Result<UserRecord, AddUserError> {
    if !is_truthy(request.name.as_ref()) || !is_truthy(request.age.as_ref()) {
        return Err(AddUserError::MissingFields);
    }

    let name = cast_name(request.name)?;

    let existing = store.find_by_name(&name).await?;
    if !existing.is_empty() {
        return Err(AddUserError::AlreadyExists);
    }

    // Only the lookup needs `name` typed; `age` is cast at write time.
    let age = cast_age(request.age)?;

    match store.insert(NewUser::new(name, age)).await {
        Ok(record) => Ok(record),
        Err(StoreError::Duplicate(_)) => Err(AddUserError::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

pub async fn list_users(store: &dyn UserStore) -> Result<Vec<UserRecord>, StoreError> {
    store.list_all().await
}

/// `null`, `false`, `0`, and `""` count as missing.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn cast_name(value: Option<Value>) -> Result<String, AddUserError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Some(Value::Number(n)) => Ok(match n.as_f64() {
            Some(f) => number_to_json(f).to_string(),
            None => n.to_string(),
        }),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(AddUserError::Cast {
            field: "name",
            expected: "string",
        }),
    }
}

fn cast_age(value: Option<Value>) -> Result<f64, AddUserError> {
    let age = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(true)) => Some(1.0),
        _ => None,
    };

    age.filter(|a| a.is_finite()).ok_or(AddUserError::Cast {
        field: "age",
        expected: "number",
    })
}
