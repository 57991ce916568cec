//! Settings endpoints. Reads are open to any authenticated user; writes
//! are admin only.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use pharma_core::{Setting, SettingType};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::audit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: Option<String>,
    #[serde(default)]
    pub setting_type: SettingType,
    pub description: Option<String>,
}

/// `GET /api/settings`
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Setting>>, ApiError> {
    Ok(Json(state.db.settings().list().await?))
}

/// `GET /api/settings/{key}`
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<Setting>, ApiError> {
    let setting = state
        .db
        .settings()
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Setting not found: {key}")))?;

    Ok(Json(setting))
}

/// `PUT /api/settings/{key}`
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(req): Json<UpdateSettingRequest>,
) -> Result<Json<Setting>, ApiError> {
    auth.require_admin()?;

    let setting = state
        .db
        .settings()
        .upsert(
            &key,
            req.value.as_deref(),
            req.setting_type,
            req.description.as_deref(),
        )
        .await?;

    audit::record_activity(
        &state.db,
        pharma_core::NewActivityEntry {
            user_id: auth.user_id,
            action: "UPDATE_SETTING".to_string(),
            table_name: Some("settings".to_string()),
            new_values: serde_json::to_string(&setting).ok(),
            ..Default::default()
        },
    )
    .await;

    Ok(Json(setting))
}

/// `PUT /api/settings`
///
/// Upserts every key in the body in one request; the stored type tag is
/// inferred from each JSON value. Keys absent from the body are left
/// untouched.
pub async fn update_all(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<Vec<Setting>>, ApiError> {
    auth.require_admin()?;

    for (key, value) in &body {
        let (setting_type, stored) = classify(value);
        state
            .db
            .settings()
            .upsert(key, stored.as_deref(), setting_type, None)
            .await?;
    }

    audit::record_activity(
        &state.db,
        pharma_core::NewActivityEntry {
            user_id: auth.user_id,
            action: "UPDATE_SETTINGS".to_string(),
            table_name: Some("settings".to_string()),
            new_values: serde_json::to_string(&body).ok(),
            ..Default::default()
        },
    )
    .await;

    Ok(Json(state.db.settings().list().await?))
}

/// Maps a JSON value to its stored type tag and string form.
fn classify(value: &Value) -> (SettingType, Option<String>) {
    match value {
        Value::Null => (SettingType::String, None),
        Value::Bool(b) => (SettingType::Boolean, Some(b.to_string())),
        Value::Number(n) => (SettingType::Number, Some(n.to_string())),
        Value::String(s) => (SettingType::String, Some(s.clone())),
        other => (SettingType::Json, Some(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_infers_setting_types() {
        assert_eq!(
            classify(&json!("PharmaCare")),
            (SettingType::String, Some("PharmaCare".to_string()))
        );
        assert_eq!(
            classify(&json!(42)),
            (SettingType::Number, Some("42".to_string()))
        );
        assert_eq!(
            classify(&json!(true)),
            (SettingType::Boolean, Some("true".to_string()))
        );
        assert_eq!(
            classify(&json!({"hours": "9-18"})),
            (SettingType::Json, Some(r#"{"hours":"9-18"}"#.to_string()))
        );
        assert_eq!(classify(&Value::Null), (SettingType::String, None));
    }
}
