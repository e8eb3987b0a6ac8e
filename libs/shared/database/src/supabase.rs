use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::{StoreError, StoreResult};

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> StoreResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|_| StoreError::Backend("service key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|_| StoreError::Backend("service key is not a valid header value".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("PostgREST error ({}): {}", status, error_text);
            return Err(classify_error(status, &error_text));
        }

        let bytes = response.bytes().await?;
        // 204 and `return=minimal` carry no body.
        let data = if bytes.is_empty() {
            serde_json::from_value(Value::Null)?
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(data)
    }

    /// Calls a stored procedure. Each procedure runs in its own transaction.
    pub async fn rpc<T>(&self, function: &str, args: Value) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/rpc/{}", function);
        self.request(Method::POST, &path, Some(args)).await
    }

    /// Headers asking PostgREST to echo the written rows back.
    pub fn return_representation() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

/// Maps a PostgREST failure onto the store taxonomy using the SQLSTATE when
/// one is present.
fn classify_error(status: StatusCode, body: &str) -> StoreError {
    let parsed: Option<PostgrestError> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.clone()).unwrap_or_default();
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone().or_else(|| e.details.clone()))
        .unwrap_or_else(|| body.to_string());

    match code.as_str() {
        // unique_violation, foreign_key_violation, object_not_in_prerequisite_state
        "23505" | "23503" | "55000" => StoreError::Conflict(message),
        // no_data_found, raised by the procedures
        "P0002" => StoreError::NotFound(message),
        // invalid_parameter_value, invalid_text_representation, check_violation
        "22023" | "22P02" | "23514" => StoreError::Invalid(message),
        _ => match status {
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            StatusCode::CONFLICT => StoreError::Conflict(message),
            _ => StoreError::Backend(format!("PostgREST error ({}): {}", status, message)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlstate_drives_classification() {
        let body = r#"{"code":"23505","message":"slot unavailable","details":null,"hint":null}"#;
        assert_eq!(
            classify_error(StatusCode::CONFLICT, body),
            StoreError::Conflict("slot unavailable".to_string())
        );

        let body = r#"{"code":"P0002","message":"Doctor not found"}"#;
        assert_eq!(
            classify_error(StatusCode::BAD_REQUEST, body),
            StoreError::NotFound("Doctor not found".to_string())
        );

        let body = r#"{"code":"23503","message":"update or delete on table \"specializations\" violates foreign key constraint"}"#;
        assert!(matches!(classify_error(StatusCode::CONFLICT, body), StoreError::Conflict(_)));
    }

    #[test]
    fn unknown_failures_are_backend_errors() {
        let err = classify_error(StatusCode::INTERNAL_SERVER_ERROR, "upstream timed out");
        assert!(matches!(err, StoreError::Backend(msg) if msg.contains("upstream timed out")));
    }
}
