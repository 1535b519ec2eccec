//! Wire types for the RuStore backend API.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "code": "OK", "message": null, "body": { ... } }
//! ```
//!
//! The envelope is decoded into [`StoreResponse`], so the "code is not OK"
//! branch is an explicit variant instead of a missing key.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FetchError, FetchResult};

/// Envelope code signalling success.
pub const CODE_OK: &str = "OK";

/// Internal application identifier assigned by the store.
///
/// The backend currently returns a number, but the value is only ever echoed
/// back, so a string form is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppId {
    Number(u64),
    Text(String),
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppId::Number(n) => write!(f, "{}", n),
            AppId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Body of `GET /applicationData/overallInfo/{package}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub app_id: AppId,

    /// Release notes of the current version.
    ///
    /// `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub whats_new: Option<Option<String>>,

    #[serde(default)]
    pub app_name: Option<String>,

    #[serde(default)]
    pub package_name: Option<String>,
}

/// Body of `POST /applicationData/download-link`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLinkInfo {
    /// Signed, time-limited URL of the package payload.
    pub apk_url: String,
}

/// Request body of `POST /applicationData/download-link`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLinkRequest<'a> {
    pub app_id: &'a AppId,
    pub first_install: bool,
}

/// Decoded backend answer.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreResponse<T> {
    /// `code == "OK"` with a well-formed body.
    Ok(T),
    /// Any other code.
    Err { code: String, reason: String },
}

/// Marks a key as present, keeping an explicit `null` distinct from absence.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    body: Option<serde_json::Value>,
}

/// Decode an envelope returned from `url`.
///
/// A non-JSON body, or an `OK` envelope whose body does not match `T`, is an
/// [`FetchError::InvalidResponse`].
pub fn decode_response<T: DeserializeOwned>(
    url: &str,
    bytes: &[u8],
) -> FetchResult<StoreResponse<T>> {
    let envelope: Envelope =
        serde_json::from_slice(bytes).map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let code = envelope.code.unwrap_or_default();
    if code != CODE_OK {
        let reason = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("backend returned code '{}'", code));
        return Ok(StoreResponse::Err { code, reason });
    }

    let body = envelope.body.ok_or_else(|| FetchError::InvalidResponse {
        url: url.to_string(),
        reason: "missing body in OK response".to_string(),
    })?;

    serde_json::from_value(body)
        .map(StoreResponse::Ok)
        .map_err(|e| FetchError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://backapi.rustore.ru/test";

    #[test]
    fn test_decode_application_info() {
        let json = br#"{"code":"OK","body":{"appId":12345,"whatsNew":"Fixes","appName":"Max"}}"#;
        let response: StoreResponse<ApplicationInfo> = decode_response(URL, json).unwrap();

        match response {
            StoreResponse::Ok(info) => {
                assert_eq!(info.app_id, AppId::Number(12345));
                assert_eq!(info.whats_new, Some(Some("Fixes".to_string())));
                assert_eq!(info.app_name.as_deref(), Some("Max"));
                assert_eq!(info.package_name, None);
            }
            other => panic!("expected Ok, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_string_app_id() {
        let json = br#"{"code":"OK","body":{"appId":"abc-1"}}"#;
        let response: StoreResponse<ApplicationInfo> = decode_response(URL, json).unwrap();
        assert!(matches!(response, StoreResponse::Ok(ref i) if i.app_id == AppId::Text("abc-1".to_string())));
    }

    #[test]
    fn test_whats_new_null_differs_from_absent() {
        let null = br#"{"code":"OK","body":{"appId":1,"whatsNew":null}}"#;
        let absent = br#"{"code":"OK","body":{"appId":1}}"#;

        let null: StoreResponse<ApplicationInfo> = decode_response(URL, null).unwrap();
        let absent: StoreResponse<ApplicationInfo> = decode_response(URL, absent).unwrap();

        assert!(matches!(null, StoreResponse::Ok(ref i) if i.whats_new == Some(None)));
        assert!(matches!(absent, StoreResponse::Ok(ref i) if i.whats_new.is_none()));
    }

    #[test]
    fn test_decode_error_code_uses_message() {
        let json = br#"{"code":"ERROR","message":"Application not found","body":null}"#;
        let response: StoreResponse<ApplicationInfo> = decode_response(URL, json).unwrap();
        assert_eq!(
            response,
            StoreResponse::Err {
                code: "ERROR".to_string(),
                reason: "Application not found".to_string()
            }
        );
    }

    #[test]
    fn test_decode_error_without_message() {
        let json = br#"{"code":"NOT_FOUND"}"#;
        let response: StoreResponse<DownloadLinkInfo> = decode_response(URL, json).unwrap();
        match response {
            StoreResponse::Err { reason, .. } => assert!(reason.contains("NOT_FOUND")),
            other => panic!("expected Err, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_code_is_not_ok() {
        let json = br#"{"body":{"apkUrl":"https://cdn/x.apk"}}"#;
        let response: StoreResponse<DownloadLinkInfo> = decode_response(URL, json).unwrap();
        assert!(matches!(response, StoreResponse::Err { .. }));
    }

    #[test]
    fn test_ok_without_body_is_invalid() {
        let json = br#"{"code":"OK"}"#;
        let err = decode_response::<DownloadLinkInfo>(URL, json).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse { .. }));
    }

    #[test]
    fn test_non_json_is_invalid() {
        let err = decode_response::<DownloadLinkInfo>(URL, b"<html>502</html>").unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse { ref url, .. } if url == URL));
    }

    #[test]
    fn test_download_link_request_serialization() {
        let id = AppId::Number(42);
        let body = serde_json::to_value(DownloadLinkRequest {
            app_id: &id,
            first_install: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"appId": 42, "firstInstall": true}));
    }
}
