//! Running service instance record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Labels, Token};
use crate::error::{Result, TokenError};
use crate::service::ServiceFactory;

/// One running instance of a named, versioned service.
///
/// Built once at startup by [`ServiceFactory::new_service`] and never mutated
/// afterwards. The serialized field names match the record shape existing
/// consumers parse: `Name`, `BuildID`, `Token`, `Labels`, `CreatedAt`.
/// Decoding rejects records whose token is nil.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ServiceRecord")]
pub struct Service {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "BuildID")]
    build_id: String,

    #[serde(rename = "Token")]
    token: Token,

    #[serde(rename = "Labels", default)]
    labels: Labels,

    #[serde(rename = "CreatedAt")]
    created_at: DateTime<Utc>,
}

/// Wire shape of a [`Service`] before validation.
#[derive(Deserialize)]
struct ServiceRecord {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "BuildID")]
    build_id: String,

    #[serde(rename = "Token")]
    token: Token,

    #[serde(rename = "Labels", default)]
    labels: Labels,

    #[serde(rename = "CreatedAt")]
    created_at: DateTime<Utc>,
}

impl TryFrom<ServiceRecord> for Service {
    type Error = TokenError;

    fn try_from(record: ServiceRecord) -> std::result::Result<Self, Self::Error> {
        if record.token.is_nil() {
            return Err(TokenError::Nil);
        }
        Ok(Self::from_parts(
            record.name,
            record.build_id,
            record.token,
            record.labels,
            record.created_at,
        ))
    }
}

impl Service {
    /// Create a service record using the process-wide factory.
    ///
    /// Mints a fresh token and stamps the current UTC time.
    #[must_use]
    pub fn new(name: impl Into<String>, build_id: impl Into<String>, labels: Labels) -> Self {
        ServiceFactory::global().new_service(name, build_id, labels)
    }

    /// Assemble a record from already-minted parts.
    pub(crate) const fn from_parts(
        name: String,
        build_id: String,
        token: Token,
        labels: Labels,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            build_id,
            token,
            labels,
            created_at,
        }
    }

    /// Service or component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build or version marker.
    #[must_use]
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Unique instance handle.
    #[must_use]
    pub const fn token(&self) -> Token {
        self.token
    }

    /// Instance labels.
    #[must_use]
    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    /// When the instance record was created (UTC).
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Render as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a record produced by [`Service::to_json_pretty`] or any
    /// consumer emitting the same shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the token is missing,
    /// invalid or nil.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn sample() -> Service {
        Service::from_parts(
            "render-worker".to_string(),
            "build-42".to_string(),
            Token::parse("9m4e2mr0ui3e8a215n4g").unwrap(),
            Labels::from([("region", "us-east")]),
            Utc.with_ymd_and_hms(2026, 1, 23, 8, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_uses_global_factory() {
        let before = Utc::now();
        let service = Service::new("api", "v1", Labels::new());
        let after = Utc::now();

        assert_eq!(service.name(), "api");
        assert_eq!(service.build_id(), "v1");
        assert!(!service.token().is_nil());
        assert!(service.labels().is_empty());
        assert!(before <= service.created_at() && service.created_at() <= after);
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Name": "render-worker",
                "BuildID": "build-42",
                "Token": "9m4e2mr0ui3e8a215n4g",
                "Labels": { "region": "us-east" },
                "CreatedAt": "2026-01-23T08:30:00Z"
            })
        );
    }

    #[test]
    fn test_to_json_pretty() {
        let json = sample().to_json_pretty().unwrap();
        assert!(json.contains("\n  \"Token\": \"9m4e2mr0ui3e8a215n4g\""));
    }

    #[test]
    fn test_json_round_trip() {
        let service = sample();
        let json = serde_json::to_string(&service).unwrap();
        let decoded: Service = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, service);
    }

    #[test]
    fn test_json_rejects_malformed_token() {
        let json = r#"{"Name":"a","BuildID":"b","Token":"bogus","Labels":{},"CreatedAt":"2026-01-23T08:30:00Z"}"#;
        assert!(serde_json::from_str::<Service>(json).is_err());
    }

    #[test]
    fn test_json_rejects_nil_token() {
        for token in [r#""00000000000000000000""#, "null"] {
            let json = format!(
                r#"{{"Name":"a","BuildID":"b","Token":{token},"Labels":{{}},"CreatedAt":"2026-01-23T08:30:00Z"}}"#
            );
            let err = serde_json::from_str::<Service>(&json).unwrap_err();
            assert!(err.to_string().contains("Service token cannot be nil"));
        }
    }

    #[test]
    fn test_from_json() {
        let service = sample();
        let decoded = Service::from_json(&service.to_json_pretty().unwrap()).unwrap();
        assert_eq!(decoded, service);

        let err = Service::from_json("{}").unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::SERIALIZATION);
    }

    #[test]
    fn test_json_missing_labels_defaults_to_empty() {
        let json = r#"{"Name":"a","BuildID":"b","Token":"9m4e2mr0ui3e8a215n4g","CreatedAt":"2026-01-23T08:30:00Z"}"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert!(service.labels().is_empty());
    }
}
