//! JARM response token claims.

use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::signer::MapClaims;

/// The claim set of a JWT-secured authorization response token.
///
/// `extra` carries the flattened response parameters alongside the
/// well-known fields. Timestamps are second-precision; absent (`None`)
/// timestamps are omitted from the externalized mapping rather than
/// serialized as epoch zero, and the externalized `jti` is never empty —
/// a fresh unique id is synthesized on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JarmClaims {
    /// Token issuer.
    pub issuer: String,

    /// Intended audience, the requesting client's identifier.
    pub audience: Vec<String>,

    /// Unique token identifier.
    pub jti: String,

    /// When the token was issued.
    pub issued_at: Option<OffsetDateTime>,

    /// When the token expires.
    pub expires_at: Option<OffsetDateTime>,

    /// Additional claims, including the flattened response parameters.
    pub extra: MapClaims,
}

impl JarmClaims {
    /// Adds a key/value pair to the extra claims.
    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }

    /// Returns the externalized value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().get(key).cloned()
    }

    /// Externalizes the claims as a generic JWT claim mapping.
    ///
    /// `iss` is omitted when empty, `jti` is synthesized when empty, `aud`
    /// is always a list (possibly empty), and `iat`/`exp` are emitted as
    /// integer seconds since the epoch, omitted when unset.
    #[must_use]
    pub fn to_map(&self) -> MapClaims {
        let mut map = self.extra.clone();

        if self.issuer.is_empty() {
            map.remove("iss");
        } else {
            map.insert("iss".to_string(), Value::String(self.issuer.clone()));
        }

        let jti = if self.jti.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            self.jti.clone()
        };
        map.insert("jti".to_string(), Value::String(jti));

        map.insert(
            "aud".to_string(),
            Value::Array(
                self.audience
                    .iter()
                    .map(|aud| Value::String(aud.clone()))
                    .collect(),
            ),
        );

        match self.issued_at {
            Some(iat) => {
                map.insert("iat".to_string(), Value::from(iat.unix_timestamp()));
            }
            None => {
                map.remove("iat");
            }
        }

        match self.expires_at {
            Some(exp) => {
                map.insert("exp".to_string(), Value::from(exp.unix_timestamp()));
            }
            None => {
                map.remove("exp");
            }
        }

        map
    }

    /// Rebuilds claims from a generic JWT claim mapping.
    ///
    /// `aud` tolerates a single string or a list of strings; `iat`/`exp`
    /// tolerate numeric and textual timestamp encodings. Every other key is
    /// preserved verbatim in `extra`.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut claims = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "jti" => {
                    if let Some(jti) = value.as_str() {
                        claims.jti = jti.to_string();
                    }
                }
                "iss" => {
                    if let Some(issuer) = value.as_str() {
                        claims.issuer = issuer.to_string();
                    }
                }
                "aud" => match value {
                    Value::String(aud) => claims.audience = vec![aud.clone()],
                    Value::Array(entries) => {
                        claims.audience = entries
                            .iter()
                            .filter_map(Value::as_str)
                            .map(ToString::to_string)
                            .collect();
                    }
                    _ => {}
                },
                "iat" => claims.issued_at = timestamp_from(value),
                "exp" => claims.expires_at = timestamp_from(value),
                _ => {
                    claims.extra.insert(key.clone(), value.clone());
                }
            }
        }
        claims
    }
}

/// Parses a second-precision timestamp from a numeric or textual claim value.
fn timestamp_from(value: &Value) -> Option<OffsetDateTime> {
    let seconds = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.parse::<i64>().ok()?,
        _ => return None,
    };
    OffsetDateTime::from_unix_timestamp(seconds).ok()
}
