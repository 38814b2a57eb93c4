//! Endpoint inventory entities
//!
//! Each entity carries its field table. Decoding goes through
//! [`decode_strict`]; encoding uses serde with the same wire names and
//! omits attributes that were absent.

use super::decoder::decode_strict;
use super::types::{Field, Setter, StrictEntity};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Payloads shorter than this cannot hold an `attributes` wrapper
pub const MIN_PAYLOAD_LEN: usize = 10;

// ============================================================================
// Event
// ============================================================================

/// Last recorded event of an endpoint or of one of its users
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(rename = "event", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npa_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Seconds since the epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl StrictEntity for EventRecord {
    const NAME: &'static str = "EventRecord";
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "actor",
            setter: Setter::Text(|e, v| e.actor = Some(v)),
        },
        Field {
            name: "event",
            setter: Setter::Text(|e, v| e.name = Some(v)),
        },
        Field {
            name: "npa_status",
            setter: Setter::Text(|e, v| e.npa_status = Some(v)),
        },
        Field {
            name: "status",
            setter: Setter::Text(|e, v| e.status = Some(v)),
        },
        Field {
            name: "timestamp",
            setter: Setter::Number(|e, v| e.timestamp = Some(v)),
        },
    ];
}

impl EventRecord {
    /// Event time as a UTC datetime
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(epoch_to_utc)
    }
}

// ============================================================================
// Host
// ============================================================================

/// Device and operating system details of an endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(rename = "managementID", skip_serializing_if = "Option::is_none")]
    pub management_id: Option<String>,
    #[serde(rename = "os", skip_serializing_if = "Option::is_none")]
    pub os_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(rename = "nsdeviceuid", skip_serializing_if = "Option::is_none")]
    pub device_uid: Option<String>,
}

impl StrictEntity for HostRecord {
    const NAME: &'static str = "HostRecord";
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "device_make",
            setter: Setter::Text(|h, v| h.device_make = Some(v)),
        },
        Field {
            name: "device_model",
            setter: Setter::Text(|h, v| h.device_model = Some(v)),
        },
        Field {
            name: "hostname",
            setter: Setter::Text(|h, v| h.hostname = Some(v)),
        },
        Field {
            name: "managementID",
            setter: Setter::Text(|h, v| h.management_id = Some(v)),
        },
        Field {
            name: "os",
            setter: Setter::Text(|h, v| h.os_name = Some(v)),
        },
        Field {
            name: "os_version",
            setter: Setter::Text(|h, v| h.os_version = Some(v)),
        },
        Field {
            name: "nsdeviceuid",
            setter: Setter::Text(|h, v| h.device_uid = Some(v)),
        },
    ];
}

// ============================================================================
// User
// ============================================================================

/// A user signed in on an endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_classification_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<EventRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_unit: Option<String>,
    /// Seconds since the epoch
    #[serde(rename = "user_added_time", skip_serializing_if = "Option::is_none")]
    pub added_timestamp: Option<f64>,
    /// Group names as returned, duplicates kept
    #[serde(rename = "user_groups", skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(rename = "user_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "userkey", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl StrictEntity for UserRecord {
    const NAME: &'static str = "UserRecord";
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "_id",
            setter: Setter::Text(|u, v| u.id = Some(v)),
        },
        Field {
            name: "device_classification_status",
            setter: Setter::Text(|u, v| u.device_classification_status = Some(v)),
        },
        Field {
            name: "last_event",
            setter: Setter::Object(|u, m| {
                u.last_event = Some(decode_strict(m)?);
                Ok(())
            }),
        },
        Field {
            name: "organization_unit",
            setter: Setter::Text(|u, v| u.organization_unit = Some(v)),
        },
        Field {
            name: "user_added_time",
            setter: Setter::Number(|u, v| u.added_timestamp = Some(v)),
        },
        Field {
            name: "user_groups",
            setter: Setter::TextList(|u, v| u.groups = v),
        },
        Field {
            name: "user_source",
            setter: Setter::Text(|u, v| u.source = Some(v)),
        },
        Field {
            name: "userkey",
            setter: Setter::Text(|u, v| u.key = Some(v)),
        },
        Field {
            name: "username",
            setter: Setter::Text(|u, v| u.username = Some(v)),
        },
    ];
}

impl UserRecord {
    /// When the user was added, as a UTC datetime
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.added_timestamp.and_then(epoch_to_utc)
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// A client endpoint as reported by the clients API
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EndpointRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Seconds since the epoch
    #[serde(rename = "client_install_time", skip_serializing_if = "Option::is_none")]
    pub install_timestamp: Option<f64>,
    #[serde(rename = "client_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_info: Option<HostRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<EventRecord>,
}

impl StrictEntity for EndpointRecord {
    const NAME: &'static str = "EndpointRecord";
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "_id",
            setter: Setter::Text(|c, v| c.id = Some(v)),
        },
        Field {
            name: "device_id",
            setter: Setter::Text(|c, v| c.device_id = Some(v)),
        },
        Field {
            name: "client_install_time",
            setter: Setter::Number(|c, v| c.install_timestamp = Some(v)),
        },
        Field {
            name: "client_version",
            setter: Setter::Text(|c, v| c.version = Some(v)),
        },
        Field {
            name: "users",
            setter: Setter::ObjectList(|c, m| {
                c.users.push(decode_strict(m)?);
                Ok(())
            }),
        },
        Field {
            name: "host_info",
            setter: Setter::Object(|c, m| {
                c.host_info = Some(decode_strict(m)?);
                Ok(())
            }),
        },
        Field {
            name: "last_event",
            setter: Setter::Object(|c, m| {
                c.last_event = Some(decode_strict(m)?);
                Ok(())
            }),
        },
    ];
}

impl EndpointRecord {
    /// Decode one raw `{"attributes": {...}}` record
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_PAYLOAD_LEN {
            return Err(Error::PayloadTooShort {
                entity: Self::NAME,
                len: bytes.len(),
            });
        }
        let value: JsonValue = serde_json::from_slice(bytes)
            .map_err(|e| Error::decode(format!("failed to unpack {}: {e}", Self::NAME)))?;
        Self::from_value(&value)
    }

    /// Decode an already parsed record, unwrapping `attributes`
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let attributes = value.get("attributes").ok_or(Error::MissingAttributes {
            entity: Self::NAME,
        })?;
        let map = attributes.as_object().ok_or_else(|| Error::TypeMismatch {
            entity: Self::NAME,
            key: "attributes".to_string(),
            expected: "an object",
            value: attributes.clone(),
        })?;
        decode_strict(map)
    }

    /// Serialize to a single-line JSON object
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Re-wrap the record the way the API delivers it
    pub fn to_attributes(&self) -> Result<JsonValue> {
        Ok(serde_json::json!({ "attributes": serde_json::to_value(self)? }))
    }

    /// Client install time as a UTC datetime
    pub fn installed_at(&self) -> Option<DateTime<Utc>> {
        self.install_timestamp.and_then(epoch_to_utc)
    }
}

// ============================================================================
// Page envelope
// ============================================================================

/// One page of the clients API response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageResponse {
    #[serde(rename = "success", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "msg", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "data")]
    pub records: Vec<EndpointRecord>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default, rename = "success")]
    status: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<Vec<Box<RawValue>>>,
}

impl PageResponse {
    /// Decode a response body; the envelope tolerates extra keys, records do not
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let envelope: RawEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| Error::decode(format!("failed unmarshalling response: {e}")))?;

        let raw_records = envelope.data.unwrap_or_default();
        let mut records = Vec::with_capacity(raw_records.len());
        for (i, raw) in raw_records.iter().enumerate() {
            let record = EndpointRecord::from_slice(raw.get().as_bytes())
                .map_err(|e| Error::nested("PageResponse", format!("data[{i}]"), e))?;
            records.push(record);
        }

        Ok(Self {
            status: envelope.status,
            message: envelope.msg,
            records,
        })
    }

    /// True when the envelope reports `"success"`
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the page carries no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn epoch_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}
