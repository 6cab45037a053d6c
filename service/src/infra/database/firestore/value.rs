//! Wire representation of Firestore REST documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Firestore document.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name of this [`Document`], absent on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Fields of this [`Document`].
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,

    /// Time this [`Document`] was created at, output only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    /// Time this [`Document`] was last updated at, output only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Returns the ID of this [`Document`]: the last segment of its resource
    /// name.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.name.as_deref().and_then(|n| n.rsplit('/').next())
    }

    /// Returns the field with the first present of the given `aliases`.
    ///
    /// Documents written by older application versions name some fields
    /// differently per collection, so reads probe every known alias.
    #[must_use]
    pub fn field(&self, aliases: &[&str]) -> Option<&Value> {
        aliases.iter().find_map(|a| self.fields.get(*a))
    }
}

/// Typed value of a [`Document`] field.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Value {
    /// Null value.
    #[serde(rename = "nullValue")]
    Null(()),

    /// Boolean value.
    #[serde(rename = "booleanValue")]
    Boolean(bool),

    /// 64-bit integer value, transported as a decimal string.
    #[serde(rename = "integerValue")]
    Integer(String),

    /// Double value.
    #[serde(rename = "doubleValue")]
    Double(f64),

    /// Timestamp value in RFC 3339 format.
    #[serde(rename = "timestampValue")]
    Timestamp(String),

    /// String value.
    #[serde(rename = "stringValue")]
    String(String),

    /// Reference to another [`Document`], as a full resource name.
    #[serde(rename = "referenceValue")]
    Reference(String),

    /// Geographical point value.
    #[serde(rename = "geoPointValue")]
    GeoPoint(LatLng),

    /// Array value.
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),

    /// Map value.
    #[serde(rename = "mapValue")]
    Map(MapValue),
}

impl Value {
    /// Creates a new string [`Value`].
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Creates a new integer [`Value`].
    #[must_use]
    pub fn integer(i: i64) -> Self {
        Self::Integer(i.to_string())
    }

    /// Creates a new array [`Value`] of the given `values`.
    #[must_use]
    pub fn array(values: Vec<Self>) -> Self {
        Self::Array(ArrayValue { values })
    }

    /// Creates a new geographical point [`Value`].
    #[must_use]
    pub fn geo_point(latitude: f64, longitude: f64) -> Self {
        Self::GeoPoint(LatLng {
            latitude,
            longitude,
        })
    }

    /// Returns the string behind this [`Value`], if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Null(())
            | Self::Boolean(_)
            | Self::Integer(_)
            | Self::Double(_)
            | Self::Timestamp(_)
            | Self::Reference(_)
            | Self::GeoPoint(_)
            | Self::Array(_)
            | Self::Map(_) => None,
        }
    }

    /// Returns the boolean behind this [`Value`], if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Returns the integer behind this [`Value`], if it is one.
    ///
    /// Doubles are truncated, as numeric fields written by loosely typed
    /// clients may arrive either way.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "intentional truncation"
    )]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(s) => s.parse().ok(),
            Self::Double(d) => Some(*d as i64),
            Self::Null(())
            | Self::Boolean(_)
            | Self::Timestamp(_)
            | Self::String(_)
            | Self::Reference(_)
            | Self::GeoPoint(_)
            | Self::Array(_)
            | Self::Map(_) => None,
        }
    }

    /// Returns the RFC 3339 timestamp behind this [`Value`], if it is one.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&str> {
        if let Self::Timestamp(t) = self {
            Some(t)
        } else {
            None
        }
    }

    /// Returns the resource name behind this [`Value`], if it is a
    /// reference.
    #[must_use]
    pub fn as_reference(&self) -> Option<&str> {
        if let Self::Reference(r) = self {
            Some(r)
        } else {
            None
        }
    }

    /// Returns the geographical point behind this [`Value`], if it is one.
    #[must_use]
    pub fn as_geo_point(&self) -> Option<&LatLng> {
        if let Self::GeoPoint(p) = self {
            Some(p)
        } else {
            None
        }
    }

    /// Returns the elements behind this [`Value`], if it is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        if let Self::Array(a) = self {
            Some(&a.values)
        } else {
            None
        }
    }
}

/// Inner representation of an array [`Value`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ArrayValue {
    /// Elements of the array.
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Inner representation of a map [`Value`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MapValue {
    /// Fields of the map.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

/// Geographical point of a [`Value::GeoPoint`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct LatLng {
    /// Latitude, in degrees.
    #[serde(default)]
    pub latitude: f64,

    /// Longitude, in degrees.
    #[serde(default)]
    pub longitude: f64,
}

/// Single write of a `documents:commit` request.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Write {
    /// [`Document`] to create or update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<Document>,

    /// Resource name of a [`Document`] to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,

    /// Fields to touch on update, leaving the rest intact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<DocumentMask>,

    /// Field transforms applied after the update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_transforms: Option<Vec<FieldTransform>>,
}

/// Set of [`Document`] field paths.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMask {
    /// Field paths of the mask.
    pub field_paths: Vec<String>,
}

/// Server-side transform of a single [`Document`] field.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTransform {
    /// Path of the field to transform.
    pub field_path: String,

    /// Server value to set the field to.
    pub set_to_server_value: String,
}

impl FieldTransform {
    /// Creates a [`FieldTransform`] stamping the given `field` with the
    /// commit time.
    #[must_use]
    pub fn request_time(field: impl Into<String>) -> Self {
        Self {
            field_path: field.into(),
            set_to_server_value: "REQUEST_TIME".into(),
        }
    }
}

/// Body of a `documents:commit` request.
#[derive(Clone, Debug, Serialize)]
pub(super) struct CommitRequest {
    /// Writes to apply atomically.
    pub(super) writes: Vec<Write>,
}

/// Response of a documents list request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListResponse {
    /// [`Document`]s of the requested page.
    #[serde(default)]
    pub(super) documents: Vec<Document>,

    /// Token of the next page, if any.
    #[serde(default)]
    pub(super) next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Document, Value};

    #[test]
    fn decodes_tagged_values() {
        let json = r#"{
            "name": "projects/p/databases/(default)/documents/equip_use/a1",
            "fields": {
                "title_of_post": {"stringValue": "حفارة"},
                "is_active": {"booleanValue": true},
                "equipNumm": {"integerValue": "3"},
                "created_att": {"timestampValue": "2024-05-01T10:00:00Z"},
                "equipmentloca": {
                    "geoPointValue": {"latitude": 24.7, "longitude": 46.7}
                },
                "equip_photo": {
                    "arrayValue": {"values": [{"stringValue": "u1"}]}
                }
            }
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id(), Some("a1"));
        assert_eq!(
            doc.field(&["title_of_post", "post_title"])
                .and_then(Value::as_str),
            Some("حفارة"),
        );
        assert_eq!(
            doc.field(&["is_active"]).and_then(Value::as_bool),
            Some(true),
        );
        assert_eq!(
            doc.field(&["equipNumm", "Equip_Nuum"]).and_then(Value::as_i64),
            Some(3),
        );
        assert_eq!(
            doc.field(&["equip_photo"])
                .and_then(Value::as_array)
                .map(<[Value]>::len),
            Some(1),
        );
    }

    #[test]
    fn alias_probing_prefers_the_first_present() {
        let json = r#"{
            "fields": {
                "post_title": {"stringValue": "مشروع"},
                "city_project": {"stringValue": "جدة"}
            }
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(
            doc.field(&["title_of_post", "post_title"])
                .and_then(Value::as_str),
            Some("مشروع"),
        );
        assert!(doc.field(&["city_madinah", "city_project"]).is_some());
        assert!(doc.field(&["district_hai", "district_project"]).is_none());
    }

    #[test]
    fn empty_array_value_roundtrips() {
        let value = Value::array(vec![]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"arrayValue":{"values":[]}}"#);
        let back: Value = serde_json::from_str(r#"{"arrayValue":{}}"#).unwrap();
        assert_eq!(back.as_array().map(<[Value]>::len), Some(0));
    }
}
