//! [`User`]-related [`Database`] operations.

use std::collections::BTreeMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::database::{
        self,
        firestore::{
            value::DocumentMask, Document, Error, Firestore, Value, Write,
        },
        Database,
    },
};

/// Name of the collection holding [`User`] profiles.
const COLLECTION: &str = "users";

/// Decodes a [`User`] profile out of the given [`Document`].
#[expect(unsafe_code, reason = "storage is the source of truth")]
fn decode(doc: &Document) -> Option<User> {
    let id = unsafe { user::Id::new_unchecked(doc.id()?) };

    Some(User {
        id,
        display_name: doc
            .field(&["display_name"])
            .and_then(Value::as_str)
            .and_then(user::DisplayName::new),
        email: doc
            .field(&["email"])
            .and_then(Value::as_str)
            .and_then(user::Email::new),
        phone: doc
            .field(&["phone_number"])
            .and_then(Value::as_str)
            .and_then(user::Phone::new),
        company_bio: doc
            .field(&["com_bio"])
            .and_then(Value::as_str)
            .and_then(user::CompanyBio::new),
        company_location: doc
            .field(&["com_locat"])
            .and_then(Value::as_str)
            .and_then(user::CompanyLocation::new),
        trade_registry_number: doc
            .field(&["sjltejari"])
            .and_then(Value::as_str)
            .and_then(user::TradeRegistryNumber::new),
        photo_url: doc
            .field(&["photo_url"])
            .and_then(Value::as_str)
            .and_then(user::PhotoUrl::new),
        role: doc
            .field(&["iseqqquip"])
            .and_then(Value::as_str)
            .and_then(user::Role::from_flag),
        // Only an explicit "no" marks the flow as completed.
        first_login: doc
            .field(&["isfirttime"])
            .and_then(Value::as_str)
            .map_or(true, |flag| flag != "no"),
    })
}

/// Encodes the given [`User`] profile into [`Document`] fields.
fn encode(user: &User) -> Document {
    let mut fields = BTreeMap::new();

    _ = fields.insert(
        "isfirttime".into(),
        Value::string(if user.first_login { "yes" } else { "no" }),
    );
    if let Some(name) = &user.display_name {
        _ = fields.insert("display_name".into(), Value::string(AsRef::<str>::as_ref(name)));
    }
    if let Some(email) = &user.email {
        _ = fields.insert("email".into(), Value::string(AsRef::<str>::as_ref(email)));
    }
    if let Some(phone) = &user.phone {
        _ = fields.insert("phone_number".into(), Value::string(AsRef::<str>::as_ref(phone)));
    }
    if let Some(bio) = &user.company_bio {
        _ = fields.insert("com_bio".into(), Value::string(AsRef::<str>::as_ref(bio)));
    }
    if let Some(location) = &user.company_location {
        _ = fields.insert("com_locat".into(), Value::string(AsRef::<str>::as_ref(location)));
    }
    if let Some(number) = &user.trade_registry_number {
        _ = fields.insert("sjltejari".into(), Value::string(AsRef::<str>::as_ref(number)));
    }
    if let Some(url) = &user.photo_url {
        _ = fields.insert("photo_url".into(), Value::string(AsRef::<str>::as_ref(url)));
    }
    if let Some(role) = user.role {
        _ = fields.insert("iseqqquip".into(), Value::string(role.as_flag()));
    }

    Document {
        fields,
        ..Document::default()
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Firestore {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(doc) = self
            .get(&format!("{COLLECTION}/{id}"))
            .await
            .map_err(tracerr::map_from)?
        else {
            return Ok(None);
        };
        decode(&doc)
            .map(Some)
            .ok_or_else(|| tracerr::new!(Error::Malformed("User")))
            .map_err(tracerr::map_from)
    }
}

impl Database<Insert<User>> for Firestore {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut doc = encode(&user);
        doc.name =
            Some(self.document_name(&format!("{COLLECTION}/{}", user.id)));

        self.commit(vec![Write {
            update: Some(doc),
            ..Write::default()
        }])
        .await
        .map_err(tracerr::map_from)
    }
}

impl Database<Update<user::ProfileUpdate>> for Firestore {
    type Ok = ();
    type Err = Traced<database::Error>;

    /// Applies the [`user::ProfileUpdate`] with an update mask, leaving
    /// untouched fields intact.
    async fn execute(
        &self,
        Update(update): Update<user::ProfileUpdate>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut fields = BTreeMap::new();

        if let Some(name) = &update.display_name {
            _ = fields
                .insert("display_name".into(), Value::string(AsRef::<str>::as_ref(name)));
        }
        if let Some(phone) = &update.phone {
            _ = fields
                .insert("phone_number".into(), Value::string(AsRef::<str>::as_ref(phone)));
        }
        if let Some(bio) = &update.company_bio {
            _ = fields.insert("com_bio".into(), Value::string(AsRef::<str>::as_ref(bio)));
        }
        if let Some(location) = &update.company_location {
            _ = fields
                .insert("com_locat".into(), Value::string(AsRef::<str>::as_ref(location)));
        }
        if let Some(number) = &update.trade_registry_number {
            _ = fields
                .insert("sjltejari".into(), Value::string(AsRef::<str>::as_ref(number)));
        }
        if let Some(url) = &update.photo_url {
            _ = fields.insert("photo_url".into(), Value::string(AsRef::<str>::as_ref(url)));
        }
        if let Some(role) = update.role {
            _ = fields
                .insert("iseqqquip".into(), Value::string(role.as_flag()));
        }
        if let Some(first_login) = update.first_login {
            _ = fields.insert(
                "isfirttime".into(),
                Value::string(if first_login { "yes" } else { "no" }),
            );
        }
        if fields.is_empty() {
            return Ok(());
        }

        let mask = DocumentMask {
            field_paths: fields.keys().cloned().collect(),
        };
        self.commit(vec![Write {
            update: Some(Document {
                name: Some(
                    self.document_name(&format!("{COLLECTION}/{}", update.id)),
                ),
                fields,
                ..Document::default()
            }),
            update_mask: Some(mask),
            ..Write::default()
        }])
        .await
        .map_err(tracerr::map_from)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::user::Role;

    use super::{decode, encode, Document};

    #[test]
    fn decodes_profile_flags() {
        let doc: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/users/u1",
                "fields": {
                    "email": {"stringValue": "a@b.sa"},
                    "iseqqquip": {"stringValue": "yes"},
                    "isfirttime": {"stringValue": "no"},
                    "display_name": {"stringValue": "مؤسسة النقل"},
                    "phone_number": {"stringValue": "+966 50 123 4567"},
                    "sjltejari": {"stringValue": "CR-1234"}
                }
            }"#,
        )
        .unwrap();

        let user = decode(&doc).unwrap();
        assert_eq!(AsRef::<str>::as_ref(&user.id), "u1");
        assert_eq!(user.role, Some(Role::EquipmentOwner));
        assert!(!user.first_login);
        assert_eq!(
            user.phone.as_ref().map(AsRef::as_ref),
            Some("+966 50 123 4567"),
        );
        assert_eq!(
            user.trade_registry_number.as_ref().map(AsRef::as_ref),
            Some("CR-1234"),
        );

        let encoded = encode(&user);
        assert_eq!(
            encoded
                .fields
                .get("phone_number")
                .and_then(super::Value::as_str),
            Some("+966 50 123 4567"),
        );
    }

    #[test]
    fn fresh_sign_up_counts_as_first_login() {
        let doc: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/users/u2",
                "fields": {"email": {"stringValue": "new@b.sa"}}
            }"#,
        )
        .unwrap();

        let user = decode(&doc).unwrap();
        assert!(user.first_login);
        assert!(user.role.is_none());

        let encoded = encode(&user);
        assert_eq!(
            encoded.fields.get("isfirttime").and_then(super::Value::as_str),
            Some("yes"),
        );
    }
}
