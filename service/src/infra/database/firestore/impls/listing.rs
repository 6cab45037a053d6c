//! [`Listing`]-related [`Database`] operations.

use std::collections::BTreeMap;

use common::{
    operations::{By, Delete, Insert, Select, Update},
    DateTime,
};
use tracerr::Traced;
use tracing as log;
use uuid::Uuid;

use crate::{
    domain::{equipment, listing, user, Equipment, Listing, Variant},
    infra::database::{
        self,
        firestore::{
            value::{DocumentMask, FieldTransform},
            Batch, Document, Error, Firestore, Value, Write,
        },
        Database,
    },
};

/// Title field aliases, the equipment-offer one first.
const TITLE: [&str; 2] = ["title_of_post", "post_title"];

/// City field aliases.
const CITY: [&str; 2] = ["city_madinah", "city_project"];

/// District field aliases.
const DISTRICT: [&str; 2] = ["district_hai", "district_project"];

/// Geographical location field aliases.
const LOCATION: [&str; 2] = ["equipmentloca", "Project_loca"];

/// Extra information field aliases.
const EXTRA_INFO: [&str; 2] = ["extrainfo", "extrainfomuq"];

/// Photo URLs field aliases.
const PHOTOS: [&str; 2] = ["equip_photo", "contractor_img"];

/// Owner reference field aliases.
const OWNER: [&str; 2] = ["created_by", "created_byy"];

/// Creation time field aliases.
const CREATED_AT: [&str; 2] = ["created_att", "created_at"];

/// Equipment count field aliases.
const EQUIPMENT_COUNT: [&str; 2] = ["equipNumm", "Equip_Nuum"];

/// Picks the field name a [`Variant`]'s documents are written with.
const fn alias(variant: Variant, pair: [&'static str; 2]) -> &'static str {
    match variant {
        Variant::EquipmentOffer => pair[0],
        Variant::ProjectRequest => pair[1],
    }
}

/// Decodes a [`Listing`] out of the given [`Document`].
///
/// Probes both field aliases of every pair, so documents of either
/// collection (and of older application versions) decode the same way.
/// Optional fields failing their format checks degrade to [`None`].
#[expect(unsafe_code, reason = "storage is the source of truth")]
fn decode(variant: Variant, doc: &Document) -> Option<Listing> {
    let id = listing::Id::new(doc.id()?)?;
    let title = unsafe {
        listing::Title::new_unchecked(doc.field(&TITLE)?.as_str()?)
    };

    let project = match variant {
        Variant::EquipmentOffer => None,
        Variant::ProjectRequest => {
            let details = listing::ProjectDetails {
                diesel: doc
                    .field(&["diesel"])
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned),
                workers: doc
                    .field(&["workers"])
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned),
                area: doc
                    .field(&["areamuq"])
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned),
            };
            (!details.is_empty()).then_some(details)
        }
    };

    Some(Listing {
        id,
        variant,
        title,
        city: doc
            .field(&CITY)
            .and_then(Value::as_str)
            .and_then(listing::City::new),
        district: doc
            .field(&DISTRICT)
            .and_then(Value::as_str)
            .and_then(listing::District::new),
        location: doc.field(&LOCATION).and_then(Value::as_geo_point).and_then(
            |p| listing::GeoPoint::new(p.latitude, p.longitude),
        ),
        description: doc
            .field(&["description"])
            .and_then(Value::as_str)
            .and_then(listing::Description::new),
        extra_info: doc
            .field(&EXTRA_INFO)
            .and_then(Value::as_str)
            .and_then(listing::ExtraInfo::new),
        phone: doc
            .field(&["phone_rqm"])
            .and_then(Value::as_str)
            .and_then(listing::Phone::new),
        photo_urls: doc
            .field(&PHOTOS)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(listing::PhotoUrl::new)
                    .collect()
            })
            .unwrap_or_default(),
        is_active: doc
            .field(&["is_active"])
            .and_then(Value::as_bool)
            .unwrap_or(true),
        equipment_count: doc
            .field(&EQUIPMENT_COUNT)
            .and_then(Value::as_i64)
            .and_then(|n| n.try_into().ok())
            .unwrap_or(0),
        equipment: vec![],
        project,
        created_at: doc
            .field(&CREATED_AT)
            .and_then(Value::as_timestamp)
            .and_then(|t| DateTime::from_rfc3339(t).ok())
            .map(DateTime::coerce),
        owner: doc
            .field(&OWNER)
            .and_then(Value::as_reference)
            .and_then(|r| r.rsplit('/').next())
            .and_then(user::Id::new),
    })
}

/// Encodes the given [`Listing`] into [`Document`] fields, named per its
/// [`Variant`].
///
/// The creation time is left out: it is stamped server-side via a
/// [`FieldTransform`] on commit.
fn encode(listing: &Listing, users_root: &str) -> Document {
    let v = listing.variant;
    let mut fields = BTreeMap::new();

    _ = fields.insert(
        alias(v, TITLE).into(),
        Value::string(AsRef::<str>::as_ref(&listing.title)),
    );
    _ = fields.insert("is_active".into(), Value::Boolean(listing.is_active));
    _ = fields.insert(
        alias(v, EQUIPMENT_COUNT).into(),
        Value::integer(i64::from(listing.equipment_count)),
    );
    _ = fields.insert(
        alias(v, PHOTOS).into(),
        Value::array(
            listing
                .photo_urls
                .iter()
                .map(|u| Value::string(AsRef::<str>::as_ref(u)))
                .collect(),
        ),
    );
    if let Some(city) = &listing.city {
        _ = fields.insert(alias(v, CITY).into(), Value::string(AsRef::<str>::as_ref(city)));
    }
    if let Some(district) = &listing.district {
        _ = fields.insert(
            alias(v, DISTRICT).into(),
            Value::string(AsRef::<str>::as_ref(district)),
        );
    }
    if let Some(location) = &listing.location {
        _ = fields.insert(
            alias(v, LOCATION).into(),
            Value::geo_point(location.latitude(), location.longitude()),
        );
    }
    if let Some(description) = &listing.description {
        _ = fields.insert(
            "description".into(),
            Value::string(AsRef::<str>::as_ref(description)),
        );
    }
    if let Some(extra_info) = &listing.extra_info {
        _ = fields.insert(
            alias(v, EXTRA_INFO).into(),
            Value::string(AsRef::<str>::as_ref(extra_info)),
        );
    }
    if let Some(phone) = &listing.phone {
        _ = fields.insert("phone_rqm".into(), Value::string(AsRef::<str>::as_ref(phone)));
    }
    if let Some(owner) = &listing.owner {
        _ = fields.insert(
            alias(v, OWNER).into(),
            Value::Reference(format!("{users_root}/{owner}")),
        );
    }
    if let Some(project) = &listing.project {
        if let Some(diesel) = &project.diesel {
            _ = fields.insert("diesel".into(), Value::string(diesel));
        }
        if let Some(workers) = &project.workers {
            _ = fields.insert("workers".into(), Value::string(workers));
        }
        if let Some(area) = &project.area {
            _ = fields.insert("areamuq".into(), Value::string(area));
        }
    }

    Document {
        fields,
        ..Document::default()
    }
}

/// Decodes an [`Equipment`] out of the given child [`Document`].
fn decode_equipment(doc: &Document) -> Option<Equipment> {
    let terms = match doc.field(&["rent_span"])? {
        Value::Array(spans) => equipment::RentTerms::Spans(
            spans
                .values
                .iter()
                .filter_map(Value::as_str)
                .filter_map(equipment::RentSpan::from_label)
                .collect(),
        ),
        value => equipment::RentTerms::Single(
            value.as_str().and_then(equipment::RentSpan::from_label)?,
        ),
    };

    Some(Equipment {
        kind: equipment::Kind::new(doc.field(&["kind"])?.as_str()?)?,
        model: equipment::Model::new(doc.field(&["model"])?.as_str()?)?,
        year: doc
            .field(&["year"])
            .and_then(|v| {
                v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
            })
            .and_then(|y| y.try_into().ok())
            .and_then(equipment::Year::new),
        terms,
    })
}

/// Encodes the given [`Equipment`] into child [`Document`] fields.
fn encode_equipment(equipment: &Equipment) -> Document {
    let mut fields = BTreeMap::new();
    _ = fields
        .insert("kind".into(), Value::string(AsRef::<str>::as_ref(&equipment.kind)));
    _ = fields
        .insert("model".into(), Value::string(AsRef::<str>::as_ref(&equipment.model)));
    if let Some(year) = equipment.year {
        _ = fields
            .insert("year".into(), Value::integer(i64::from(u16::from(year))));
    }
    let rent_span = match &equipment.terms {
        equipment::RentTerms::Spans(spans) => Value::array(
            spans.iter().map(|s| Value::string(s.label())).collect(),
        ),
        equipment::RentTerms::Single(span) => Value::string(span.label()),
    };
    _ = fields.insert("rent_span".into(), rent_span);

    Document {
        fields,
        ..Document::default()
    }
}

/// Relative path of a [`Listing`]'s parent document.
fn listing_path(variant: Variant, id: &listing::Id) -> String {
    format!("{}/{id}", variant.collection())
}

/// Relative path of a [`Listing`]'s equipment sub-collection.
fn equipment_path(variant: Variant, id: &listing::Id) -> String {
    format!("{}/{id}/{}", variant.collection(), variant.equipment_collection())
}

impl Database<Select<By<Vec<Listing>, Variant>>> for Firestore {
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    /// Scans the whole collection of the given [`Variant`].
    ///
    /// Deactivated [`Listing`]s are skipped, and so are documents that fail
    /// to decode, keeping one bad write from poisoning the entire feed.
    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, Variant>>,
    ) -> Result<Self::Ok, Self::Err> {
        let variant = by.into_inner();

        let documents = self
            .list_all(variant.collection())
            .await
            .map_err(tracerr::map_from)?;
        Ok(documents
            .iter()
            .filter_map(|doc| {
                let listing = decode(variant, doc);
                if listing.is_none() {
                    log::warn!(
                        "Skipping malformed `{variant}` document: {:?}",
                        doc.name,
                    );
                }
                listing
            })
            .filter(|l| l.is_active)
            .collect())
    }
}

impl Database<Select<By<Option<Listing>, (Variant, listing::Id)>>>
    for Firestore
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, (Variant, listing::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (variant, id) = by.into_inner();

        let Some(doc) = self
            .get(&listing_path(variant, &id))
            .await
            .map_err(tracerr::map_from)?
        else {
            return Ok(None);
        };
        let mut listing = decode(variant, &doc)
            .ok_or_else(|| tracerr::new!(Error::Malformed("Listing")))
            .map_err(tracerr::map_from)?;

        listing.equipment = self
            .list_all(&equipment_path(variant, &id))
            .await
            .map_err(tracerr::map_from)?
            .iter()
            .filter_map(decode_equipment)
            .collect();

        Ok(Some(listing))
    }
}

impl Database<Update<listing::Deactivation>> for Firestore {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deactivation): Update<listing::Deactivation>,
    ) -> Result<Self::Ok, Self::Err> {
        let listing::Deactivation { variant, id } = deactivation;

        let mut fields = BTreeMap::new();
        _ = fields.insert("is_active".into(), Value::Boolean(false));

        self.commit(vec![Write {
            update: Some(Document {
                name: Some(self.document_name(&listing_path(variant, &id))),
                fields,
                ..Document::default()
            }),
            update_mask: Some(DocumentMask {
                field_paths: vec!["is_active".into()],
            }),
            ..Write::default()
        }])
        .await
        .map_err(tracerr::map_from)
    }
}

impl Database<Delete<By<Listing, (Variant, listing::CreationDateTime)>>>
    for Firestore
{
    type Ok = ();
    type Err = Traced<database::Error>;

    /// Deletes deactivated [`Listing`]s created before the deadline, each
    /// together with its equipment sub-collection.
    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, (Variant, listing::CreationDateTime)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (variant, deadline) = by.into_inner();

        let documents = self
            .list_all(variant.collection())
            .await
            .map_err(tracerr::map_from)?;
        for doc in &documents {
            let Some(listing) = decode(variant, doc) else {
                continue;
            };
            if listing.is_active {
                continue;
            }
            // Documents without a resolvable creation time are kept.
            let Some(created_at) = listing.created_at else {
                continue;
            };
            if created_at >= deadline {
                continue;
            }

            let mut writes: Vec<Write> = self
                .list_all(&equipment_path(variant, &listing.id))
                .await
                .map_err(tracerr::map_from)?
                .into_iter()
                .filter_map(|child| child.name)
                .map(|name| Write {
                    delete: Some(name),
                    ..Write::default()
                })
                .collect();
            writes.push(Write {
                delete: Some(
                    self.document_name(&listing_path(variant, &listing.id)),
                ),
                ..Write::default()
            });

            self.commit(writes).await.map_err(tracerr::map_from)?;
            log::info!(
                "Purged inactive `{variant}` listing {}",
                listing.id,
            );
        }
        Ok(())
    }
}

impl Database<Insert<Listing>> for Batch {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let users_root = self.client().document_name("users");

        let mut doc = encode(&listing, &users_root);
        doc.name = Some(
            self.client()
                .document_name(&listing_path(listing.variant, &listing.id)),
        );

        self.push(Write {
            update: Some(doc),
            update_transforms: Some(vec![FieldTransform::request_time(
                alias(listing.variant, CREATED_AT),
            )]),
            ..Write::default()
        });
        Ok(())
    }
}

impl Database<Insert<equipment::Record>> for Batch {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<equipment::Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let equipment::Record {
            variant,
            listing,
            equipment,
        } = record;

        let mut doc = encode_equipment(&equipment);
        doc.name = Some(self.client().document_name(&format!(
            "{}/{}",
            equipment_path(variant, &listing),
            Uuid::new_v4().simple(),
        )));

        self.push(Write {
            update: Some(doc),
            ..Write::default()
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{equipment::RentTerms, Variant};

    use super::{decode, decode_equipment, encode, Document};

    #[test]
    fn decodes_offer_and_request_aliases_into_one_shape() {
        let offer: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/equip_use/o1",
                "fields": {
                    "title_of_post": {"stringValue": "حفارة للإيجار"},
                    "city_madinah": {"stringValue": "الرياض"},
                    "district_hai": {"stringValue": "العليا"},
                    "is_active": {"booleanValue": true},
                    "equipNumm": {"integerValue": "2"},
                    "created_att": {"timestampValue": "2024-05-01T10:00:00Z"},
                    "created_by": {"referenceValue": "projects/p/databases/(default)/documents/users/u1"},
                    "equip_photo": {"arrayValue": {"values": [{"stringValue": "https://x/1.jpg"}]}}
                }
            }"#,
        )
        .unwrap();
        let request: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/contractor_use/r1",
                "fields": {
                    "post_title": {"stringValue": "مشروع حفر"},
                    "city_project": {"stringValue": "جدة"},
                    "Equip_Nuum": {"integerValue": "1"},
                    "created_at": {"timestampValue": "2024-05-02T10:00:00Z"},
                    "created_byy": {"referenceValue": "projects/p/databases/(default)/documents/users/u2"},
                    "diesel": {"stringValue": "yes"},
                    "workers": {"stringValue": "no"},
                    "areamuq": {"stringValue": "500"}
                }
            }"#,
        )
        .unwrap();

        let offer = decode(Variant::EquipmentOffer, &offer).unwrap();
        assert_eq!(AsRef::<str>::as_ref(&offer.title), "حفارة للإيجار");
        assert_eq!(offer.city.as_ref().map(AsRef::as_ref), Some("الرياض"));
        assert_eq!(offer.equipment_count, 2);
        assert_eq!(offer.owner.as_ref().map(AsRef::as_ref), Some("u1"));
        assert_eq!(offer.photo_urls.len(), 1);
        assert!(offer.created_at.is_some());
        assert!(offer.project.is_none());

        let request = decode(Variant::ProjectRequest, &request).unwrap();
        assert_eq!(AsRef::<str>::as_ref(&request.title), "مشروع حفر");
        assert_eq!(request.city.as_ref().map(AsRef::as_ref), Some("جدة"));
        assert_eq!(request.owner.as_ref().map(AsRef::as_ref), Some("u2"));
        let project = request.project.unwrap();
        assert_eq!(project.diesel.as_deref(), Some("yes"));
        assert_eq!(project.area.as_deref(), Some("500"));
        // Missing district degrades to an absent field.
        assert!(request.district.is_none());
    }

    #[test]
    fn missing_title_fails_the_decode() {
        let doc: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/equip_use/x",
                "fields": {"is_active": {"booleanValue": true}}
            }"#,
        )
        .unwrap();
        assert!(decode(Variant::EquipmentOffer, &doc).is_none());
    }

    #[test]
    fn bad_timestamp_degrades_to_none() {
        let doc: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/equip_use/x",
                "fields": {
                    "title_of_post": {"stringValue": "t"},
                    "created_att": {"stringValue": "not a timestamp"}
                }
            }"#,
        )
        .unwrap();
        let listing = decode(Variant::EquipmentOffer, &doc).unwrap();
        assert!(listing.created_at.is_none());
    }

    #[test]
    fn equipment_rent_span_decodes_both_shapes() {
        let offer_item: Document = serde_json::from_str(
            r#"{
                "fields": {
                    "kind": {"stringValue": "حفارة"},
                    "model": {"stringValue": "CAT 320"},
                    "year": {"integerValue": "2019"},
                    "rent_span": {"arrayValue": {"values": [
                        {"stringValue": "يومي"}, {"stringValue": "شهري"}
                    ]}}
                }
            }"#,
        )
        .unwrap();
        let request_item: Document = serde_json::from_str(
            r#"{
                "fields": {
                    "kind": {"stringValue": "جرافة"},
                    "model": {"stringValue": "Komatsu"},
                    "rent_span": {"stringValue": "سنوي"}
                }
            }"#,
        )
        .unwrap();

        let offer = decode_equipment(&offer_item).unwrap();
        assert!(matches!(&offer.terms, RentTerms::Spans(s) if s.len() == 2));
        assert_eq!(offer.year.map(u16::from), Some(2019));

        let request = decode_equipment(&request_item).unwrap();
        assert!(matches!(&request.terms, RentTerms::Single(_)));
        assert!(request.year.is_none());
    }

    #[test]
    fn encode_uses_variant_field_names() {
        let doc: Document = serde_json::from_str(
            r#"{
                "name": "projects/p/databases/(default)/documents/contractor_use/r1",
                "fields": {
                    "post_title": {"stringValue": "مشروع"},
                    "city_project": {"stringValue": "جدة"}
                }
            }"#,
        )
        .unwrap();
        let listing = decode(Variant::ProjectRequest, &doc).unwrap();

        let encoded = encode(&listing, "projects/p/databases/(default)/documents/users");
        assert!(encoded.fields.contains_key("post_title"));
        assert!(encoded.fields.contains_key("city_project"));
        assert!(!encoded.fields.contains_key("title_of_post"));
        // Stamped server-side on commit instead.
        assert!(!encoded.fields.contains_key("created_at"));
    }
}
