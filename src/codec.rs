//! Persisted table format.
//!
//! One JSON document per table:
//!
//! ```json
//! {
//!   "name_sets": { "Atlantic": ["", "AST", "", "ADT", "", "AT"] },
//!   "entries": [
//!     ["America/Halifax", { "set": "Atlantic" }],
//!     ["timezone.excity.America/Halifax", "Halifax"]
//!   ]
//! }
//! ```
//!
//! Entries are an array of pairs so that duplicate keys stay visible to
//! validation instead of being collapsed by a JSON object.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{ MapAccess, Visitor };
use serde::{ Deserialize, Deserializer, Serialize, Serializer };
use serde_json::Value;

use crate::error::NamesError;
use crate::table::{ LocaleTable, NameValue, TableId, TimeZoneNames };

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    // Kept in document order, repeats included, so validation sees them.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "name_sets_in_order",
        serialize_with = "name_sets_as_map"
    )]
    name_sets: Vec<(String, Vec<String>)>,
    entries: Vec<(String, RawValue)>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Names(Vec<String>),
    SetRef(SetRef),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetRef {
    set: String,
}

fn name_sets_in_order<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<String>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct InOrder;

    impl<'de> Visitor<'de> for InOrder {
        type Value = Vec<(String, Vec<String>)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of name set names to six time zone names")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut sets = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                sets.push(entry);
            }
            Ok(sets)
        }
    }

    deserializer.deserialize_map(InOrder)
}

fn name_sets_as_map<S>(sets: &[(String, Vec<String>)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(sets.iter().map(|(name, names)| (name, names)))
}

/// Decodes and validates a table from JSON text.
pub fn decode_str(id: TableId, json: &str) -> Result<LocaleTable, NamesError> {
    let document: TableDocument =
        serde_json::from_str(json).map_err(|e| NamesError::json(id.to_string(), e))?;
    decode_document(id, document)
}

/// Decodes and validates a table from an already parsed JSON value.
pub fn decode_value(id: TableId, value: Value) -> Result<LocaleTable, NamesError> {
    let document: TableDocument =
        serde_json::from_value(value).map_err(|e| NamesError::json(id.to_string(), e))?;
    decode_document(id, document)
}

fn decode_document(id: TableId, document: TableDocument) -> Result<LocaleTable, NamesError> {
    let table = id.to_string();

    let mut name_sets = BTreeMap::new();
    for (name, names) in document.name_sets {
        let key = format!("name set {name}");
        if name_sets.contains_key(&name) {
            return Err(NamesError::DuplicateKey { table, key });
        }
        let names = TimeZoneNames::try_from(names).map_err(|len| NamesError::ZoneArity {
            table: table.clone(),
            key,
            len,
        })?;
        name_sets.insert(name, Arc::new(names));
    }

    let mut entries = Vec::with_capacity(document.entries.len());
    for (key, raw) in document.entries {
        if !id.domain.expects_zone_names(&key) && !matches!(raw, RawValue::Text(_)) {
            return Err(NamesError::UnexpectedValue {
                table,
                key,
                expected: "a string",
            });
        }
        let value = match raw {
            RawValue::Text(text) => NameValue::Text(text),
            RawValue::Names(names) => match TimeZoneNames::try_from(names) {
                Ok(names) => NameValue::Zone(Arc::new(names)),
                Err(len) => {
                    return Err(NamesError::ZoneArity {
                        table,
                        key,
                        len,
                    });
                }
            },
            RawValue::SetRef(SetRef { set }) => match name_sets.get(&set) {
                Some(names) => NameValue::Zone(Arc::clone(names)),
                None => {
                    return Err(NamesError::UnknownNameSet { table, key, set });
                }
            },
        };
        entries.push((key, value));
    }

    LocaleTable::with_name_sets(id, name_sets, entries)
}

fn encode_document(table: &LocaleTable) -> TableDocument {
    let name_sets = table
        .name_sets()
        .iter()
        .map(|(name, names)| (name.clone(), names.as_array().to_vec()))
        .collect();

    let entries = table
        .entries()
        .iter()
        .map(|(key, value)| {
            let raw = match value {
                NameValue::Text(text) => RawValue::Text(text.clone()),
                NameValue::Zone(names) => {
                    let shared = table
                        .name_sets()
                        .iter()
                        .find(|(_, set)| Arc::ptr_eq(set, names));
                    match shared {
                        Some((set, _)) => RawValue::SetRef(SetRef { set: set.clone() }),
                        None => RawValue::Names(names.as_array().to_vec()),
                    }
                }
            };
            (key.clone(), raw)
        })
        .collect();

    TableDocument { name_sets, entries }
}

/// Encodes a table to pretty-printed JSON in the persisted format.
pub fn encode_string(table: &LocaleTable) -> Result<String, NamesError> {
    serde_json::to_string_pretty(&encode_document(table))
        .map_err(|e| NamesError::json(table.id().to_string(), e))
}

/// Encodes a table to a JSON value, as stored inside a bundle.
pub fn encode_value(table: &LocaleTable) -> Result<Value, NamesError> {
    serde_json::to_value(encode_document(table)).map_err(|e| NamesError::json(table.id().to_string(), e))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::locale::LocaleId;
    use crate::table::Domain;

    fn id(domain: Domain, locale: &str) -> TableId {
        TableId::new(domain, LocaleId::parse(locale).unwrap())
    }

    const EN_CA: &str = r#"{
        "name_sets": {
            "Atlantic": ["", "AST", "", "ADT", "", "AT"],
            "Eastern": ["", "EST", "", "EDT", "", "ET"]
        },
        "entries": [
            ["America/Halifax", { "set": "Atlantic" }],
            ["America/Moncton", { "set": "Atlantic" }],
            ["America/Toronto", { "set": "Eastern" }],
            ["America/Regina", ["", "CST", "", "CDT", "", "CT"]],
            ["timezone.excity.America/Halifax", "Halifax"]
        ]
    }"#;

    #[test]
    fn test_decode_resolves_name_sets() {
        let table = decode_str(id(Domain::TimeZone, "en_CA"), EN_CA).unwrap();

        assert_eq!(table.len(), 5);
        let halifax = table.get_zone_names("America/Halifax").unwrap();
        assert_eq!(halifax.as_array(), &["", "AST", "", "ADT", "", "AT"].map(String::from));
        assert_eq!(table.get_text("timezone.excity.America/Halifax"), Some("Halifax"));

        let (NameValue::Zone(a), NameValue::Zone(b)) =
            (table.get("America/Halifax").unwrap(), table.get("America/Moncton").unwrap())
        else {
            panic!("expected zone names");
        };
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_encode_then_decode_keeps_pairs_and_sharing() {
        let table = decode_str(id(Domain::TimeZone, "en_CA"), EN_CA).unwrap();
        let json = encode_string(&table).unwrap();
        let reloaded = decode_str(id(Domain::TimeZone, "en_CA"), &json).unwrap();

        assert_eq!(table.entries(), reloaded.entries());
        assert_eq!(table.name_sets(), reloaded.name_sets());
        assert!(json.contains(r#""set": "Atlantic""#));
        assert!(json.contains(r#""set": "Eastern""#));
    }

    #[rstest]
    #[case::short_tuple(
        Domain::TimeZone,
        r#"{"entries": [["Europe/London", ["Hora de Greenwich", "", ""]]]}"#
    )]
    #[case::short_name_set(
        Domain::TimeZone,
        r#"{"name_sets": {"GMT": ["a"]}, "entries": []}"#
    )]
    fn test_decode_rejects_wrong_arity(#[case] domain: Domain, #[case] json: &str) {
        let result = decode_str(id(domain, "pt_PT"), json);
        assert!(matches!(result, Err(NamesError::ZoneArity { .. })), "{result:?}");
    }

    #[test]
    fn test_decode_rejects_unknown_name_set() {
        let json = r#"{"entries": [["America/Halifax", {"set": "Atlantic"}]]}"#;
        let result = decode_str(id(Domain::TimeZone, "en_CA"), json);
        assert!(matches!(
            result,
            Err(NamesError::UnknownNameSet { set, .. }) if set == "Atlantic"
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_keys() {
        let json = r#"{"entries": [["AFN", "؋"], ["AFN", "AFN"]]}"#;
        let result = decode_str(id(Domain::Currency, "ps"), json);
        assert!(matches!(result, Err(NamesError::DuplicateKey { .. })));
    }

    #[rstest]
    #[case::not_json("entries")]
    #[case::missing_entries(r#"{"name_sets": {}}"#)]
    #[case::unknown_field(r#"{"entries": [], "locale": "ps"}"#)]
    #[case::number_value(r#"{"entries": [["AFN", 971]]}"#)]
    #[case::set_ref_extra_field(
        r#"{"entries": [["America/Halifax", {"set": "Atlantic", "sett": "oops"}]]}"#
    )]
    fn test_decode_rejects_malformed_documents(#[case] json: &str) {
        let result = decode_str(id(Domain::Currency, "ps"), json);
        assert!(matches!(result, Err(NamesError::Json { .. })), "{result:?}");
    }

    #[test]
    fn test_decode_rejects_set_ref_with_unknown_field_in_time_zones() {
        let json = r#"{
            "name_sets": {"Atlantic": ["", "AST", "", "ADT", "", "AT"]},
            "entries": [["America/Halifax", {"set": "Atlantic", "sett": "oops"}]]
        }"#;
        let result = decode_str(id(Domain::TimeZone, "en_CA"), json);
        assert!(matches!(result, Err(NamesError::Json { .. })), "{result:?}");
    }

    #[test]
    fn test_decode_rejects_repeated_name_set() {
        let json = r#"{
            "name_sets": {
                "Atlantic": ["", "AST", "", "ADT", "", "AT"],
                "Atlantic": ["X", "X", "X", "X", "X", "X"]
            },
            "entries": [["America/Halifax", {"set": "Atlantic"}]]
        }"#;
        let result = decode_str(id(Domain::TimeZone, "en_CA"), json);
        assert!(matches!(
            result,
            Err(NamesError::DuplicateKey { key, .. }) if key == "name set Atlantic"
        ));
    }

    #[rstest]
    #[case::currency_array(Domain::Currency, "ps", r#"{"entries": [["AFN", ["a", "b"]]]}"#, "AFN")]
    #[case::currency_six_names(
        Domain::Currency,
        "ps",
        r#"{"entries": [["AFN", ["a", "b", "c", "d", "e", "f"]]]}"#,
        "AFN"
    )]
    #[case::locale_set_ref(Domain::Locale, "dyo", r#"{"entries": [["dyo", {"set": "X"}]]}"#, "dyo")]
    #[case::exemplar_city_array(
        Domain::TimeZone,
        "en_CA",
        r#"{"entries": [["timezone.excity.America/Halifax", ["Halifax", ""]]]}"#,
        "timezone.excity.America/Halifax"
    )]
    fn test_decode_rejects_non_string_where_string_expected(
        #[case] domain: Domain,
        #[case] locale: &str,
        #[case] json: &str,
        #[case] bad_key: &str,
    ) {
        let result = decode_str(id(domain, locale), json);
        assert!(
            matches!(
                &result,
                Err(NamesError::UnexpectedValue { key, expected: "a string", .. }) if key == bad_key
            ),
            "{result:?}"
        );
    }

    #[test]
    fn test_encode_keeps_name_sets_as_object() {
        let table = decode_str(id(Domain::TimeZone, "en_CA"), EN_CA).unwrap();
        let value = encode_value(&table).unwrap();
        let sets = value.get("name_sets").and_then(Value::as_object).unwrap();
        assert_eq!(sets.len(), 2);
        assert!(sets.contains_key("Atlantic"));
    }

    #[test]
    fn test_decode_rejects_name_sets_outside_time_zones() {
        let json = r#"{"name_sets": {"X": ["", "", "", "", "", ""]}, "entries": []}"#;
        let result = decode_str(id(Domain::Locale, "dyo"), json);
        assert!(matches!(result, Err(NamesError::MisplacedNameSets(_))));
    }

    #[test]
    fn test_encode_value_matches_string_form() {
        let json = r#"{"entries": [["dyo", "joola"], ["SN", "Senegal"]]}"#;
        let table = decode_str(id(Domain::Locale, "dyo"), json).unwrap();

        let value = encode_value(&table).unwrap();
        let reparsed: Value = serde_json::from_str(&encode_string(&table).unwrap()).unwrap();
        assert_eq!(value, reparsed);
        assert!(value.get("name_sets").is_none());
    }
}
