use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

/// All records assembled during one run, keyed by memorial id in
/// first-visited order. The display name stays on the record; two ids that
/// render the same name produce two entries instead of overwriting.
pub type Store = IndexMap<String, PersonRecord>;

/// Relationship label ("Parents", "Spouse", ...) to member name to reference.
pub type RelationMap = IndexMap<String, IndexMap<String, RelatedPersonRef>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BirthInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthplace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeathInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deathdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deathplace: Option<String>,
}

/// A relative as listed on someone else's page, not a full record.
/// Wire keys match the original output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedPersonRef {
    #[serde(rename = "url")]
    pub link: String,
    #[serde(rename = "bday")]
    pub birth: String,
    #[serde(rename = "dday")]
    pub death: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRecord {
    #[serde(skip)]
    pub memorial_id: String,
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "Birth_Info")]
    pub birth: BirthInfo,
    #[serde(rename = "Death_Info")]
    pub death: DeathInfo,
    // Relationship labels never collide with Birth_Info/Death_Info.
    #[serde(flatten)]
    pub relations: RelationMap,
}

/// JSON array of single-key objects, one per record: `{name: record body}`.
pub fn to_output(store: &Store) -> Result<Vec<serde_json::Value>> {
    store
        .values()
        .map(|rec| {
            let mut obj = serde_json::Map::new();
            obj.insert(rec.name.clone(), serde_json::to_value(rec)?);
            Ok(serde_json::Value::Object(obj))
        })
        .collect()
}

pub fn write_store(store: &Store, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &to_output(store)?)?;
    // Flush here so a short write surfaces instead of dying in Drop.
    out.flush()?;
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PersonRecord {
        let mut parents = IndexMap::new();
        parents.insert(
            "Robert Doe".to_string(),
            RelatedPersonRef {
                link: "/memorial/11111111/robert-doe".to_string(),
                birth: "2 Feb 1870".to_string(),
                death: "1 Jan 1001".to_string(),
            },
        );
        let mut relations = RelationMap::new();
        relations.insert("Parents".to_string(), parents);

        PersonRecord {
            memorial_id: "120297053".to_string(),
            name: "John Doe".to_string(),
            birth: BirthInfo {
                birthdate: Some("4 Jul 1900".to_string()),
                birthplace: None,
            },
            death: DeathInfo::default(),
            relations,
        }
    }

    #[test]
    fn absent_fact_keys_are_omitted() {
        let v = serde_json::to_value(sample_record()).unwrap();
        let birth = &v["Birth_Info"];
        assert_eq!(birth["birthdate"], "4 Jul 1900");
        assert!(birth.get("birthplace").is_none());
        // Empty Death_Info serializes as {}, not null fields.
        assert_eq!(v["Death_Info"], serde_json::json!({}));
    }

    #[test]
    fn relations_flatten_beside_vitals() {
        let v = serde_json::to_value(sample_record()).unwrap();
        let parent = &v["Parents"]["Robert Doe"];
        assert_eq!(parent["url"], "/memorial/11111111/robert-doe");
        assert_eq!(parent["bday"], "2 Feb 1870");
        assert_eq!(parent["dday"], "1 Jan 1001");
    }

    #[test]
    fn written_file_holds_the_output_array() {
        let mut store = Store::new();
        let rec = sample_record();
        store.insert(rec.memorial_id.clone(), rec);

        let path = std::env::temp_dir().join("grave_scraper_write_test.json");
        write_store(&store, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn write_error_is_reported_not_swallowed() {
        let mut store = Store::new();
        let rec = sample_record();
        store.insert(rec.memorial_id.clone(), rec);

        // /dev/full accepts the open but rejects every write with ENOSPC.
        let res = write_store(&store, Path::new("/dev/full"));
        assert!(res.is_err());
    }

    #[test]
    fn output_is_single_key_objects_keyed_by_name() {
        let mut store = Store::new();
        let rec = sample_record();
        store.insert(rec.memorial_id.clone(), rec);

        let out = to_output(&store).unwrap();
        assert_eq!(out.len(), 1);
        let obj = out[0].as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("John Doe"));
        // The record body does not repeat the name or the id.
        assert!(obj["John Doe"].get("name").is_none());
        assert!(obj["John Doe"].get("memorial_id").is_none());
    }
}
