//! JSON encoding of the sidecar metadata document.
//!
//! The document carries everything but the value:
//!
//! ```json
//! {
//!   "objectID": "Xk3v9QmZ",
//!   "capabilitiesURI": "/cdmi_capabilities/dataobject",
//!   "mimetype": "text/plain",
//!   "metadata": {
//!     "cdmi_atime": "never",
//!     "cdmi_ctime": "2026-10-19T09:30:15",
//!     "cdmi_size": "5",
//!     "fileName": "/srv/cdmi/docs/readme.txt",
//!     "metadataFileName": "/srv/cdmi/docs/.readme.txt",
//!     "mimetype": "text/plain"
//!   }
//! }
//! ```

use crate::object::DataObject;

pub(crate) fn encode(object: &DataObject) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(object)
}

/// Rebuilds an object (with an empty value) from a sidecar document.
pub(crate) fn decode(document: &[u8]) -> Result<DataObject, serde_json::Error> {
    serde_json::from_slice(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{AccessTime, DataObjectDraft};
    use crate::path::ObjectPath;
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use std::path::Path;

    fn sample() -> DataObject {
        let location = ObjectPath::parse("docs/readme.txt").unwrap().locate(Path::new("/srv/cdmi"));
        let now = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(9, 30, 15).unwrap();
        DataObject::assemble(
            DataObjectDraft::new("hello").metadata("owner", "ops"),
            "Xk3v9QmZ".to_owned(),
            "text/plain".to_owned(),
            &location,
            now,
        )
    }

    #[test]
    fn encodes_string_valued_metadata() {
        let document: Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();

        assert_eq!(document["objectID"], "Xk3v9QmZ");
        assert_eq!(document["capabilitiesURI"], "/cdmi_capabilities/dataobject");
        assert_eq!(document["mimetype"], "text/plain");
        assert_eq!(
            document["metadata"],
            json!({
                "cdmi_size": "5",
                "cdmi_ctime": "2026-10-19T09:30:15",
                "cdmi_atime": "never",
                "fileName": "/srv/cdmi/docs/readme.txt",
                "metadataFileName": "/srv/cdmi/docs/.readme.txt",
                "mimetype": "text/plain",
                "owner": "ops"
            })
        );
        assert!(document.get("value").is_none(), "the value lives in the content file");
    }

    #[test]
    fn decode_restores_everything_but_the_value() {
        let original = sample();
        let decoded = decode(&encode(&original).unwrap()).unwrap();

        assert_eq!(decoded.object_id(), original.object_id());
        assert_eq!(decoded.metadata(), original.metadata());
        assert_eq!(decoded.value(), "");
    }

    #[test]
    fn decode_parses_access_timestamps() {
        let mut document: Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();
        document["metadata"]["cdmi_atime"] = json!("2026-10-20T08:00:00");

        let decoded = decode(&serde_json::to_vec(&document).unwrap()).unwrap();
        assert!(matches!(decoded.metadata().atime(), AccessTime::At(_)));
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert!(decode(b"{ not json").is_err());
    }

    #[test]
    fn decode_rejects_missing_structural_fields() {
        let mut document: Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();
        document.as_object_mut().unwrap().remove("objectID");
        assert!(decode(&serde_json::to_vec(&document).unwrap()).is_err());

        let mut document: Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();
        document["metadata"].as_object_mut().unwrap().remove("cdmi_ctime");
        assert!(decode(&serde_json::to_vec(&document).unwrap()).is_err());
    }

    #[test]
    fn decode_rejects_non_numeric_size() {
        let mut document: Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();
        document["metadata"]["cdmi_size"] = json!("five");
        assert!(decode(&serde_json::to_vec(&document).unwrap()).is_err());
    }
}
