//! In-memory data objects: the caller's draft and the persisted representation.

use crate::path::ObjectLocation;
use cdmi_domain::constants::{
    ATIME_NEVER, CDMI_ATIME, CDMI_CTIME, CDMI_SIZE, DATAOBJECT_CAPABILITIES_URI, FILE_NAME,
    METADATA_FILE_NAME, MIMETYPE, SYSTEM_METADATA_KEYS, TIMESTAMP_FORMAT,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Object content and caller-chosen attributes, before the store persists them.
///
/// ```rust
/// use cdmi_storage::DataObjectDraft;
///
/// let draft = DataObjectDraft::new("hello")
///     .mimetype("text/markdown")
///     .metadata("owner", "ops");
/// assert_eq!(draft.value(), "hello");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataObjectDraft {
    pub(crate) object_id: Option<String>,
    pub(crate) value: String,
    pub(crate) mimetype: Option<String>,
    pub(crate) metadata: BTreeMap<String, String>,
}

impl DataObjectDraft {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), ..Self::default() }
    }

    /// Keeps a caller-assigned object ID instead of generating one.
    #[must_use = "Sets the object ID of the draft"]
    pub fn object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    #[must_use = "Sets the MIME type of the draft"]
    pub fn mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    /// Adds a user metadata entry. Keys the store owns (`cdmi_size`, `mimetype`, ...) are
    /// dropped when the object is created.
    #[must_use = "Adds a metadata entry to the draft"]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// `cdmi_atime`: either a read timestamp or the `never` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessTime {
    Never,
    At(NaiveDateTime),
}

impl fmt::Display for AccessTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str(ATIME_NEVER),
            Self::At(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl Serialize for AccessTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccessTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Cow::<'de, str>::deserialize(deserializer)?;
        if raw == ATIME_NEVER {
            return Ok(Self::Never);
        }
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(Self::At)
            .map_err(serde::de::Error::custom)
    }
}

/// The metadata mapping of a stored object: store-owned keys as typed fields, caller
/// keys in an ordered open map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "cdmi_size", with = "decimal_string")]
    size: u64,
    #[serde(rename = "cdmi_ctime", with = "timestamp")]
    ctime: NaiveDateTime,
    #[serde(rename = "cdmi_atime")]
    atime: AccessTime,
    #[serde(rename = "fileName")]
    file_name: PathBuf,
    #[serde(rename = "metadataFileName")]
    metadata_file_name: PathBuf,
    mimetype: String,
    #[serde(flatten)]
    user: BTreeMap<String, String>,
}

impl Metadata {
    /// `cdmi_size`: byte length of the value.
    ///
    /// This is the UTF-8 encoded length, not a character count: `"héllo"` has size 6.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn ctime(&self) -> NaiveDateTime {
        self.ctime
    }

    #[must_use]
    pub const fn atime(&self) -> AccessTime {
        self.atime
    }

    /// Absolute path of the content file.
    #[must_use]
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Absolute path of the sidecar metadata file.
    #[must_use]
    pub fn metadata_file_name(&self) -> &Path {
        &self.metadata_file_name
    }

    #[must_use]
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Caller-supplied entries only.
    #[must_use]
    pub const fn user(&self) -> &BTreeMap<String, String> {
        &self.user
    }

    /// Looks up any key, store-owned or user, in its string form.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            CDMI_SIZE => Some(Cow::Owned(self.size.to_string())),
            CDMI_CTIME => Some(Cow::Owned(self.ctime.format(TIMESTAMP_FORMAT).to_string())),
            CDMI_ATIME => Some(Cow::Owned(self.atime.to_string())),
            FILE_NAME => Some(self.file_name.to_string_lossy()),
            METADATA_FILE_NAME => Some(self.metadata_file_name.to_string_lossy()),
            MIMETYPE => Some(Cow::Borrowed(&self.mimetype)),
            other => self.user.get(other).map(|v| Cow::Borrowed(v.as_str())),
        }
    }

    /// The whole mapping as strings, the way CDMI responses render it.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        SYSTEM_METADATA_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|v| ((*key).to_owned(), v.into_owned())))
            .chain(self.user.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }
}

/// A persisted data object.
///
/// Instances come out of the store only; the object ID is fixed once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataObject {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(rename = "capabilitiesURI")]
    capabilities_uri: String,
    mimetype: String,
    metadata: Metadata,
    #[serde(skip)]
    value: String,
}

impl DataObject {
    /// Fills in every derived attribute of `draft` for a fresh object at `location`.
    pub(crate) fn assemble(
        draft: DataObjectDraft,
        object_id: String,
        mimetype: String,
        location: &ObjectLocation,
        now: NaiveDateTime,
    ) -> Self {
        let DataObjectDraft { value, mut metadata, .. } = draft;
        metadata.retain(|key, _| !SYSTEM_METADATA_KEYS.contains(&key.as_str()));

        Self {
            object_id,
            capabilities_uri: DATAOBJECT_CAPABILITIES_URI.to_owned(),
            metadata: Metadata {
                size: value.len() as u64,
                ctime: now,
                atime: AccessTime::Never,
                file_name: location.content_file.clone(),
                metadata_file_name: location.metadata_file.clone(),
                mimetype: mimetype.clone(),
                user: metadata,
            },
            mimetype,
            value,
        }
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub(crate) const fn touch(&mut self, now: NaiveDateTime) {
        self.metadata.atime = AccessTime::At(now);
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    #[must_use]
    pub fn capabilities_uri(&self) -> &str {
        &self.capabilities_uri
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

mod decimal_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::borrow::Cow;

    pub(super) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = Cow::<'de, str>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

mod timestamp {
    use cdmi_domain::constants::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::borrow::Cow;

    pub(super) fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = Cow::<'de, str>::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
