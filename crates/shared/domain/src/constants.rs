//! Well-known CDMI names shared by the store and its front ends.

/// Capability class every data object is published under.
pub const DATAOBJECT_CAPABILITIES_URI: &str = "/cdmi_capabilities/dataobject";

/// MIME type assumed when a CDMI create does not carry one.
pub const DEFAULT_MIMETYPE: &str = "text/plain";

/// `cdmi_atime` value of an object that has never been read.
pub const ATIME_NEVER: &str = "never";

/// Length of generated object identifiers.
pub const OBJECT_ID_LENGTH: usize = 8;

/// `chrono` pattern for `cdmi_ctime` / `cdmi_atime` (ISO-8601, second precision, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Prefix that turns an object name into its sidecar metadata file name.
pub const METADATA_FILE_PREFIX: &str = ".";

// Metadata keys
pub const CDMI_SIZE: &str = "cdmi_size";
pub const CDMI_CTIME: &str = "cdmi_ctime";
pub const CDMI_ATIME: &str = "cdmi_atime";
pub const FILE_NAME: &str = "fileName";
pub const METADATA_FILE_NAME: &str = "metadataFileName";
pub const MIMETYPE: &str = "mimetype";

/// Keys owned by the store; callers cannot override them through user metadata.
pub const SYSTEM_METADATA_KEYS: [&str; 6] =
    [CDMI_SIZE, CDMI_CTIME, CDMI_ATIME, FILE_NAME, METADATA_FILE_NAME, MIMETYPE];
