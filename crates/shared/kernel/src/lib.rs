//! Kernel utilities shared across the workspace.
//! Keep this crate lightweight; it re-exports ergonomic helpers for IDs and config loading.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use cdmi_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//!
//! let object_id = safe_nanoid!(cdmi_kernel::domain::constants::OBJECT_ID_LENGTH);
//! assert_eq!(object_id.len(), 8);
//! ```
//!
//! ## Config loading
//! ```rust,no_run
//! use cdmi_kernel::config::load_config;
//! use cdmi_kernel::domain::config::CdmiConfig;
//!
//! let cfg: CdmiConfig = load_config(None::<&str>).unwrap();
//! println!("{}", cfg.storage.base_directory.display());
//! ```
pub mod config;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use cdmi_domain as domain;
pub use nanoid::nanoid;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
