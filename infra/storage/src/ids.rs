use std::fmt::Debug;

/// Produces identifiers for objects created without one.
pub trait ObjectIdGenerator: Debug + Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// URL-safe IDs without visually ambiguous characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoIdGenerator;

impl ObjectIdGenerator for NanoIdGenerator {
    fn generate(&self, length: usize) -> String {
        cdmi_kernel::safe_nanoid!(length)
    }
}
