use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Every data-object operation a CDMI front end may ask the store for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateByPath,
    CreateNonCdmiByPath,
    FindByPath,
    CreateById,
    DeleteByPath,
    FindByObjectId,
}

impl Operation {
    pub const ALL: [Self; 6] = [
        Self::CreateByPath,
        Self::CreateNonCdmiByPath,
        Self::FindByPath,
        Self::CreateById,
        Self::DeleteByPath,
        Self::FindByObjectId,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateByPath => "createByPath",
            Self::CreateNonCdmiByPath => "createNonCDMIByPath",
            Self::FindByPath => "findByPath",
            Self::CreateById => "createById",
            Self::DeleteByPath => "deleteByPath",
            Self::FindByObjectId => "findByObjectId",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of [`Operation`]s, used for capability negotiation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct OperationSet: u32 {
        const CREATE_BY_PATH = 1 << 0;
        const CREATE_NON_CDMI_BY_PATH = 1 << 1;
        const FIND_BY_PATH = 1 << 2;
        const CREATE_BY_ID = 1 << 3;
        const DELETE_BY_PATH = 1 << 4;
        const FIND_BY_OBJECT_ID = 1 << 5;

        const BY_PATH = Self::CREATE_BY_PATH.bits()
            | Self::CREATE_NON_CDMI_BY_PATH.bits()
            | Self::FIND_BY_PATH.bits();
    }
}

impl From<Operation> for OperationSet {
    fn from(op: Operation) -> Self {
        match op {
            Operation::CreateByPath => Self::CREATE_BY_PATH,
            Operation::CreateNonCdmiByPath => Self::CREATE_NON_CDMI_BY_PATH,
            Operation::FindByPath => Self::FIND_BY_PATH,
            Operation::CreateById => Self::CREATE_BY_ID,
            Operation::DeleteByPath => Self::DELETE_BY_PATH,
            Operation::FindByObjectId => Self::FIND_BY_OBJECT_ID,
        }
    }
}

impl OperationSet {
    #[must_use]
    pub fn supports(self, op: Operation) -> bool {
        self.contains(op.into())
    }

    /// Operations of this set, in declaration order.
    pub fn operations(self) -> impl Iterator<Item = Operation> {
        Operation::ALL.into_iter().filter(move |op| self.supports(*op))
    }
}

impl Serialize for OperationSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for OperationSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
