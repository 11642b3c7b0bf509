//! Resource identifier type.

use uuid::Uuid;

/// Namespace all resource ids are derived under.
///
/// Changing this value changes every generated id, which the scheduler would
/// see as a completely new set of machines.
const RESOURCE_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6f, 0x1c, 0x52, 0x0e, 0x8a, 0x3d, 0x4b, 0x7e, 0x9c, 0x21, 0x5d, 0x0b, 0x44, 0xe7, 0x91, 0xa3,
]);

/// Identifier of one node in a resource topology tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Derives an ID from a seed string. Pure: equal seeds give equal IDs.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        Self(Uuid::new_v5(&RESOURCE_NAMESPACE, seed.as_bytes()))
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
