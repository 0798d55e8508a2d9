use serde::{Deserialize, Serialize};

/// The signed-in user's profile, a singular resource: one slot, no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
}
