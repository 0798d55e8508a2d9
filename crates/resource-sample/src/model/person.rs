use serde::{Deserialize, Serialize};

/// A person record as served by the directory.
///
/// Preloaded roster rows carry only `id` and `name`; `age` and `middle`
/// arrive once the store fetches the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
}
