use serde::{Deserialize, Serialize};

pub type MemberId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub initials: String,
}
