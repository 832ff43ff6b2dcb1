use crate::board::BoardId;
use serde::{Deserialize, Serialize};

pub type LabelId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: LabelId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub id_board: BoardId,
}

impl Label {
    /// Name to show in pickers; unnamed labels fall back to their colour.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else {
            self.color.as_deref().unwrap_or("(no name)")
        }
    }
}
