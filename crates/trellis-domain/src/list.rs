use crate::board::BoardId;
use serde::{Deserialize, Serialize};

pub type ListId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    pub id_board: BoardId,
    #[serde(default)]
    pub pos: f64,
}

impl List {
    pub fn new(id: impl Into<ListId>, board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            closed: false,
            id_board: board_id.into(),
            pos: 0.0,
        }
    }
}
