use serde::{Deserialize, Serialize};

pub type BoardId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub short_link: String,
    #[serde(default)]
    pub closed: bool,
}

impl Board {
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            desc: String::new(),
            url: String::new(),
            short_link: String::new(),
            closed: false,
        }
    }
}
