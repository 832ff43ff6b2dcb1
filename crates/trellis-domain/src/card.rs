use crate::attachment::Attachment;
use crate::board::BoardId;
use crate::checklist::Checklist;
use crate::label::Label;
use crate::list::ListId;
use crate::member::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type CardId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub short_link: String,
    pub id_list: ListId,
    #[serde(default)]
    pub id_board: BoardId,
    #[serde(default)]
    pub id_members: Vec<MemberId>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub pos: f64,
    /// Loaded on demand by the card detail view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklists: Option<Vec<Checklist>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl Card {
    pub fn new(
        id: impl Into<CardId>,
        list_id: impl Into<ListId>,
        board_id: impl Into<BoardId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            desc: String::new(),
            due: None,
            closed: false,
            url: String::new(),
            short_link: String::new(),
            id_list: list_id.into(),
            id_board: board_id.into(),
            id_members: Vec::new(),
            labels: Vec::new(),
            pos: 0.0,
            checklists: None,
            attachments: None,
        }
    }

    pub fn has_label(&self, label_id: &str) -> bool {
        self.labels.iter().any(|l| l.id == label_id)
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.id_members.iter().any(|m| m == member_id)
    }

    /// Checklists in display order, empty when details are not loaded.
    pub fn sorted_checklists(&self) -> Vec<&Checklist> {
        let mut checklists: Vec<&Checklist> =
            self.checklists.iter().flatten().collect();
        checklists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        checklists
    }

    pub fn has_details(&self) -> bool {
        self.checklists.is_some() && self.attachments.is_some()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due.is_some_and(|due| due < now)
    }

    /// Carries lazily loaded sub-resources over from a previous snapshot when
    /// the new record was fetched without them.
    pub fn inherit_details(mut self, previous: &Card) -> Self {
        if self.checklists.is_none() {
            self.checklists = previous.checklists.clone();
        }
        if self.attachments.is_none() {
            self.attachments = previous.attachments.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_remote_card() {
        let json = r#"{
            "id": "c1",
            "name": "Write docs",
            "desc": "",
            "due": "2024-05-01T12:00:00.000Z",
            "closed": false,
            "url": "https://trello.com/c/abc/1-write-docs",
            "shortLink": "abc",
            "idList": "l1",
            "idBoard": "b1",
            "idMembers": ["m1"],
            "labels": [{"id": "lb1", "name": "docs", "color": "green", "idBoard": "b1"}],
            "pos": 16384
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id_list, "l1");
        assert!(card.has_member("m1"));
        assert!(card.has_label("lb1"));
        assert!(card.checklists.is_none());
        assert!(card.due.is_some());
    }

    #[test]
    fn test_inherit_details_keeps_loaded_subresources() {
        let mut previous = Card::new("c1", "l1", "b1", "Old");
        previous.checklists = Some(Vec::new());
        previous.attachments = Some(Vec::new());

        let fresh = Card::new("c1", "l1", "b1", "New").inherit_details(&previous);
        assert_eq!(fresh.name, "New");
        assert!(fresh.has_details());
    }

    #[test]
    fn test_overdue() {
        let mut card = Card::new("c1", "l1", "b1", "Due");
        let now = Utc::now();
        assert!(!card.is_overdue(now));
        card.due = Some(now - chrono::Duration::hours(1));
        assert!(card.is_overdue(now));
    }
}
