use crate::card::CardId;
use serde::{Deserialize, Serialize};

pub type ChecklistId = String;
pub type CheckItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckItemState {
    Complete,
    Incomplete,
}

impl CheckItemState {
    pub fn toggled(self) -> Self {
        match self {
            CheckItemState::Complete => CheckItemState::Incomplete,
            CheckItemState::Incomplete => CheckItemState::Complete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckItemState::Complete => "complete",
            CheckItemState::Incomplete => "incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckItem {
    pub id: CheckItemId,
    pub name: String,
    pub state: CheckItemState,
    #[serde(default)]
    pub pos: f64,
    pub id_checklist: ChecklistId,
}

impl CheckItem {
    pub fn is_complete(&self) -> bool {
        self.state == CheckItemState::Complete
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: ChecklistId,
    pub name: String,
    pub id_card: CardId,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub check_items: Vec<CheckItem>,
}

impl Checklist {
    /// Items in display order.
    pub fn sorted_items(&self) -> Vec<&CheckItem> {
        let mut items: Vec<&CheckItem> = self.check_items.iter().collect();
        items.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        items
    }

    /// `(completed, total)`
    pub fn progress(&self) -> (usize, usize) {
        let done = self.check_items.iter().filter(|i| i.is_complete()).count();
        (done, self.check_items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, pos: f64, state: CheckItemState) -> CheckItem {
        CheckItem {
            id: id.to_string(),
            name: id.to_string(),
            state,
            pos,
            id_checklist: "cl".to_string(),
        }
    }

    #[test]
    fn test_sorted_items_orders_by_pos() {
        let checklist = Checklist {
            id: "cl".to_string(),
            name: "Release".to_string(),
            id_card: "c1".to_string(),
            pos: 1.0,
            check_items: vec![
                item("b", 2048.0, CheckItemState::Incomplete),
                item("a", 16.0, CheckItemState::Complete),
            ],
        };
        let ids: Vec<&str> = checklist.sorted_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(checklist.progress(), (1, 2));
    }

    #[test]
    fn test_state_wire_format() {
        let json = r#"{"id":"i1","name":"Ship","state":"complete","pos":1,"idChecklist":"cl"}"#;
        let item: CheckItem = serde_json::from_str(json).unwrap();
        assert!(item.is_complete());
        assert_eq!(item.state.toggled(), CheckItemState::Incomplete);
        assert_eq!(item.state.toggled().as_str(), "incomplete");
    }
}
