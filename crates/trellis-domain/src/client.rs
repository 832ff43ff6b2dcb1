use crate::{
    Attachment, Board, BoardId, Card, CardId, CheckItem, CheckItemState, Checklist, ChecklistId,
    FieldUpdate, Label, List, ListId, Member,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use trellis_core::TrellisResult;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCardParams {
    pub list_id: ListId,
    pub name: String,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateListParams {
    pub board_id: BoardId,
    pub name: String,
}

/// Partial card update. Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub due: FieldUpdate<DateTime<Utc>>,
    pub list_id: Option<ListId>,
    pub closed: Option<bool>,
}

impl CardUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn desc(desc: impl Into<String>) -> Self {
        Self {
            desc: Some(desc.into()),
            ..Self::default()
        }
    }

    pub fn due(due: Option<DateTime<Utc>>) -> Self {
        Self {
            due: due.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.desc.is_none()
            && !self.due.is_change()
            && self.list_id.is_none()
            && self.closed.is_none()
    }

    /// Applies the update to a local record.
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(name) = &self.name {
            card.name = name.clone();
        }
        if let Some(desc) = &self.desc {
            card.desc = desc.clone();
        }
        self.due.clone().apply_to(&mut card.due);
        if let Some(list_id) = &self.list_id {
            card.id_list = list_id.clone();
        }
        if let Some(closed) = self.closed {
            card.closed = closed;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateChecklistParams {
    pub card_id: CardId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCheckItemParams {
    pub checklist_id: ChecklistId,
    pub name: String,
}

/// What to attach to a card.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentSource {
    Url { url: String, name: Option<String> },
    File(PathBuf),
}

impl AttachmentSource {
    /// Interprets prompt input: anything with a URL scheme is a link,
    /// everything else is a local file path.
    pub fn from_input(input: &str) -> Self {
        let input = input.trim();
        if input.contains("://") {
            AttachmentSource::Url {
                url: input.to_string(),
                name: None,
            }
        } else {
            let expanded = match input.strip_prefix("~/") {
                Some(rest) => std::env::var_os("HOME")
                    .map(|home| PathBuf::from(home).join(rest))
                    .unwrap_or_else(|| PathBuf::from(input)),
                None => PathBuf::from(input),
            };
            AttachmentSource::File(expanded)
        }
    }
}

/// The remote work-tracking service.
///
/// Every call returns the authoritative record produced by the service.
/// Implementations must be usable from spawned tasks.
#[async_trait]
pub trait DomainClient: Send + Sync {
    // Boards
    async fn list_boards(&self) -> TrellisResult<Vec<Board>>;
    async fn get_board(&self, board_id: &str) -> TrellisResult<Board>;

    // Lists
    async fn list_lists(&self, board_id: &str) -> TrellisResult<Vec<List>>;
    async fn create_list(&self, params: CreateListParams) -> TrellisResult<List>;

    // Cards
    async fn list_cards(&self, list_id: &str) -> TrellisResult<Vec<Card>>;
    async fn get_card(&self, card_id: &str) -> TrellisResult<Card>;
    async fn create_card(&self, params: CreateCardParams) -> TrellisResult<Card>;
    async fn update_card(&self, card_id: &str, update: CardUpdate) -> TrellisResult<Card>;
    async fn move_card(&self, card_id: &str, list_id: &str) -> TrellisResult<Card>;
    async fn archive_card(&self, card_id: &str) -> TrellisResult<Card>;
    async fn delete_card(&self, card_id: &str) -> TrellisResult<()>;
    async fn my_cards(&self) -> TrellisResult<Vec<Card>>;

    // Labels
    async fn list_labels(&self, board_id: &str) -> TrellisResult<Vec<Label>>;
    async fn add_label(&self, card_id: &str, label_id: &str) -> TrellisResult<()>;
    async fn remove_label(&self, card_id: &str, label_id: &str) -> TrellisResult<()>;

    // Members
    async fn list_members(&self, board_id: &str) -> TrellisResult<Vec<Member>>;
    async fn add_member(&self, card_id: &str, member_id: &str) -> TrellisResult<()>;
    async fn remove_member(&self, card_id: &str, member_id: &str) -> TrellisResult<()>;

    // Checklists
    async fn list_checklists(&self, card_id: &str) -> TrellisResult<Vec<Checklist>>;
    async fn create_checklist(&self, params: CreateChecklistParams) -> TrellisResult<Checklist>;
    async fn delete_checklist(&self, checklist_id: &str) -> TrellisResult<()>;
    async fn create_check_item(&self, params: CreateCheckItemParams) -> TrellisResult<CheckItem>;
    async fn delete_check_item(
        &self,
        checklist_id: &str,
        check_item_id: &str,
    ) -> TrellisResult<()>;
    async fn set_check_item_state(
        &self,
        card_id: &str,
        check_item_id: &str,
        state: CheckItemState,
    ) -> TrellisResult<CheckItem>;

    // Attachments
    async fn list_attachments(&self, card_id: &str) -> TrellisResult<Vec<Attachment>>;
    async fn add_attachment(
        &self,
        card_id: &str,
        source: AttachmentSource,
    ) -> TrellisResult<Attachment>;
    async fn delete_attachment(
        &self,
        card_id: &str,
        attachment_id: &str,
    ) -> TrellisResult<()>;

    // Search
    async fn search_cards(&self, query: &str) -> TrellisResult<Vec<Card>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_update_apply() {
        let mut card = Card::new("c1", "l1", "b1", "Old");
        card.due = Some(Utc::now());
        let update = CardUpdate {
            name: Some("New".to_string()),
            due: FieldUpdate::Clear,
            ..CardUpdate::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut card);
        assert_eq!(card.name, "New");
        assert_eq!(card.due, None);
    }

    #[test]
    fn test_empty_update() {
        assert!(CardUpdate::default().is_empty());
        assert!(!CardUpdate::due(None).is_empty());
    }

    #[test]
    fn test_attachment_source_from_input() {
        assert_eq!(
            AttachmentSource::from_input(" https://example.com/a.png "),
            AttachmentSource::Url {
                url: "https://example.com/a.png".to_string(),
                name: None
            }
        );
        assert_eq!(
            AttachmentSource::from_input("/tmp/report.pdf"),
            AttachmentSource::File(PathBuf::from("/tmp/report.pdf"))
        );
    }
}
