//! Work the input handlers hand to the event loop.
//!
//! Key handlers run synchronously and cannot await the network, so anything
//! remote is queued as a [`StoreCommand`]. The loop spawns
//! [`DomainStore::execute`] for each one and feeds the [`CommandOutcome`] back
//! into the app.

use super::domain::DomainStore;
use super::navigation::ConfirmAction;
use trellis_domain::{
    AttachmentId, AttachmentSource, Board, Card, CardId, CardUpdate, CheckItemId,
    CheckItemState, ChecklistId, LabelId, ListId, MemberId,
};

/// Where the card results view got its cards from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsSource {
    #[default]
    Assigned,
    Search(String),
}

impl ResultsSource {
    pub fn title(&self) -> String {
        match self {
            ResultsSource::Assigned => "My Cards".to_string(),
            ResultsSource::Search(query) => format!("Search: {}", query),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    LoadBoards,
    LoadBoard(Board),
    ReloadBoard,
    CreateCard {
        list_id: ListId,
        name: String,
    },
    CreateList {
        board_id: String,
        name: String,
    },
    MoveCard {
        card_id: CardId,
        from_list: ListId,
        to_list: ListId,
        to_name: String,
    },
    ArchiveCard {
        card_id: CardId,
        list_id: ListId,
    },
    DeleteCard {
        card_id: CardId,
        list_id: ListId,
    },
    UpdateCard {
        card_id: CardId,
        update: CardUpdate,
    },
    SetLabel {
        card_id: CardId,
        label_id: LabelId,
        present: bool,
    },
    SetMember {
        card_id: CardId,
        member_id: MemberId,
        present: bool,
    },
    LoadCardDetails(CardId),
    CreateChecklist {
        card_id: CardId,
        name: String,
    },
    DeleteChecklist {
        card_id: CardId,
        checklist_id: ChecklistId,
    },
    CreateCheckItem {
        card_id: CardId,
        checklist_id: ChecklistId,
        name: String,
    },
    DeleteCheckItem {
        card_id: CardId,
        checklist_id: ChecklistId,
        item_id: CheckItemId,
    },
    ToggleCheckItem {
        card_id: CardId,
        item_id: CheckItemId,
        state: CheckItemState,
    },
    AddAttachment {
        card_id: CardId,
        source: AttachmentSource,
    },
    DeleteAttachment {
        card_id: CardId,
        attachment_id: AttachmentId,
    },
    SyncCache,
    LoadAssignedCards,
    SearchCards(String),
}

impl StoreCommand {
    pub fn description(&self) -> String {
        match self {
            StoreCommand::LoadBoards => "Load boards".to_string(),
            StoreCommand::LoadBoard(board) => format!("Load board {}", board.name),
            StoreCommand::ReloadBoard => "Reload board".to_string(),
            StoreCommand::CreateCard { name, .. } => format!("Create card '{}'", name),
            StoreCommand::CreateList { name, .. } => format!("Create list '{}'", name),
            StoreCommand::MoveCard { card_id, to_name, .. } => {
                format!("Move card {} to {}", card_id, to_name)
            }
            StoreCommand::ArchiveCard { card_id, .. } => format!("Archive card {}", card_id),
            StoreCommand::DeleteCard { card_id, .. } => format!("Delete card {}", card_id),
            StoreCommand::UpdateCard { card_id, .. } => format!("Update card {}", card_id),
            StoreCommand::SetLabel { card_id, label_id, present } => {
                format!("Set label {} on {} to {}", label_id, card_id, present)
            }
            StoreCommand::SetMember { card_id, member_id, present } => {
                format!("Set member {} on {} to {}", member_id, card_id, present)
            }
            StoreCommand::LoadCardDetails(card_id) => format!("Load details for {}", card_id),
            StoreCommand::CreateChecklist { name, .. } => format!("Create checklist '{}'", name),
            StoreCommand::DeleteChecklist { checklist_id, .. } => {
                format!("Delete checklist {}", checklist_id)
            }
            StoreCommand::CreateCheckItem { name, .. } => format!("Create item '{}'", name),
            StoreCommand::DeleteCheckItem { item_id, .. } => format!("Delete item {}", item_id),
            StoreCommand::ToggleCheckItem { item_id, .. } => format!("Toggle item {}", item_id),
            StoreCommand::AddAttachment { card_id, .. } => format!("Attach to {}", card_id),
            StoreCommand::DeleteAttachment { attachment_id, .. } => {
                format!("Delete attachment {}", attachment_id)
            }
            StoreCommand::SyncCache => "Sync cache".to_string(),
            StoreCommand::LoadAssignedCards => "Load assigned cards".to_string(),
            StoreCommand::SearchCards(query) => format!("Search '{}'", query),
        }
    }

    /// Status text shown when the command succeeds. Loads stay quiet.
    fn success_message(&self) -> Option<String> {
        match self {
            StoreCommand::CreateCard { name, .. } => Some(format!("Created '{}'", name)),
            StoreCommand::CreateList { name, .. } => Some(format!("Created list '{}'", name)),
            StoreCommand::MoveCard { to_name, .. } => Some(format!("Moved to {}", to_name)),
            StoreCommand::ArchiveCard { .. } => Some("Card archived".to_string()),
            StoreCommand::DeleteCard { .. } => Some("Card deleted".to_string()),
            StoreCommand::UpdateCard { .. } => Some("Card updated".to_string()),
            StoreCommand::CreateChecklist { name, .. } => {
                Some(format!("Added checklist '{}'", name))
            }
            StoreCommand::DeleteChecklist { .. } => Some("Checklist deleted".to_string()),
            StoreCommand::CreateCheckItem { name, .. } => Some(format!("Added '{}'", name)),
            StoreCommand::DeleteCheckItem { .. } => Some("Item deleted".to_string()),
            StoreCommand::AddAttachment { .. } => Some("Attachment added".to_string()),
            StoreCommand::DeleteAttachment { .. } => Some("Attachment deleted".to_string()),
            _ => None,
        }
    }
}

impl From<ConfirmAction> for StoreCommand {
    fn from(action: ConfirmAction) -> Self {
        match action {
            ConfirmAction::ArchiveCard {
                card_id, list_id, ..
            } => StoreCommand::ArchiveCard { card_id, list_id },
            ConfirmAction::DeleteCard {
                card_id, list_id, ..
            } => StoreCommand::DeleteCard { card_id, list_id },
            ConfirmAction::DeleteChecklist {
                card_id,
                checklist_id,
                ..
            } => StoreCommand::DeleteChecklist {
                card_id,
                checklist_id,
            },
            ConfirmAction::DeleteAttachment {
                card_id,
                attachment_id,
                ..
            } => StoreCommand::DeleteAttachment {
                card_id,
                attachment_id,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Completed { message: Option<String> },
    Failed { message: String },
    CardResults { source: ResultsSource, cards: Vec<Card> },
}

impl DomainStore {
    /// Runs a queued command against the store and describes the result.
    pub async fn execute(&self, command: StoreCommand) -> CommandOutcome {
        tracing::debug!("Executing: {}", command.description());
        let success_message = command.success_message();

        let ok = match command {
            StoreCommand::LoadBoards => self.load_boards().await,
            StoreCommand::LoadBoard(board) => self.load_board(board).await,
            StoreCommand::ReloadBoard => self.reload_board().await,
            StoreCommand::CreateCard { list_id, name } => {
                self.create_card(&list_id, &name).await.is_some()
            }
            StoreCommand::CreateList { board_id, name } => {
                self.create_list(&board_id, &name).await.is_some()
            }
            StoreCommand::MoveCard {
                card_id,
                from_list,
                to_list,
                ..
            } => self.move_card(&card_id, &from_list, &to_list).await,
            StoreCommand::ArchiveCard { card_id, list_id } => {
                self.archive_card(&card_id, &list_id).await
            }
            StoreCommand::DeleteCard { card_id, list_id } => {
                self.delete_card(&card_id, &list_id).await
            }
            StoreCommand::UpdateCard { card_id, update } => {
                self.update_card(&card_id, update).await.is_some()
            }
            StoreCommand::SetLabel {
                card_id,
                label_id,
                present,
            } => {
                if present {
                    self.add_label_to_card(&card_id, &label_id).await
                } else {
                    self.remove_label_from_card(&card_id, &label_id).await
                }
            }
            StoreCommand::SetMember {
                card_id,
                member_id,
                present,
            } => {
                if present {
                    self.add_member_to_card(&card_id, &member_id).await
                } else {
                    self.remove_member_from_card(&card_id, &member_id).await
                }
            }
            StoreCommand::LoadCardDetails(card_id) => self.load_card_details(&card_id).await,
            StoreCommand::CreateChecklist { card_id, name } => {
                self.create_checklist(&card_id, &name).await
            }
            StoreCommand::DeleteChecklist {
                card_id,
                checklist_id,
            } => self.delete_checklist(&card_id, &checklist_id).await,
            StoreCommand::CreateCheckItem {
                card_id,
                checklist_id,
                name,
            } => self.create_check_item(&card_id, &checklist_id, &name).await,
            StoreCommand::DeleteCheckItem {
                card_id,
                checklist_id,
                item_id,
            } => {
                self.delete_check_item(&card_id, &checklist_id, &item_id)
                    .await
            }
            StoreCommand::ToggleCheckItem {
                card_id,
                item_id,
                state,
            } => self.toggle_check_item(&card_id, &item_id, state).await,
            StoreCommand::AddAttachment { card_id, source } => {
                self.add_attachment(&card_id, source).await
            }
            StoreCommand::DeleteAttachment {
                card_id,
                attachment_id,
            } => self.delete_attachment(&card_id, &attachment_id).await,
            StoreCommand::SyncCache => {
                return match self.sync_cache().await {
                    Some(report) => CommandOutcome::Completed {
                        message: Some(format!(
                            "Synced {} boards, {} lists",
                            report.boards, report.lists
                        )),
                    },
                    None => self.failure(),
                };
            }
            StoreCommand::LoadAssignedCards => {
                return match self.load_assigned_cards().await {
                    Some(cards) => CommandOutcome::CardResults {
                        source: ResultsSource::Assigned,
                        cards,
                    },
                    None => self.failure(),
                };
            }
            StoreCommand::SearchCards(query) => {
                return match self.search_cards(&query).await {
                    Some(cards) => CommandOutcome::CardResults {
                        source: ResultsSource::Search(query),
                        cards,
                    },
                    None => self.failure(),
                };
            }
        };

        if ok {
            CommandOutcome::Completed {
                message: success_message,
            }
        } else {
            self.failure()
        }
    }

    fn failure(&self) -> CommandOutcome {
        let message = self
            .error()
            .unwrap_or_else(|| "Request failed".to_string());
        CommandOutcome::Failed { message }
    }
}
