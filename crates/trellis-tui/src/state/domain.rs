use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::sync::Arc;
use trellis_core::TrellisResult;
use trellis_domain::{
    AttachmentSource, Board, Cache, Card, CardUpdate, CheckItemState, CreateCardParams,
    CreateCheckItemParams, CreateChecklistParams, CreateListParams, DomainClient, Label, List,
    ListId, Member, SyncReport,
};

/// Everything the dashboard knows about the remote workspace.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    pub boards: Vec<Board>,
    pub current_board: Option<Board>,
    pub lists: Vec<List>,
    pub cards_by_list: HashMap<ListId, Vec<Card>>,
    pub board_labels: Vec<Label>,
    pub members: Vec<Member>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl DomainState {
    pub fn cards_in(&self, list_id: &str) -> &[Card] {
        self.cards_by_list
            .get(list_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.cards_by_list
            .values()
            .flatten()
            .find(|card| card.id == card_id)
    }

    pub fn list_name(&self, list_id: &str) -> Option<&str> {
        self.lists
            .iter()
            .find(|list| list.id == list_id)
            .map(|list| list.name.as_str())
    }

    pub fn board_name(&self, board_id: &str) -> Option<&str> {
        self.boards
            .iter()
            .find(|board| board.id == board_id)
            .map(|board| board.name.as_str())
    }

    /// Replaces a card wherever it is stored, keeping details that the new
    /// record was fetched without.
    fn replace_card(&mut self, card: Card) {
        for cards in self.cards_by_list.values_mut() {
            if let Some(slot) = cards.iter_mut().find(|c| c.id == card.id) {
                *slot = card.inherit_details(slot);
                return;
            }
        }
    }

    fn remove_card(&mut self, list_id: &str, card_id: &str) {
        if let Some(cards) = self.cards_by_list.get_mut(list_id) {
            cards.retain(|c| c.id != card_id);
        }
    }

    fn clear_board(&mut self) {
        self.lists.clear();
        self.cards_by_list.clear();
        self.board_labels.clear();
        self.members.clear();
    }
}

/// Moves `moved` from `from` to the end of `to`.
pub fn move_between_lists(
    cards_by_list: &mut HashMap<ListId, Vec<Card>>,
    card_id: &str,
    from: &str,
    to: &str,
    moved: Card,
) {
    if let Some(cards) = cards_by_list.get_mut(from) {
        cards.retain(|c| c.id != card_id);
    }
    cards_by_list.entry(to.to_string()).or_default().push(moved);
}

struct BoardSnapshot {
    lists: Vec<List>,
    cards_by_list: HashMap<ListId, Vec<Card>>,
    labels: Vec<Label>,
    members: Vec<Member>,
}

/// Shared handle to the domain state and the collaborators that change it.
///
/// Every action marks the store as loading, calls the remote client, patches
/// the state from the returned records and records a readable error on
/// failure. Errors never escape an action; callers get `None`/`false`.
#[derive(Clone)]
pub struct DomainStore {
    client: Arc<dyn DomainClient>,
    cache: Arc<dyn Cache>,
    pub(crate) state: Arc<RwLock<DomainState>>,
}

impl DomainStore {
    pub fn new(client: Arc<dyn DomainClient>, cache: Arc<dyn Cache>) -> Self {
        Self {
            client,
            cache,
            state: Arc::new(RwLock::new(DomainState::default())),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, DomainState> {
        self.state.read()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    fn begin(&self) {
        let mut state = self.state.write();
        state.loading = true;
        state.error = None;
    }

    fn finish<T, R>(
        &self,
        action: &str,
        result: TrellisResult<T>,
        patch: impl FnOnce(&mut DomainState, T) -> R,
    ) -> Option<R> {
        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(value) => Some(patch(&mut state, value)),
            Err(err) => {
                tracing::warn!("{} failed: {}", action, err);
                state.error = Some(err.user_message());
                None
            }
        }
    }

    pub async fn load_boards(&self) -> bool {
        self.begin();
        let result = self.client.list_boards().await;
        self.finish("load_boards", result, |state, boards| {
            state.boards = boards;
        })
        .is_some()
    }

    pub async fn load_board(&self, board: Board) -> bool {
        self.begin();
        {
            let mut state = self.state.write();
            let switching = state
                .current_board
                .as_ref()
                .map_or(true, |current| current.id != board.id);
            if switching {
                state.clear_board();
            }
            state.current_board = Some(board.clone());
        }

        let result = self.fetch_board(&board.id).await;
        self.finish("load_board", result, |state, snapshot| {
            if state.current_board.as_ref().map(|b| &b.id) != Some(&board.id) {
                tracing::debug!("Discarding late load of board {}", board.name);
                return;
            }
            tracing::debug!(
                "Loaded board {} with {} lists",
                board.name,
                snapshot.lists.len()
            );
            state.lists = snapshot.lists;
            state.cards_by_list = snapshot.cards_by_list;
            state.board_labels = snapshot.labels;
            state.members = snapshot.members;
        })
        .is_some()
    }

    /// Reloads whichever board is open.
    pub async fn reload_board(&self) -> bool {
        let current = self.state.read().current_board.clone();
        match current {
            Some(board) => self.load_board(board).await,
            None => false,
        }
    }

    async fn fetch_board(&self, board_id: &str) -> TrellisResult<BoardSnapshot> {
        let lists = self.client.list_lists(board_id).await?;
        let card_fetches = lists.iter().map(|list| self.client.list_cards(&list.id));
        let (cards, labels, members) = tokio::try_join!(
            try_join_all(card_fetches),
            self.client.list_labels(board_id),
            self.client.list_members(board_id),
        )?;
        let cards_by_list = lists
            .iter()
            .map(|list| list.id.clone())
            .zip(cards)
            .collect();
        Ok(BoardSnapshot {
            lists,
            cards_by_list,
            labels,
            members,
        })
    }

    pub async fn create_card(&self, list_id: &str, name: &str) -> Option<Card> {
        self.begin();
        let result = self
            .client
            .create_card(CreateCardParams {
                list_id: list_id.to_string(),
                name: name.to_string(),
                desc: None,
            })
            .await;
        self.finish("create_card", result, |state, card| {
            state
                .cards_by_list
                .entry(card.id_list.clone())
                .or_default()
                .push(card.clone());
            card
        })
    }

    pub async fn create_list(&self, board_id: &str, name: &str) -> Option<List> {
        self.begin();
        let result = self
            .client
            .create_list(CreateListParams {
                board_id: board_id.to_string(),
                name: name.to_string(),
            })
            .await;
        self.finish("create_list", result, |state, list| {
            state.cards_by_list.entry(list.id.clone()).or_default();
            state.lists.push(list.clone());
            list
        })
    }

    pub async fn move_card(&self, card_id: &str, from_list: &str, to_list: &str) -> bool {
        self.begin();
        let result = self.client.move_card(card_id, to_list).await;
        self.finish("move_card", result, |state, moved| {
            let moved = match state.find_card(card_id) {
                Some(previous) => moved.inherit_details(previous),
                None => moved,
            };
            move_between_lists(&mut state.cards_by_list, card_id, from_list, to_list, moved);
        })
        .is_some()
    }

    pub async fn archive_card(&self, card_id: &str, list_id: &str) -> bool {
        self.begin();
        let result = self.client.archive_card(card_id).await;
        self.finish("archive_card", result, |state, _| {
            state.remove_card(list_id, card_id);
        })
        .is_some()
    }

    pub async fn delete_card(&self, card_id: &str, list_id: &str) -> bool {
        self.begin();
        let result = self.client.delete_card(card_id).await;
        self.finish("delete_card", result, |state, _| {
            state.remove_card(list_id, card_id);
        })
        .is_some()
    }

    pub async fn update_card(&self, card_id: &str, update: CardUpdate) -> Option<Card> {
        self.begin();
        let result = self.client.update_card(card_id, update).await;
        self.finish("update_card", result, |state, card| {
            state.replace_card(card.clone());
            card
        })
    }

    pub async fn add_label_to_card(&self, card_id: &str, label_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client.add_label(card_id, label_id).await?;
            self.client.get_card(card_id).await
        }
        .await;
        self.finish("add_label", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn remove_label_from_card(&self, card_id: &str, label_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .remove_label(card_id, label_id)
                .await?;
            self.client.get_card(card_id).await
        }
        .await;
        self.finish("remove_label", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn add_member_to_card(&self, card_id: &str, member_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .add_member(card_id, member_id)
                .await?;
            self.client.get_card(card_id).await
        }
        .await;
        self.finish("add_member", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn remove_member_from_card(&self, card_id: &str, member_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .remove_member(card_id, member_id)
                .await?;
            self.client.get_card(card_id).await
        }
        .await;
        self.finish("remove_member", result, DomainState::replace_card)
            .is_some()
    }

    /// Card record with checklists and attachments filled in.
    async fn refetch_card_details(&self, card_id: &str) -> TrellisResult<Card> {
        let (mut card, checklists, attachments) = tokio::try_join!(
            self.client.get_card(card_id),
            self.client.list_checklists(card_id),
            self.client.list_attachments(card_id),
        )?;
        card.checklists = Some(checklists);
        card.attachments = Some(attachments);
        Ok(card)
    }

    pub async fn load_card_details(&self, card_id: &str) -> bool {
        self.begin();
        let result = self.refetch_card_details(card_id).await;
        self.finish("load_card_details", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn create_checklist(&self, card_id: &str, name: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .create_checklist(CreateChecklistParams {
                    card_id: card_id.to_string(),
                    name: name.to_string(),
                })
                .await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("create_checklist", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn delete_checklist(&self, card_id: &str, checklist_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client.delete_checklist(checklist_id).await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("delete_checklist", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn create_check_item(&self, card_id: &str, checklist_id: &str, name: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .create_check_item(CreateCheckItemParams {
                    checklist_id: checklist_id.to_string(),
                    name: name.to_string(),
                })
                .await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("create_check_item", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn delete_check_item(&self, card_id: &str, checklist_id: &str, item_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .delete_check_item(checklist_id, item_id)
                .await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("delete_check_item", result, DomainState::replace_card)
            .is_some()
    }

    /// Flips an item from `current` to the opposite state.
    pub async fn toggle_check_item(
        &self,
        card_id: &str,
        item_id: &str,
        current: CheckItemState,
    ) -> bool {
        self.begin();
        let result = async {
            self.client
                .set_check_item_state(card_id, item_id, current.toggled())
                .await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("toggle_check_item", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn add_attachment(&self, card_id: &str, source: AttachmentSource) -> bool {
        self.begin();
        let result = async {
            self.client.add_attachment(card_id, source).await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("add_attachment", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn delete_attachment(&self, card_id: &str, attachment_id: &str) -> bool {
        self.begin();
        let result = async {
            self.client
                .delete_attachment(card_id, attachment_id)
                .await?;
            self.refetch_card_details(card_id).await
        }
        .await;
        self.finish("delete_attachment", result, DomainState::replace_card)
            .is_some()
    }

    pub async fn sync_cache(&self) -> Option<SyncReport> {
        self.begin();
        let result = async {
            self.cache.bootstrap().await?;
            self.cache.sync().await
        }
        .await;
        self.finish("sync_cache", result, |state, report| {
            state.last_synced = Some(Utc::now());
            report
        })
    }

    /// Cards assigned to the authenticated member. Nothing is stored.
    pub async fn load_assigned_cards(&self) -> Option<Vec<Card>> {
        self.begin();
        let result = self.client.my_cards().await;
        self.finish("load_assigned_cards", result, |_, cards| cards)
    }

    pub async fn search_cards(&self, query: &str) -> Option<Vec<Card>> {
        self.begin();
        let result = self.client.search_cards(query).await;
        self.finish("search_cards", result, |_, cards| cards)
    }
}
