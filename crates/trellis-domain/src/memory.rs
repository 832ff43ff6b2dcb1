//! In-memory [`DomainClient`] used for offline demos and tests.

use crate::client::{
    AttachmentSource, CardUpdate, CreateCardParams, CreateCheckItemParams, CreateChecklistParams,
    CreateListParams, DomainClient,
};
use crate::{
    Attachment, Board, BoardId, Card, CardId, CheckItem, CheckItemState, Checklist, Label, List,
    Member, MemberId,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use trellis_core::{TrellisError, TrellisResult};

#[derive(Default)]
struct MemoryData {
    boards: Vec<Board>,
    lists: Vec<List>,
    cards: Vec<Card>,
    labels: Vec<Label>,
    members: Vec<(BoardId, Member)>,
    checklists: Vec<Checklist>,
    attachments: HashMap<CardId, Vec<Attachment>>,
    me: Option<MemberId>,
    next_id: u64,
    failure: Option<String>,
    calls: Vec<String>,
}

impl MemoryData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn card_mut(&mut self, card_id: &str) -> TrellisResult<&mut Card> {
        self.cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| TrellisError::NotFound(format!("card {}", card_id)))
    }

    fn card(&self, card_id: &str) -> TrellisResult<Card> {
        self.cards
            .iter()
            .find(|c| c.id == card_id)
            .cloned()
            .ok_or_else(|| TrellisError::NotFound(format!("card {}", card_id)))
    }

    fn end_of_list(&self, list_id: &str) -> f64 {
        self.cards
            .iter()
            .filter(|c| c.id_list == list_id)
            .map(|c| c.pos)
            .fold(0.0, f64::max)
            + 1.0
    }
}

/// Thread-safe in-memory stand-in for the remote service.
///
/// Records every call and can be told to fail, which makes it the fixture
/// of choice for store tests.
#[derive(Default)]
pub struct MemoryClient {
    data: Mutex<MemoryData>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small pre-populated workspace for `--offline`.
    pub fn with_demo_data() -> Self {
        let client = Self::new();
        let me = client.seed_member(None, "me", "Demo User");
        client.set_me(&me.id);

        let roadmap = client.seed_board("Product Roadmap");
        let teammate = client.seed_member(Some(&roadmap.id), "alex", "Alex Rivera");
        client.seed_board_member(&roadmap.id, &me);
        let bug = client.seed_label(&roadmap.id, "bug", "red");
        let feature = client.seed_label(&roadmap.id, "feature", "green");
        client.seed_label(&roadmap.id, "design", "purple");

        let backlog = client.seed_list(&roadmap.id, "Backlog");
        let doing = client.seed_list(&roadmap.id, "In Progress");
        let review = client.seed_list(&roadmap.id, "Review");
        let done = client.seed_list(&roadmap.id, "Done");

        for name in [
            "Dark mode",
            "Export boards to CSV",
            "Keyboard shortcut cheatsheet",
            "Offline queue for mutations",
            "Faster board loading",
            "Card templates",
        ] {
            client.seed_card(&backlog.id, name);
        }
        let login = client.seed_card(&doing.id, "Fix login redirect loop");
        client.tag(&login.id, &bug, Some(&me.id));
        let search = client.seed_card(&doing.id, "Search across boards");
        client.tag(&search.id, &feature, Some(&teammate.id));
        let release = client.seed_card(&review.id, "Release notes for 1.2");
        client.tag(&release.id, &feature, Some(&me.id));
        let checklist = client.seed_checklist(&release.id, "Release steps");
        for step in ["Draft notes", "Review with team", "Publish"] {
            client.seed_check_item(&checklist.id, step);
        }
        client.seed_card(&done.id, "Set up CI");

        let personal = client.seed_board("Personal");
        client.seed_board_member(&personal.id, &me);
        let todo = client.seed_list(&personal.id, "To Do");
        client.seed_list(&personal.id, "Done");
        client.seed_card(&todo.id, "Renew passport");

        client.data.lock().calls.clear();
        client
    }

    pub fn seed_board(&self, name: &str) -> Board {
        let mut data = self.data.lock();
        let id = data.next_id("b");
        let mut board = Board::new(id.clone(), name);
        board.short_link = id.clone();
        board.url = format!("https://trello.com/b/{}", id);
        data.boards.push(board.clone());
        board
    }

    pub fn seed_list(&self, board_id: &str, name: &str) -> List {
        let mut data = self.data.lock();
        let id = data.next_id("l");
        let pos = data.lists.iter().filter(|l| l.id_board == board_id).count() as f64 + 1.0;
        let mut list = List::new(id, board_id, name);
        list.pos = pos;
        data.lists.push(list.clone());
        list
    }

    pub fn seed_card(&self, list_id: &str, name: &str) -> Card {
        let mut data = self.data.lock();
        let id = data.next_id("c");
        let board_id = data
            .lists
            .iter()
            .find(|l| l.id == list_id)
            .map(|l| l.id_board.clone())
            .unwrap_or_default();
        let mut card = Card::new(id.clone(), list_id, board_id, name);
        card.pos = data.end_of_list(list_id);
        card.short_link = id.clone();
        card.url = format!("https://trello.com/c/{}", id);
        data.cards.push(card.clone());
        card
    }

    pub fn seed_label(&self, board_id: &str, name: &str, color: &str) -> Label {
        let mut data = self.data.lock();
        let id = data.next_id("lb");
        let label = Label {
            id,
            name: name.to_string(),
            color: Some(color.to_string()),
            id_board: board_id.to_string(),
        };
        data.labels.push(label.clone());
        label
    }

    /// Creates a member, optionally adding it to a board.
    pub fn seed_member(&self, board_id: Option<&str>, username: &str, full_name: &str) -> Member {
        let mut data = self.data.lock();
        let id = data.next_id("m");
        let initials = full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect::<String>()
            .to_uppercase();
        let member = Member {
            id,
            username: username.to_string(),
            full_name: full_name.to_string(),
            initials,
        };
        if let Some(board_id) = board_id {
            data.members.push((board_id.to_string(), member.clone()));
        }
        member
    }

    pub fn seed_board_member(&self, board_id: &str, member: &Member) {
        self.data
            .lock()
            .members
            .push((board_id.to_string(), member.clone()));
    }

    pub fn seed_checklist(&self, card_id: &str, name: &str) -> Checklist {
        let mut data = self.data.lock();
        let id = data.next_id("cl");
        let pos = data.checklists.iter().filter(|c| c.id_card == card_id).count() as f64 + 1.0;
        let checklist = Checklist {
            id,
            name: name.to_string(),
            id_card: card_id.to_string(),
            pos,
            check_items: Vec::new(),
        };
        data.checklists.push(checklist.clone());
        checklist
    }

    pub fn seed_check_item(&self, checklist_id: &str, name: &str) -> Option<CheckItem> {
        let mut data = self.data.lock();
        let id = data.next_id("ci");
        let checklist = data.checklists.iter_mut().find(|c| c.id == checklist_id)?;
        let item = CheckItem {
            id,
            name: name.to_string(),
            state: CheckItemState::Incomplete,
            pos: checklist.check_items.len() as f64 + 1.0,
            id_checklist: checklist_id.to_string(),
        };
        checklist.check_items.push(item.clone());
        Some(item)
    }

    pub fn set_me(&self, member_id: &str) {
        self.data.lock().me = Some(member_id.to_string());
    }

    /// Makes every following call fail with a remote error until cleared.
    pub fn set_failure(&self, message: Option<&str>) {
        self.data.lock().failure = message.map(str::to_string);
    }

    /// Names of the calls made so far, e.g. `get_card:c3`.
    pub fn calls(&self) -> Vec<String> {
        self.data.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.data.lock().calls.clear();
    }

    /// Snapshot of a stored card, including archived ones.
    pub fn stored_card(&self, card_id: &str) -> Option<Card> {
        self.data.lock().card(card_id).ok()
    }

    fn tag(&self, card_id: &str, label: &Label, member_id: Option<&MemberId>) {
        let mut data = self.data.lock();
        if let Ok(card) = data.card_mut(card_id) {
            card.labels.push(label.clone());
            if let Some(member_id) = member_id {
                card.id_members.push(member_id.to_string());
            }
        }
    }

    fn begin(&self, call: String) -> TrellisResult<parking_lot::MutexGuard<'_, MemoryData>> {
        let mut data = self.data.lock();
        data.calls.push(call);
        if let Some(message) = data.failure.clone() {
            return Err(TrellisError::Remote {
                status: 500,
                message,
            });
        }
        Ok(data)
    }
}

#[async_trait]
impl DomainClient for MemoryClient {
    async fn list_boards(&self) -> TrellisResult<Vec<Board>> {
        let data = self.begin("list_boards".to_string())?;
        Ok(data.boards.iter().filter(|b| !b.closed).cloned().collect())
    }

    async fn get_board(&self, board_id: &str) -> TrellisResult<Board> {
        let data = self.begin(format!("get_board:{}", board_id))?;
        data.boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .ok_or_else(|| TrellisError::NotFound(format!("board {}", board_id)))
    }

    async fn list_lists(&self, board_id: &str) -> TrellisResult<Vec<List>> {
        let data = self.begin(format!("list_lists:{}", board_id))?;
        let mut lists: Vec<List> = data
            .lists
            .iter()
            .filter(|l| l.id_board == board_id && !l.closed)
            .cloned()
            .collect();
        lists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        Ok(lists)
    }

    async fn create_list(&self, params: CreateListParams) -> TrellisResult<List> {
        let mut data = self.begin(format!("create_list:{}", params.board_id))?;
        if !data.boards.iter().any(|b| b.id == params.board_id) {
            return Err(TrellisError::NotFound(format!("board {}", params.board_id)));
        }
        let id = data.next_id("l");
        let pos = data
            .lists
            .iter()
            .filter(|l| l.id_board == params.board_id)
            .map(|l| l.pos)
            .fold(0.0, f64::max)
            + 1.0;
        let mut list = List::new(id, params.board_id, params.name);
        list.pos = pos;
        data.lists.push(list.clone());
        Ok(list)
    }

    async fn list_cards(&self, list_id: &str) -> TrellisResult<Vec<Card>> {
        let data = self.begin(format!("list_cards:{}", list_id))?;
        Ok(data
            .cards
            .iter()
            .filter(|c| c.id_list == list_id && !c.closed)
            .cloned()
            .collect())
    }

    async fn get_card(&self, card_id: &str) -> TrellisResult<Card> {
        let data = self.begin(format!("get_card:{}", card_id))?;
        data.card(card_id)
    }

    async fn create_card(&self, params: CreateCardParams) -> TrellisResult<Card> {
        let mut data = self.begin(format!("create_card:{}", params.list_id))?;
        let board_id = data
            .lists
            .iter()
            .find(|l| l.id == params.list_id)
            .map(|l| l.id_board.clone())
            .ok_or_else(|| TrellisError::NotFound(format!("list {}", params.list_id)))?;
        let id = data.next_id("c");
        let mut card = Card::new(id.clone(), params.list_id.clone(), board_id, params.name);
        card.desc = params.desc.unwrap_or_default();
        card.pos = data.end_of_list(&params.list_id);
        card.short_link = id.clone();
        card.url = format!("https://trello.com/c/{}", id);
        data.cards.push(card.clone());
        Ok(card)
    }

    async fn update_card(&self, card_id: &str, update: CardUpdate) -> TrellisResult<Card> {
        let mut data = self.begin(format!("update_card:{}", card_id))?;
        let new_pos = update.list_id.as_deref().map(|list| data.end_of_list(list));
        let card = data.card_mut(card_id)?;
        update.apply_to(card);
        if let Some(pos) = new_pos {
            card.pos = pos;
        }
        Ok(card.clone())
    }

    async fn move_card(&self, card_id: &str, list_id: &str) -> TrellisResult<Card> {
        let mut data = self.begin(format!("move_card:{}:{}", card_id, list_id))?;
        if !data.lists.iter().any(|l| l.id == list_id) {
            return Err(TrellisError::NotFound(format!("list {}", list_id)));
        }
        let pos = data.end_of_list(list_id);
        let card = data.card_mut(card_id)?;
        card.id_list = list_id.to_string();
        card.pos = pos;
        Ok(card.clone())
    }

    async fn archive_card(&self, card_id: &str) -> TrellisResult<Card> {
        let mut data = self.begin(format!("archive_card:{}", card_id))?;
        let card = data.card_mut(card_id)?;
        card.closed = true;
        Ok(card.clone())
    }

    async fn delete_card(&self, card_id: &str) -> TrellisResult<()> {
        let mut data = self.begin(format!("delete_card:{}", card_id))?;
        let before = data.cards.len();
        data.cards.retain(|c| c.id != card_id);
        if data.cards.len() == before {
            return Err(TrellisError::NotFound(format!("card {}", card_id)));
        }
        data.checklists.retain(|c| c.id_card != card_id);
        data.attachments.remove(card_id);
        Ok(())
    }

    async fn my_cards(&self) -> TrellisResult<Vec<Card>> {
        let data = self.begin("my_cards".to_string())?;
        let Some(me) = data.me.clone() else {
            return Ok(Vec::new());
        };
        Ok(data
            .cards
            .iter()
            .filter(|c| !c.closed && c.has_member(&me))
            .cloned()
            .collect())
    }

    async fn list_labels(&self, board_id: &str) -> TrellisResult<Vec<Label>> {
        let data = self.begin(format!("list_labels:{}", board_id))?;
        Ok(data
            .labels
            .iter()
            .filter(|l| l.id_board == board_id)
            .cloned()
            .collect())
    }

    async fn add_label(&self, card_id: &str, label_id: &str) -> TrellisResult<()> {
        let mut data = self.begin(format!("add_label:{}:{}", card_id, label_id))?;
        let label = data
            .labels
            .iter()
            .find(|l| &l.id == label_id)
            .cloned()
            .ok_or_else(|| TrellisError::NotFound(format!("label {}", label_id)))?;
        let card = data.card_mut(card_id)?;
        if card.has_label(label_id) {
            return Err(TrellisError::Remote {
                status: 400,
                message: "that label is already on the card".to_string(),
            });
        }
        card.labels.push(label);
        Ok(())
    }

    async fn remove_label(&self, card_id: &str, label_id: &str) -> TrellisResult<()> {
        let mut data = self.begin(format!("remove_label:{}:{}", card_id, label_id))?;
        let card = data.card_mut(card_id)?;
        card.labels.retain(|l| &l.id != label_id);
        Ok(())
    }

    async fn list_members(&self, board_id: &str) -> TrellisResult<Vec<Member>> {
        let data = self.begin(format!("list_members:{}", board_id))?;
        Ok(data
            .members
            .iter()
            .filter(|(board, _)| board == board_id)
            .map(|(_, member)| member.clone())
            .collect())
    }

    async fn add_member(&self, card_id: &str, member_id: &str) -> TrellisResult<()> {
        let mut data = self.begin(format!("add_member:{}:{}", card_id, member_id))?;
        let card = data.card_mut(card_id)?;
        if !card.has_member(member_id) {
            card.id_members.push(member_id.to_string());
        }
        Ok(())
    }

    async fn remove_member(&self, card_id: &str, member_id: &str) -> TrellisResult<()> {
        let mut data = self.begin(format!("remove_member:{}:{}", card_id, member_id))?;
        let card = data.card_mut(card_id)?;
        card.id_members.retain(|m| m != member_id);
        Ok(())
    }

    async fn list_checklists(&self, card_id: &str) -> TrellisResult<Vec<Checklist>> {
        let data = self.begin(format!("list_checklists:{}", card_id))?;
        let mut checklists: Vec<Checklist> = data
            .checklists
            .iter()
            .filter(|c| c.id_card == card_id)
            .cloned()
            .collect();
        checklists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        Ok(checklists)
    }

    async fn create_checklist(&self, params: CreateChecklistParams) -> TrellisResult<Checklist> {
        let mut data = self.begin(format!("create_checklist:{}", params.card_id))?;
        data.card(&params.card_id)?;
        let id = data.next_id("cl");
        let pos = data
            .checklists
            .iter()
            .filter(|c| c.id_card == params.card_id)
            .count() as f64
            + 1.0;
        let checklist = Checklist {
            id,
            name: params.name,
            id_card: params.card_id,
            pos,
            check_items: Vec::new(),
        };
        data.checklists.push(checklist.clone());
        Ok(checklist)
    }

    async fn delete_checklist(&self, checklist_id: &str) -> TrellisResult<()> {
        let mut data = self.begin(format!("delete_checklist:{}", checklist_id))?;
        data.checklists.retain(|c| c.id != checklist_id);
        Ok(())
    }

    async fn create_check_item(&self, params: CreateCheckItemParams) -> TrellisResult<CheckItem> {
        let mut data = self.begin(format!("create_check_item:{}", params.checklist_id))?;
        let id = data.next_id("ci");
        let checklist = data
            .checklists
            .iter_mut()
            .find(|c| c.id == params.checklist_id)
            .ok_or_else(|| TrellisError::NotFound(format!("checklist {}", params.checklist_id)))?;
        let item = CheckItem {
            id,
            name: params.name,
            state: CheckItemState::Incomplete,
            pos: checklist.check_items.len() as f64 + 1.0,
            id_checklist: params.checklist_id,
        };
        checklist.check_items.push(item.clone());
        Ok(item)
    }

    async fn delete_check_item(
        &self,
        checklist_id: &str,
        check_item_id: &str,
    ) -> TrellisResult<()> {
        let mut data = self.begin(format!("delete_check_item:{}", check_item_id))?;
        if let Some(checklist) = data.checklists.iter_mut().find(|c| c.id == checklist_id) {
            checklist.check_items.retain(|i| &i.id != check_item_id);
        }
        Ok(())
    }

    async fn set_check_item_state(
        &self,
        card_id: &str,
        check_item_id: &str,
        state: CheckItemState,
    ) -> TrellisResult<CheckItem> {
        let mut data = self.begin(format!("set_check_item_state:{}", check_item_id))?;
        data.checklists
            .iter_mut()
            .filter(|c| c.id_card == card_id)
            .flat_map(|c| c.check_items.iter_mut())
            .find(|i| &i.id == check_item_id)
            .map(|item| {
                item.state = state;
                item.clone()
            })
            .ok_or_else(|| TrellisError::NotFound(format!("check item {}", check_item_id)))
    }

    async fn list_attachments(&self, card_id: &str) -> TrellisResult<Vec<Attachment>> {
        let data = self.begin(format!("list_attachments:{}", card_id))?;
        Ok(data.attachments.get(card_id).cloned().unwrap_or_default())
    }

    async fn add_attachment(
        &self,
        card_id: &str,
        source: AttachmentSource,
    ) -> TrellisResult<Attachment> {
        let mut data = self.begin(format!("add_attachment:{}", card_id))?;
        data.card(card_id)?;
        let id = data.next_id("a");
        let attachment = match source {
            AttachmentSource::Url { url, name } => Attachment {
                id,
                name: name.unwrap_or_else(|| url.clone()),
                url,
                date: Some(Utc::now()),
                mime_type: None,
                bytes: None,
                is_upload: false,
                file_name: None,
            },
            AttachmentSource::File(path) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| {
                        TrellisError::Validation(format!("not a file: {}", path.display()))
                    })?;
                Attachment {
                    url: format!("memory://{}/{}", card_id, file_name),
                    name: file_name.clone(),
                    id,
                    date: Some(Utc::now()),
                    mime_type: None,
                    bytes: std::fs::metadata(&path).ok().map(|m| m.len()),
                    is_upload: true,
                    file_name: Some(file_name),
                }
            }
        };
        data.attachments
            .entry(card_id.to_string())
            .or_default()
            .push(attachment.clone());
        Ok(attachment)
    }

    async fn delete_attachment(
        &self,
        card_id: &str,
        attachment_id: &str,
    ) -> TrellisResult<()> {
        let mut data = self.begin(format!("delete_attachment:{}", attachment_id))?;
        if let Some(attachments) = data.attachments.get_mut(card_id) {
            attachments.retain(|a| &a.id != attachment_id);
        }
        Ok(())
    }

    async fn search_cards(&self, query: &str) -> TrellisResult<Vec<Card>> {
        let data = self.begin(format!("search_cards:{}", query))?;
        let needle = query.to_lowercase();
        Ok(data
            .cards
            .iter()
            .filter(|c| !c.closed && c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
