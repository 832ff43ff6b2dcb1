//! Navigation state: which view is showing, which mode the keyboard is in,
//! what is selected, and the transient status/confirmation overlays.
//!
//! All changes go through [`reduce`], a pure function from the current state
//! and one [`NavAction`] to the next state. [`NavigationStore`] owns the
//! state and applies actions one at a time.

use trellis_domain::{AttachmentId, CardId, ChecklistId, ListId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Board,
    CardDetail,
    MyCards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    CreateCard,
    CreateList,
    MoveCard,
    Search,
    EditCard,
    EditDesc,
    SetDue,
    ToggleLabel,
    ToggleMember,
    ToggleChecklist,
    AddChecklist,
    AddCheckItem,
    AddAttachment,
    ViewAttachments,
}

impl Mode {
    /// Modes whose keys go to the single-line prompt.
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            Mode::CreateCard
                | Mode::CreateList
                | Mode::EditCard
                | Mode::SetDue
                | Mode::AddChecklist
                | Mode::AddCheckItem
                | Mode::AddAttachment
                | Mode::Search
        )
    }

    pub fn prompt_title(self) -> &'static str {
        match self {
            Mode::CreateCard => "New Card",
            Mode::CreateList => "New List",
            Mode::EditCard => "Rename Card",
            Mode::SetDue => "Due Date",
            Mode::AddChecklist => "New Checklist",
            Mode::AddCheckItem => "New Item",
            Mode::AddAttachment => "Attach",
            Mode::Search => "Search",
            Mode::EditDesc => "Description",
            Mode::MoveCard => "Move Card",
            Mode::ToggleLabel => "Labels",
            Mode::ToggleMember => "Members",
            Mode::ToggleChecklist => "Checklists",
            Mode::ViewAttachments => "Attachments",
            Mode::Normal => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// A destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ArchiveCard {
        card_id: CardId,
        list_id: ListId,
        name: String,
    },
    DeleteCard {
        card_id: CardId,
        list_id: ListId,
        name: String,
    },
    DeleteChecklist {
        card_id: CardId,
        checklist_id: ChecklistId,
        name: String,
    },
    DeleteAttachment {
        card_id: CardId,
        attachment_id: AttachmentId,
        name: String,
    },
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::ArchiveCard { name, .. } => format!("Archive card '{}'?", name),
            ConfirmAction::DeleteCard { name, .. } => {
                format!("Permanently delete card '{}'?", name)
            }
            ConfirmAction::DeleteChecklist { name, .. } => {
                format!("Delete checklist '{}'?", name)
            }
            ConfirmAction::DeleteAttachment { name, .. } => {
                format!("Delete attachment '{}'?", name)
            }
        }
    }

    /// Card-level actions remove the card the detail view is showing.
    pub fn removes_card(&self) -> bool {
        matches!(
            self,
            ConfirmAction::ArchiveCard { .. } | ConfirmAction::DeleteCard { .. }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub view: View,
    pub previous_view: Option<View>,
    pub mode_origin_view: Option<View>,
    pub selected_list_index: usize,
    pub selected_card_index: usize,
    pub list_scroll_offset: usize,
    pub mode: Mode,
    pub search_query: String,
    pub status_message: Option<StatusMessage>,
    pub confirm_action: Option<ConfirmAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    SetView {
        view: View,
        preserve_selection: bool,
    },
    GoBack,
    SelectList(usize),
    SelectCard(usize),
    SetListScroll(usize),
    SetMode {
        mode: Mode,
        origin: Option<View>,
    },
    SetSearch(String),
    SetStatus(Option<StatusMessage>),
    SetConfirm(Option<ConfirmAction>),
    ResetSelection,
}

fn reset_selection(state: &mut NavigationState) {
    state.selected_list_index = 0;
    state.selected_card_index = 0;
    state.list_scroll_offset = 0;
}

pub fn reduce(state: &NavigationState, action: NavAction) -> NavigationState {
    let mut next = state.clone();
    match action {
        NavAction::SetView {
            view,
            preserve_selection,
        } => {
            next.previous_view = Some(state.view);
            next.view = view;
            next.mode = Mode::Normal;
            next.mode_origin_view = None;
            if !preserve_selection {
                reset_selection(&mut next);
            }
        }
        NavAction::GoBack => {
            next.view = state.previous_view.unwrap_or(View::Home);
            next.previous_view = None;
            next.mode = Mode::Normal;
            next.mode_origin_view = None;
            reset_selection(&mut next);
        }
        NavAction::SelectList(index) => {
            next.selected_list_index = index;
            next.selected_card_index = 0;
        }
        NavAction::SelectCard(index) => next.selected_card_index = index,
        NavAction::SetListScroll(offset) => next.list_scroll_offset = offset,
        NavAction::SetMode { mode, origin } => {
            next.mode = mode;
            next.mode_origin_view = if mode == Mode::Normal {
                None
            } else {
                origin.or(state.mode_origin_view).or(Some(state.view))
            };
        }
        NavAction::SetSearch(query) => next.search_query = query,
        NavAction::SetStatus(status) => next.status_message = status,
        NavAction::SetConfirm(confirm) => next.confirm_action = confirm,
        NavAction::ResetSelection => reset_selection(&mut next),
    }
    next
}

#[derive(Debug, Default)]
pub struct NavigationStore {
    state: NavigationState,
}

impl NavigationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(view: View) -> Self {
        Self {
            state: NavigationState {
                view,
                ..NavigationState::default()
            },
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn dispatch(&mut self, action: NavAction) {
        tracing::trace!("nav: {:?}", action);
        self.state = reduce(&self.state, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_mode(mode: Mode, origin: Option<View>) -> NavAction {
        NavAction::SetMode { mode, origin }
    }

    #[test]
    fn test_set_view_resets_selection_and_mode() {
        let mut store = NavigationStore::new();
        store.dispatch(NavAction::SelectList(3));
        store.dispatch(NavAction::SelectCard(4));
        store.dispatch(NavAction::SetListScroll(2));
        store.dispatch(set_mode(Mode::Search, None));

        store.dispatch(NavAction::SetView {
            view: View::Board,
            preserve_selection: false,
        });
        let state = store.state();
        assert_eq!(state.view, View::Board);
        assert_eq!(state.previous_view, Some(View::Home));
        assert_eq!(state.selected_list_index, 0);
        assert_eq!(state.selected_card_index, 0);
        assert_eq!(state.list_scroll_offset, 0);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.mode_origin_view, None);
    }

    #[test]
    fn test_set_view_can_preserve_selection() {
        let mut store = NavigationStore::with_view(View::Board);
        store.dispatch(NavAction::SelectList(1));
        store.dispatch(NavAction::SelectCard(2));
        store.dispatch(NavAction::SetView {
            view: View::CardDetail,
            preserve_selection: true,
        });
        assert_eq!(store.state().selected_list_index, 1);
        assert_eq!(store.state().selected_card_index, 2);
    }

    #[test]
    fn test_go_back_returns_to_previous_view() {
        let mut store = NavigationStore::new();
        store.dispatch(NavAction::SetView {
            view: View::Board,
            preserve_selection: false,
        });
        store.dispatch(NavAction::GoBack);
        assert_eq!(store.state().view, View::Home);
        assert_eq!(store.state().previous_view, None);
    }

    #[test]
    fn test_go_back_without_history_goes_home() {
        let mut store = NavigationStore::with_view(View::MyCards);
        store.dispatch(NavAction::GoBack);
        assert_eq!(store.state().view, View::Home);
    }

    #[test]
    fn test_select_list_resets_card() {
        let mut store = NavigationStore::new();
        store.dispatch(NavAction::SelectCard(7));
        store.dispatch(NavAction::SelectList(2));
        assert_eq!(store.state().selected_list_index, 2);
        assert_eq!(store.state().selected_card_index, 0);
    }

    #[test]
    fn test_mode_origin_is_kept_across_mode_changes() {
        let mut store = NavigationStore::with_view(View::Board);
        store.dispatch(set_mode(Mode::EditCard, Some(View::CardDetail)));
        store.dispatch(set_mode(Mode::ToggleChecklist, None));
        assert_eq!(store.state().mode_origin_view, Some(View::CardDetail));

        store.dispatch(set_mode(Mode::Normal, None));
        assert_eq!(store.state().mode_origin_view, None);
    }

    #[test]
    fn test_mode_origin_defaults_to_current_view() {
        let mut store = NavigationStore::with_view(View::Board);
        store.dispatch(set_mode(Mode::MoveCard, None));
        assert_eq!(store.state().mode_origin_view, Some(View::Board));
    }

    #[test]
    fn test_reduce_is_pure() {
        let state = NavigationState::default();
        let next = reduce(&state, NavAction::SetSearch("bug".into()));
        assert_eq!(state.search_query, "");
        assert_eq!(next.search_query, "bug");
    }
}
