use crate::app::App;
use crate::layout::{ensure_list_visible, num_columns};
use crate::state::{Mode, NavAction, ResultsSource, StoreCommand, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

impl App {
    pub(crate) fn handle_home_key(&mut self, key: KeyEvent) {
        let board_count = self.domain.read().boards.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.board_selection.prev(board_count),
            KeyCode::Down | KeyCode::Char('j') => self.board_selection.next(board_count),
            KeyCode::Enter => self.open_selected_board(),
            KeyCode::Char('r') => self.queue(StoreCommand::LoadBoards),
            KeyCode::Char('a') => self.open_my_cards(),
            KeyCode::Char('S') => self.queue(StoreCommand::SyncCache),
            KeyCode::Char('/') => {
                self.input.clear();
                self.enter_mode(Mode::Search);
            }
            _ => {}
        }
    }

    fn open_selected_board(&mut self) {
        let board = self
            .board_selection
            .get()
            .and_then(|index| self.domain.read().boards.get(index).cloned());
        let Some(board) = board else {
            return;
        };
        tracing::info!("Opening board {}", board.name);
        self.nav.dispatch(NavAction::SetSearch(String::new()));
        self.nav.dispatch(NavAction::SetView {
            view: View::Board,
            preserve_selection: false,
        });
        self.queue(StoreCommand::LoadBoard(board));
    }

    pub(crate) fn open_my_cards(&mut self) {
        self.show_results(ResultsSource::Assigned);
    }

    pub(crate) fn show_results(&mut self, source: ResultsSource) {
        let command = match &source {
            ResultsSource::Assigned => StoreCommand::LoadAssignedCards,
            ResultsSource::Search(query) => StoreCommand::SearchCards(query.clone()),
        };
        self.results_source = source;
        self.card_results.clear();
        self.results_selection.clear();
        if self.nav.state().view != View::MyCards {
            self.nav.dispatch(NavAction::SetView {
                view: View::MyCards,
                preserve_selection: false,
            });
        }
        self.queue(command);
    }

    pub(crate) fn handle_my_cards_key(&mut self, key: KeyEvent) {
        let count = self.card_results.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.results_selection.prev(count),
            KeyCode::Down | KeyCode::Char('j') => self.results_selection.next(count),
            KeyCode::Char('r') => self.show_results(self.results_source.clone()),
            KeyCode::Esc => self.nav.dispatch(NavAction::GoBack),
            _ => {}
        }
    }

    pub(crate) fn handle_board_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                self.queue(StoreCommand::ReloadBoard);
            }
            return;
        }

        if self.handle_card_shortcut(key.code) {
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.step_list(-1),
            KeyCode::Right | KeyCode::Tab => self.step_list(1),
            KeyCode::Up | KeyCode::Char('k') => self.step_card(-1),
            KeyCode::Down | KeyCode::Char('j') => self.step_card(1),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.domain.read().lists.len() {
                    self.select_list(index);
                }
            }
            KeyCode::Char('g') => self.nav.dispatch(NavAction::SelectCard(0)),
            KeyCode::Char('G') => {
                let last = self.selected_list_cards().len().saturating_sub(1);
                self.nav.dispatch(NavAction::SelectCard(last));
            }
            KeyCode::Char('n') => {
                if self.selected_list().is_some() {
                    self.begin_text_entry(Mode::CreateCard, String::new());
                }
            }
            KeyCode::Char('L') => {
                if self.domain.read().current_board.is_some() {
                    self.begin_text_entry(Mode::CreateList, String::new());
                }
            }
            KeyCode::Char('m') => {
                if self.selected_card().is_some() {
                    self.enter_mode(Mode::MoveCard);
                }
            }
            KeyCode::Char('s') => self.queue(StoreCommand::ReloadBoard),
            KeyCode::Char('/') => {
                let query = self.nav.state().search_query.clone();
                self.begin_text_entry(Mode::Search, query);
            }
            KeyCode::Enter => self.open_card_detail(),
            KeyCode::Esc => {
                self.nav.dispatch(NavAction::SetSearch(String::new()));
                self.nav.dispatch(NavAction::SetView {
                    view: View::Home,
                    preserve_selection: false,
                });
            }
            _ => {}
        }
    }

    pub(crate) fn select_list(&mut self, index: usize) {
        self.nav.dispatch(NavAction::SelectList(index));
        let state = self.nav.state();
        let offset = ensure_list_visible(
            index,
            state.list_scroll_offset,
            num_columns(self.viewport.width),
        );
        if offset != state.list_scroll_offset {
            self.nav.dispatch(NavAction::SetListScroll(offset));
        }
    }

    fn step_list(&mut self, delta: isize) {
        let count = self.domain.read().lists.len();
        if count == 0 {
            return;
        }
        let current = self.nav.state().selected_list_index;
        let next = current.saturating_add_signed(delta).min(count - 1);
        if next != current {
            self.select_list(next);
        }
    }

    fn step_card(&mut self, delta: isize) {
        let count = self.selected_list_cards().len();
        if count == 0 {
            return;
        }
        let current = self.nav.state().selected_card_index;
        let next = current.saturating_add_signed(delta).min(count - 1);
        self.nav.dispatch(NavAction::SelectCard(next));
    }

    fn open_card_detail(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        self.attachment_selection.clear();
        self.checklist_focus = Default::default();
        self.nav.dispatch(NavAction::SetView {
            view: View::CardDetail,
            preserve_selection: true,
        });
        self.queue(StoreCommand::LoadCardDetails(card.id));
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let state = self.nav.state();
        if state.view != View::Board || state.mode != Mode::Normal {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.step_card(-1),
            MouseEventKind::ScrollDown => self.step_card(1),
            _ => {}
        }
    }
}
