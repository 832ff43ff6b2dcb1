use crate::app::App;
use crate::dialog::{handle_dialog_input, DialogAction};
use crate::editor::EditorAction;
use crate::state::{ConfirmAction, Mode, NavAction, ResultsSource, StatusMessage, StoreCommand, View};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use trellis_domain::{parse_due, AttachmentSource, CardUpdate};

impl App {
    pub(crate) fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let Some(action) = self.nav.state().confirm_action.clone() else {
                    return;
                };
                self.nav.dispatch(NavAction::SetConfirm(None));
                if action.removes_card() && self.nav.state().view == View::CardDetail {
                    self.nav.dispatch(NavAction::SetView {
                        view: View::Board,
                        preserve_selection: true,
                    });
                }
                if matches!(action, ConfirmAction::DeleteChecklist { .. }) {
                    self.checklist_focus.checklist = None;
                }
                self.queue(action.into());
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.nav.dispatch(NavAction::SetConfirm(None));
            }
            _ => {}
        }
    }

    pub(crate) fn handle_text_entry_key(&mut self, mode: Mode, key: KeyEvent) {
        let allow_empty = matches!(mode, Mode::SetDue | Mode::Search);
        match handle_dialog_input(&mut self.input, key, allow_empty) {
            DialogAction::None => {
                if mode == Mode::Search {
                    let query = self.input.as_str().to_string();
                    if query != self.nav.state().search_query {
                        self.nav.dispatch(NavAction::SetSearch(query));
                        self.nav.dispatch(NavAction::SelectCard(0));
                    }
                }
            }
            DialogAction::Cancel => self.cancel_text_entry(mode),
            DialogAction::Confirm => self.submit_text_entry(mode),
        }
    }

    fn cancel_text_entry(&mut self, mode: Mode) {
        self.input.clear();
        match mode {
            Mode::Search => {
                self.nav.dispatch(NavAction::SetSearch(String::new()));
                self.exit_mode();
            }
            Mode::AddChecklist | Mode::AddCheckItem => self.enter_mode(Mode::ToggleChecklist),
            _ => self.exit_mode(),
        }
    }

    fn submit_text_entry(&mut self, mode: Mode) {
        match mode {
            Mode::SetDue => self.submit_due(),
            Mode::Search => self.submit_search(),
            Mode::CreateCard => {
                let name = self.input.take_trimmed();
                if let Some(list) = self.selected_list() {
                    self.queue(StoreCommand::CreateCard {
                        list_id: list.id,
                        name,
                    });
                }
                self.exit_mode();
            }
            Mode::CreateList => {
                let name = self.input.take_trimmed();
                let board_id = self.domain.read().current_board.as_ref().map(|b| b.id.clone());
                if let Some(board_id) = board_id {
                    self.queue(StoreCommand::CreateList { board_id, name });
                }
                self.exit_mode();
            }
            Mode::EditCard => {
                let name = self.input.take_trimmed();
                if let Some(card) = self.selected_card() {
                    self.queue(StoreCommand::UpdateCard {
                        card_id: card.id,
                        update: CardUpdate::name(name),
                    });
                }
                self.exit_mode();
            }
            Mode::AddChecklist => {
                let name = self.input.take_trimmed();
                if let Some(card) = self.selected_card() {
                    self.queue(StoreCommand::CreateChecklist {
                        card_id: card.id,
                        name,
                    });
                }
                self.enter_mode(Mode::ToggleChecklist);
            }
            Mode::AddCheckItem => {
                let name = self.input.take_trimmed();
                let target = self.selected_card().and_then(|card| {
                    let checklist = self
                        .checklist_focus
                        .checklist
                        .and_then(|index| card.sorted_checklists().get(index).map(|c| c.id.clone()));
                    checklist.map(|checklist_id| (card.id.clone(), checklist_id))
                });
                if let Some((card_id, checklist_id)) = target {
                    self.queue(StoreCommand::CreateCheckItem {
                        card_id,
                        checklist_id,
                        name,
                    });
                }
                self.enter_mode(Mode::ToggleChecklist);
            }
            Mode::AddAttachment => {
                let source = AttachmentSource::from_input(&self.input.take_trimmed());
                if let Some(card) = self.selected_card() {
                    self.queue(StoreCommand::AddAttachment {
                        card_id: card.id,
                        source,
                    });
                }
                self.exit_mode();
            }
            _ => self.exit_mode(),
        }
    }

    fn submit_due(&mut self) {
        let due = match parse_due(self.input.as_str(), Utc::now()) {
            Ok(due) => due,
            Err(err) => {
                self.set_status(StatusMessage::error(err.user_message()));
                return;
            }
        };
        self.input.clear();
        if let Some(card) = self.selected_card() {
            self.queue(StoreCommand::UpdateCard {
                card_id: card.id,
                update: CardUpdate::due(due.into_option()),
            });
        }
        self.exit_mode();
    }

    /// On the board the query stays as a filter; from home it becomes a
    /// remote search.
    fn submit_search(&mut self) {
        let query = self.input.take_trimmed();
        let origin = self.nav.state().mode_origin_view;
        self.exit_mode();
        if origin == Some(View::Home) {
            self.nav.dispatch(NavAction::SetSearch(String::new()));
            if !query.is_empty() {
                self.show_results(ResultsSource::Search(query));
            }
        }
    }

    pub(crate) fn handle_edit_desc_key(&mut self, key: KeyEvent) {
        match self.editor.handle_key(key) {
            EditorAction::None => {}
            EditorAction::Cancel => {
                self.editor.clear();
                self.exit_mode();
            }
            EditorAction::Submit(text) => {
                if let Some(card) = self.selected_card() {
                    if card.desc != text {
                        self.queue(StoreCommand::UpdateCard {
                            card_id: card.id,
                            update: CardUpdate::desc(text),
                        });
                    }
                }
                self.editor.clear();
                self.exit_mode();
            }
        }
    }
}
