use crate::app::{App, ChecklistFocus};
use crate::clipboard;
use crate::state::{ConfirmAction, Mode, NavAction, StatusMessage, StoreCommand, View};
use crossterm::event::{KeyCode, KeyEvent};

impl App {
    /// Card actions shared by the board and card-detail views. Returns
    /// whether the key was consumed.
    pub(crate) fn handle_card_shortcut(&mut self, code: KeyCode) -> bool {
        let Some(card) = self.selected_card() else {
            return false;
        };
        match code {
            KeyCode::Char('e') => self.begin_text_entry(Mode::EditCard, card.name.clone()),
            KeyCode::Char('d') => {
                self.editor.set_text(card.desc.clone());
                self.enter_mode(Mode::EditDesc);
            }
            KeyCode::Char('D') => {
                let current = card
                    .due
                    .map(|due| due.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                self.begin_text_entry(Mode::SetDue, current);
            }
            KeyCode::Char('l') => self.enter_mode(Mode::ToggleLabel),
            KeyCode::Char('M') => self.enter_mode(Mode::ToggleMember),
            KeyCode::Char('x') => {
                self.nav
                    .dispatch(NavAction::SetConfirm(Some(ConfirmAction::ArchiveCard {
                        card_id: card.id.clone(),
                        list_id: card.id_list.clone(),
                        name: card.name.clone(),
                    })))
            }
            KeyCode::Delete => {
                self.nav
                    .dispatch(NavAction::SetConfirm(Some(ConfirmAction::DeleteCard {
                        card_id: card.id.clone(),
                        list_id: card.id_list.clone(),
                        name: card.name.clone(),
                    })))
            }
            KeyCode::Char('y') => self.copy_to_clipboard(&card.url),
            _ => return false,
        }
        true
    }

    pub(crate) fn handle_card_detail_key(&mut self, key: KeyEvent) {
        if self.handle_card_shortcut(key.code) {
            return;
        }
        let Some(card) = self.selected_card() else {
            if key.code == KeyCode::Esc {
                self.back_to_board();
            }
            return;
        };

        match key.code {
            KeyCode::Char('c') => {
                self.checklist_focus = ChecklistFocus::default();
                self.enter_mode(Mode::ToggleChecklist);
            }
            KeyCode::Char('C') => {
                self.checklist_focus = ChecklistFocus::default();
                self.begin_text_entry(Mode::AddChecklist, String::new());
            }
            KeyCode::Char('a') => self.begin_text_entry(Mode::AddAttachment, String::new()),
            KeyCode::Char('A') => {
                let count = card.attachments.as_ref().map_or(0, Vec::len);
                self.attachment_selection.clamp(count);
                self.enter_mode(Mode::ViewAttachments);
            }
            KeyCode::Char('r') => self.queue(StoreCommand::LoadCardDetails(card.id)),
            KeyCode::Esc => self.back_to_board(),
            _ => {}
        }
    }

    fn back_to_board(&mut self) {
        self.nav.dispatch(NavAction::SetView {
            view: View::Board,
            preserve_selection: true,
        });
    }

    pub(crate) fn begin_text_entry(&mut self, mode: Mode, initial: String) {
        self.input.set(initial);
        self.enter_mode(mode);
    }

    pub(crate) fn copy_to_clipboard(&mut self, url: &str) {
        match clipboard::copy_url(url) {
            Ok(()) => self.set_status(StatusMessage::info("Copied URL to clipboard")),
            Err(err) => self.set_status(StatusMessage::error(err.user_message())),
        }
    }
}
