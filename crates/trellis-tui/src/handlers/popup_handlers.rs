use crate::app::App;
use crate::state::{ConfirmAction, NavAction, StatusMessage, StoreCommand};
use crossterm::event::{KeyCode, KeyEvent};

/// Index for a `1`-`9` key.
fn digit_index(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
        _ => None,
    }
}

impl App {
    pub(crate) fn handle_move_card_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.exit_mode();
            return;
        }
        let Some(index) = digit_index(key.code) else {
            return;
        };
        let Some(destination) = self.domain.read().lists.get(index).cloned() else {
            return;
        };
        let Some(card) = self.selected_card() else {
            self.exit_mode();
            return;
        };

        if destination.id == card.id_list {
            self.set_status(StatusMessage::info(format!(
                "Card is already in {}",
                destination.name
            )));
        } else {
            self.queue(StoreCommand::MoveCard {
                card_id: card.id,
                from_list: card.id_list,
                to_list: destination.id,
                to_name: destination.name,
            });
        }
        self.exit_mode();
    }

    pub(crate) fn handle_toggle_label_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.exit_mode();
            return;
        }
        let Some(index) = digit_index(key.code) else {
            return;
        };
        let Some(label) = self.domain.read().board_labels.get(index).cloned() else {
            return;
        };
        if let Some(card) = self.selected_card() {
            let present = !card.has_label(&label.id);
            self.queue(StoreCommand::SetLabel {
                card_id: card.id,
                label_id: label.id,
                present,
            });
        }
    }

    pub(crate) fn handle_toggle_member_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.exit_mode();
            return;
        }
        let Some(index) = digit_index(key.code) else {
            return;
        };
        let Some(member) = self.domain.read().members.get(index).cloned() else {
            return;
        };
        if let Some(card) = self.selected_card() {
            let present = !card.has_member(&member.id);
            self.queue(StoreCommand::SetMember {
                card_id: card.id,
                member_id: member.id,
                present,
            });
        }
    }

    pub(crate) fn handle_view_attachments_key(&mut self, key: KeyEvent) {
        let Some(card) = self.selected_card() else {
            self.exit_mode();
            return;
        };
        let attachments = card.attachments.unwrap_or_default();
        let highlighted = self
            .attachment_selection
            .get()
            .and_then(|index| attachments.get(index));

        match key.code {
            KeyCode::Esc => self.exit_mode(),
            KeyCode::Up | KeyCode::Char('k') => self.attachment_selection.prev(attachments.len()),
            KeyCode::Down | KeyCode::Char('j') => {
                self.attachment_selection.next(attachments.len())
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(attachment) = highlighted {
                    let action = ConfirmAction::DeleteAttachment {
                        card_id: card.id.clone(),
                        attachment_id: attachment.id.clone(),
                        name: attachment.name.clone(),
                    };
                    self.nav.dispatch(NavAction::SetConfirm(Some(action)));
                }
            }
            KeyCode::Char('y') => {
                if let Some(url) = highlighted.map(|attachment| attachment.url.clone()) {
                    self.copy_to_clipboard(&url);
                }
            }
            code => {
                if let Some(index) = digit_index(code).filter(|index| *index < attachments.len()) {
                    self.attachment_selection.set(Some(index));
                }
            }
        }
    }
}
