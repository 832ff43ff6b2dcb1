use crate::app::{App, ChecklistFocus};
use crate::keymap;
use crate::state::{ConfirmAction, Mode, NavAction, StoreCommand};
use crossterm::event::{KeyCode, KeyEvent};
use trellis_domain::{Card, Checklist};

impl App {
    pub(crate) fn handle_toggle_checklist_key(&mut self, key: KeyEvent) {
        let Some(card) = self.selected_card() else {
            self.exit_mode();
            return;
        };
        let checklists: Vec<Checklist> = card.sorted_checklists().into_iter().cloned().collect();

        match self.checklist_focus.checklist {
            None => self.handle_checklist_level(&card, &checklists, key),
            Some(index) => match checklists.get(index) {
                Some(checklist) => self.handle_check_item_level(&card, checklist, key),
                None => self.checklist_focus = ChecklistFocus::default(),
            },
        }
    }

    fn handle_checklist_level(&mut self, card: &Card, checklists: &[Checklist], key: KeyEvent) {
        let count = checklists.len();
        let focus = &mut self.checklist_focus;
        match key.code {
            KeyCode::Esc => {
                *focus = ChecklistFocus::default();
                self.exit_mode();
            }
            KeyCode::Up | KeyCode::Char('k') => focus.hovered = focus.hovered.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                focus.hovered = (focus.hovered + 1).min(count.saturating_sub(1))
            }
            KeyCode::Enter if count > 0 => {
                let hovered = focus.hovered;
                open_checklist(focus, hovered);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < count {
                    open_checklist(focus, index);
                }
            }
            KeyCode::Char('a') => {
                self.input.clear();
                self.enter_mode(Mode::AddChecklist);
            }
            KeyCode::Delete => {
                if let Some(checklist) = checklists.get(focus.hovered) {
                    self.confirm_delete_checklist(card, checklist);
                }
            }
            _ => {}
        }
    }

    fn handle_check_item_level(&mut self, card: &Card, checklist: &Checklist, key: KeyEvent) {
        let items = checklist.sorted_items();
        let focus = &mut self.checklist_focus;
        match key.code {
            KeyCode::Esc if focus.pending_delete => focus.pending_delete = false,
            KeyCode::Esc => {
                focus.checklist = None;
                focus.page = 0;
            }
            KeyCode::Left => focus.page = focus.page.saturating_sub(1),
            KeyCode::Right => {
                focus.page = (focus.page + 1).min(keymap::page_count(items.len()) - 1)
            }
            KeyCode::Char('-') => focus.pending_delete = true,
            KeyCode::Char('i') => {
                focus.pending_delete = false;
                self.input.clear();
                self.enter_mode(Mode::AddCheckItem);
            }
            KeyCode::Delete => self.confirm_delete_checklist(card, checklist),
            KeyCode::Char(c) => {
                let Some(global) = keymap::resolve(c, focus.page, items.len()) else {
                    return;
                };
                let item = items[global];
                let command = if focus.pending_delete {
                    focus.pending_delete = false;
                    StoreCommand::DeleteCheckItem {
                        card_id: card.id.clone(),
                        checklist_id: checklist.id.clone(),
                        item_id: item.id.clone(),
                    }
                } else {
                    StoreCommand::ToggleCheckItem {
                        card_id: card.id.clone(),
                        item_id: item.id.clone(),
                        state: item.state,
                    }
                };
                self.queue(command);
            }
            _ => {}
        }
    }

    fn confirm_delete_checklist(&mut self, card: &Card, checklist: &Checklist) {
        self.nav
            .dispatch(NavAction::SetConfirm(Some(ConfirmAction::DeleteChecklist {
                card_id: card.id.clone(),
                checklist_id: checklist.id.clone(),
                name: checklist.name.clone(),
            })));
    }
}

fn open_checklist(focus: &mut ChecklistFocus, index: usize) {
    focus.checklist = Some(index);
    focus.hovered = index;
    focus.page = 0;
    focus.pending_delete = false;
}
