use crate::editor::MultiLineEditor;
use crate::events::{Event, EventHandler};
use crate::keymap;
use crate::layout::{ensure_list_visible, num_columns};
use crate::state::{
    CommandOutcome, DomainStore, Mode, NavAction, NavigationStore, ResultsSource, StatusMessage,
    StoreCommand, View,
};
use crate::sync::SyncScheduler;
use crate::theme::Theme;
use crate::ui;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use trellis_core::{AppConfig, DefaultView, InputState, SelectionState, TrellisResult};
use trellis_domain::{Card, List};

pub const INFO_STATUS_TTL: Duration = Duration::from_secs(3);
pub const ERROR_STATUS_TTL: Duration = Duration::from_secs(5);

/// Messages delivered to the event loop by spawned work.
#[derive(Debug)]
pub enum AppMessage {
    Command(CommandOutcome),
    /// Clears the status line if it is still the given generation.
    ClearStatus(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Two-level selection inside the checklist mode.
///
/// `checklist` is `None` while choosing a checklist and `Some` once its
/// items take the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistFocus {
    pub checklist: Option<usize>,
    pub hovered: usize,
    pub page: usize,
    pub pending_delete: bool,
}

pub struct App {
    pub should_quit: bool,
    pub nav: NavigationStore,
    pub domain: DomainStore,
    pub config: AppConfig,
    pub theme: Theme,
    pub input: InputState,
    pub editor: MultiLineEditor,
    pub board_selection: SelectionState,
    pub card_results: Vec<Card>,
    pub results_source: ResultsSource,
    pub results_selection: SelectionState,
    pub checklist_focus: ChecklistFocus,
    pub attachment_selection: SelectionState,
    pub viewport: Viewport,
    pending: Vec<StoreCommand>,
    status_generation: u64,
    status_timers: Vec<(u64, Duration)>,
}

impl App {
    pub fn new(domain: DomainStore, config: AppConfig) -> Self {
        let theme = Theme::from_config(&config.theme);
        let start_view = match config.default_view {
            DefaultView::Home => View::Home,
            DefaultView::MyCards => View::MyCards,
        };

        let mut app = Self {
            should_quit: false,
            nav: NavigationStore::with_view(start_view),
            domain,
            config,
            theme,
            input: InputState::new(),
            editor: MultiLineEditor::new(),
            board_selection: SelectionState::new(),
            card_results: Vec::new(),
            results_source: ResultsSource::Assigned,
            results_selection: SelectionState::new(),
            checklist_focus: ChecklistFocus::default(),
            attachment_selection: SelectionState::new(),
            viewport: Viewport::default(),
            pending: Vec::new(),
            status_generation: 0,
            status_timers: Vec::new(),
        };

        app.queue(StoreCommand::LoadBoards);
        if start_view == View::MyCards {
            app.queue(StoreCommand::LoadAssignedCards);
        }
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub(crate) fn queue(&mut self, command: StoreCommand) {
        tracing::debug!("Queued: {}", command.description());
        self.pending.push(command);
    }

    /// Commands queued by key handlers since the last call.
    pub fn take_pending_commands(&mut self) -> Vec<StoreCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Status timers to start, as `(generation, delay)` pairs.
    pub fn take_status_timers(&mut self) -> Vec<(u64, Duration)> {
        std::mem::take(&mut self.status_timers)
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        let ttl = if status.is_error() {
            ERROR_STATUS_TTL
        } else {
            INFO_STATUS_TTL
        };
        self.status_generation += 1;
        self.status_timers.push((self.status_generation, ttl));
        self.nav.dispatch(NavAction::SetStatus(Some(status)));
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Command(outcome) => self.handle_outcome(outcome),
            AppMessage::ClearStatus(generation) => {
                if generation == self.status_generation {
                    self.nav.dispatch(NavAction::SetStatus(None));
                }
            }
        }
    }

    pub fn handle_outcome(&mut self, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::Completed { message: Some(text) } => {
                self.set_status(StatusMessage::info(text))
            }
            CommandOutcome::Completed { message: None } => {}
            CommandOutcome::Failed { message } => self.set_status(StatusMessage::error(message)),
            CommandOutcome::CardResults { source, cards } => {
                if source != self.results_source {
                    tracing::debug!("Dropping stale results for {:?}", source);
                    return;
                }
                if let ResultsSource::Search(query) = &source {
                    let text = format!("{} cards match '{}'", cards.len(), query);
                    self.set_status(StatusMessage::info(text));
                }
                self.card_results = cards;
                self.results_selection.clamp(self.card_results.len());
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.nav.state().confirm_action.is_some() {
            self.handle_confirm_key(key);
            return;
        }

        let state = self.nav.state();
        let (mode, view) = (state.mode, state.view);
        if mode != Mode::Normal {
            self.handle_mode_key(mode, key);
            return;
        }

        if key.code == KeyCode::Char('q') {
            self.quit();
            return;
        }

        match view {
            View::Home => self.handle_home_key(key),
            View::Board => self.handle_board_key(key),
            View::CardDetail => self.handle_card_detail_key(key),
            View::MyCards => self.handle_my_cards_key(key),
        }
    }

    fn handle_mode_key(&mut self, mode: Mode, key: KeyEvent) {
        match mode {
            Mode::Normal => {}
            Mode::EditDesc => self.handle_edit_desc_key(key),
            Mode::MoveCard => self.handle_move_card_key(key),
            Mode::ToggleLabel => self.handle_toggle_label_key(key),
            Mode::ToggleMember => self.handle_toggle_member_key(key),
            Mode::ToggleChecklist => self.handle_toggle_checklist_key(key),
            Mode::ViewAttachments => self.handle_view_attachments_key(key),
            text_mode => self.handle_text_entry_key(text_mode, key),
        }
    }

    pub(crate) fn enter_mode(&mut self, mode: Mode) {
        self.nav.dispatch(NavAction::SetMode { mode, origin: None });
    }

    /// Leaves the current mode, returning to the view it was entered from.
    pub(crate) fn exit_mode(&mut self) {
        let state = self.nav.state();
        let (origin, view) = (state.mode_origin_view, state.view);
        self.nav.dispatch(NavAction::SetMode {
            mode: Mode::Normal,
            origin: None,
        });
        if let Some(origin) = origin.filter(|origin| *origin != view) {
            self.nav.dispatch(NavAction::SetView {
                view: origin,
                preserve_selection: true,
            });
        }
    }

    pub fn selected_list(&self) -> Option<List> {
        let index = self.nav.state().selected_list_index;
        self.domain.read().lists.get(index).cloned()
    }

    /// Cards of a list after the search filter.
    pub fn visible_cards_in(&self, list_id: &str) -> Vec<Card> {
        let query = self.nav.state().search_query.to_lowercase();
        self.domain
            .read()
            .cards_in(list_id)
            .iter()
            .filter(|card| query.is_empty() || card.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    pub fn selected_list_cards(&self) -> Vec<Card> {
        self.selected_list()
            .map(|list| self.visible_cards_in(&list.id))
            .unwrap_or_default()
    }

    pub fn selected_card(&self) -> Option<Card> {
        let index = self.nav.state().selected_card_index;
        self.selected_list_cards().into_iter().nth(index)
    }

    pub fn selected_result(&self) -> Option<&Card> {
        self.results_selection
            .get()
            .and_then(|index| self.card_results.get(index))
    }

    /// Pulls every selection back inside the data it points at.
    pub fn reconcile_selection(&mut self) {
        let (board_count, list_count) = {
            let domain = self.domain.read();
            (domain.boards.len(), domain.lists.len())
        };
        self.board_selection.clamp(board_count);
        self.results_selection.clamp(self.card_results.len());

        let state = self.nav.state().clone();
        if !matches!(state.view, View::Board | View::CardDetail) {
            return;
        }

        let list_index = state.selected_list_index.min(list_count.saturating_sub(1));
        if list_index != state.selected_list_index {
            self.nav.dispatch(NavAction::SelectList(list_index));
        }

        let card_count = self.selected_list_cards().len();
        let card_index = self.nav.state().selected_card_index;
        let clamped = card_index.min(card_count.saturating_sub(1));
        if clamped != card_index {
            self.nav.dispatch(NavAction::SelectCard(clamped));
        }

        let offset = ensure_list_visible(
            list_index,
            state.list_scroll_offset,
            num_columns(self.viewport.width),
        )
        .min(list_count.saturating_sub(1));
        if offset != state.list_scroll_offset {
            self.nav.dispatch(NavAction::SetListScroll(offset));
        }

        let card = self.selected_card();
        let attachment_count = card
            .as_ref()
            .and_then(|card| card.attachments.as_ref())
            .map_or(0, Vec::len);
        if self.attachment_selection.get().is_some() {
            self.attachment_selection.clamp(attachment_count);
        }

        let checklists = card
            .as_ref()
            .map(|card| {
                card.sorted_checklists()
                    .iter()
                    .map(|checklist| checklist.check_items.len())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let focus = &mut self.checklist_focus;
        focus.hovered = focus.hovered.min(checklists.len().saturating_sub(1));
        if let Some(index) = focus.checklist {
            match checklists.get(index) {
                Some(item_count) => {
                    focus.page = focus.page.min(keymap::page_count(*item_count) - 1)
                }
                None => *focus = ChecklistFocus::default(),
            }
        }
    }

    fn spawn_pending(&mut self, tx: &mpsc::UnboundedSender<AppMessage>) {
        for command in self.take_pending_commands() {
            let store = self.domain.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = store.execute(command).await;
                let _ = tx.send(AppMessage::Command(outcome));
            });
        }

        for (generation, delay) in self.take_status_timers() {
            let tx = tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(AppMessage::ClearStatus(generation));
            });
        }
    }

    pub async fn run(&mut self) -> TrellisResult<()> {
        let mut terminal = setup_terminal(self.config.mouse)?;
        let size = terminal.size()?;
        self.viewport = Viewport {
            width: size.width,
            height: size.height,
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _scheduler = SyncScheduler::start(
            self.domain.clone(),
            Duration::from_millis(self.config.sync_interval_ms),
        );
        let mut events = EventHandler::new();

        while !self.should_quit {
            self.spawn_pending(&tx);
            self.reconcile_selection();
            terminal.draw(|frame| ui::render(self, frame))?;

            tokio::select! {
                Some(event) = events.next() => match event {
                    Event::Key(key) => self.handle_key_event(key),
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    Event::Resize(width, height) => self.viewport = Viewport { width, height },
                    Event::Tick => {}
                },
                Some(message) = rx.recv() => self.handle_message(message),
                else => break,
            }
        }

        events.stop();
        restore_terminal(&mut terminal, self.config.mouse)?;
        Ok(())
    }
}

fn setup_terminal(mouse: bool) -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mouse: bool,
) -> io::Result<()> {
    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
