use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::sync::Arc;
use trellis_core::AppConfig;
use trellis_domain::{Card, CheckItem, List, MemoryCache, MemoryClient};
use trellis_tui::app::{App, AppMessage, ERROR_STATUS_TTL, INFO_STATUS_TTL};
use trellis_tui::state::{
    ConfirmAction, Mode, NavAction, ResultsSource, StatusMessage, StoreCommand, View,
};

struct Harness {
    client: Arc<MemoryClient>,
    app: App,
    todo: List,
    doing: List,
    alpha: Card,
    steps: Vec<CheckItem>,
    big: Vec<CheckItem>,
}

async fn harness() -> Harness {
    let client = Arc::new(MemoryClient::new());
    let me = client.seed_member(None, "me", "Me Myself");
    client.set_me(&me.id);
    let board = client.seed_board("Work");
    client.seed_board_member(&board.id, &me);
    client.seed_label(&board.id, "bug", "red");
    let todo = client.seed_list(&board.id, "To Do");
    let doing = client.seed_list(&board.id, "Doing");
    client.seed_list(&board.id, "Done");

    let alpha = client.seed_card(&todo.id, "Alpha");
    let beta = client.seed_card(&todo.id, "Beta");
    client.seed_card(&todo.id, "Gamma");
    client.seed_card(&doing.id, "Delta");

    let checklist = client.seed_checklist(&alpha.id, "Steps");
    let steps = ["One", "Two", "Three"]
        .iter()
        .filter_map(|name| client.seed_check_item(&checklist.id, name))
        .collect();
    let large = client.seed_checklist(&beta.id, "Big");
    let big = (1..=40)
        .filter_map(|n| client.seed_check_item(&large.id, &format!("Item {}", n)))
        .collect();

    let cache = Arc::new(MemoryCache::new(client.clone()));
    let store = trellis_tui::DomainStore::new(client.clone(), cache);
    let mut app = App::new(store, AppConfig::default());
    settle(&mut app).await;

    Harness {
        client,
        app,
        todo,
        doing,
        alpha,
        steps,
        big,
    }
}

/// Runs queued commands until none are left, the way the event loop would.
async fn settle(app: &mut App) {
    loop {
        let commands = app.take_pending_commands();
        if commands.is_empty() {
            break;
        }
        for command in commands {
            let outcome = app.domain.execute(command).await;
            app.handle_outcome(outcome);
        }
    }
    app.reconcile_selection();
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

fn ctrl(app: &mut App, c: char) {
    app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

async fn open_board(h: &mut Harness) {
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
}

async fn open_alpha(h: &mut Harness) {
    open_board(h).await;
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
}

fn names(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|card| card.name.as_str()).collect()
}

fn status_text(app: &App) -> Option<String> {
    app.nav.state().status_message.as_ref().map(|s| s.text.clone())
}

fn alpha_now(h: &Harness) -> Card {
    h.app.domain.read().find_card(&h.alpha.id).cloned().unwrap()
}

#[tokio::test]
async fn test_startup_loads_boards() {
    let h = harness().await;
    assert_eq!(h.app.nav.state().view, View::Home);
    assert_eq!(h.app.domain.read().boards.len(), 1);
    assert_eq!(h.app.board_selection.get(), Some(0));
}

#[tokio::test]
async fn test_board_navigation_is_clamped() {
    let mut h = harness().await;
    open_board(&mut h).await;
    assert_eq!(h.app.nav.state().view, View::Board);
    assert_eq!(h.app.domain.read().lists.len(), 3);

    press(&mut h.app, KeyCode::Left);
    assert_eq!(h.app.nav.state().selected_list_index, 0);
    press(&mut h.app, KeyCode::Right);
    assert_eq!(h.app.nav.state().selected_list_index, 1);
    press(&mut h.app, KeyCode::Char('h'));
    assert_eq!(h.app.nav.state().selected_list_index, 0);

    press(&mut h.app, KeyCode::Down);
    press(&mut h.app, KeyCode::Char('j'));
    press(&mut h.app, KeyCode::Down);
    assert_eq!(h.app.nav.state().selected_card_index, 2);
    press(&mut h.app, KeyCode::Char('g'));
    assert_eq!(h.app.nav.state().selected_card_index, 0);
    press(&mut h.app, KeyCode::Char('G'));
    assert_eq!(h.app.selected_card().unwrap().name, "Gamma");

    press(&mut h.app, KeyCode::Char('3'));
    let state = h.app.nav.state();
    assert_eq!(state.selected_list_index, 2);
    assert_eq!(state.selected_card_index, 0);
    assert_eq!(state.list_scroll_offset, 1);

    press(&mut h.app, KeyCode::Char('9'));
    assert_eq!(h.app.nav.state().selected_list_index, 2);
}

#[tokio::test]
async fn test_card_detail_round_trip_resets_on_home() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('2'));
    press(&mut h.app, KeyCode::Enter);
    let state = h.app.nav.state();
    assert_eq!(state.view, View::CardDetail);
    assert_eq!(state.selected_list_index, 1);
    assert_eq!(
        h.app.take_pending_commands(),
        vec![StoreCommand::LoadCardDetails(
            h.app.selected_card().unwrap().id
        )]
    );

    press(&mut h.app, KeyCode::Esc);
    assert_eq!(h.app.nav.state().view, View::Board);
    assert_eq!(h.app.nav.state().selected_list_index, 1);

    press(&mut h.app, KeyCode::Esc);
    let state = h.app.nav.state();
    assert_eq!(state.view, View::Home);
    assert_eq!(state.selected_list_index, 0);
    assert_eq!(state.selected_card_index, 0);
}

#[tokio::test]
async fn test_navigation_sequence_through_store() {
    let mut h = harness().await;
    h.app.nav.dispatch(NavAction::SelectList(2));
    h.app.nav.dispatch(NavAction::SelectCard(5));
    h.app.nav.dispatch(NavAction::SetView {
        view: View::CardDetail,
        preserve_selection: true,
    });
    h.app.nav.dispatch(NavAction::SetView {
        view: View::Home,
        preserve_selection: false,
    });
    let state = h.app.nav.state();
    assert_eq!(state.view, View::Home);
    assert_eq!(state.selected_list_index, 0);
    assert_eq!(state.selected_card_index, 0);
}

#[tokio::test]
async fn test_create_card_flow() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('n'));
    assert_eq!(h.app.nav.state().mode, Mode::CreateCard);
    assert_eq!(h.app.nav.state().mode_origin_view, Some(View::Board));

    press(&mut h.app, KeyCode::Enter);
    assert_eq!(h.app.nav.state().mode, Mode::CreateCard);
    assert!(h.app.take_pending_commands().is_empty());

    type_text(&mut h.app, "Epsilon");
    press(&mut h.app, KeyCode::Enter);
    assert_eq!(h.app.nav.state().mode, Mode::Normal);
    settle(&mut h.app).await;

    let cards = h.app.domain.read().cards_in(&h.todo.id).to_vec();
    assert_eq!(names(&cards), vec!["Alpha", "Beta", "Gamma", "Epsilon"]);
    assert_eq!(status_text(&h.app).as_deref(), Some("Created 'Epsilon'"));
}

#[tokio::test]
async fn test_create_list_flow() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('L'));
    type_text(&mut h.app, "Archive");
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;

    let lists = h.app.domain.read().lists.clone();
    assert_eq!(lists.len(), 4);
    assert_eq!(lists[3].name, "Archive");
}

#[tokio::test]
async fn test_escape_leaves_text_entry_in_place() {
    let mut h = harness().await;
    open_alpha(&mut h).await;

    press(&mut h.app, KeyCode::Char('e'));
    assert_eq!(h.app.nav.state().mode, Mode::EditCard);
    assert_eq!(h.app.input.as_str(), "Alpha");
    press(&mut h.app, KeyCode::Esc);

    let state = h.app.nav.state();
    assert_eq!(state.mode, Mode::Normal);
    assert_eq!(state.mode_origin_view, None);
    assert_eq!(state.view, View::CardDetail);
    assert!(h.app.take_pending_commands().is_empty());
}

#[tokio::test]
async fn test_rename_card() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('e'));
    ctrl(&mut h.app, 'u');
    type_text(&mut h.app, "Alpha prime");
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
    assert_eq!(alpha_now(&h).name, "Alpha prime");
}

#[tokio::test]
async fn test_invalid_due_date_keeps_mode() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('D'));
    type_text(&mut h.app, "someday");
    press(&mut h.app, KeyCode::Enter);

    assert_eq!(h.app.nav.state().mode, Mode::SetDue);
    assert!(h.app.nav.state().status_message.as_ref().unwrap().is_error());
    assert!(h.app.take_pending_commands().is_empty());

    ctrl(&mut h.app, 'u');
    type_text(&mut h.app, "2030-01-02");
    press(&mut h.app, KeyCode::Enter);
    assert_eq!(h.app.nav.state().mode, Mode::Normal);
    settle(&mut h.app).await;

    let expected = Utc.with_ymd_and_hms(2030, 1, 2, 12, 0, 0).unwrap();
    assert_eq!(alpha_now(&h).due, Some(expected));
}

#[tokio::test]
async fn test_empty_due_date_clears() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('D'));
    type_text(&mut h.app, "+3d");
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
    assert!(alpha_now(&h).due.is_some());

    press(&mut h.app, KeyCode::Char('D'));
    ctrl(&mut h.app, 'u');
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
    assert_eq!(alpha_now(&h).due, None);
}

#[tokio::test]
async fn test_move_to_same_list_only_reports() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('m'));
    assert_eq!(h.app.nav.state().mode, Mode::MoveCard);
    press(&mut h.app, KeyCode::Char('1'));

    assert_eq!(h.app.nav.state().mode, Mode::Normal);
    assert_eq!(status_text(&h.app).as_deref(), Some("Card is already in To Do"));
    assert!(h.app.take_pending_commands().is_empty());
}

#[tokio::test]
async fn test_move_card_to_other_list() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('m'));
    press(&mut h.app, KeyCode::Char('2'));
    settle(&mut h.app).await;

    let (todo, doing) = {
        let domain = h.app.domain.read();
        (
            domain.cards_in(&h.todo.id).to_vec(),
            domain.cards_in(&h.doing.id).to_vec(),
        )
    };
    assert_eq!(names(&todo), vec!["Beta", "Gamma"]);
    assert_eq!(names(&doing), vec!["Delta", "Alpha"]);
    assert_eq!(status_text(&h.app).as_deref(), Some("Moved to Doing"));
    assert_eq!(h.app.selected_card().unwrap().name, "Beta");
}

#[tokio::test]
async fn test_toggle_label_keeps_mode_open() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('l'));
    press(&mut h.app, KeyCode::Char('1'));
    settle(&mut h.app).await;
    assert_eq!(alpha_now(&h).labels.len(), 1);
    assert_eq!(h.app.nav.state().mode, Mode::ToggleLabel);

    press(&mut h.app, KeyCode::Char('1'));
    settle(&mut h.app).await;
    assert!(alpha_now(&h).labels.is_empty());

    press(&mut h.app, KeyCode::Esc);
    assert_eq!(h.app.nav.state().mode, Mode::Normal);
}

#[tokio::test]
async fn test_search_filters_current_board() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('/'));
    type_text(&mut h.app, "GAM");
    assert_eq!(h.app.nav.state().search_query, "GAM");
    assert_eq!(names(&h.app.selected_list_cards()), vec!["Gamma"]);

    press(&mut h.app, KeyCode::Enter);
    assert_eq!(h.app.nav.state().mode, Mode::Normal);
    assert_eq!(h.app.nav.state().search_query, "GAM");
    assert_eq!(h.app.selected_card().unwrap().name, "Gamma");

    press(&mut h.app, KeyCode::Char('/'));
    assert_eq!(h.app.input.as_str(), "GAM");
    press(&mut h.app, KeyCode::Esc);
    assert!(h.app.nav.state().search_query.is_empty());
    assert_eq!(h.app.selected_list_cards().len(), 3);
}

#[tokio::test]
async fn test_confirmation_guards_archive() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('x'));
    assert!(matches!(
        h.app.nav.state().confirm_action,
        Some(ConfirmAction::ArchiveCard { .. })
    ));
    press(&mut h.app, KeyCode::Char('q'));
    assert!(!h.app.should_quit);
    press(&mut h.app, KeyCode::Char('n'));
    assert!(h.app.nav.state().confirm_action.is_none());
    assert!(h.app.take_pending_commands().is_empty());

    press(&mut h.app, KeyCode::Char('x'));
    press(&mut h.app, KeyCode::Char('y'));
    settle(&mut h.app).await;
    assert!(h.client.stored_card(&h.alpha.id).unwrap().closed);
    assert_eq!(names(&h.app.selected_list_cards()), vec!["Beta", "Gamma"]);
}

#[tokio::test]
async fn test_delete_from_card_detail_returns_to_board() {
    let mut h = harness().await;
    open_alpha(&mut h).await;

    press(&mut h.app, KeyCode::Delete);
    press(&mut h.app, KeyCode::Enter);
    assert_eq!(h.app.nav.state().view, View::Board);
    settle(&mut h.app).await;

    assert!(h.client.stored_card(&h.alpha.id).is_none());
    assert_eq!(h.app.selected_card().unwrap().name, "Beta");
}

#[tokio::test]
async fn test_checklist_two_level_selection() {
    let mut h = harness().await;
    open_alpha(&mut h).await;
    assert!(alpha_now(&h).has_details());

    press(&mut h.app, KeyCode::Char('c'));
    assert_eq!(h.app.nav.state().mode, Mode::ToggleChecklist);
    assert_eq!(h.app.checklist_focus.checklist, None);

    press(&mut h.app, KeyCode::Char('1'));
    assert_eq!(h.app.checklist_focus.checklist, Some(0));

    press(&mut h.app, KeyCode::Char('2'));
    settle(&mut h.app).await;
    let items = alpha_now(&h).checklists.unwrap()[0].check_items.clone();
    assert!(items[1].is_complete());
    assert!(!items[0].is_complete());

    press(&mut h.app, KeyCode::Char('-'));
    press(&mut h.app, KeyCode::Char('1'));
    settle(&mut h.app).await;
    let items = alpha_now(&h).checklists.unwrap()[0].check_items.clone();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.id != h.steps[0].id));

    press(&mut h.app, KeyCode::Esc);
    assert_eq!(h.app.checklist_focus.checklist, None);
    assert_eq!(h.app.nav.state().mode, Mode::ToggleChecklist);
    press(&mut h.app, KeyCode::Esc);
    assert_eq!(h.app.nav.state().mode, Mode::Normal);
    assert_eq!(h.app.nav.state().view, View::CardDetail);
}

#[tokio::test]
async fn test_add_checklist_and_item_return_to_checklist_mode() {
    let mut h = harness().await;
    open_alpha(&mut h).await;

    press(&mut h.app, KeyCode::Char('c'));
    press(&mut h.app, KeyCode::Char('a'));
    assert_eq!(h.app.nav.state().mode, Mode::AddChecklist);
    type_text(&mut h.app, "QA");
    press(&mut h.app, KeyCode::Enter);
    assert_eq!(h.app.nav.state().mode, Mode::ToggleChecklist);
    settle(&mut h.app).await;
    assert_eq!(alpha_now(&h).checklists.unwrap().len(), 2);

    press(&mut h.app, KeyCode::Char('2'));
    press(&mut h.app, KeyCode::Char('i'));
    assert_eq!(h.app.nav.state().mode, Mode::AddCheckItem);
    type_text(&mut h.app, "Smoke test");
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
    assert_eq!(h.app.nav.state().mode, Mode::ToggleChecklist);

    let card = alpha_now(&h);
    let qa = card.sorted_checklists()[1].clone();
    assert_eq!(qa.name, "QA");
    assert_eq!(qa.check_items.len(), 1);

    press(&mut h.app, KeyCode::Char('i'));
    press(&mut h.app, KeyCode::Esc);
    assert_eq!(h.app.nav.state().mode, Mode::ToggleChecklist);
    assert_eq!(h.app.checklist_focus.checklist, Some(1));
}

#[tokio::test]
async fn test_checklist_paging() {
    let mut h = harness().await;
    open_board(&mut h).await;
    press(&mut h.app, KeyCode::Down);
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;

    press(&mut h.app, KeyCode::Char('c'));
    press(&mut h.app, KeyCode::Char('1'));
    press(&mut h.app, KeyCode::Right);
    press(&mut h.app, KeyCode::Right);
    assert_eq!(h.app.checklist_focus.page, 1);

    press(&mut h.app, KeyCode::Char('1'));
    let commands = h.app.take_pending_commands();
    assert!(matches!(
        commands.as_slice(),
        [StoreCommand::ToggleCheckItem { item_id, .. }] if *item_id == h.big[35].id
    ));

    press(&mut h.app, KeyCode::Char('z'));
    assert!(h.app.take_pending_commands().is_empty());

    press(&mut h.app, KeyCode::Left);
    assert_eq!(h.app.checklist_focus.page, 0);
    assert_eq!(h.app.checklist_focus.checklist, Some(0));
}

#[tokio::test]
async fn test_edit_description_with_newline() {
    let mut h = harness().await;
    open_alpha(&mut h).await;

    press(&mut h.app, KeyCode::Char('d'));
    assert_eq!(h.app.nav.state().mode, Mode::EditDesc);
    type_text(&mut h.app, "Hi");
    h.app
        .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
    type_text(&mut h.app, "there");
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;

    assert_eq!(alpha_now(&h).desc, "Hi\nthere");
    assert_eq!(h.app.nav.state().mode, Mode::Normal);
}

#[tokio::test]
async fn test_attachments_add_and_delete() {
    let mut h = harness().await;
    open_alpha(&mut h).await;

    press(&mut h.app, KeyCode::Char('a'));
    type_text(&mut h.app, "https://example.com/design");
    press(&mut h.app, KeyCode::Enter);
    settle(&mut h.app).await;
    assert_eq!(alpha_now(&h).attachments.unwrap().len(), 1);

    press(&mut h.app, KeyCode::Char('A'));
    assert_eq!(h.app.nav.state().mode, Mode::ViewAttachments);
    assert_eq!(h.app.attachment_selection.get(), Some(0));

    press(&mut h.app, KeyCode::Char('x'));
    assert!(matches!(
        h.app.nav.state().confirm_action,
        Some(ConfirmAction::DeleteAttachment { .. })
    ));
    press(&mut h.app, KeyCode::Char('y'));
    settle(&mut h.app).await;
    assert!(alpha_now(&h).attachments.unwrap().is_empty());
}

#[tokio::test]
async fn test_my_cards_view() {
    let mut h = harness().await;
    open_board(&mut h).await;
    press(&mut h.app, KeyCode::Char('M'));
    press(&mut h.app, KeyCode::Char('1'));
    press(&mut h.app, KeyCode::Esc);
    settle(&mut h.app).await;

    press(&mut h.app, KeyCode::Esc);
    press(&mut h.app, KeyCode::Char('a'));
    assert_eq!(h.app.nav.state().view, View::MyCards);
    settle(&mut h.app).await;
    assert_eq!(names(&h.app.card_results), vec!["Alpha"]);
    assert_eq!(h.app.selected_result().map(|c| c.name.as_str()), Some("Alpha"));

    press(&mut h.app, KeyCode::Esc);
    assert_eq!(h.app.nav.state().view, View::Home);
}

#[tokio::test]
async fn test_search_from_home_is_remote() {
    let mut h = harness().await;

    press(&mut h.app, KeyCode::Char('/'));
    type_text(&mut h.app, "lta");
    press(&mut h.app, KeyCode::Enter);

    assert_eq!(h.app.nav.state().view, View::MyCards);
    assert_eq!(h.app.results_source, ResultsSource::Search("lta".to_string()));
    assert!(h.app.nav.state().search_query.is_empty());
    settle(&mut h.app).await;
    assert_eq!(names(&h.app.card_results), vec!["Delta"]);
}

#[tokio::test]
async fn test_failure_becomes_error_status() {
    let mut h = harness().await;
    h.client.set_failure(Some("offline"));

    press(&mut h.app, KeyCode::Char('r'));
    settle(&mut h.app).await;

    let status = h.app.nav.state().status_message.clone().unwrap();
    assert!(status.is_error());
    assert_eq!(status.text, "offline");
}

#[tokio::test]
async fn test_status_clears_only_for_latest_generation() {
    let mut h = harness().await;
    h.app.set_status(StatusMessage::info("first"));
    h.app.set_status(StatusMessage::error("second"));

    let timers = h.app.take_status_timers();
    assert_eq!(timers.len(), 2);
    assert_eq!(timers[0].1, INFO_STATUS_TTL);
    assert_eq!(timers[1].1, ERROR_STATUS_TTL);

    h.app.handle_message(AppMessage::ClearStatus(timers[0].0));
    assert_eq!(status_text(&h.app).as_deref(), Some("second"));
    h.app.handle_message(AppMessage::ClearStatus(timers[1].0));
    assert!(h.app.nav.state().status_message.is_none());
}

#[tokio::test]
async fn test_quit_keys() {
    let mut h = harness().await;
    open_board(&mut h).await;

    press(&mut h.app, KeyCode::Char('n'));
    press(&mut h.app, KeyCode::Char('q'));
    assert!(!h.app.should_quit);
    assert_eq!(h.app.input.as_str(), "q");

    ctrl(&mut h.app, 'c');
    assert!(h.app.should_quit);

    let mut h = harness().await;
    press(&mut h.app, KeyCode::Char('q'));
    assert!(h.app.should_quit);
}

#[tokio::test]
async fn test_mouse_wheel_moves_card_selection() {
    let mut h = harness().await;
    open_board(&mut h).await;

    let wheel = |kind| MouseEvent {
        kind,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    };
    h.app.handle_mouse_event(wheel(MouseEventKind::ScrollDown));
    h.app.handle_mouse_event(wheel(MouseEventKind::ScrollDown));
    assert_eq!(h.app.nav.state().selected_card_index, 2);
    h.app.handle_mouse_event(wheel(MouseEventKind::ScrollUp));
    assert_eq!(h.app.nav.state().selected_card_index, 1);
}
