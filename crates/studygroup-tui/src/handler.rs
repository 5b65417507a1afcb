use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use studygroup_core::{fixtures, AuthClient, Channel, GeminiClient, Group, GroupDraft, ResourceDraft};

use crate::app::{
    Action, App, ChatScreen, CreateGroupScreen, EventsScreen, GroupScreen, InputMode, LoginField,
    LoginScreen, QuestionDetailScreen, QuestionsScreen, ResourcesScreen, Screen, TextInput, UploadResourceScreen,
    CREATE_GROUP_FIELDS, UPLOAD_FIELDS,
};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Apply a line-editing key to `value`. Returns false for keys that are not
/// editing keys, so callers can handle them.
fn edit_text(value: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    let char_count = value.chars().count();
    *cursor = (*cursor).min(char_count);

    match key.code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(value, *cursor);
                value.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(value, *cursor);
                value.remove(byte_pos);
            }
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(char_count),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = char_count,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let byte_pos = char_to_byte_index(value, *cursor);
            value.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => return false,
    }
    true
}

fn edit_input(input: &mut TextInput, key: KeyEvent) -> bool {
    edit_text(&mut input.value, &mut input.cursor, key)
}

fn list_down(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
    state.select(Some(i));
}

fn list_up(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
    state.select(Some(i));
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The dashboard reads app-wide group lists, so it gets the whole app
    if matches!(app.current(), Some(Screen::Dashboard(_))) {
        let action = handle_dashboard(app, key);
        app.apply(action);
        return;
    }

    let App {
        screens,
        input_mode,
        gemini,
        auth,
        last_email,
        ..
    } = &mut *app;

    let action = match screens.last_mut() {
        None => Action::Quit,
        Some(Screen::Welcome) => handle_welcome(last_email.as_deref(), key),
        Some(Screen::Login(login)) => handle_login(login, auth, key),
        Some(Screen::Dashboard(_)) => Action::None,
        Some(Screen::CreateGroup(form)) => handle_create_group(form, key),
        Some(Screen::Group(group)) => handle_group(group, gemini, key),
        Some(Screen::Chat(chat)) => handle_chat(chat, input_mode, key),
        Some(Screen::Events(events)) => handle_events(events, key),
        Some(Screen::Resources(resources)) => handle_resources(resources, key),
        Some(Screen::UploadResource(form)) => handle_upload(form, key),
        Some(Screen::Questions(questions)) => handle_questions(questions, key),
        Some(Screen::QuestionDetail(detail)) => handle_question_detail(detail, input_mode, gemini, key),
    };

    app.apply(action);
}

fn handle_welcome(last_email: Option<&str>, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter | KeyCode::Char('l') => Action::Push(Screen::Login(LoginScreen::new(last_email))),
        KeyCode::Char('s') => Action::Home,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

fn handle_login(login: &mut LoginScreen, auth: &AuthClient, key: KeyEvent) -> Action {
    // Skip login
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Home;
    }

    match key.code {
        KeyCode::Esc => Action::Pop,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            login.focus = match login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
            Action::None
        }
        KeyCode::Enter => {
            match login.focus {
                LoginField::Email => login.focus = LoginField::Password,
                LoginField::Password => {
                    login.submit(auth);
                }
            }
            Action::None
        }
        _ => {
            if !login.is_loading() {
                match login.focus {
                    LoginField::Email => edit_input(&mut login.email, key),
                    LoginField::Password => edit_input(&mut login.password, key),
                };
            }
            Action::None
        }
    }
}

fn handle_dashboard(app: &mut App, key: KeyEvent) -> Action {
    if app.input_mode == InputMode::Editing {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.input_mode = InputMode::Normal;
            return Action::None;
        }
        let query = match app.current_mut() {
            Some(Screen::Dashboard(dashboard)) => {
                if !edit_input(&mut dashboard.search, key) {
                    return Action::None;
                }
                dashboard.search.value.clone()
            }
            _ => return Action::None,
        };
        // Search filters live; keep the highlight on the first match
        let (mine, recommended) = app.visible_groups(&query);
        let len = mine.len() + recommended.len();
        if let Some(Screen::Dashboard(dashboard)) = app.current_mut() {
            dashboard.list_state.select(if len == 0 { None } else { Some(0) });
        }
        return Action::None;
    }

    let query = match app.current() {
        Some(Screen::Dashboard(dashboard)) => dashboard.search.value.clone(),
        _ => return Action::None,
    };
    let visible: Vec<Group> = {
        let (mine, recommended) = app.visible_groups(&query);
        mine.into_iter().chain(recommended).cloned().collect()
    };

    let App { screens, input_mode, .. } = &mut *app;
    let Some(Screen::Dashboard(dashboard)) = screens.last_mut() else {
        return Action::None;
    };

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            list_down(&mut dashboard.list_state, visible.len());
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            list_up(&mut dashboard.list_state, visible.len());
            Action::None
        }
        KeyCode::Char('/') | KeyCode::Char('i') => {
            *input_mode = InputMode::Editing;
            Action::None
        }
        KeyCode::Esc => {
            dashboard.search.clear();
            dashboard.list_state.select(Some(0));
            Action::None
        }
        KeyCode::Char('n') => Action::Push(Screen::CreateGroup(CreateGroupScreen::default())),
        KeyCode::Enter | KeyCode::Char('l') => {
            let selected = dashboard.list_state.selected().unwrap_or(0);
            match visible.into_iter().nth(selected) {
                Some(group) => Action::Push(Screen::Group(GroupScreen::new(group))),
                None => Action::None,
            }
        }
        _ => Action::None,
    }
}

fn handle_create_group(form: &mut CreateGroupScreen, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Pop,
        KeyCode::Tab | KeyCode::Down => {
            form.focus = (form.focus + 1) % CREATE_GROUP_FIELDS;
            Action::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = (form.focus + CREATE_GROUP_FIELDS - 1) % CREATE_GROUP_FIELDS;
            Action::None
        }
        KeyCode::Enter => {
            let draft = GroupDraft {
                name: form.name.value.clone(),
                description: form.description.value.clone(),
                focus_area: form.focus_area.value.clone(),
            };
            if draft.is_valid() {
                Action::AddGroup(draft)
            } else {
                form.error = Some("Group name is required".to_string());
                form.focus = 0;
                Action::None
            }
        }
        _ => {
            edit_input(form.field_mut(), key);
            Action::None
        }
    }
}

fn handle_group(group: &mut GroupScreen, gemini: &GeminiClient, key: KeyEvent) -> Action {
    if group.modal.is_some() {
        handle_assistant_modal(group, gemini, key);
        return Action::None;
    }

    let channels = Channel::all();
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Backspace => Action::Pop,
        KeyCode::Char('j') | KeyCode::Down => {
            list_down(&mut group.channel_state, channels.len());
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            list_up(&mut group.channel_state, channels.len());
            Action::None
        }
        KeyCode::Char('a') => {
            group.open_assistant();
            Action::None
        }
        KeyCode::Enter | KeyCode::Char('l') => {
            let selected = group.channel_state.selected().unwrap_or(0);
            let id = group.group.id.as_str();
            match channels.get(selected) {
                Some(Channel::Chat) => Action::Push(Screen::Chat(ChatScreen::new(id))),
                Some(Channel::Resources) => Action::Push(Screen::Resources(ResourcesScreen::new(id))),
                Some(Channel::Questions) => Action::Push(Screen::Questions(QuestionsScreen::new(id))),
                Some(Channel::Events) => Action::Push(Screen::Events(EventsScreen::new())),
                None => Action::None,
            }
        }
        _ => Action::None,
    }
}

fn handle_assistant_modal(group: &mut GroupScreen, gemini: &GeminiClient, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        group.close_assistant();
        return;
    }
    let Some(panel) = group.modal.as_mut() else {
        return;
    };

    let pending = panel.assistant.is_pending();
    let answered = panel.assistant.result().is_some();

    if answered {
        // "Ask Another Question"
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) {
            panel.reset();
        }
    } else if !pending {
        if key.code == KeyCode::Enter {
            // Disabled while the input is blank
            if panel.assistant.can_submit() {
                panel.submit(gemini);
            }
        } else if let Some(input) = panel.assistant.input_mut() {
            edit_text(input, &mut panel.cursor, key);
        }
    }
}

fn handle_chat(chat: &mut ChatScreen, input_mode: &mut InputMode, key: KeyEvent) -> Action {
    if *input_mode == InputMode::Editing {
        match key.code {
            KeyCode::Esc => *input_mode = InputMode::Normal,
            KeyCode::Enter => {
                chat.send();
            }
            _ => {
                edit_input(&mut chat.draft, key);
            }
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Char('h') => Action::Pop,
        KeyCode::Char('i') | KeyCode::Enter => {
            *input_mode = InputMode::Editing;
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_events(events: &mut EventsScreen, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Char('h') => Action::Pop,
        KeyCode::Char('j') | KeyCode::Down => {
            list_down(&mut events.list_state, events.events.len());
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            list_up(&mut events.list_state, events.events.len());
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_resources(resources: &mut ResourcesScreen, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::Pop,
        KeyCode::Char('j') | KeyCode::Down => {
            let len = resources.visible().len();
            list_down(&mut resources.list_state, len);
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let len = resources.visible().len();
            list_up(&mut resources.list_state, len);
            Action::None
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            resources.cycle_category(true);
            Action::None
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            resources.cycle_category(false);
            Action::None
        }
        KeyCode::Char('u') => Action::Push(Screen::UploadResource(UploadResourceScreen::default())),
        _ => Action::None,
    }
}

fn handle_upload(form: &mut UploadResourceScreen, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Pop,
        KeyCode::Tab | KeyCode::Down => {
            form.focus = (form.focus + 1) % UPLOAD_FIELDS;
            Action::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = (form.focus + UPLOAD_FIELDS - 1) % UPLOAD_FIELDS;
            Action::None
        }
        KeyCode::Enter => {
            let draft = ResourceDraft {
                title: form.title.value.clone(),
                description: form.description.value.clone(),
                category: form.category.value.clone(),
            };
            if draft.is_valid() {
                Action::AddResource(draft)
            } else {
                form.error = Some("Title is required".to_string());
                form.focus = 0;
                Action::None
            }
        }
        _ => {
            edit_input(form.field_mut(), key);
            Action::None
        }
    }
}

fn handle_questions(questions: &mut QuestionsScreen, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Char('h') => Action::Pop,
        KeyCode::Char('j') | KeyCode::Down => {
            list_down(&mut questions.list_state, questions.questions.len());
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            list_up(&mut questions.list_state, questions.questions.len());
            Action::None
        }
        KeyCode::Enter | KeyCode::Char('l') => {
            let selected = questions.list_state.selected().unwrap_or(0);
            questions
                .questions
                .get(selected)
                .and_then(|q| fixtures::thread(&q.id))
                .map(|thread| Action::Push(Screen::QuestionDetail(QuestionDetailScreen::new(thread))))
                .unwrap_or(Action::None)
        }
        _ => Action::None,
    }
}

fn handle_question_detail(
    detail: &mut QuestionDetailScreen,
    input_mode: &mut InputMode,
    gemini: &GeminiClient,
    key: KeyEvent,
) -> Action {
    if *input_mode == InputMode::Editing {
        match key.code {
            KeyCode::Esc => *input_mode = InputMode::Normal,
            KeyCode::Enter => {
                if detail.thread.post_answer(&detail.answer.value) {
                    detail.answer.clear();
                    *input_mode = InputMode::Normal;
                }
            }
            _ => {
                edit_input(&mut detail.answer, key);
            }
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Char('h') => Action::Pop,
        // "Get AI Help"
        KeyCode::Char('g') => {
            if !detail.helper.assistant.is_pending() && detail.helper.assistant.result().is_none() {
                detail.ask_helper(gemini);
            }
            Action::None
        }
        // "Ask Again"
        KeyCode::Char('r') => {
            detail.helper.reset();
            Action::None
        }
        KeyCode::Char('i') => {
            *input_mode = InputMode::Editing;
            Action::None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            detail.scroll = detail.scroll.saturating_add(1);
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            detail.scroll = detail.scroll.saturating_sub(1);
            Action::None
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studygroup_core::{AssistantState, Config, FALLBACK_MESSAGE};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    fn app_with_gemini(base_url: &str) -> App {
        let config = Config {
            gemini_api_key: Some("test-key".to_string()),
            gemini_base_url: Some(base_url.to_string()),
            ..Config::new()
        };
        App::new(&config, std::env::temp_dir().join("studygroup-handler-test.json"))
    }

    fn group_screen(app: &App) -> &GroupScreen {
        match app.current() {
            Some(Screen::Group(group)) => group,
            _ => panic!("expected group screen"),
        }
    }

    async fn wait_for_answer(app: &mut App) {
        for _ in 0..200 {
            app.poll_tasks();
            let done = group_screen(app)
                .modal
                .as_ref()
                .map(|p| p.assistant.result().is_some())
                .unwrap_or(true);
            if done {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("assistant never answered");
    }

    fn open_group(app: &mut App) {
        handle_key(app, key(KeyCode::Char('s'))); // skip login
        handle_key(app, key(KeyCode::Enter)); // first group
        assert!(matches!(app.current(), Some(Screen::Group(_))));
    }

    fn open_first_question(app: &mut App) {
        open_group(app);
        handle_key(app, key(KeyCode::Down));
        handle_key(app, key(KeyCode::Down));
        handle_key(app, key(KeyCode::Enter)); // questions channel
        handle_key(app, key(KeyCode::Enter)); // first question
        assert!(matches!(app.current(), Some(Screen::QuestionDetail(_))));
    }

    fn detail_screen(app: &App) -> &QuestionDetailScreen {
        match app.current() {
            Some(Screen::QuestionDetail(detail)) => detail,
            _ => panic!("expected question detail screen"),
        }
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        assert_eq!(char_to_byte_index("∫dx", 1), "∫".len());
        assert_eq!(char_to_byte_index("ab", 5), 2);
    }

    #[test]
    fn test_edit_text_cursor_moves() {
        let mut input = TextInput::default();
        for c in "x²".chars() {
            edit_input(&mut input, key(KeyCode::Char(c)));
        }
        edit_input(&mut input, key(KeyCode::Left));
        edit_input(&mut input, key(KeyCode::Char('+')));
        assert_eq!(input.value, "x+²");
        edit_input(&mut input, key(KeyCode::Backspace));
        assert_eq!(input.value, "x²");
        assert!(!edit_input(&mut input, key(KeyCode::Enter)));
    }

    #[test]
    fn test_dashboard_search_filters_selection() {
        let mut app = app_with_gemini("http://127.0.0.1:1");
        handle_key(&mut app, key(KeyCode::Char('s')));
        handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);
        type_text(&mut app, "physics");
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Enter));

        let Some(Screen::Group(group)) = app.current() else {
            panic!("expected group screen");
        };
        assert_eq!(group.group.name, "Physics Problem Solving");
    }

    #[test]
    fn test_create_group_requires_name() {
        let mut app = app_with_gemini("http://127.0.0.1:1");
        handle_key(&mut app, key(KeyCode::Char('s')));
        handle_key(&mut app, key(KeyCode::Char('n')));
        handle_key(&mut app, key(KeyCode::Enter));

        let Some(Screen::CreateGroup(form)) = app.current() else {
            panic!("expected create group form");
        };
        assert!(form.error.is_some());

        type_text(&mut app, "Linear Algebra");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(matches!(app.current(), Some(Screen::Dashboard(_))));
        assert!(app.my_groups.iter().any(|g| g.name == "Linear Algebra"));
    }

    #[test]
    fn test_chat_send_and_blank() {
        let mut app = app_with_gemini("http://127.0.0.1:1");
        open_group(&mut app);
        handle_key(&mut app, key(KeyCode::Enter)); // chat channel
        handle_key(&mut app, key(KeyCode::Char('i')));
        handle_key(&mut app, key(KeyCode::Enter)); // blank, ignored
        type_text(&mut app, "  hi all ");
        handle_key(&mut app, key(KeyCode::Enter));

        let Some(Screen::Chat(chat)) = app.current() else {
            panic!("expected chat screen");
        };
        assert_eq!(chat.log.messages().len(), 2);
        assert_eq!(chat.log.messages()[1].content, "hi all");
        assert!(chat.draft.value.is_empty());
    }

    #[tokio::test]
    async fn test_modal_blank_submit_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let mut app = app_with_gemini(&server.url());
        open_group(&mut app);

        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "   ");
        handle_key(&mut app, key(KeyCode::Enter));

        let panel = group_screen(&app).modal.as_ref().unwrap();
        assert!(!panel.assistant.is_pending());
        assert!(!panel.is_busy());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_modal_answers_then_resets() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"4"}]}}]}"#)
            .expect(1)
            .create_async()
            .await;
        let mut app = app_with_gemini(&server.url());
        open_group(&mut app);

        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "What is 2+2?");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(group_screen(&app).modal.as_ref().unwrap().assistant.is_pending());

        // A second Enter while pending is ignored
        handle_key(&mut app, key(KeyCode::Enter));

        wait_for_answer(&mut app).await;
        let panel = group_screen(&app).modal.as_ref().unwrap();
        assert_eq!(panel.assistant.result().map(|r| r.text()), Some("4"));

        handle_key(&mut app, key(KeyCode::Char('r')));
        let panel = group_screen(&app).modal.as_ref().unwrap();
        assert!(panel.assistant.result().is_none());
        assert_eq!(panel.assistant.input(), "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_modal_server_error_shows_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let mut app = app_with_gemini(&server.url());
        open_group(&mut app);

        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "anything");
        handle_key(&mut app, key(KeyCode::Enter));
        wait_for_answer(&mut app).await;

        let panel = group_screen(&app).modal.as_ref().unwrap();
        assert_eq!(panel.assistant.result().map(|r| r.text()), Some(FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_closing_modal_while_pending_drops_it() {
        let mut app = app_with_gemini("http://127.0.0.1:1");
        open_group(&mut app);

        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "slow");
        handle_key(&mut app, key(KeyCode::Enter));
        handle_key(&mut app, key(KeyCode::Esc));

        assert!(group_screen(&app).modal.is_none());
        app.poll_tasks();
        assert!(group_screen(&app).modal.is_none());
    }

    #[tokio::test]
    async fn test_question_helper_asks_with_tutor_prompt_then_resets() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::Regex(
                "step-by-step explanation for this question: I am stuck".to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Expand, then integrate each term."}]}}]}"#)
            .expect(1)
            .create_async()
            .await;
        let mut app = app_with_gemini(&server.url());
        open_first_question(&mut app);

        handle_key(&mut app, key(KeyCode::Char('g')));
        assert!(detail_screen(&app).helper.assistant.is_pending());

        for _ in 0..200 {
            app.poll_tasks();
            if detail_screen(&app).helper.assistant.result().is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let helper = &detail_screen(&app).helper;
        assert_eq!(
            helper.assistant.result().map(|r| r.text()),
            Some("Expand, then integrate each term.")
        );

        // "Ask Again"
        handle_key(&mut app, key(KeyCode::Char('r')));
        let helper = &detail_screen(&app).helper;
        assert_eq!(*helper.assistant.state(), AssistantState::Idle);
        assert_eq!(helper.assistant.input(), "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_helper_ignores_g_while_pending() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
            .expect(1)
            .create_async()
            .await;
        let mut app = app_with_gemini(&server.url());
        open_first_question(&mut app);

        handle_key(&mut app, key(KeyCode::Char('g')));
        assert!(detail_screen(&app).helper.is_busy());
        handle_key(&mut app, key(KeyCode::Char('g')));
        assert!(detail_screen(&app).helper.assistant.is_pending());

        for _ in 0..200 {
            app.poll_tasks();
            if !detail_screen(&app).helper.is_busy() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(detail_screen(&app).helper.assistant.result().map(|r| r.text()), Some("ok"));
        mock.assert_async().await;
    }
}
