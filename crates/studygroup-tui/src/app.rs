use std::future::Future;
use std::path::PathBuf;

use futures_util::FutureExt;
use ratatui::widgets::ListState;
use tokio::task::{JoinError, JoinHandle};

use studygroup_core::{
    fixtures, AuthClient, AuthError, Assistant, Config, Event, GeminiClient, GenerationResult, Group, GroupDraft,
    PromptStyle, Question, Resource, ResourceDraft, Session, Thread, Ticket, FALLBACK_MESSAGE,
};
use studygroup_core::state::ChatLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// A single-line text field with a cursor counted in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// A spawned task that is aborted when its owner goes away.
pub struct PendingTask<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> PendingTask<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// The task's output if it has finished, without waiting.
    pub fn try_take(&mut self) -> Option<Result<T, JoinError>> {
        if !self.handle.is_finished() {
            return None;
        }
        (&mut self.handle).now_or_never()
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An assistant plus the request it has in flight.
pub struct AssistantPanel {
    pub assistant: Assistant,
    pub cursor: usize,
    task: Option<(Ticket, PendingTask<GenerationResult>)>,
}

impl AssistantPanel {
    pub fn new(style: PromptStyle) -> Self {
        Self {
            assistant: Assistant::new(style),
            cursor: 0,
            task: None,
        }
    }

    /// Start a request for the current input. Returns false when the
    /// assistant refused (blank input or already busy).
    pub fn submit(&mut self, client: &GeminiClient) -> bool {
        match self.assistant.submit() {
            Ok((ticket, request)) => {
                let client = client.clone();
                let task = PendingTask::spawn(async move { client.answer(&request).await });
                self.task = Some((ticket, task));
                true
            }
            Err(err) => {
                tracing::debug!(%err, "assistant submission ignored");
                false
            }
        }
    }

    pub fn poll(&mut self) {
        let Some((ticket, task)) = self.task.as_mut() else {
            return;
        };
        let Some(outcome) = task.try_take() else {
            return;
        };
        let ticket = *ticket;
        self.task = None;

        let result = outcome.unwrap_or_else(|err| {
            tracing::error!(%err, "assistant task did not finish");
            GenerationResult::Failed(FALLBACK_MESSAGE)
        });
        self.assistant.complete(ticket, result);
    }

    /// "Ask another question"
    pub fn reset(&mut self) -> bool {
        if self.assistant.reset() {
            self.cursor = 0;
            return true;
        }
        false
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginScreen {
    pub email: TextInput,
    pub password: TextInput,
    pub focus: LoginField,
    pub error: Option<String>,
    task: Option<PendingTask<Result<Session, AuthError>>>,
}

impl LoginScreen {
    pub fn new(last_email: Option<&str>) -> Self {
        let email = last_email.map(TextInput::with_value).unwrap_or_default();
        let focus = if email.is_blank() { LoginField::Email } else { LoginField::Password };
        Self {
            email,
            password: TextInput::default(),
            focus,
            error: None,
            task: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    pub fn submit(&mut self, auth: &AuthClient) -> bool {
        if self.is_loading() {
            return false;
        }
        self.error = None;

        let auth = auth.clone();
        let email = self.email.value.trim().to_string();
        let password = self.password.value.clone();
        self.task = Some(PendingTask::spawn(async move {
            auth.sign_in_with_password(&email, &password).await
        }));
        true
    }

    /// A session once sign-in succeeds. Failures land in `error`.
    pub fn poll(&mut self) -> Option<Session> {
        let outcome = self.task.as_mut()?.try_take()?;
        self.task = None;

        match outcome {
            Ok(Ok(session)) => Some(session),
            Ok(Err(err)) => {
                self.error = Some(err.to_string());
                None
            }
            Err(err) => {
                tracing::error!(%err, "sign-in task did not finish");
                self.error = Some("Sign-in was interrupted. Please try again.".to_string());
                None
            }
        }
    }
}

#[derive(Default)]
pub struct DashboardScreen {
    pub search: TextInput,
    pub list_state: ListState,
}

pub const CREATE_GROUP_FIELDS: usize = 3;

#[derive(Default)]
pub struct CreateGroupScreen {
    pub name: TextInput,
    pub description: TextInput,
    pub focus_area: TextInput,
    pub focus: usize,
    pub error: Option<String>,
}

impl CreateGroupScreen {
    pub fn field_mut(&mut self) -> &mut TextInput {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.description,
            _ => &mut self.focus_area,
        }
    }
}

pub struct GroupScreen {
    pub group: Group,
    pub blurb: String,
    pub channel_state: ListState,
    pub modal: Option<AssistantPanel>,
}

impl GroupScreen {
    pub fn new(group: Group) -> Self {
        let mut channel_state = ListState::default();
        channel_state.select(Some(0));
        Self {
            blurb: fixtures::group_blurb(&group),
            group,
            channel_state,
            modal: None,
        }
    }

    pub fn open_assistant(&mut self) {
        if self.modal.is_none() {
            self.modal = Some(AssistantPanel::new(PromptStyle::General));
        }
    }

    pub fn close_assistant(&mut self) {
        if let Some(panel) = self.modal.take() {
            if panel.is_busy() {
                tracing::debug!("assistant closed with a request in flight; aborting");
            }
        }
    }
}

pub struct ChatScreen {
    pub group_id: String,
    pub log: ChatLog,
    pub draft: TextInput,
}

impl ChatScreen {
    pub fn new(group_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            log: ChatLog::for_group(group_id),
            draft: TextInput::default(),
        }
    }

    pub fn send(&mut self) -> bool {
        let sent = self.log.send(&self.draft.value).is_some();
        if sent {
            self.draft.clear();
        }
        sent
    }
}

pub struct EventsScreen {
    pub events: Vec<Event>,
    pub list_state: ListState,
}

impl EventsScreen {
    pub fn new() -> Self {
        let events = fixtures::events();
        let mut list_state = ListState::default();
        if !events.is_empty() {
            list_state.select(Some(0));
        }
        Self { events, list_state }
    }
}

pub struct ResourcesScreen {
    pub group_id: String,
    pub resources: Vec<Resource>,
    pub category_idx: usize,
    pub list_state: ListState,
    next_id: usize,
}

impl ResourcesScreen {
    pub fn new(group_id: &str) -> Self {
        let resources = fixtures::resources();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            group_id: group_id.to_string(),
            next_id: resources.len() + 1,
            resources,
            category_idx: 0,
            list_state,
        }
    }

    pub fn categories(&self) -> Vec<String> {
        studygroup_core::group::resource_categories(&self.resources)
    }

    pub fn selected_category(&self) -> String {
        self.categories()
            .get(self.category_idx)
            .cloned()
            .unwrap_or_else(|| "All".to_string())
    }

    pub fn visible(&self) -> Vec<&Resource> {
        studygroup_core::group::filter_resources(&self.resources, &self.selected_category())
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let count = self.categories().len();
        self.category_idx = if forward {
            (self.category_idx + 1) % count
        } else {
            (self.category_idx + count - 1) % count
        };
        self.list_state.select(if self.visible().is_empty() { None } else { Some(0) });
    }

    pub fn next_id(&mut self) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        id
    }
}

pub const UPLOAD_FIELDS: usize = 3;

#[derive(Default)]
pub struct UploadResourceScreen {
    pub title: TextInput,
    pub description: TextInput,
    pub category: TextInput,
    pub focus: usize,
    pub error: Option<String>,
}

impl UploadResourceScreen {
    pub fn field_mut(&mut self) -> &mut TextInput {
        match self.focus {
            0 => &mut self.title,
            1 => &mut self.description,
            _ => &mut self.category,
        }
    }
}

pub struct QuestionsScreen {
    pub group_id: String,
    pub questions: Vec<Question>,
    pub list_state: ListState,
}

impl QuestionsScreen {
    pub fn new(group_id: &str) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            group_id: group_id.to_string(),
            questions: fixtures::questions(),
            list_state,
        }
    }
}

pub struct QuestionDetailScreen {
    pub thread: Thread,
    pub helper: AssistantPanel,
    pub answer: TextInput,
    pub scroll: u16,
}

impl QuestionDetailScreen {
    pub fn new(thread: Thread) -> Self {
        Self {
            thread,
            helper: AssistantPanel::new(PromptStyle::Tutor),
            answer: TextInput::default(),
            scroll: 0,
        }
    }

    /// "Get AI Help": ask the tutor about this thread's question.
    pub fn ask_helper(&mut self, client: &GeminiClient) -> bool {
        self.helper.assistant.set_input(&self.thread.question.content);
        self.helper.submit(client)
    }
}

pub enum Screen {
    Welcome,
    Login(LoginScreen),
    Dashboard(DashboardScreen),
    CreateGroup(CreateGroupScreen),
    Group(GroupScreen),
    Chat(ChatScreen),
    Events(EventsScreen),
    Resources(ResourcesScreen),
    UploadResource(UploadResourceScreen),
    Questions(QuestionsScreen),
    QuestionDetail(QuestionDetailScreen),
}

impl Screen {
    pub fn title(&self) -> String {
        match self {
            Screen::Welcome => "Welcome".to_string(),
            Screen::Login(_) => "Login".to_string(),
            Screen::Dashboard(_) => "Study Groups".to_string(),
            Screen::CreateGroup(_) => "Create Study Group".to_string(),
            Screen::Group(s) => s.group.name.clone(),
            Screen::Chat(_) => "# chat".to_string(),
            Screen::Events(_) => "# events".to_string(),
            Screen::Resources(_) => "# resources".to_string(),
            Screen::UploadResource(_) => "Upload Resource".to_string(),
            Screen::Questions(_) => "# questions".to_string(),
            Screen::QuestionDetail(s) => s.thread.question.title.clone(),
        }
    }

    /// Forms take keystrokes as soon as they open.
    fn default_mode(&self) -> InputMode {
        match self {
            Screen::Login(_) | Screen::CreateGroup(_) | Screen::UploadResource(_) => InputMode::Editing,
            _ => InputMode::Normal,
        }
    }
}

/// Navigation requested by a key handler, applied once its borrow ends.
pub enum Action {
    None,
    Push(Screen),
    Pop,
    /// Replace the whole stack (after login)
    Home,
    Quit,
    AddGroup(GroupDraft),
    AddResource(ResourceDraft),
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub screens: Vec<Screen>,

    // Local, unpersisted data
    pub my_groups: Vec<Group>,
    pub recommended: Vec<Group>,
    pub session: Option<Session>,

    // Collaborators
    pub gemini: GeminiClient,
    pub auth: AuthClient,
    pub config_path: PathBuf,
    pub last_email: Option<String>,

    // Animation state
    pub animation_frame: u8,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: &Config, config_path: PathBuf) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            screens: vec![Screen::Welcome],

            my_groups: fixtures::groups(),
            recommended: fixtures::recommended_groups(),
            session: None,

            gemini: config.gemini_client(),
            auth: config.auth_client(),
            config_path,
            last_email: config.last_email.clone(),

            animation_frame: 0,
            status: None,
        }
    }

    pub fn current(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Screen> {
        self.screens.last_mut()
    }

    pub fn push(&mut self, screen: Screen) {
        self.input_mode = screen.default_mode();
        self.status = None;
        self.screens.push(screen);
    }

    /// Leave the current screen, dropping its state (and aborting anything
    /// it had in flight). The root screen is never popped.
    pub fn pop(&mut self) {
        if self.screens.len() > 1 {
            self.screens.pop();
        }
        self.input_mode = self
            .current()
            .map(Screen::default_mode)
            .unwrap_or(InputMode::Normal);
    }

    pub fn go_home(&mut self) {
        self.screens.clear();
        self.push(Screen::Dashboard(DashboardScreen::default()));
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Push(screen) => self.push(screen),
            Action::Pop => self.pop(),
            Action::Home => self.go_home(),
            Action::Quit => self.should_quit = true,
            Action::AddGroup(draft) => {
                let Some(group) = draft.build(&self.next_group_id()) else {
                    return;
                };
                self.pop();
                self.status = Some(format!("Created {}", group.name));
                tracing::info!(group = %group.name, "group created");
                self.my_groups.push(group);
            }
            Action::AddResource(draft) => {
                self.pop();
                if let Some(Screen::Resources(screen)) = self.current_mut() {
                    let id = screen.next_id();
                    if let Some(resource) = draft.build(&id) {
                        tracing::info!(title = %resource.title, "resource recorded");
                        screen.resources.push(resource);
                        screen.category_idx = 0;
                        let last = screen.resources.len().saturating_sub(1);
                        screen.list_state.select(Some(last));
                    }
                }
            }
        }
    }

    /// Groups matching the dashboard search: (yours, recommended).
    pub fn visible_groups(&self, query: &str) -> (Vec<&Group>, Vec<&Group>) {
        let mine = self.my_groups.iter().filter(|g| g.matches(query)).collect();
        let recommended = self.recommended.iter().filter(|g| g.matches(query)).collect();
        (mine, recommended)
    }

    pub fn next_group_id(&self) -> String {
        (self.my_groups.len() + self.recommended.len() + 1).to_string()
    }

    /// Collect finished background work. Called after every event.
    pub fn poll_tasks(&mut self) {
        let mut signed_in = None;
        for screen in self.screens.iter_mut() {
            match screen {
                Screen::Login(login) => {
                    if let Some(session) = login.poll() {
                        signed_in = Some(session);
                    }
                }
                Screen::Group(group) => {
                    if let Some(panel) = group.modal.as_mut() {
                        panel.poll();
                    }
                }
                Screen::QuestionDetail(detail) => detail.helper.poll(),
                _ => {}
            }
        }

        if let Some(session) = signed_in {
            if let Err(err) = Config::save_last_email(&self.config_path, &session.email) {
                tracing::warn!(%err, "could not remember last email");
            }
            self.last_email = Some(session.email.clone());
            self.session = Some(session);
            self.go_home();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 4;
    }
}
