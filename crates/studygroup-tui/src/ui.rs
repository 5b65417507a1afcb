use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use studygroup_core::{Assistant, AssistantState, Channel, Group, Sender};

use crate::app::{
    App, AssistantPanel, ChatScreen, CreateGroupScreen, EventsScreen, GroupScreen, InputMode, LoginField,
    LoginScreen, QuestionDetailScreen, QuestionsScreen, ResourcesScreen, Screen, TextInput, UploadResourceScreen,
};
use crate::theme;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Parse a line of model output, rendering **bold** runs and `* ` bullets.
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();

    let body = match text.strip_prefix("* ").or_else(|| text.strip_prefix("- ")) {
        Some(rest) => {
            spans.push(Span::raw("• "));
            rest
        }
        None => text,
    };

    let parts: Vec<&str> = body.split("**").collect();
    // An odd number of markers leaves the last one unmatched
    let unmatched = parts.len() % 2 == 0;
    for (i, part) in parts.iter().enumerate() {
        if unmatched && i == parts.len() - 1 {
            spans.push(Span::raw(format!("**{part}")));
        } else if part.is_empty() {
            continue;
        } else if i % 2 == 1 {
            spans.push(Span::styled(part.to_string(), Style::default().add_modifier(Modifier::BOLD)));
        } else {
            spans.push(Span::raw(part.to_string()));
        }
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

fn spinner(frame_no: u8) -> &'static str {
    SPINNER[frame_no as usize % SPINNER.len()]
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme::base()), area);

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_footer(app, frame, footer_area);

    if matches!(app.current(), Some(Screen::Dashboard(_))) {
        render_dashboard(app, frame, body_area);
        return;
    }

    let frame_no = app.animation_frame;
    let editing = app.input_mode == InputMode::Editing;
    let auth_configured = app.auth.is_configured();
    let Some(screen) = app.screens.last_mut() else {
        return;
    };

    match screen {
        Screen::Welcome => render_welcome(frame, body_area),
        Screen::Login(login) => render_login(login, auth_configured, frame_no, frame, body_area),
        Screen::Dashboard(_) => {}
        Screen::CreateGroup(form) => render_create_group(form, frame, body_area),
        Screen::Group(group) => {
            render_group(group, frame, body_area);
            if let Some(panel) = group.modal.as_ref() {
                render_assistant_modal(panel, frame_no, frame, area);
            }
        }
        Screen::Chat(chat) => render_chat(chat, editing, frame, body_area),
        Screen::Events(events) => render_events(events, frame, body_area),
        Screen::Resources(resources) => render_resources(resources, frame, body_area),
        Screen::UploadResource(form) => render_upload(form, frame, body_area),
        Screen::Questions(questions) => render_questions(questions, frame, body_area),
        Screen::QuestionDetail(detail) => render_question_detail(detail, editing, frame_no, frame, body_area),
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let crumbs = app
        .screens
        .iter()
        .map(Screen::title)
        .collect::<Vec<_>>()
        .join(" › ");

    let mut spans = vec![
        Span::styled(" Study Group Finder ", Style::default().fg(theme::ACCENT).bold()),
        Span::styled(crumbs, theme::muted()),
    ];
    if let Some(session) = &app.session {
        spans.push(Span::styled(format!("  {}", session.email), Style::default().fg(theme::SUCCESS)));
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("  {status}"), Style::default().fg(theme::WARNING)));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::SURFACE));
    frame.render_widget(header, area);
}

fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(format!(" {key} "), theme::key_hint()),
        Span::styled(format!(" {label} "), theme::key_label()),
    ]
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(theme::ACCENT).fg(theme::TEXT),
        InputMode::Editing => Style::default().bg(theme::WARNING).fg(theme::BACKGROUND),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " INSERT ",
    };

    let editing = app.input_mode == InputMode::Editing;
    let pairs: Vec<[Span<'static>; 2]> = match app.current() {
        None | Some(Screen::Welcome) => vec![hint("Enter", "login"), hint("s", "skip login"), hint("q", "quit")],
        Some(Screen::Login(_)) => vec![
            hint("Tab", "next field"),
            hint("Enter", "login"),
            hint("^S", "skip login"),
            hint("Esc", "back"),
        ],
        Some(Screen::Dashboard(_)) if editing => vec![hint("Enter", "done"), hint("Esc", "done")],
        Some(Screen::Dashboard(_)) => vec![
            hint("j/k", "nav"),
            hint("Enter", "open"),
            hint("/", "search"),
            hint("n", "new group"),
            hint("q", "quit"),
        ],
        Some(Screen::CreateGroup(_)) | Some(Screen::UploadResource(_)) => {
            vec![hint("Tab", "next field"), hint("Enter", "submit"), hint("Esc", "cancel")]
        }
        Some(Screen::Group(group)) if group.modal.is_some() => {
            vec![hint("Enter", "ask"), hint("r", "ask another"), hint("Esc", "close")]
        }
        Some(Screen::Group(_)) => vec![
            hint("j/k", "channel"),
            hint("Enter", "open"),
            hint("a", "AI assistant"),
            hint("Esc", "back"),
        ],
        Some(Screen::Chat(_)) if editing => vec![hint("Enter", "send"), hint("Esc", "stop typing")],
        Some(Screen::Chat(_)) => vec![hint("i", "compose"), hint("Esc", "back")],
        Some(Screen::Events(_)) => vec![hint("j/k", "nav"), hint("Esc", "back")],
        Some(Screen::Resources(_)) => vec![
            hint("j/k", "nav"),
            hint("h/l", "category"),
            hint("u", "upload"),
            hint("Esc", "back"),
        ],
        Some(Screen::Questions(_)) => vec![hint("j/k", "nav"), hint("Enter", "view"), hint("Esc", "back")],
        Some(Screen::QuestionDetail(_)) if editing => vec![hint("Enter", "post answer"), hint("Esc", "stop typing")],
        Some(Screen::QuestionDetail(_)) => vec![
            hint("g", "get AI help"),
            hint("r", "ask again"),
            hint("i", "answer"),
            hint("j/k", "scroll"),
            hint("Esc", "back"),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(pairs.into_iter().flatten());
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A bordered single-line text field. `mask` hides the value (passwords).
fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &TextInput,
    placeholder: &str,
    focused: bool,
    mask: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(focused))
        .title(format!(" {label} "));

    let content = if input.value.is_empty() {
        Span::styled(placeholder.to_string(), theme::muted())
    } else if mask {
        Span::raw("•".repeat(input.value.chars().count()))
    } else {
        Span::raw(input.value.clone())
    };

    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if focused {
        let max = area.width.saturating_sub(3) as usize;
        let cursor_x = input.cursor.min(max) as u16;
        frame.set_cursor_position((area.x + 1 + cursor_x, area.y + 1));
    }
}

fn render_error(frame: &mut Frame, area: Rect, error: Option<&str>) {
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(error.to_string()).style(Style::default().fg(theme::ERROR)),
            area,
        );
    }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("🎓", Style::default().fg(theme::ACCENT))),
        Line::default(),
        Line::from(Span::styled("Study Group Finder", theme::title())),
        Line::from(Span::styled("Connect. Learn. Succeed.", theme::muted())),
        Line::default(),
        Line::from("👥  Join study groups with like-minded students"),
        Line::from("📚  Access shared resources and materials"),
        Line::from("💡  Get AI-powered learning assistance"),
        Line::default(),
        Line::from(vec![
            Span::styled(" Enter ", theme::highlight()),
            Span::raw(" Login    "),
            Span::styled(" s ", theme::key_hint()),
            Span::raw(" Skip Login"),
        ]),
    ];

    let popup = centered_rect(56, lines.len() as u16 + 2, area);
    let card = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme::border(true)));
    frame.render_widget(card, popup);
}

fn render_login(login: &LoginScreen, auth_configured: bool, frame_no: u8, frame: &mut Frame, area: Rect) {
    let card = centered_rect(50, 15, area);
    let [title_area, email_area, password_area, button_area, error_area, note_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
    ])
    .areas(card);

    frame.render_widget(
        Paragraph::new(Span::styled("Welcome Back!", theme::title())).alignment(ratatui::layout::Alignment::Center),
        title_area,
    );

    let typing = !login.is_loading();
    render_input(
        frame,
        email_area,
        "Email",
        &login.email,
        "Email",
        typing && login.focus == LoginField::Email,
        false,
    );
    render_input(
        frame,
        password_area,
        "Password",
        &login.password,
        "Password",
        typing && login.focus == LoginField::Password,
        true,
    );

    let button = if login.is_loading() {
        Span::styled(format!(" {} Logging in... ", spinner(frame_no)), theme::muted())
    } else {
        Span::styled(" Login ", theme::highlight())
    };
    frame.render_widget(
        Paragraph::new(Line::from(button)).alignment(ratatui::layout::Alignment::Center),
        button_area,
    );

    render_error(frame, error_area, login.error.as_deref());

    if !auth_configured {
        frame.render_widget(
            Paragraph::new("Sign-in is not configured. Press Ctrl-S to skip login.")
                .style(theme::muted())
                .wrap(Wrap { trim: true }),
            note_area,
        );
    }
}

fn group_item(group: &Group) -> ListItem<'static> {
    let mut title = vec![
        Span::styled(format!(" {} ", group.initials()), Style::default().bg(theme::ACCENT).fg(theme::TEXT).bold()),
        Span::raw(" "),
        Span::styled(group.name.clone(), Style::default().bold()),
        Span::styled(format!("  {} members", group.member_count), theme::muted()),
    ];
    if group.active {
        title.push(Span::styled("  ● active", Style::default().fg(theme::SUCCESS)));
    }
    ListItem::new(vec![
        Line::from(title),
        Line::from(Span::styled(format!("     {}", group.description), theme::muted())),
    ])
}

fn render_group_section(frame: &mut Frame, area: Rect, title: &str, groups: &[&Group], selected: Option<usize>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(selected.is_some()))
        .title(Span::styled(format!(" {title} "), theme::title()));

    if groups.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No groups match your search", theme::muted())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = groups.iter().map(|g| group_item(g)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme::SURFACE).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_dashboard(app: &App, frame: &mut Frame, area: Rect) {
    let Some(Screen::Dashboard(dashboard)) = app.current() else {
        return;
    };
    let editing = app.input_mode == InputMode::Editing;
    let (mine, recommended) = app.visible_groups(&dashboard.search.value);

    let [search_area, mine_area, recommended_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(50),
        Constraint::Min(0),
    ])
    .areas(area);

    render_input(frame, search_area, "Search", &dashboard.search, "Search groups...", editing, false);

    // One selection runs across both sections
    let selected = dashboard.list_state.selected();
    let in_mine = selected.filter(|&i| i < mine.len());
    let in_recommended = selected.and_then(|i| i.checked_sub(mine.len())).filter(|&i| i < recommended.len());

    render_group_section(frame, mine_area, "YOUR GROUPS", &mine, in_mine);
    render_group_section(frame, recommended_area, "RECOMMENDED", &recommended, in_recommended);
}

fn render_create_group(form: &CreateGroupScreen, frame: &mut Frame, area: Rect) {
    let card = centered_rect(60, 14, area);
    let [name_area, description_area, focus_area, error_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .areas(card);

    render_input(frame, name_area, "Group Name", &form.name, "Enter group name", form.focus == 0, false);
    render_input(
        frame,
        description_area,
        "Description",
        &form.description,
        "Describe your group",
        form.focus == 1,
        false,
    );
    render_input(
        frame,
        focus_area,
        "Focus Area",
        &form.focus_area,
        "e.g., Mathematics, Programming",
        form.focus == 2,
        false,
    );
    render_error(frame, error_area, form.error.as_deref());
}

fn render_group(group: &mut GroupScreen, frame: &mut Frame, area: Rect) {
    let [about_area, channels_area] = Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(area);

    let about = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", group.group.initials()),
                Style::default().bg(theme::ACCENT).fg(theme::TEXT).bold(),
            ),
            Span::raw(" "),
            Span::styled(group.group.name.clone(), theme::title()),
            Span::styled(format!("  {} members", group.group.member_count), theme::muted()),
        ]),
        Line::default(),
        Line::from(group.blurb.clone()),
    ];
    frame.render_widget(
        Paragraph::new(about)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(theme::border(false))),
        about_area,
    );

    let items: Vec<ListItem> = Channel::all()
        .iter()
        .map(|c| ListItem::new(format!("# {}", c.display_name())))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border(group.modal.is_none()))
                .title(" Channels "),
        )
        .highlight_style(theme::highlight())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, channels_area, &mut group.channel_state);
}

/// Lines describing an assistant's current state; shared by the modal
/// and the inline helper.
fn assistant_lines(assistant: &Assistant, frame_no: u8, pending_text: &str) -> Vec<Line<'static>> {
    match assistant.state() {
        AssistantState::Idle => Vec::new(),
        AssistantState::Pending => vec![Line::from(Span::styled(
            format!("{} {}", spinner(frame_no), pending_text),
            Style::default().fg(theme::ASSISTANT).add_modifier(Modifier::ITALIC),
        ))],
        AssistantState::Answered(result) => {
            let style = if result.is_fallback() {
                Style::default().fg(theme::ERROR)
            } else {
                Style::default()
            };
            result.text().lines().map(|l| parse_markdown_line(l).patch_style(style)).collect()
        }
    }
}

fn render_assistant_modal(panel: &AssistantPanel, frame_no: u8, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area.width * 7 / 10, area.height * 7 / 10, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ASSISTANT))
        .title(Span::styled(
            format!(" ⚛ {} ", panel.assistant.style().display_name()),
            Style::default().fg(theme::ASSISTANT).bold(),
        ))
        .style(theme::base());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let assistant = &panel.assistant;
    match assistant.state() {
        AssistantState::Idle => {
            let [subtitle_area, input_area, send_area] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .areas(inner);

            frame.render_widget(
                Paragraph::new(Span::styled("Ask me anything about your studies", theme::muted())),
                subtitle_area,
            );
            let input = TextInput {
                value: assistant.input().to_string(),
                cursor: panel.cursor,
            };
            render_input(frame, input_area, "Question", &input, "Type your question here...", true, false);

            // Disabled while the question is blank
            let send_style = if assistant.can_submit() {
                Style::default().bg(theme::ASSISTANT).fg(theme::TEXT).bold()
            } else {
                theme::muted()
            };
            frame.render_widget(Paragraph::new(Span::styled(" Enter ➤ Send ", send_style)), send_area);
        }
        AssistantState::Pending => {
            let lines = assistant_lines(assistant, frame_no, "Processing your question...");
            frame.render_widget(Paragraph::new(lines), inner);
        }
        AssistantState::Answered(_) => {
            let mut lines = vec![
                Line::from(Span::styled("💬 AI Response", Style::default().fg(theme::ASSISTANT).bold())),
                Line::default(),
            ];
            lines.extend(assistant_lines(assistant, frame_no, ""));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled(" r ", theme::key_hint()),
                Span::raw(" Ask Another Question"),
            ]));
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }
    }
}

fn render_chat(chat: &ChatScreen, editing: bool, frame: &mut Frame, area: Rect) {
    let [log_area, input_area] = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    let lines: Vec<Line> = chat
        .log
        .messages()
        .iter()
        .map(|msg| {
            let sender_style = match &msg.sender {
                Sender::System => theme::muted().add_modifier(Modifier::ITALIC),
                Sender::You => Style::default().fg(theme::ACCENT).bold(),
            };
            Line::from(vec![
                Span::styled(msg.timestamp.format("%H:%M ").to_string(), theme::muted()),
                Span::styled(format!("{}: ", msg.sender.display_name()), sender_style),
                Span::raw(msg.content.clone()),
            ])
        })
        .collect();

    // Keep the newest messages in view
    let visible = log_area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::border(!editing))
                    .title(format!(" # chat · group {} ", chat.group_id)),
            ),
        log_area,
    );

    render_input(frame, input_area, "Message", &chat.draft, "Type a message...", editing, false);
}

fn render_events(events: &mut EventsScreen, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = events
        .events
        .iter()
        .map(|event| {
            ListItem::new(vec![
                Line::from(Span::styled(event.title.clone(), Style::default().bold())),
                Line::from(Span::styled(
                    format!(
                        "  📅 {} – {}",
                        event.start_time.format("%a %b %-d, %H:%M"),
                        event.end_time.format("%H:%M")
                    ),
                    Style::default().fg(theme::ACCENT),
                )),
                Line::from(format!("  {}", event.description)),
                Line::from(Span::styled(
                    format!("  {} attending · by {}", event.attendee_count, event.created_by),
                    theme::muted(),
                )),
                Line::default(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(theme::border(true)).title(" Upcoming Events "))
        .highlight_style(Style::default().bg(theme::SURFACE))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut events.list_state);
}

fn render_resources(resources: &mut ResourcesScreen, frame: &mut Frame, area: Rect) {
    let [chips_area, list_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let selected = resources.selected_category();
    let chips: Vec<Span> = resources
        .categories()
        .into_iter()
        .flat_map(|category| {
            let style = if category == selected {
                theme::highlight()
            } else {
                theme::key_label()
            };
            [Span::styled(format!(" {category} "), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(chips)), chips_area);

    let items: Vec<ListItem> = resources
        .visible()
        .into_iter()
        .map(|resource| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(resource.title.clone(), Style::default().bold()),
                    Span::styled(format!("  [{}]", resource.category), Style::default().fg(theme::ACCENT_ALT)),
                ]),
                Line::from(format!("  {}", resource.description)),
                Line::from(Span::styled(
                    format!(
                        "  by {} · {}",
                        resource.uploaded_by,
                        resource.uploaded_at.format("%b %-d, %Y")
                    ),
                    theme::muted(),
                )),
                Line::default(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border(true))
                .title(format!(" # resources · group {} ", resources.group_id)),
        )
        .highlight_style(Style::default().bg(theme::SURFACE))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, &mut resources.list_state);
}

fn render_upload(form: &UploadResourceScreen, frame: &mut Frame, area: Rect) {
    let card = centered_rect(60, 14, area);
    let [title_area, description_area, category_area, error_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .areas(card);

    render_input(frame, title_area, "Title", &form.title, "Enter resource title", form.focus == 0, false);
    render_input(
        frame,
        description_area,
        "Description",
        &form.description,
        "Describe the resource",
        form.focus == 1,
        false,
    );
    render_input(
        frame,
        category_area,
        "Category",
        &form.category,
        "e.g., Notes, Exercises",
        form.focus == 2,
        false,
    );
    render_error(frame, error_area, form.error.as_deref());
}

fn render_questions(questions: &mut QuestionsScreen, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = questions
        .questions
        .iter()
        .map(|question| {
            let mut title = vec![Span::styled(question.title.clone(), Style::default().bold())];
            if question.solved {
                title.push(Span::styled("  ✓ solved", Style::default().fg(theme::SUCCESS)));
            }
            let preview: String = question.content.chars().take(80).collect();
            ListItem::new(vec![
                Line::from(title),
                Line::from(format!("  {preview}")),
                Line::from(Span::styled(
                    format!(
                        "  asked by {} · {} answers · {}",
                        question.asked_by,
                        question.answer_count,
                        question.created_at.format("%b %-d")
                    ),
                    theme::muted(),
                )),
                Line::default(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border(true))
                .title(format!(" # questions · group {} ", questions.group_id)),
        )
        .highlight_style(Style::default().bg(theme::SURFACE))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut questions.list_state);
}

fn render_question_detail(
    detail: &QuestionDetailScreen,
    editing: bool,
    frame_no: u8,
    frame: &mut Frame,
    area: Rect,
) {
    let [thread_area, input_area] = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);
    let question = &detail.thread.question;

    let mut lines = vec![
        Line::from(Span::styled(question.title.clone(), theme::title())),
        Line::from(Span::styled(
            format!("asked by {} · {}", question.asked_by, question.created_at.format("%b %-d, %H:%M")),
            theme::muted(),
        )),
        Line::default(),
        Line::from(question.content.clone()),
        Line::default(),
    ];

    // Inline tutor
    let helper = &detail.helper.assistant;
    lines.push(Line::from(Span::styled(
        "⚛ AI Assistant",
        Style::default().fg(theme::ASSISTANT).bold(),
    )));
    match helper.state() {
        AssistantState::Idle => lines.push(Line::from(vec![
            Span::styled(" g ", theme::key_hint()),
            Span::raw(" Get AI Help"),
        ])),
        AssistantState::Pending => lines.extend(assistant_lines(helper, frame_no, "AI is thinking...")),
        AssistantState::Answered(_) => {
            lines.extend(assistant_lines(helper, frame_no, ""));
            lines.push(Line::from(vec![
                Span::styled(" r ", theme::key_hint()),
                Span::raw(" Ask Again"),
            ]));
        }
    }
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        format!("Answers ({})", detail.thread.answers.len()),
        Style::default().bold(),
    )));
    for answer in &detail.thread.answers {
        lines.push(Line::from(vec![
            Span::styled(answer.answered_by.clone(), Style::default().fg(theme::ACCENT).bold()),
            Span::styled(format!("  {}", answer.answered_at.format("%b %-d, %H:%M")), theme::muted()),
        ]));
        lines.push(Line::from(answer.content.clone()));
        lines.push(Line::default());
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((detail.scroll, 0))
            .block(Block::default().borders(Borders::ALL).border_style(theme::border(!editing))),
        thread_area,
    );

    render_input(frame, input_area, "Your Answer", &detail.answer, "Write your answer...", editing, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use studygroup_core::{Config, GenerationResult, FALLBACK_MESSAGE};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_markdown_bold() {
        let line = parse_markdown_line("The **answer** is 4");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "answer");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_markdown_bullet() {
        let line = parse_markdown_line("* First, expand");
        assert_eq!(line.spans[0].content, "• ");
        assert_eq!(line.spans[1].content, "First, expand");
    }

    #[test]
    fn test_markdown_plain_and_empty() {
        assert_eq!(parse_markdown_line("2 + 2 = 4").spans.len(), 1);
        assert!(parse_markdown_line("").spans.is_empty());
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(100, 100, area);
        assert!(rect.width <= area.width && rect.height <= area.height);
    }

    #[test]
    fn test_modal_shows_fallback_answer() {
        let config = Config::new();
        let mut app = App::new(&config, std::env::temp_dir().join("studygroup-ui-test.json"));
        app.go_home();
        let group = app.my_groups[0].clone();
        let mut screen = GroupScreen::new(group);
        screen.open_assistant();
        if let Some(panel) = screen.modal.as_mut() {
            panel.assistant.set_input("anything");
            let (ticket, _) = panel.assistant.submit().unwrap();
            panel.assistant.complete(ticket, GenerationResult::Failed(FALLBACK_MESSAGE));
        }
        app.push(Screen::Group(screen));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("AI Response"));
        assert!(text.contains(&FALLBACK_MESSAGE[..30]));
        assert!(text.contains("Ask Another Question"));
    }

    #[test]
    fn test_resources_title_names_group() {
        let config = Config::new();
        let mut app = App::new(&config, std::env::temp_dir().join("studygroup-ui-test.json"));
        app.go_home();
        app.push(Screen::Resources(ResourcesScreen::new("2")));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        assert!(buffer_text(&terminal).contains("# resources · group 2"));
    }
}
