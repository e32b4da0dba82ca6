use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use rala_bank::formatting::{format_currency, mask_secret, truncate};
use rala_bank::{
    biometric, AlertQueue, BankClient, DashboardScreen, Field, LoadState, NoBiometrics, Notifier,
    ProfileScreen, RegisterOutcome, RegisterScreen, Route, Session, SqliteFlagStore,
};
use std::io;
use tokio::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Register,
    Dashboard,
    Profile,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Register => Page::Dashboard,
            Page::Dashboard => Page::Profile,
            Page::Profile => Page::Register,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Register => Page::Profile,
            Page::Dashboard => Page::Register,
            Page::Profile => Page::Dashboard,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Register => "Sign Up",
            Page::Dashboard => "Home",
            Page::Profile => "Profile",
        }
    }
}

impl From<Route> for Page {
    // There is no login page in the terminal client; sign-up is the entry point.
    fn from(route: Route) -> Self {
        match route {
            Route::Login | Route::Register => Page::Register,
            Route::Dashboard => Page::Dashboard,
            Route::Profile => Page::Profile,
        }
    }
}

pub struct App {
    pub current_page: Page,
    pub register: RegisterScreen,
    pub dashboard: DashboardScreen,
    pub profile: ProfileScreen,
    pub session: Session,
    pub alerts: AlertQueue,
    client: BankClient,
    store: SqliteFlagStore,
    runtime: Runtime,
    table_state: TableState,
    dashboard_mounted: bool,
}

impl App {
    pub fn new(client: BankClient, store: SqliteFlagStore, session: Session) -> Result<Self> {
        let runtime = Runtime::new().context("failed to start async runtime")?;
        let profile = ProfileScreen::mount(&store).context("failed to read settings")?;
        let current_page = if session.is_authenticated() {
            Page::Dashboard
        } else {
            Page::Register
        };

        Ok(Self {
            current_page,
            register: RegisterScreen::new(),
            dashboard: DashboardScreen::new(),
            profile,
            session,
            alerts: AlertQueue::new(),
            client,
            store,
            runtime,
            table_state: TableState::default(),
            dashboard_mounted: false,
        })
    }

    pub fn go_to(&mut self, page: Page) {
        self.current_page = page;
        if page == Page::Dashboard && !self.dashboard_mounted {
            self.mount_dashboard();
        }
    }

    /// Leaving the session unmounts the dashboard with everything it fetched
    fn signed_out(&mut self, route: Route) {
        self.dashboard.reset();
        self.dashboard_mounted = false;
        self.table_state = TableState::default();
        self.go_to(route.into());
    }

    fn mount_dashboard(&mut self) {
        self.dashboard_mounted = true;

        let gate = self.runtime.block_on(biometric::unlock_on_mount(
            &mut self.store,
            &NoBiometrics,
            &mut self.alerts,
        ));
        if let Err(err) = gate {
            tracing::warn!(error = %err, "biometric gate failed");
        }

        self.runtime
            .block_on(self.dashboard.load(&self.client, &self.session, &mut self.alerts));
    }

    fn refresh_dashboard(&mut self) {
        self.runtime
            .block_on(self.dashboard.refresh(&self.client, &self.session, &mut self.alerts));
    }

    fn submit_registration(&mut self) {
        let outcome = self
            .runtime
            .block_on(self.register.submit(&self.client, &mut self.alerts));
        if let RegisterOutcome::Created { next, .. } = outcome {
            self.go_to(next.into());
        }
    }

    /// Returns false when the app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        // A pending alert blocks everything until dismissed
        if !self.alerts.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alerts.dismiss();
            }
            return true;
        }

        match key.code {
            KeyCode::Tab => {
                self.go_to(self.current_page.next());
                return true;
            }
            KeyCode::BackTab => {
                self.go_to(self.current_page.previous());
                return true;
            }
            _ => {}
        }

        match self.current_page {
            Page::Register => self.handle_register_key(key),
            Page::Dashboard => self.handle_dashboard_key(key),
            Page::Profile => self.handle_profile_key(key),
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Enter => self.submit_registration(),
            KeyCode::Down => self.register.focus_next(),
            KeyCode::Up => self.register.focus_previous(),
            KeyCode::Backspace => self.register.backspace(),
            KeyCode::Char(c) => self.register.type_char(c),
            _ => {}
        }
        true
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('r') => self.refresh_dashboard(),
            KeyCode::Char('p') => self.go_to(Page::Profile),
            KeyCode::Enter => {
                self.dashboard.show_selected(&mut self.alerts);
            }
            KeyCode::Down | KeyCode::Char('j') => self.dashboard.next(),
            KeyCode::Up | KeyCode::Char('k') => self.dashboard.previous(),
            KeyCode::PageDown => self.dashboard.page_down(),
            KeyCode::PageUp => self.dashboard.page_up(),
            KeyCode::Home => self.dashboard.first(),
            KeyCode::End => self.dashboard.last(),
            _ => {}
        }
        true
    }

    fn handle_profile_key(&mut self, key: KeyEvent) -> bool {
        if self.profile.delete_prompt().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    if let Some(route) = self.profile.confirm_delete(&mut self.session) {
                        self.signed_out(route);
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => self.profile.cancel_delete(),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('h') => self.go_to(Page::Dashboard),
            KeyCode::Char('t') => self.profile.toggle_theme(),
            KeyCode::Char('n') => self.profile.toggle_notifications(),
            KeyCode::Char('b') => {
                if let Err(err) = self.profile.toggle_biometrics(&mut self.store) {
                    tracing::warn!(error = %err, "could not save biometric setting");
                    self.alerts.alert("Erro", "Não foi possível salvar a preferência");
                }
            }
            KeyCode::Char('l') => {
                let route = self.profile.logout(&mut self.session);
                self.signed_out(route);
            }
            KeyCode::Char('d') => self.profile.request_delete(),
            _ => {}
        }
        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Dashboard data is fetched when the page is first shown
    if app.current_page == Page::Dashboard {
        app.mount_dashboard();
    }

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Register => render_register(f, chunks[1], app),
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        Page::Profile => render_profile(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if let Some((title, message)) = app.profile.delete_prompt() {
        if app.current_page == Page::Profile {
            render_popup(f, title, &format!("{message}\n\ny confirm · n cancel"), Color::Red);
        }
    }

    if let Some(alert) = app.alerts.current() {
        render_popup(f, &alert.title, &format!("{}\n\nEnter OK", alert.message), Color::Yellow);
    }
}

fn accent(app: &App) -> Color {
    if app.profile.dark_theme {
        Color::LightBlue
    } else {
        Color::Magenta
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Register, Page::Dashboard, Page::Profile];

    let mut tab_spans = vec![Span::styled(
        " Rala ",
        Style::default().fg(accent(app)).add_modifier(Modifier::BOLD),
    )];
    for page in pages.iter() {
        tab_spans.push(Span::raw(" │ "));
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    if app.session.is_authenticated() {
        tab_spans.push(Span::styled(
            format!("@{}", app.session.display_name()),
            Style::default().fg(Color::White),
        ));
    } else {
        tab_spans.push(Span::styled("signed out", Style::default().fg(Color::DarkGray)));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn render_register(f: &mut Frame, area: Rect, app: &App) {
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome to Rala",
            Style::default().fg(accent(app)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  Create a commitment-free profile to explore financial products",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for field in Field::ALL {
        let focused = field == app.register.focus();
        let raw = app.register.form().get(field);
        let value = if field.is_secret() {
            mask_secret(raw)
        } else {
            raw.to_string()
        };

        let value_span = if value.is_empty() {
            Span::styled(field.placeholder().to_string(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(value, Style::default().fg(Color::White))
        };

        content.push(Line::from(vec![
            Span::raw(if focused { "→ " } else { "  " }),
            Span::styled(format!("{:<18}", field.label()), label_style),
            value_span,
            Span::raw(if focused { "▏" } else { "" }),
        ]));
        content.push(Line::from(""));
    }

    content.push(Line::from(Span::styled(
        if app.register.is_submitting() {
            "  Creating account..."
        } else {
            "  Press Enter to Sign Up"
        },
        Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Sign Up "),
    );

    f.render_widget(paragraph, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    // Balance card
    let (greeting, name) = app.dashboard.greeting(&app.session);
    let balance_text = match app.dashboard.balance() {
        LoadState::Loading => Span::styled("Loading...", Style::default().fg(Color::DarkGray)),
        LoadState::Loaded(value) => Span::styled(
            format_currency(*value),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    };
    let card = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("  {greeting} "), Style::default().fg(Color::DarkGray)),
            Span::styled(name, Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total Balance  ", Style::default().fg(Color::Cyan)),
            balance_text,
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent(app))),
    );
    f.render_widget(card, chunks[0]);

    // Transactions
    let title = if app.dashboard.is_refreshing() {
        " Transactions (refreshing) "
    } else {
        " Transactions "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title);

    let transactions = match app.dashboard.transactions() {
        LoadState::Loading => {
            f.render_widget(Paragraph::new("  Loading...").block(block), chunks[1]);
            return;
        }
        LoadState::Loaded(list) if list.is_empty() => {
            f.render_widget(
                Paragraph::new("  Nenhuma transação encontrada").block(block),
                chunks[1],
            );
            return;
        }
        LoadState::Loaded(list) => list,
    };

    let header_cells = ["", "Date", "Description", "Counterparty", "Amount"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = transactions.iter().map(|tx| {
        let color = if tx.is_incoming() { Color::Green } else { Color::Red };
        Row::new(vec![
            Cell::from(tx.direction().arrow()).style(Style::default().fg(color)),
            Cell::from(tx.display_date()),
            Cell::from(truncate(&tx.description, 30)),
            Cell::from(truncate(&tx.counterparty_label(), 22)),
            Cell::from(tx.signed_amount()).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Length(32),
            Constraint::Length(24),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    app.table_state.select(app.dashboard.selected());
    f.render_stateful_widget(table, chunks[1], &mut app.table_state);
}

fn switch_span(on: bool) -> Span<'static> {
    if on {
        Span::styled("[on] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[off]", Style::default().fg(Color::DarkGray))
    }
}

fn render_profile(f: &mut Frame, area: Rect, app: &App) {
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Yellow);
    let user = app.session.user.as_ref();

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  ( {} )  ", app.profile.avatar_initial(&app.session)),
                Style::default().fg(accent(app)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                user.map(|u| u.name.clone()).unwrap_or_else(|| "Usuário".to_string()),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Apelido: ", label_style),
            Span::raw(user.map(|u| format!("@{}", u.nickname)).unwrap_or_default()),
        ]),
        Line::from(vec![
            Span::styled("  Email: ", label_style),
            Span::raw(user.and_then(|u| u.email.clone()).unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("  Cliente desde: ", label_style),
            Span::raw(user.and_then(|u| u.customer_since()).unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(Span::styled(
            "  SETTINGS",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            switch_span(app.profile.dark_theme),
            Span::raw(" Dark Theme      ("),
            Span::styled("t", key_style),
            Span::raw(")"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            switch_span(app.profile.notifications),
            Span::raw(" Notifications   ("),
            Span::styled("n", key_style),
            Span::raw(")"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            switch_span(app.profile.biometrics()),
            Span::raw(" Biometric Login ("),
            Span::styled("b", key_style),
            Span::raw(")"),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("l", key_style),
            Span::raw(" Sair da Conta    "),
            Span::styled("d", Style::default().fg(Color::Red)),
            Span::raw(" Excluir Conta"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.profile.version_label()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let border = if app.profile.dark_theme { Color::LightBlue } else { Color::White };
    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Profile "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);
    let mut status_spans = vec![];

    match app.current_page {
        Page::Register => {
            status_spans.push(Span::styled("↑/↓", key));
            status_spans.push(Span::raw(" Field | "));
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" Sign Up | "));
        }
        Page::Dashboard => {
            let selected = app.dashboard.selected().map(|i| i + 1).unwrap_or(0);
            let total = app.dashboard.transactions().loaded().map(Vec::len).unwrap_or(0);
            status_spans.push(Span::styled(
                format!(" Row: {}/{} ", selected, total),
                Style::default().fg(Color::Cyan),
            ));
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" Details | "));
            status_spans.push(Span::styled("r", key));
            status_spans.push(Span::raw(" Refresh | "));
            status_spans.push(Span::styled("PgUp/PgDn", key));
            status_spans.push(Span::raw(" Fast | "));
        }
        Page::Profile => {
            status_spans.push(Span::styled("h", key));
            status_spans.push(Span::raw(" Home | "));
        }
    }

    status_spans.push(Span::styled("Tab", key));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled(
        if app.current_page == Page::Register { "Esc" } else { "q" },
        Style::default().fg(Color::Red),
    ));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_popup(f: &mut Frame, title: &str, message: &str, color: Color) {
    let area = centered_rect(60, 30, f.size());
    let popup = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {title} ")),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
