//! Application core: the event loop and action dispatch.

mod loaders;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use logwatch_api::ApiClient;

use crate::action::{Action, Loaded, Notification, Resource};
use crate::component::Component;
use crate::event::{Event, EventRates, EventReader};
use crate::modal::Modal;
use crate::refresh::spawn_refresh_timer;
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::state::{FilterState, RequestTracker};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered_rect;
use crate::widgets::pagination::Pagination;

/// How long a toast stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Toast expiry and throbber speed.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Dashboard behavior resolved from the config file and CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub page_size: u32,
    pub recent_errors: u32,
    pub refresh_interval: Duration,
    pub tick_rate: Duration,
    pub render_rate: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&logwatch_config::Config::default())
    }
}

impl From<&logwatch_config::Config> for Settings {
    fn from(cfg: &logwatch_config::Config) -> Self {
        Self {
            page_size: cfg.dashboard.page_size,
            recent_errors: cfg.dashboard.recent_errors,
            refresh_interval: cfg.refresh_interval(),
            tick_rate: TICK_RATE,
            render_rate: cfg.render_interval(),
        }
    }
}

impl Settings {
    fn event_rates(&self) -> EventRates {
        EventRates {
            tick: self.tick_rate,
            render: self.render_rate,
        }
    }
}

/// Top-level application state and event loop.
pub struct App {
    /// Current active screen.
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender. Components and fetch tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver, drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Backend API handle, cloned into every fetch task.
    client: ApiClient,
    settings: Settings,
    /// Filters every error-list fetch reads.
    filters: FilterState,
    /// Position of the last applied error-list page.
    pagination: Pagination,
    /// Per-resource generations; stale responses are dropped.
    requests: RequestTracker,
    /// Number of fetch tasks still running, for the status-bar spinner.
    in_flight: Arc<AtomicUsize>,
    /// Detail or logs overlay (blocks other input while open).
    modal: Option<Modal>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    /// Stops the background refresh timer.
    refresh_cancel: CancellationToken,
    throbber_state: ThrobberState,
}

impl App {
    /// Create a new App with all screens, talking to `client`.
    pub fn new(client: ApiClient, settings: Settings) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::default()) {
            screen.set_focused(true);
        }

        Self {
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            client,
            settings,
            filters: FilterState::default(),
            pagination: Pagination::default(),
            requests: RequestTracker::default(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            modal: None,
            notification: None,
            refresh_cancel: CancellationToken::new(),
            throbber_state: ThrobberState::default(),
        }
    }

    /// Kick off the startup load and the periodic refresh.
    fn start(&mut self) {
        spawn_refresh_timer(
            self.settings.refresh_interval,
            self.action_tx.clone(),
            self.refresh_cancel.clone(),
        );
        self.load_errors(1);
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter(self.client.base_url().as_str().trim_end_matches('/'))?;
        self.start();

        let mut events = EventReader::new(self.settings.event_rates());

        info!(backend = %self.client.base_url(), "TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                // Redraw right away; the terminal resizes itself on draw.
                Event::Resize | Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.refresh_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays and text inputs see keys
    /// first; global keys come next; the rest go to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // The modal captures all input
        if let Some(modal) = self.modal.as_mut() {
            return modal.handle_key_event(key);
        }

        // Search box, page links, or the config editor
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.captures_input() {
                return screen.handle_key_event(key);
            }
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
                self.refresh_cancel.cancel();
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }

                    match target {
                        ScreenId::Dashboard => self.load_dashboard(),
                        ScreenId::Errors => self.load_errors(1),
                        ScreenId::Containers => self.load_containers(),
                        ScreenId::Config => self.load_config(),
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Render => {}

            Action::Tick => {
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                if self.in_flight.load(Ordering::Relaxed) > 0 {
                    self.throbber_state.calc_next();
                }
            }

            // ── Loaders ───────────────────────────────────────────────
            Action::LoadErrors(page) => self.load_errors(*page),
            // A list fetch the user started (page or filter change) wins
            // over the timer.
            Action::RefreshErrors => {
                if self.requests.is_pending(Resource::ErrorList) {
                    debug!("error list fetch in flight, skipping refresh");
                } else {
                    self.load_errors(self.pagination.current_page);
                }
            }
            Action::LoadDashboard => self.load_dashboard(),
            Action::LoadContainers => self.load_containers(),
            Action::LoadConfig => self.load_config(),
            Action::ShowErrorDetail(id) => self.show_error_detail(*id),
            Action::ShowContainerLogs { id, name } => {
                self.show_container_logs(id.clone(), name.clone());
            }

            // ── Fetch results ─────────────────────────────────────────
            Action::Loaded(req, loaded) => {
                if !self.requests.is_current(*req) {
                    debug!(?req, "dropping stale response");
                    return Ok(());
                }
                self.requests.finish(*req);
                self.apply_loaded(action, loaded)?;
            }

            Action::RequestFailed(req) => {
                if !self.requests.is_current(*req) {
                    debug!(?req, "dropping stale failure");
                    return Ok(());
                }
                self.requests.finish(*req);
                if let Some(message) = req.resource.failure_message() {
                    self.action_tx
                        .send(Action::Notify(Notification::error(message)))?;
                }
            }

            Action::SetFilters(filters) => {
                self.filters.clone_from(filters);
            }

            // ── Mutations ─────────────────────────────────────────────
            Action::UpdateErrorStatus { id, status } => {
                self.update_error_status(*id, status.clone());
            }

            Action::ErrorStatusUpdated { id, status } => {
                self.action_tx.send(Action::Notify(Notification::success(format!(
                    "Error #{id} marked {}",
                    status.label()
                ))))?;
                self.load_errors(self.pagination.current_page);
            }

            Action::SaveConfig(text) => match serde_json::from_str(text) {
                Ok(config) => self.save_config(config),
                Err(e) => {
                    warn!(error = %e, "config text is not valid JSON");
                    self.action_tx.send(Action::Notify(Notification::error(format!(
                        "Invalid JSON: {e}"
                    ))))?;
                }
            },

            Action::CloseModal => {
                self.modal = None;
            }

            // Notifications
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }
        }
        Ok(())
    }

    /// Apply a current fetch result.
    fn apply_loaded(&mut self, action: &Action, loaded: &Loaded) -> Result<()> {
        match loaded {
            Loaded::Errors { page, data } => {
                self.pagination = Pagination {
                    current_page: *page,
                    total_pages: data.pages,
                    total: data.total,
                };
                if *page == 1 {
                    self.load_filter_options();
                }
                self.broadcast(action)?;
            }
            Loaded::Stats(_) => {
                self.broadcast(action)?;
                self.load_recent_errors();
            }
            Loaded::ErrorDetail(record) => {
                self.modal = Some(Modal::error_detail(record.as_ref().clone()));
            }
            Loaded::ContainerLogs { name, logs } => {
                self.modal = Some(Modal::container_logs(name.clone(), logs.clone()));
            }
            Loaded::FilterOptions(_)
            | Loaded::RecentErrors(_)
            | Loaded::MonitorStatus(_)
            | Loaded::Containers(_)
            | Loaded::Config(_) => self.broadcast(action)?,
        }
        Ok(())
    }

    /// Data updates go to ALL screens so hidden ones stay in sync.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays (order matters: last = topmost)
        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if let Some(ref modal) = self.modal {
            modal.render(frame, layout[0]);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    /// Render the bottom tab bar showing all screens.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let focused = self.screens.get(&id).is_some_and(|s| s.focused());
                let style = if focused {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar with backend, load state, and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let layout =
            Layout::horizontal([Constraint::Length(14), Constraint::Min(1)]).split(area);

        if self.in_flight.load(Ordering::Relaxed) > 0 {
            let throbber = Throbber::default()
                .label("Loading")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, layout[0], &mut self.throbber_state.clone());
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    " ● ready",
                    Style::default().fg(theme::SUCCESS_GREEN),
                )),
                layout[0],
            );
        }

        let line = Line::from(vec![
            Span::styled(
                self.client.base_url().as_str().trim_end_matches('/').to_owned(),
                Style::default().fg(theme::BORDER_GRAY),
            ),
            Span::styled("  │  ", theme::key_hint()),
            Span::styled("1-4 ", theme::key_hint_key()),
            Span::styled("screens  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("help  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), layout[1]);
    }
}

/// Render the help overlay centered on screen.
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered_rect(area, 60, 24);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(theme::NEON_CYAN)))
    };
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(desc, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        heading("  Navigation"),
        entry("1-4", "Jump to screen"),
        entry("Tab", "Next screen"),
        entry("j/k ↑/↓", "Move up/down"),
        entry("Enter", "Open detail / logs"),
        entry("Esc", "Back / close"),
        Line::from(""),
        heading("  Errors"),
        entry("/", "Search"),
        entry("s v c", "Cycle status / severity / container"),
        entry("a  x", "Apply / clear filters"),
        entry("[ ]  p", "Prev / next page, page links"),
        Line::from(""),
        heading("  Detail & Config"),
        entry("←/→", "Change error status"),
        entry("e", "Edit config"),
        entry("Ctrl+S", "Save config"),
        entry("Ctrl+R", "Reload config"),
        Line::from(""),
        entry("?", "This help"),
        entry("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Render a notification toast in the bottom-right corner.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2); // above status bar
    let toast_area = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

    let (accent, icon) = theme::notification(notif.level);

    frame.render_widget(Clear, toast_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent)
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), accent),
        Span::styled(&notif.message, Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use logwatch_api::{ErrorStatus, TransportConfig};

    use crate::action::NotificationLevel;
    use crate::test_util::{buffer_text, record_json};

    fn app_for(server: &MockServer) -> App {
        let client = ApiClient::new(&server.uri(), &TransportConfig::default()).unwrap();
        App::new(client, Settings::default())
    }

    /// Process queued actions until nothing arrives for a while; returns
    /// everything processed.
    async fn settle(app: &mut App) -> Vec<Action> {
        let mut seen = Vec::new();
        while let Ok(Some(action)) =
            tokio::time::timeout(Duration::from_millis(750), app.action_rx.recv()).await
        {
            app.process_action(&action).unwrap();
            seen.push(action);
        }
        seen
    }

    fn notifications(seen: &[Action], level: NotificationLevel) -> Vec<String> {
        seen.iter()
            .filter_map(|a| match a {
                Action::Notify(n) if n.level == level => Some(n.message.clone()),
                _ => None,
            })
            .collect()
    }

    fn page_json(records: &[serde_json::Value], pages: u32) -> serde_json::Value {
        json!({
            "errors": records,
            "pages": pages,
            "total": records.len(),
        })
    }

    async fn open_detail(app: &mut App, server: &MockServer, id: i64, status: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/errors/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json(id, status)))
            .mount(server)
            .await;
        app.process_action(&Action::ShowErrorDetail(id)).unwrap();
        settle(app).await;
        assert!(app.modal.is_some(), "detail modal should be open");
    }

    #[tokio::test]
    async fn switching_screens_focuses_exactly_one() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);

        for target in [ScreenId::Dashboard, ScreenId::Containers, ScreenId::Config] {
            app.process_action(&Action::SwitchScreen(target)).unwrap();
            let focused: Vec<ScreenId> = app
                .screens
                .iter()
                .filter(|(_, s)| s.focused())
                .map(|(id, _)| *id)
                .collect();
            assert_eq!(focused, vec![target]);
        }

        app.process_action(&Action::GoBack).unwrap();
        settle(&mut app).await;
        assert_eq!(app.active_screen, ScreenId::Containers);
    }

    #[tokio::test]
    async fn status_update_success_notifies_and_refetches() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        open_detail(&mut app, &server, 7, "new").await;

        Mock::given(method("PUT"))
            .and(path("/api/errors/7/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(&[record_json(7, "resolved")], 1)),
            )
            .expect(1..)
            .mount(&server)
            .await;

        app.process_action(&Action::UpdateErrorStatus {
            id: 7,
            status: ErrorStatus::Resolved,
        })
        .unwrap();
        let seen = settle(&mut app).await;

        assert_eq!(
            notifications(&seen, NotificationLevel::Success),
            vec!["Error #7 marked Resolved".to_owned()]
        );
        assert!(notifications(&seen, NotificationLevel::Error).is_empty());
        // The modal stays open; the list underneath was re-fetched.
        assert!(app.modal.is_some());
        app.modal = None;
        let text = buffer_text(140, 30, |f| app.render(f));
        let row = text
            .lines()
            .find(|l| l.contains("upstream connect error #7"))
            .unwrap_or_else(|| panic!("row #7 missing:\n{text}"));
        assert!(row.contains("Resolved"), "{row}");
    }

    #[tokio::test]
    async fn status_update_on_deleted_error_says_so() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        open_detail(&mut app, &server, 7, "new").await;

        Mock::given(method("PUT"))
            .and(path("/api/errors/7/status"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&server)
            .await;

        app.process_action(&Action::UpdateErrorStatus {
            id: 7,
            status: ErrorStatus::Resolved,
        })
        .unwrap();
        let seen = settle(&mut app).await;

        assert_eq!(
            notifications(&seen, NotificationLevel::Error),
            vec!["Error #7 no longer exists".to_owned()]
        );
    }

    #[tokio::test]
    async fn status_update_failure_keeps_selector_value() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        open_detail(&mut app, &server, 7, "new").await;

        Mock::given(method("PUT"))
            .and(path("/api/errors/7/status"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE))
            .unwrap()
            .unwrap();
        app.process_action(&action).unwrap();
        let seen = settle(&mut app).await;

        assert_eq!(notifications(&seen, NotificationLevel::Error).len(), 1);
        assert!(notifications(&seen, NotificationLevel::Success).is_empty());
        let modal = app.modal.as_ref().unwrap();
        assert_eq!(modal.selected_status(), Some(ErrorStatus::Investigating));
    }

    #[tokio::test]
    async fn invalid_config_text_is_rejected_before_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::SaveConfig("{\"interval\": ".into()))
            .unwrap();
        let seen = settle(&mut app).await;

        let errors = notifications(&seen, NotificationLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid JSON"), "{errors:?}");
    }

    #[tokio::test]
    async fn valid_config_text_is_saved() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::SaveConfig("{\"interval\": 60}".into()))
            .unwrap();
        let seen = settle(&mut app).await;

        assert_eq!(notifications(&seen, NotificationLevel::Success).len(), 1);
    }

    #[tokio::test]
    async fn only_the_latest_list_response_is_applied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(&[record_json(2, "new")], 5))
                    .set_delay(Duration::from_millis(250)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_json(&[record_json(3, "new")], 5)),
            )
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::LoadErrors(2)).unwrap();
        app.process_action(&Action::LoadErrors(3)).unwrap();
        settle(&mut app).await;

        assert_eq!(app.pagination.current_page, 3);
        let text = buffer_text(140, 30, |f| app.render(f));
        assert!(text.contains("upstream connect error #3"), "{text}");
        assert!(!text.contains("upstream connect error #2"), "{text}");
    }

    #[tokio::test]
    async fn failed_list_fetch_keeps_previous_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_json(&[record_json(1, "new")], 2)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::LoadErrors(1)).unwrap();
        settle(&mut app).await;
        app.process_action(&Action::LoadErrors(2)).unwrap();
        let seen = settle(&mut app).await;

        assert_eq!(
            notifications(&seen, NotificationLevel::Error),
            vec!["Failed to load error list".to_owned()]
        );
        assert_eq!(app.pagination.current_page, 1);
        let text = buffer_text(140, 30, |f| app.render(f));
        assert!(text.contains("upstream connect error #1"), "{text}");
    }

    #[tokio::test]
    async fn notifications_expire_on_tick() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);

        app.process_action(&Action::Notify(Notification::success("saved")))
            .unwrap();
        app.process_action(&Action::Tick).unwrap();
        assert!(app.notification.is_some());

        app.notification = app
            .notification
            .take()
            .map(|(n, at)| (n, at - Duration::from_secs(4)));
        app.process_action(&Action::Tick).unwrap();
        assert!(app.notification.is_none());
    }

    #[tokio::test]
    async fn modal_captures_global_keys() {
        let server = MockServer::start().await;
        let mut app = app_for(&server);
        open_detail(&mut app, &server, 3, "new").await;

        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE))
            .unwrap();
        assert!(action.is_none());

        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(action, Some(Action::CloseModal)));
    }

    #[tokio::test]
    async fn unknown_status_is_rendered_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(&[record_json(5, "wontfix")], 1)),
            )
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::LoadErrors(1)).unwrap();
        settle(&mut app).await;

        let text = buffer_text(140, 30, |f| app.render(f));
        let row = text
            .lines()
            .find(|l| l.contains("upstream connect error #5"))
            .unwrap_or_else(|| panic!("row #5 missing:\n{text}"));
        assert!(row.contains("wontfix"), "{row}");
    }

    #[tokio::test]
    async fn refresh_on_hidden_screen_keeps_page_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "20"))
            .and(query_param("status", "resolved"))
            .and(query_param("container", "api"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(&[record_json(11, "resolved")], 3)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::SwitchScreen(ScreenId::Dashboard))
            .unwrap();
        app.pagination.current_page = 2;
        app.process_action(&Action::SetFilters(FilterState {
            status: Some(ErrorStatus::Resolved),
            container: Some("api".into()),
            ..FilterState::default()
        }))
        .unwrap();
        app.process_action(&Action::RefreshErrors).unwrap();
        settle(&mut app).await;

        assert_eq!(app.active_screen, ScreenId::Dashboard);
        assert_eq!(app.pagination.current_page, 2);
        let errors = &app.screens[&ScreenId::Errors];
        let text = buffer_text(140, 30, |f| errors.render(f, f.area()));
        assert!(text.contains("upstream connect error #11"), "{text}");
    }

    #[tokio::test]
    async fn filter_options_reload_only_with_first_page() {
        for (page, stats_calls) in [(1_u32, 1_u64), (2, 0)] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/errors"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(page_json(&[record_json(i64::from(page), "new")], 3)),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/api/stats"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "containers": [{"name": "api", "count": 3}]
                })))
                .expect(stats_calls)
                .mount(&server)
                .await;
            let mut app = app_for(&server);

            app.process_action(&Action::LoadErrors(page)).unwrap();
            settle(&mut app).await;

            assert_eq!(app.pagination.current_page, page);
            server.verify().await;
        }
    }

    #[tokio::test]
    async fn refresh_waits_for_a_pending_page_change() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(&[record_json(2, "new")], 5))
                    .set_delay(Duration::from_millis(250)),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/errors"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&[], 5)))
            .expect(0)
            .mount(&server)
            .await;
        let mut app = app_for(&server);

        app.process_action(&Action::LoadErrors(2)).unwrap();
        app.process_action(&Action::RefreshErrors).unwrap();
        settle(&mut app).await;
        assert_eq!(app.pagination.current_page, 2);

        // Nothing pending any more, so the timer refreshes page 2.
        app.process_action(&Action::RefreshErrors).unwrap();
        settle(&mut app).await;
        assert_eq!(app.pagination.current_page, 2);
    }
}
