use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::AppConfig;
use crate::event::KeyAction;
use crate::model::credentials::Credentials;
use crate::model::notice::{Notice, NoticeLevel};
use crate::model::workflow::Workflow;
use crate::workflow::{Controller, Phase};

const MAX_NOTICES: usize = 100;
const FLASH_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyAction),
    Tick,
    /// Slow operations are queued so the busy indicator renders first.
    Connect,
    LoadCandidates,
    RunModel,
    WriteBack,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    /// Optional goals, risks and deadlines sent with a business value assessment.
    Context,
    /// The story point value written back by the estimator.
    FinalEstimate,
}

impl InputTarget {
    pub fn title(&self) -> &'static str {
        match self {
            InputTarget::Context => " Context: goals, risks, deadlines (enter to keep, esc to cancel) ",
            InputTarget::FinalEstimate => " Final estimate (enter to keep, esc to cancel) ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Home,
    Connect,
    Items,
    Input(InputTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Host,
    Email,
    ApiToken,
    ProjectKey,
    ModelKey,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Host,
        FormField::Email,
        FormField::ApiToken,
        FormField::ProjectKey,
        FormField::ModelKey,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Host => "Jira URL",
            FormField::Email => "Jira Email",
            FormField::ApiToken => "Jira API Token",
            FormField::ProjectKey => "Jira Project Key",
            FormField::ModelKey => "OpenAI API Key",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, FormField::ApiToken | FormField::ModelKey)
    }
}

/// The connection form shared by all pages.
#[derive(Debug, Clone, Default)]
pub struct ConnectForm {
    values: [String; 5],
    pub focus: usize,
}

impl ConnectForm {
    pub fn from_config(config: &AppConfig) -> Self {
        let jira = &config.jira;
        Self {
            values: [
                jira.host.clone().unwrap_or_default(),
                jira.email.clone().unwrap_or_default(),
                jira.api_token.clone().unwrap_or_default(),
                jira.project_key.clone().unwrap_or_default(),
                config.model.api_key.clone().unwrap_or_default(),
            ],
            focus: 0,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[field as usize]
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn prev(&mut self) {
        self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    pub fn push(&mut self, c: char) {
        self.values[self.focus].push(c);
    }

    pub fn pop(&mut self) {
        self.values[self.focus].pop();
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            host: self.value(FormField::Host).to_string(),
            email: self.value(FormField::Email).to_string(),
            api_token: self.value(FormField::ApiToken).to_string(),
            project_key: self.value(FormField::ProjectKey).to_string(),
            model_api_key: self.value(FormField::ModelKey).to_string(),
        }
    }

    pub fn clear_secrets(&mut self) {
        for field in FormField::ALL {
            if field.is_secret() {
                self.values[field as usize].clear();
            }
        }
    }
}

pub struct App {
    pub view_mode: ViewMode,
    pub home_selected: usize,
    pub controller: Controller,
    pub form: ConnectForm,
    pub notices: Vec<Notice>,
    pub flash_message: Option<(Notice, Instant)>,
    /// Text of the in-flight operation, shown while the loop is blocked on it.
    pub busy: Option<String>,
    pub context_input: String,
    pub estimate_input: String,
    pub input_buffer: String,
    pub should_quit: bool,
    pub action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        controller: Controller,
        start: Option<Workflow>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let home_selected = start
            .and_then(|w| Workflow::ALL.iter().position(|x| *x == w))
            .unwrap_or(0);
        Self {
            view_mode: if start.is_some() {
                ViewMode::Connect
            } else {
                ViewMode::Home
            },
            home_selected,
            controller,
            form: ConnectForm::from_config(config),
            notices: Vec::new(),
            flash_message: None,
            busy: None,
            context_input: String::new(),
            estimate_input: String::new(),
            input_buffer: String::new(),
            should_quit: false,
            action_tx,
        }
    }

    pub fn workflow(&self) -> Workflow {
        self.controller.workflow
    }

    pub async fn update(&mut self, action: Action) {
        // Clear flash message after a few seconds
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => self.handle_key(key),
            Action::Tick => {}
            Action::Connect => {
                let notice = self.controller.connect(self.form.credentials()).await;
                let connected = !notice.is_error() && self.controller.session.is_connected();
                self.busy = None;
                self.push_notice(notice);
                if connected {
                    self.view_mode = ViewMode::Items;
                    self.queue(Action::LoadCandidates, "Loading issues...");
                }
            }
            Action::LoadCandidates => {
                let notices = self.controller.load_candidates().await;
                self.busy = None;
                for notice in notices {
                    self.push_notice(notice);
                }
                self.sync_estimate_input();
            }
            Action::RunModel => {
                let notice = self.controller.run_model(&self.context_input).await;
                self.busy = None;
                self.push_notice(notice);
                self.sync_estimate_input();
            }
            Action::WriteBack => {
                let notice = self.controller.write_back(&self.estimate_input).await;
                let saved = notice.level == NoticeLevel::Success;
                self.busy = None;
                self.push_notice(notice);
                // A rejected value stays in the input so it can be corrected.
                if saved {
                    self.sync_estimate_input();
                }
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn handle_key(&mut self, key: KeyAction) {
        // Keys are ignored while an operation is queued.
        if self.busy.is_some() {
            return;
        }
        match self.view_mode {
            ViewMode::Home => self.handle_home_key(key),
            ViewMode::Connect => self.handle_connect_key(key),
            ViewMode::Items => self.handle_items_key(key),
            ViewMode::Input(target) => self.handle_input_key(target, key),
        }
    }

    fn handle_home_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Up => {
                self.home_selected = self.home_selected.saturating_sub(1);
            }
            KeyAction::Down => {
                if self.home_selected < Workflow::ALL.len() - 1 {
                    self.home_selected += 1;
                }
            }
            KeyAction::Select | KeyAction::Right => {
                self.open_workflow(Workflow::ALL[self.home_selected]);
            }
            KeyAction::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                self.home_selected = index;
                self.open_workflow(Workflow::ALL[index]);
            }
            KeyAction::Char('q') | KeyAction::Escape => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_connect_key(&mut self, key: KeyAction) {
        match key {
            KeyAction::Tab | KeyAction::Down => self.form.next(),
            KeyAction::BackTab | KeyAction::Up => self.form.prev(),
            KeyAction::Char(c) => self.form.push(c),
            KeyAction::Backspace => self.form.pop(),
            KeyAction::Select => self.queue(Action::Connect, "Connecting to Jira..."),
            KeyAction::Escape => self.view_mode = ViewMode::Home,
            _ => {}
        }
    }

    fn handle_items_key(&mut self, key: KeyAction) {
        let workflow = self.workflow();
        match key {
            KeyAction::Up => {
                let selected = self.controller.session.selected;
                self.controller.select(selected.saturating_sub(1));
                self.sync_estimate_input();
            }
            KeyAction::Down => {
                let selected = self.controller.session.selected;
                self.controller.select(selected + 1);
                self.sync_estimate_input();
            }
            KeyAction::Select | KeyAction::Char('e') => {
                if self.controller.begin_model_call() {
                    self.queue(Action::RunModel, workflow.spinner_text());
                } else {
                    self.push_notice(Notice::warning("Select a story first."));
                }
            }
            KeyAction::Char('w') if workflow.supports_write_back() => {
                if self.controller.phase() == Phase::ResultAvailable {
                    self.queue(Action::WriteBack, "Updating Jira...");
                } else {
                    self.push_notice(Notice::warning("Nothing to save for the selected item."));
                }
            }
            KeyAction::Char('r') => self.queue(Action::LoadCandidates, "Loading issues..."),
            KeyAction::Char('u') => {
                if let Some(notice) = self.controller.toggle_only_unassessed() {
                    self.push_notice(notice);
                }
                self.sync_estimate_input();
            }
            KeyAction::Char('c') => match workflow {
                Workflow::Assess => self.begin_input(InputTarget::Context),
                Workflow::Estimate if self.controller.current_result().is_some() => {
                    self.begin_input(InputTarget::FinalEstimate)
                }
                _ => {}
            },
            KeyAction::Char('D') => {
                let notice = self.controller.disconnect();
                self.form.clear_secrets();
                self.context_input.clear();
                self.estimate_input.clear();
                self.push_notice(notice);
                self.view_mode = ViewMode::Connect;
            }
            KeyAction::Escape | KeyAction::Left => self.view_mode = ViewMode::Home,
            KeyAction::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_input_key(&mut self, target: InputTarget, key: KeyAction) {
        match key {
            KeyAction::Char(c) => self.input_buffer.push(c),
            KeyAction::Backspace => {
                self.input_buffer.pop();
            }
            KeyAction::Select => {
                let value = std::mem::take(&mut self.input_buffer);
                match target {
                    InputTarget::Context => self.context_input = value,
                    InputTarget::FinalEstimate => self.estimate_input = value,
                }
                self.view_mode = ViewMode::Items;
            }
            KeyAction::Escape => {
                self.input_buffer.clear();
                self.view_mode = ViewMode::Items;
            }
            _ => {}
        }
    }

    fn open_workflow(&mut self, workflow: Workflow) {
        self.controller.switch_workflow(workflow);
        self.context_input.clear();
        self.estimate_input.clear();
        if self.controller.session.is_connected() {
            self.view_mode = ViewMode::Items;
            self.queue(Action::LoadCandidates, "Loading issues...");
        } else {
            self.view_mode = ViewMode::Connect;
        }
    }

    fn begin_input(&mut self, target: InputTarget) {
        self.input_buffer = match target {
            InputTarget::Context => self.context_input.clone(),
            InputTarget::FinalEstimate => self.estimate_input.clone(),
        };
        self.view_mode = ViewMode::Input(target);
    }

    /// Queue a slow action; the frame drawn before it runs shows `label`.
    fn queue(&mut self, action: Action, label: &str) {
        debug!(?action, "Queued");
        self.busy = Some(label.to_string());
        if self.action_tx.send(action).is_err() {
            self.busy = None;
        }
    }

    fn sync_estimate_input(&mut self) {
        if self.workflow() == Workflow::Estimate {
            self.estimate_input = self.controller.default_final_estimate();
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        self.flash_message = Some((notice.clone(), Instant::now()));
        self.notices.push(notice);
        if self.notices.len() > MAX_NOTICES {
            let overflow = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..overflow);
        }
    }
}
