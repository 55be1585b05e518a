use chrono::Utc;
use chrono_tz::Tz;
use reservas::components::reservation_calendar::MonthView;
use reservas::components::{CalendarControls, ComponentManager};
use reservas::error::AppResult;
use reservas::toast::{Toast, ToastKind, ToastQueue};
use reservas::utils::time::today_in;
use rust_i18n::t;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

// Export submodules
pub mod calendar;
pub mod notifications;
pub mod util;

/// Shared context for all console commands
pub struct CommandContext {
    pub component_manager: Arc<ComponentManager>,
    pub controls: CalendarControls,
    pub timezone: Tz,
    month: Mutex<MonthView>,
    toasts: Mutex<ToastQueue>,
}

impl CommandContext {
    /// Create a context showing the current month
    pub fn new(component_manager: Arc<ComponentManager>, controls: CalendarControls, timezone: Tz) -> Self {
        Self {
            component_manager,
            controls,
            timezone,
            month: Mutex::new(MonthView::containing(today_in(&timezone))),
            toasts: Mutex::new(ToastQueue::default()),
        }
    }

    /// Move to another month and announce its grid
    pub async fn show_month(&self, month: MonthView) {
        *self.month.lock().await = month;
        self.controls.navigate(month.grid());
    }

    pub async fn current_month(&self) -> MonthView {
        *self.month.lock().await
    }

    /// Print a transient message, dropping the ones that timed out
    pub async fn toast(&self, message: impl Into<String>, kind: ToastKind) {
        if let Some(toast) = self.push_toast(message, kind).await {
            println!("[{}] {}", toast.css_class(), toast.message);
        }
    }

    async fn push_toast(&self, message: impl Into<String>, kind: ToastKind) -> Option<Toast> {
        let mut toasts = self.toasts.lock().await;
        toasts.expire(Utc::now());
        let id = toasts.show(message, kind);
        let shown = toasts.active().find(|t| t.id == id).cloned();
        shown
    }
}

/// Whether the console loop keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Type alias for command result
pub type CommandResult = AppResult<Flow>;

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Next,
    Previous,
    Today,
    /// `None` clears the space filter
    Space(Option<String>),
    Show(String),
    Notifications,
    Read(String),
    ReadAll,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
}

impl ParseError {
    pub fn message(&self) -> Option<String> {
        match self {
            ParseError::Empty => None,
            ParseError::Unknown(command) => {
                Some(t!("console_unknown_command", command = command).to_string())
            }
            ParseError::MissingArgument(command) => {
                Some(t!("console_missing_argument", command = command).to_string())
            }
        }
    }
}

impl FromStr for ConsoleCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ParseError::Empty)?.to_lowercase();
        let argument = words.next().map(str::to_string);

        match command.as_str() {
            "next" => Ok(ConsoleCommand::Next),
            "prev" => Ok(ConsoleCommand::Previous),
            "today" => Ok(ConsoleCommand::Today),
            "space" => Ok(ConsoleCommand::Space(argument)),
            "show" => Ok(ConsoleCommand::Show(required(argument, "show")?)),
            "notifications" => Ok(ConsoleCommand::Notifications),
            "read" => Ok(ConsoleCommand::Read(required(argument, "read")?)),
            "readall" => Ok(ConsoleCommand::ReadAll),
            "help" => Ok(ConsoleCommand::Help),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            _ => Err(ParseError::Unknown(command)),
        }
    }
}

fn required(argument: Option<String>, command: &'static str) -> Result<String, ParseError> {
    argument.ok_or(ParseError::MissingArgument(command))
}

/// Run one console command
pub async fn dispatch(command: ConsoleCommand, ctx: &CommandContext) -> CommandResult {
    match command {
        ConsoleCommand::Next => calendar::next(ctx).await,
        ConsoleCommand::Previous => calendar::previous(ctx).await,
        ConsoleCommand::Today => calendar::today(ctx).await,
        ConsoleCommand::Space(space_id) => calendar::space(ctx, space_id).await,
        ConsoleCommand::Show(id) => calendar::show(ctx, &id).await,
        ConsoleCommand::Notifications => notifications::list(ctx).await,
        ConsoleCommand::Read(id) => notifications::read(ctx, id).await,
        ConsoleCommand::ReadAll => notifications::read_all(ctx).await,
        ConsoleCommand::Help => util::help(),
        ConsoleCommand::Quit => Ok(Flow::Quit),
    }
}
