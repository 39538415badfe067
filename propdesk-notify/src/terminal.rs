//! Terminal front-end pieces used by the `propdesk-notify` binary
//!
//! Toasts and navigation are printed to stdout; the panel is rendered on
//! demand from the center's list. Commands come from stdin, one per line.

use crate::model::Notification;
use crate::navigation::{Navigator, Route};
use crate::toast::{DismissReason, Toast, ToastPresenter, ToastTone};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn tone_color(tone: ToastTone) -> &'static str {
    match tone {
        ToastTone::Meeting => "\x1b[34m",
        ToastTone::Lead => "\x1b[32m",
        ToastTone::Inquiry => "\x1b[33m",
        ToastTone::Default => "\x1b[37m",
    }
}

/// One line of input from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Open,
    Close,
    /// Toast body click
    Click(String),
    /// Toast close control
    Dismiss(String),
    /// Panel list item click
    Item(String),
    Read(String),
    Unread(String),
    ReadAll,
    Delete(String),
    Badge,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    MissingId(&'static str),
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::MissingId(cmd) => write!(f, "usage: {} <id>", cmd),
            CommandError::Unknown(cmd) => write!(f, "unknown command '{}' (try 'help')", cmd),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let verb = verb.to_ascii_lowercase();
        let arg = words.next().map(str::to_string);

        let with_id = |name: &'static str, build: fn(String) -> Command| {
            arg.clone().map(build).ok_or(CommandError::MissingId(name))
        };

        match verb.as_str() {
            "list" | "ls" => Ok(Command::List),
            "open" => Ok(Command::Open),
            "close" => Ok(Command::Close),
            "click" => with_id("click", Command::Click),
            "dismiss" => with_id("dismiss", Command::Dismiss),
            "item" => with_id("item", Command::Item),
            "read" => with_id("read", Command::Read),
            "unread" => with_id("unread", Command::Unread),
            "read-all" | "readall" => Ok(Command::ReadAll),
            "delete" | "rm" => with_id("delete", Command::Delete),
            "badge" => Ok(Command::Badge),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  list            show the notification panel
  open | close    open or close the panel
  click <id>      click a toast (mark read + navigate)
  dismiss <id>    close a toast
  item <id>       click a panel item (mark read + close panel + navigate)
  read <id>       mark read
  unread <id>     mark unread
  read-all        mark everything read
  delete <id>     delete a notification
  badge           show the unread badge count
  quit            exit";

/// Render a toast as a single coloured line
pub fn render_toast(toast: &Toast) -> String {
    let color = tone_color(toast.style.tone);
    let n = &toast.notification;
    format!(
        "{color}{BOLD}{} {}{RESET} {}  {DIM}[{}]{RESET}",
        toast.style.icon, n.title, n.message, n.id
    )
}

/// Render the panel: header, unread summary and one line per record
pub fn render_panel(notifications: &[Notification], now: DateTime<Utc>) -> String {
    let unread = crate::model::unread_count(notifications);
    let mut out = format!("{BOLD}Notifications{RESET}");
    if unread > 0 {
        out.push_str(&format!(" ({} unread)", unread));
    } else if !notifications.is_empty() {
        out.push_str(" (all read)");
    }
    out.push('\n');

    if notifications.is_empty() {
        out.push_str(&format!("  {DIM}No notifications{RESET}\n"));
        return out;
    }

    for n in notifications {
        let marker = if n.is_unread() { "●" } else { " " };
        out.push_str(&format!(
            "  {marker} {:<10} {BOLD}{}{RESET} {}  {DIM}{} [{}]{RESET}\n",
            n.category.as_str(),
            n.title,
            n.message,
            n.age_label(now),
            n.id
        ));
    }
    out
}

/// Prints toasts to stdout
#[derive(Debug, Default)]
pub struct TerminalToasts;

impl ToastPresenter for TerminalToasts {
    fn show(&self, toast: &Toast) {
        print_line(&render_toast(toast));
    }

    fn dismiss(&self, notification_id: &str, reason: DismissReason) {
        if reason == DismissReason::Expired {
            print_line(&format!("{DIM}toast {} expired{RESET}", notification_id));
        }
    }
}

/// Prints navigation requests to stdout
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        print_line(&format!("-> navigate to {}", route));
    }
}

pub fn print_line(line: &str) {
    let mut stdout = std::io::stdout().lock();
    // A closed stdout is not worth failing over
    let _ = writeln!(stdout, "{}", line);
    let _ = stdout.flush();
}
