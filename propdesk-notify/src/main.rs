//! Propdesk notification client - terminal entry point
//!
//! Runs the notification center against a Propdesk backend, printing toasts
//! and navigation to stdout and reading panel commands from stdin.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use propdesk_common::events::EventBus;
use propdesk_notify::api::HttpNotificationApi;
use propdesk_notify::badge::UnreadBadge;
use propdesk_notify::config::NotifyConfig;
use propdesk_notify::sound::{AlertSound, Silent, SoundChain};
use propdesk_notify::terminal::{self, Command, TerminalNavigator, TerminalToasts};
use propdesk_notify::{CenterHooks, NotificationCenter, UserRole};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Command-line arguments for propdesk-notify
#[derive(Parser, Debug)]
#[command(name = "propdesk-notify")]
#[command(about = "In-app notification client for the Propdesk CRM")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "PROPDESK_API_URL")]
    api_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "PROPDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Role of the signed-in user (administrator, executive, sales)
    #[arg(long, env = "PROPDESK_ROLE")]
    role: Option<UserRole>,

    /// Seconds between polls
    #[arg(long)]
    interval: Option<u64>,

    /// Notifications requested per poll
    #[arg(long)]
    limit: Option<usize>,

    /// Disable the audible cue
    #[arg(long)]
    no_sound: bool,
}

impl Args {
    fn apply(&self, config: &mut NotifyConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        if let Some(role) = self.role {
            config.role = role;
        }
        if let Some(interval) = self.interval {
            config.poll_interval_secs = interval;
        }
        if let Some(limit) = self.limit {
            config.fetch_limit = limit;
        }
        if self.no_sound {
            config.sound_enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing. The filter is reloadable so the configured level
    // can apply once the config file has been read; RUST_LOG always wins.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().ok();
    let has_env_filter = env_filter.is_some();
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| default_filter("info").into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = NotifyConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    if !has_env_filter {
        filter_handle
            .reload(default_filter(&config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    info!(
        api = %config.api_base_url,
        role = %config.role,
        interval_secs = config.poll_interval_secs,
        "Starting Propdesk notification client"
    );

    let api = Arc::new(
        HttpNotificationApi::new(
            &config.api_base_url,
            config.auth_token.clone(),
            config.request_timeout(),
        )
        .context("Failed to build backend client")?,
    );
    let bus = Arc::new(EventBus::default());

    let sound: Arc<dyn AlertSound> = if config.sound_enabled {
        Arc::new(SoundChain::standard())
    } else {
        Arc::new(Silent)
    };

    let center = NotificationCenter::new(
        api.clone(),
        Arc::clone(&bus),
        CenterHooks {
            presenter: Arc::new(TerminalToasts),
            sound,
            navigator: Arc::new(TerminalNavigator),
        },
        config.role,
        config.center_settings(),
    );

    let poller = center.start();
    let badge = UnreadBadge::spawn(api, &bus, config.fetch_limit, poller.cancellation_token());

    terminal::print_line(terminal::HELP);

    tokio::select! {
        _ = command_loop(&center, &badge) => {
            info!("Input closed, shutting down");
        }
        _ = shutdown_signal() => {}
    }

    poller.stop().await;
    badge.join().await;

    info!("Shutdown complete");
    Ok(())
}

fn default_filter(level: &str) -> String {
    format!("propdesk_notify={level},propdesk_common={level}")
}

/// Read and execute commands until `quit` or EOF
async fn command_loop(center: &NotificationCenter, badge: &UnreadBadge) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read command: {}", e);
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(terminal::CommandError::Empty) => continue,
            Err(e) => {
                terminal::print_line(&e.to_string());
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        execute(center, badge, command).await;
    }
}

async fn execute(center: &NotificationCenter, badge: &UnreadBadge, command: Command) {
    let outcome = match command {
        Command::List => {
            let list = center.notifications().await;
            terminal::print_line(&terminal::render_panel(&list, chrono::Utc::now()));
            Ok(())
        }
        Command::Open => {
            center.open_panel();
            let list = center.notifications().await;
            terminal::print_line(&terminal::render_panel(&list, chrono::Utc::now()));
            Ok(())
        }
        Command::Close => {
            center.close_panel();
            Ok(())
        }
        Command::Click(id) => {
            if center.visible_toasts().contains(&id) {
                center.click_toast(&id).await;
            } else {
                terminal::print_line(&format!("no visible toast {}", id));
            }
            Ok(())
        }
        Command::Dismiss(id) => {
            if !center.close_toast(&id) {
                terminal::print_line(&format!("no visible toast {}", id));
            }
            Ok(())
        }
        Command::Item(id) => center.click_item(&id).await.map(|_| ()),
        Command::Read(id) => center.mark_read(&id).await,
        Command::Unread(id) => center.mark_unread(&id).await,
        Command::ReadAll => center.mark_all_read().await,
        Command::Delete(id) => center.delete(&id).await,
        Command::Badge => {
            terminal::print_line(&format!("unread: {}", badge.count()));
            Ok(())
        }
        Command::Help => {
            terminal::print_line(terminal::HELP);
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    if let Err(e) = outcome {
        terminal::print_line(&format!("error: {}", e));
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
