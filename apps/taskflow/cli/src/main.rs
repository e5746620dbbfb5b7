//! TaskFlow terminal client
//!
//! Reads the task snapshot from `TASKS_STORE_PATH`, applies one command and
//! writes the snapshot back.

use clap::Parser;
use core_config::storage::StorageConfig;
use core_config::FromEnv;
use core_config::tracing::{init_cli_tracing, install_color_eyre};
use domain_tasks::{JsonFileStore, LogNotifier, SystemClock, TaskBoard};
use domain_users::{AuthProvider, Session, User};
use std::sync::Arc;
use tracing::debug;

mod cli;
mod commands;

use cli::Cli;

fn main() -> eyre::Result<()> {
    install_color_eyre();

    init_cli_tracing();

    let cli = Cli::parse();
    let storage = StorageConfig::from_env()?;

    let mut session = Session::new();
    let user_id = sign_in(&mut session, cli.user, cli.provider);
    debug!(user_id = %user_id, path = %storage.tasks_path.display(), "Opening task board");

    let mut board = TaskBoard::open(
        user_id,
        Arc::new(JsonFileStore::new(storage.tasks_path)),
        Arc::new(SystemClock),
        Arc::new(LogNotifier),
    );

    let mut stdout = std::io::stdout().lock();
    commands::run(&mut board, &mut session, cli.command, &mut stdout)
}

/// Resolve the session identity. No credentials are checked here.
fn sign_in(session: &mut Session, user: Option<String>, provider: AuthProvider) -> String {
    let user = match user.filter(|id| !id.trim().is_empty()) {
        Some(id) if id != User::GUEST_ID && provider != AuthProvider::Guest => {
            session.sign_in(User::from_provider(provider, id, None, None, None))
        }
        _ => session.guest(),
    };
    user.id.clone()
}
