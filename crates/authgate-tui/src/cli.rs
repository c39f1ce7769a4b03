//! Non-interactive commands: `--status`, `--sign-in`, `--sign-out`.

use std::io::{self, Write};

use anyhow::{bail, Result};
use authgate_core::forms::{SignInForm, INVALID_CREDENTIALS_MESSAGE};
use authgate_core::navigation::wait_until_ready;
use authgate_core::{AuthPhase, Config, SessionStore};
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tui,
    Status,
    SignIn,
    SignOut,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub command: Command,
    /// Keep the session in memory only
    pub ephemeral: bool,
}

pub const USAGE: &str = "\
Usage: authgate [--status | --sign-in | --sign-out] [--ephemeral]

With no command, starts the terminal UI.

  --status      Print the persisted session
  --sign-in     Prompt for email and password and sign in
  --sign-out    Sign out and clear the persisted session
  --ephemeral   Keep the session in memory only
  -h, --help    Show this help";

pub fn parse_args<I, S>(args: I) -> Result<Options>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut command = Command::Tui;
    let mut ephemeral = false;

    for arg in args {
        let next = match arg.as_ref() {
            "--status" => Command::Status,
            "--sign-in" => Command::SignIn,
            "--sign-out" => Command::SignOut,
            "-h" | "--help" => Command::Help,
            "--ephemeral" => {
                ephemeral = true;
                continue;
            }
            other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
        };
        if command != Command::Tui && command != next {
            bail!("Only one command may be given\n\n{}", USAGE);
        }
        command = next;
    }

    Ok(Options { command, ephemeral })
}

pub async fn print_status(store: &SessionStore) {
    println!("{}", status_line(store).await);
}

/// Describe the persisted session once the store has finished loading
async fn status_line(store: &SessionStore) -> String {
    let mut rx = store.subscribe();
    store.initialize();
    let state = wait_until_ready(&mut rx).await.unwrap_or_else(|| store.state());
    match AuthPhase::from(&state) {
        AuthPhase::LoggedIn(user) => format!("Signed in as {} (id {})", user.email, user.id),
        AuthPhase::LoggedOut | AuthPhase::Uninitialized => "Signed out".to_string(),
    }
}

/// Prompt for credentials and sign in
pub async fn sign_in(store: &SessionStore, config: &mut Config) -> Result<()> {
    store.initialize();
    if let AuthPhase::LoggedIn(user) = store.phase() {
        println!("Already signed in as {}", user.email);
        return Ok(());
    }

    let email = prompt_email(config.last_email.as_deref())?;
    let password = rpassword::prompt_password("Password: ")?;

    let form = SignInForm::new(email, password);
    if let Err(e) = form.validate() {
        bail!(e.message());
    }

    println!("\nSigning in...");
    if let Err(e) = store.sign_in(&form.email, &form.password).await {
        error!(error = %e, "Sign-in failed");
        bail!(INVALID_CREDENTIALS_MESSAGE);
    }

    config.last_email = Some(form.email.clone());
    if config.read_only {
        warn!("Config failed to load, not saving last email");
    } else if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Signed in as {}", form.email);
    Ok(())
}

pub async fn sign_out(store: &SessionStore) {
    store.initialize();
    store.sign_out().await;
    println!("Signed out");
}

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match (input.is_empty(), last) {
        (true, Some(last)) => last.to_string(),
        _ => input.to_string(),
    })
}
