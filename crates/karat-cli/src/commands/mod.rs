//! CLI command implementations for the Karat console.

pub mod jobs;
pub mod output;
pub mod reports;
pub mod serve;
pub mod session;
pub mod tasks;
pub mod users;

use anyhow::Context as _;
use karat_client::{Access, ApiClient, ClientError, FileStorage, Navigator, SessionStore, access};
use karat_core::{KaratConfig, User};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Tells the terminal user how to get a new session.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn to_login(&self) {
        eprintln!("Session ended. Run `karat login` to sign in.");
    }
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

/// Everything a command needs: the gateway and the output format.
pub struct Context {
    pub client: ApiClient,
    pub output: Output,
}

impl Context {
    pub fn new(config: &KaratConfig, output: Output) -> anyhow::Result<Self> {
        let path = config.session.resolve_path();
        tracing::debug!(session = %path.display(), api = %config.api.base_url, "Opening session");

        let session = SessionStore::new(Arc::new(FileStorage::new(path)))
            .with_navigator(Arc::new(TerminalNavigator));
        let client = ApiClient::new(&config.api.base_url, session)
            .context("invalid API configuration")?;
        Ok(Self { client, output })
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    /// The signed-in user, if they may run commands of this kind.
    pub fn require(&self, access: Access) -> anyhow::Result<User> {
        access::authorize(self.session(), access).map_err(|_| match access {
            Access::Owner => anyhow::anyhow!(
                "this command needs an owner session; run `karat login` as an owner"
            ),
            Access::Worker => anyhow::anyhow!(
                "this command needs a worker session; run `karat login` as production staff"
            ),
        })
    }
}

/// Turn a failed API call into the message shown to the user.
pub fn action_error(err: ClientError, fallback: &str) -> anyhow::Error {
    if err.is_unauthorized() {
        return anyhow::anyhow!("authentication required");
    }
    if let ClientError::Api {
        detail: Some(detail),
        ..
    } = &err
    {
        return anyhow::anyhow!("{detail}");
    }
    anyhow::Error::new(err).context(fallback.to_string())
}

/// Read one line from stdin after printing a prompt to stderr.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
