mod commands;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use commands::{Context, Output};
use karat_core::{JobStatus, KaratConfig, Stage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "karat", version, about = "Karat jewelry production console")]
struct Cli {
    /// Configuration file (defaults to ./karat.yaml when present)
    #[arg(long, global = true, env = "KARAT_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the production API
    #[arg(long = "api-url", global = true, env = "KARAT_API_URL")]
    api_url: Option<String>,

    /// File holding the persisted session
    #[arg(long = "session-file", global = true, env = "KARAT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the persisted session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Production jobs (owner).
    Jobs {
        #[command(subcommand)]
        cmd: JobsCommand,
    },

    /// Console users (owner).
    Users {
        #[command(subcommand)]
        cmd: UsersCommand,
    },

    /// Tasks issued to the signed-in worker.
    Tasks {
        #[command(subcommand)]
        cmd: TasksCommand,
    },

    /// Loss reports (owner).
    Reports {
        #[command(subcommand)]
        cmd: ReportsCommand,
    },

    /// Serve the web console.
    Serve {
        /// Host to bind (overrides dashboard.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides dashboard.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// List jobs, optionally filtered by status.
    List {
        #[arg(long)]
        status: Option<JobStatus>,
    },

    /// Show one job with its transactions.
    Show { id: i64 },

    /// Create a job.
    Create {
        #[arg(long = "design-no")]
        design_no: String,
        #[arg(long)]
        category: String,
        /// Initial gold weight in grams
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        description: Option<String>,
    },

    /// Issue a job to a worker for a stage.
    Assign {
        id: i64,
        #[arg(long)]
        worker: i64,
        #[arg(long)]
        stage: Stage,
        /// Issued weight in grams (defaults to the job's initial weight)
        #[arg(long)]
        weight: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List,

    /// Register a new user.
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long = "full-name")]
        full_name: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
        /// owner, caster, filer, setter or polisher
        #[arg(long)]
        role: String,
    },

    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum TasksCommand {
    List,

    /// Return a task's gold.
    Complete {
        transaction_id: i64,
        /// Returned weight in grams
        #[arg(long = "returned-weight")]
        returned_weight: f64,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ReportsCommand {
    /// Job totals and average loss.
    Summary,
    /// Worker performance and material consumption.
    Overview,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The console server logs requests; one-shot commands stay quiet.
    let default_level = match cli.cmd {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let output = if cli.json { Output::Json } else { Output::Table };
    let ctx = Context::new(&config, output)?;

    match cli.cmd {
        Command::Login { username, password } => {
            commands::session::login(&ctx, &username, password).await
        }
        Command::Logout => commands::session::logout(&ctx),
        Command::Whoami => commands::session::whoami(&ctx),
        Command::Jobs { cmd } => run_jobs(&ctx, cmd).await,
        Command::Users { cmd } => run_users(&ctx, cmd).await,
        Command::Tasks { cmd } => run_tasks(&ctx, cmd).await,
        Command::Reports { cmd } => match cmd {
            ReportsCommand::Summary => commands::reports::summary(&ctx).await,
            ReportsCommand::Overview => commands::reports::overview(&ctx).await,
        },
        Command::Serve { host, port } => {
            let listen = commands::serve::listen_config(&config.dashboard, host, port);
            commands::serve::run(&ctx, listen).await
        }
    }
}

/// Config file, then environment, then command line flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<KaratConfig> {
    let mut config = KaratConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.trim().to_string();
    }
    if let Some(path) = &cli.session_file {
        config.session.path = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn run_jobs(ctx: &Context, cmd: JobsCommand) -> anyhow::Result<()> {
    match cmd {
        JobsCommand::List { status } => commands::jobs::list(ctx, status).await,
        JobsCommand::Show { id } => commands::jobs::show(ctx, id).await,
        JobsCommand::Create {
            design_no,
            category,
            weight,
            description,
        } => commands::jobs::create(ctx, design_no, category, weight, description).await,
        JobsCommand::Assign {
            id,
            worker,
            stage,
            weight,
        } => commands::jobs::assign(ctx, id, worker, stage, weight).await,
    }
}

async fn run_users(ctx: &Context, cmd: UsersCommand) -> anyhow::Result<()> {
    match cmd {
        UsersCommand::List => commands::users::list(ctx).await,
        UsersCommand::Create {
            username,
            email,
            full_name,
            password,
            role,
        } => commands::users::create(ctx, username, email, full_name, password, &role).await,
        UsersCommand::Delete { id } => commands::users::delete(ctx, id).await,
    }
}

async fn run_tasks(ctx: &Context, cmd: TasksCommand) -> anyhow::Result<()> {
    match cmd {
        TasksCommand::List => commands::tasks::list(ctx).await,
        TasksCommand::Complete {
            transaction_id,
            returned_weight,
            notes,
        } => commands::tasks::complete(ctx, transaction_id, returned_weight, notes).await,
    }
}
