use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use registrar::cli::{create_admin, import_terms_file};
use registrar::modules::auth::repository::PgUserRepository;
use registrar::modules::terms::repository::PgTermRepository;
use registrar_config::PasswordConfig;
use registrar_db::{DatabaseConfig, PgPool, init_db_pool};
use registrar_observability::init_basic_console_logging;

#[derive(Parser)]
#[command(name = "registrar-cli")]
#[command(about = "Registrar CLI - Administrative tools for the registrar API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin credential
    CreateAdmin {
        /// Username for the new admin
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Import academic terms from a CSV file
    ImportTerms {
        /// CSV file with header id_semester,tahun_ajaran,term,tanggal_mulai,tanggal_selesai
        file: PathBuf,

        /// Write valid rows instead of only validating them
        #[arg(long)]
        commit: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&db_config)
        .await
        .context("database unavailable")?;

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            handle_create_admin(pool, username, password).await
        }
        Commands::ImportTerms { file, commit } => handle_import_terms(pool, file, commit).await,
    }
}

async fn handle_create_admin(
    pool: PgPool,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("failed to read username")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let repo = PgUserRepository::new(pool);
    let user = create_admin(&repo, &PasswordConfig::from_env(), &username, &password)
        .await
        .context("failed to create admin")?;

    println!("Admin created: {} (id {})", user.username, user.id_user);
    Ok(())
}

async fn handle_import_terms(pool: PgPool, file: PathBuf, commit: bool) -> anyhow::Result<()> {
    let repo = PgTermRepository::new(pool);
    let report = import_terms_file(&repo, &file, commit).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
