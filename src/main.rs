use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use imscore::commands::{self, Console, Terminal};
use imscore::config::{DataPaths, LOG_ENV, Settings};
use imscore::{Inventory, Session, UserRole};

#[derive(Debug, Parser)]
#[command(name = "ims")]
#[command(about = "Console inventory management: items, categories and stock status")]
#[command(version)]
struct Cli {
    /// Directory holding config.json and the database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in with an existing account
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create a user account and log in
    Signup {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create the data directory, settings file and an admin account
    Init {
        #[arg(short, long)]
        email: Option<String>,
    },
}

fn init_tracing(settings: &Settings) {
    // IMS_LOG wins over RUST_LOG, which wins over the configured level.
    // Stdout is reserved for the console conversation.
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn ask(console: &mut dyn Console, message: &str) -> Result<String> {
    match console.prompt(message)? {
        Some(answer) if !answer.is_empty() => Ok(answer),
        _ => bail!("no input given for {}", message.trim_end_matches([':', ' '])),
    }
}

fn ask_password(console: &mut dyn Console) -> Result<String> {
    console
        .prompt_password("Enter password: ")?
        .filter(|password| !password.is_empty())
        .context("no password given")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = DataPaths::resolve(cli.data_dir.as_deref())?;
    let settings = Settings::load_or_default(&paths)?;
    init_tracing(&settings);

    let mut console = Terminal::new();
    let db_path = paths.database_file(&settings);

    if let Some(Command::Init { email }) = &cli.command {
        paths.ensure_directories()?;
        if !paths.settings_file().exists() {
            settings.save(&paths)?;
        }
        let mut inventory = Inventory::open_or_create_file(&db_path)
            .with_context(|| format!("opening {}", db_path.display()))?;

        let email = match email {
            Some(email) => email.clone(),
            None => ask(&mut console, "Admin email: ")?,
        };
        let password = ask_password(&mut console)?;
        let admin = commands::auth::register(
            &mut inventory,
            &mut console,
            &email,
            &password,
            UserRole::Admin,
        )?;
        if admin.is_some() {
            console.say(&format!("Inventory ready at {}", paths.base_dir().display()));
        }
        return Ok(());
    }

    let mut inventory = Inventory::open_or_create_file(&db_path)
        .with_context(|| format!("opening {}", db_path.display()))?;

    let email = match &cli.command {
        Some(Command::Login { email: Some(email) })
        | Some(Command::Signup { email: Some(email) }) => email.clone(),
        _ => ask(&mut console, "Enter email: ")?,
    };
    let password = ask_password(&mut console)?;

    let action = match &cli.command {
        Some(Command::Signup { .. }) => "signup".to_string(),
        Some(_) => "login".to_string(),
        None => ask(&mut console, "Write a command (login/signup): ")?.to_lowercase(),
    };

    let user = match action.as_str() {
        "login" => commands::auth::login(&inventory, &mut console, &email, &password)?,
        "signup" => commands::auth::signup(&mut inventory, &mut console, &email, &password)?,
        other => bail!("unknown command '{}', expected login or signup", other),
    };

    let Some(user) = user else {
        drop(inventory);
        std::process::exit(1);
    };

    Session::new(user)
        .with_default_min_quantity(settings.default_min_quantity)
        .run_loop(&mut inventory, &mut console)?;

    Ok(())
}
