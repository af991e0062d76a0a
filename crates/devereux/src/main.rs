//! devereux - A command-line password manager
//!
//! Commands:
//! - list: List password repositories
//! - new <NAME>: Create a password repository
//! - set <NAME>: Add or replace a password
//! - get <NAME>: Copy a password to the clipboard (or print it)
//! - names: List password names in a repository
//! - delete <REPO>: Delete a password repository

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use devereux::{prompt, Devereux};
use devereux_core::Paths;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devereux")]
#[command(about = "A command-line password manager")]
#[command(version)]
#[command(after_help = r#"KEYS:
    The repository key comes from --key, else DEVEREUX_KEY, else a hidden prompt.

STORAGE:
    - Repositories are stored in ~/.devereux/repos/ (override with DEVEREUX_HOME)
    - The current repository is recorded in ~/.devereux/config.yaml
    - Every repository file is padded to the same size before encryption"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List password repositories
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Create a new password repository
    New {
        /// Name of password repository
        name: String,
        /// Make this the default password repository
        #[arg(short, long)]
        default: bool,
        /// Repository key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Add a password to a repository
    Set {
        /// Name of password
        name: String,
        /// Password repository to use
        #[arg(short, long)]
        repo: Option<String>,
        /// Repository key
        #[arg(short, long)]
        key: Option<String>,
        /// Actual password (omit for secure hidden prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Copy a password from a repository to the clipboard
    Get {
        /// Name of password
        name: String,
        /// Password repository to use
        #[arg(short, long)]
        repo: Option<String>,
        /// Repository key
        #[arg(short, long)]
        key: Option<String>,
        /// Print the password to stdout instead of copying it
        #[arg(short, long)]
        print: bool,
        /// Print without trailing newline (useful for piping, implies --print)
        #[arg(short = 'n')]
        no_newline: bool,
    },

    /// List password names in a repository (values hidden)
    Names {
        /// Password repository to use
        #[arg(short, long)]
        repo: Option<String>,
        /// Repository key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Delete a password repository
    Delete {
        /// Password repository to delete
        repo: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let app = Devereux::open(Paths::new()).context("Failed to prepare storage directory")?;

    match cli.command {
        Some(Commands::List { json }) => cmd_list(&app, json),
        Some(Commands::New { name, default, key }) => cmd_new(&app, &name, default, key),
        Some(Commands::Set {
            name,
            repo,
            key,
            password,
        }) => cmd_set(&app, &name, repo.as_deref(), key, password),
        Some(Commands::Get {
            name,
            repo,
            key,
            print,
            no_newline,
        }) => cmd_get(&app, &name, repo.as_deref(), key, print, no_newline),
        Some(Commands::Names { repo, key }) => cmd_names(&app, repo.as_deref(), key),
        Some(Commands::Delete { repo }) => cmd_delete(&app, &repo),
        None => {
            // Default to listing repositories
            cmd_list(&app, false)
        }
    }
}

/// List repositories
fn cmd_list(app: &Devereux, json: bool) -> Result<()> {
    let names = app.list_repositories()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        println!("No password repositories. Create one with: devereux new <name>");
        return Ok(());
    }

    let current = app.current_repository()?;

    println!("Password repositories:");
    for name in &names {
        let marker = if current.as_deref() == Some(name.as_str()) { "*" } else { " " };
        println!("{} {}", marker, name);
    }

    Ok(())
}

/// Create a repository
fn cmd_new(app: &Devereux, name: &str, default: bool, key: Option<String>) -> Result<()> {
    let passphrase = prompt::resolve_key(key)?;

    let current = app.create_repository(name, &passphrase, default)?;

    println!("Created password repository \"{}\".", name);
    if current {
        println!("\"{}\" is now the default repository.", name);
    }

    Ok(())
}

/// Store a password
fn cmd_set(
    app: &Devereux,
    name: &str,
    repo: Option<&str>,
    key: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let passphrase = prompt::resolve_key(key)?;

    let password = match password {
        Some(p) => p,
        None => {
            let password = prompt::read_hidden("Enter password> ")
                .context("Failed to read password")?;

            if password.is_empty() {
                bail!("Empty password not allowed");
            }

            password
        }
    };

    let repository = app.set_password(repo, &passphrase, name, &password)?;

    println!("Saved \"{}\" in \"{}\".", name, repository);

    Ok(())
}

/// Retrieve a password
fn cmd_get(
    app: &Devereux,
    name: &str,
    repo: Option<&str>,
    key: Option<String>,
    print: bool,
    no_newline: bool,
) -> Result<()> {
    let passphrase = prompt::resolve_key(key)?;

    let password = app.get_password(repo, &passphrase, name)?;

    if no_newline {
        print!("{}", password);
    } else if print {
        println!("{}", password);
    } else {
        copy_to_clipboard(&password)?;
        println!("Copied \"{}\" to your clipboard.", name);
    }

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .context("Clipboard unavailable - use --print to write to stdout")?;
    clipboard
        .set_text(text)
        .context("Failed to copy to clipboard")?;
    Ok(())
}

/// List password names
fn cmd_names(app: &Devereux, repo: Option<&str>, key: Option<String>) -> Result<()> {
    let passphrase = prompt::resolve_key(key)?;

    let names = app.list_entries(repo, &passphrase)?;

    if names.is_empty() {
        println!("No passwords stored. Add one with: devereux set <name>");
        return Ok(());
    }

    for name in &names {
        println!("  {}", name);
    }

    Ok(())
}

/// Delete a repository
fn cmd_delete(app: &Devereux, repo: &str) -> Result<()> {
    app.delete_repository(repo)?;
    println!("Deleted password repository \"{}\".", repo);
    Ok(())
}
