use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dayscore::cli::{Cli, Command};
use dayscore::client::{page::Page, EntryList, EntryStore, EntryViewModel, HttpEntryStore};
use dayscore::config::Config;
use dayscore::db::{self, EntryRepository};
use dayscore::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let Cli { api_url, command } = Cli::parse();

    if command == Command::Serve {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "dayscore=debug,tower_http=debug".into()),
            )
            .json()
            .init();
        return serve().await;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "dayscore=warn".into()),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    let store = HttpEntryStore::new(api_url);

    match command {
        Command::Serve => serve().await,
        Command::List => list(store).await,
        Command::Show { id } => show(store, id).await,
        Command::Add { score, date, note } => add(store, score, date, note).await,
        Command::Edit {
            id,
            score,
            note,
            clear_note,
        } => edit(store, id, score, note, clear_note).await,
        Command::Delete { id, yes } => delete(store, id, yes).await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let entries = match &config.database_url {
        Some(url) => EntryRepository::Postgres(
            db::create_pool(url, config.database_max_connections).await?,
        ),
        None => {
            tracing::warn!("DATABASE_URL not set, entries are kept in memory");
            EntryRepository::memory()
        }
    };

    let app = app(AppState { entries }, &config.frontend_url);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn loaded<S: EntryStore>(store: S) -> EntryViewModel<S> {
    let mut vm = EntryViewModel::new(store);
    vm.load().await;
    vm
}

async fn list(store: HttpEntryStore) -> anyhow::Result<()> {
    let vm = loaded(store).await;
    print!("{}", Page::new(&vm));
    if let Some(banner) = vm.banner() {
        bail!("{}", banner);
    }
    Ok(())
}

async fn show(store: HttpEntryStore, id: i64) -> anyhow::Result<()> {
    let entry = store.get(id).await?;
    print!("{}", EntryList::new(&[entry]));
    Ok(())
}

async fn add(
    store: HttpEntryStore,
    score: i32,
    date: Option<String>,
    note: Option<String>,
) -> anyhow::Result<()> {
    let mut vm = loaded(store).await;
    vm.start_create();
    if let Some(form) = vm.form_mut() {
        if let Some(date) = date {
            form.set_date(date);
        }
        form.set_score(score.to_string());
        form.set_note(note.unwrap_or_default());
    }
    submit(&mut vm).await
}

async fn edit(
    store: HttpEntryStore,
    id: i64,
    score: Option<i32>,
    note: Option<String>,
    clear_note: bool,
) -> anyhow::Result<()> {
    let mut vm = loaded(store).await;
    let entry = match vm.entries().iter().find(|e| e.id == id) {
        Some(entry) => entry.clone(),
        None => match vm.banner() {
            Some(banner) => bail!("{}", banner),
            None => bail!("No entry with id {}", id),
        },
    };

    vm.start_edit(entry);
    if let Some(form) = vm.form_mut() {
        if let Some(score) = score {
            form.set_score(score.to_string());
        }
        if clear_note {
            form.set_note("");
        } else if let Some(note) = note {
            form.set_note(note);
        }
    }
    submit(&mut vm).await
}

async fn delete(store: HttpEntryStore, id: i64, yes: bool) -> anyhow::Result<()> {
    let mut vm = loaded(store).await;
    let deleted = vm
        .remove(id, |prompt| yes || confirm_on_stdin(prompt))
        .await?;
    if deleted {
        println!("Deleted entry {}", id);
        print!("{}", Page::new(&vm));
    } else {
        println!("Nothing deleted");
    }
    Ok(())
}

async fn submit<S: EntryStore>(vm: &mut EntryViewModel<S>) -> anyhow::Result<()> {
    if vm.submit().await {
        print!("{}", Page::new(vm));
        return Ok(());
    }
    let message = vm
        .form()
        .and_then(|form| form.error())
        .ok_or_else(|| anyhow!("Entry was not saved"))?;
    bail!("{}", message)
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
