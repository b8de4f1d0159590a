use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use prelegal_core::{
    field_config, generate_document_filename_on, reconcile, render_preview, DocumentState,
    DocumentType, DraftSession, PartialUpdate,
};
use prelegal_runtime::{
    ChatMessage, DocumentStore, DraftingAssistant, LlmProvider, RuntimeConfig, UserId,
};

#[derive(Parser)]
#[command(name = "prelegal")]
#[command(about = "Draft standard legal agreements through conversation")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported document types
    Types,

    /// Print a fresh document with type defaults
    New {
        document_type: DocumentType,
        /// Effective date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Merge a candidate update (JSON) into a saved document
    Merge {
        state: PathBuf,
        update: PathBuf,
        /// Write the result back to the state file
        #[arg(long)]
        in_place: bool,
    },

    /// Render the cover page of a saved document
    Preview { state: PathBuf },

    /// Print the export filename for a saved document
    Filename { state: PathBuf },

    /// Show the labelled fields and party labels for a document type
    Fields { document_type: DocumentType },

    /// Draft a document interactively with the assistant
    Chat {
        /// Runtime config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Document store snapshot used by /save
        #[arg(long, default_value = "prelegal-store.json")]
        store: PathBuf,
        #[arg(long, default_value_t = 1)]
        user: UserId,
    },

    /// Manage saved documents
    Docs {
        #[arg(long, default_value = "prelegal-store.json")]
        store: PathBuf,
        #[arg(long, default_value_t = 1)]
        user: UserId,
        #[command(subcommand)]
        command: DocsCommand,
    },
}

#[derive(Subcommand)]
enum DocsCommand {
    /// List documents, most recently updated first
    List,
    /// Print a document's contents
    Show { id: u64 },
    /// Save a document file under a title
    Save { title: String, state: PathBuf },
    Delete { id: u64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldsOutput {
    document_type: DocumentType,
    party1_label: &'static str,
    party2_label: &'static str,
    fields: Vec<FieldOutput>,
}

#[derive(Serialize)]
struct FieldOutput {
    key: &'static str,
    label: &'static str,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_state(path: &Path) -> Result<DocumentState> {
    DocumentState::from_file(path).with_context(|| format!("loading {}", path.display()))
}

fn print_state(state: &DocumentState, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", state.to_json_pretty()?),
        Format::Yaml => print!("{}", serde_yaml::to_string(state)?),
    }
    Ok(())
}

#[cfg(feature = "openrouter")]
fn build_provider(config: &RuntimeConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider = prelegal_runtime::OpenRouterProvider::from_config(config, None)?;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "openrouter"))]
fn build_provider(_config: &RuntimeConfig) -> Result<Arc<dyn LlmProvider>> {
    anyhow::bail!("chat requires a build with the `openrouter` feature")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Types => {
            for doc_type in DocumentType::ALL {
                println!("{:<22} {}", doc_type.as_str(), doc_type.display_name());
            }
        }
        Commands::New {
            document_type,
            date,
            format,
        } => {
            let today = date.unwrap_or_else(|| Utc::now().date_naive());
            print_state(&DocumentState::new_on(document_type, today), format)?;
        }
        Commands::Merge {
            state,
            update,
            in_place,
        } => {
            let current = load_state(&state)?;
            let raw = fs::read_to_string(&update)
                .with_context(|| format!("reading {}", update.display()))?;
            let candidate = PartialUpdate::from_json(&raw).context("parsing update")?;

            let merged = reconcile(&current, &candidate);
            debug!(changed = merged != current, "Merged update");

            if in_place {
                fs::write(&state, merged.to_json_pretty()?)?;
            } else {
                println!("{}", merged.to_json_pretty()?);
            }
        }
        Commands::Preview { state } => {
            print!("{}", render_preview(&load_state(&state)?));
        }
        Commands::Filename { state } => {
            let state = load_state(&state)?;
            let label = state.document_type().display_name();
            println!(
                "{}",
                generate_document_filename_on(&state, label, Utc::now().date_naive())
            );
        }
        Commands::Fields { document_type } => {
            let config = field_config(document_type);
            let output = FieldsOutput {
                document_type,
                party1_label: config.party1_label,
                party2_label: config.party2_label,
                fields: config
                    .fields
                    .iter()
                    .map(|f| FieldOutput {
                        key: f.key,
                        label: f.label,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Chat {
            config,
            store,
            user,
        } => {
            let config = match config {
                Some(path) => RuntimeConfig::from_yaml_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RuntimeConfig::default(),
            };
            run_chat(config, &store, user).await?;
        }
        Commands::Docs {
            store,
            user,
            command,
        } => run_docs(&store, user, command)?,
    }

    Ok(())
}

const CHAT_HELP: &str =
    "Commands: /preview, /filename, /save <title>, /load <id>, /reset, /quit";

/// Conversation and draft for one chat; the greeting always stays first.
struct ChatState {
    history: Vec<ChatMessage>,
    session: DraftSession,
}

impl ChatState {
    fn new(greeting: &str) -> Self {
        Self {
            history: vec![ChatMessage::assistant(greeting)],
            session: DraftSession::new(),
        }
    }

    fn reset(&mut self) {
        self.session = self.session.reset();
        self.history.truncate(1);
    }

    /// Continue drafting a saved document. The earlier conversation was
    /// about another document, so it is dropped.
    fn load(&mut self, state: DocumentState) {
        self.session = DraftSession::load(state);
        self.history.truncate(1);
    }
}

async fn run_chat(config: RuntimeConfig, store_path: &Path, user: UserId) -> Result<()> {
    let provider = build_provider(&config)?;
    let assistant = DraftingAssistant::new(provider, config);
    let store = DocumentStore::open(store_path)?;

    let greeting = DraftingAssistant::greeting();
    let mut chat = ChatState::new(&greeting.response);

    println!("{}\n({})", greeting.response, CHAT_HELP);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ').unwrap_or((input, "")) {
            ("/quit", _) | ("/exit", _) => break,
            ("/help", _) => println!("{}", CHAT_HELP),
            ("/preview", _) => print!("{}", render_preview(&chat.session.state)),
            ("/filename", _) => println!(
                "{}",
                generate_document_filename_on(
                    &chat.session.state,
                    chat.session.label(),
                    Utc::now().date_naive()
                )
            ),
            ("/save", title) => {
                let title = if title.trim().is_empty() {
                    format!("{} - {}", chat.session.label(), Utc::now().format("%Y-%m-%d"))
                } else {
                    title.trim().to_string()
                };
                let record = store.save(user, title, &chat.session.state)?;
                store.save_to_file(store_path)?;
                println!("Saved as document {}.", record.id);
            }
            ("/load", id) => {
                let Ok(id) = id.trim().parse::<u64>() else {
                    eprintln!("usage: /load <id>");
                    continue;
                };
                match store.load(id, user) {
                    Ok(state) => {
                        chat.load(state);
                        println!("Loaded {}.", chat.session.label());
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            ("/reset", _) => {
                chat.reset();
                println!("{}", greeting.response);
            }
            _ => {
                chat.history.push(ChatMessage::user(input));
                match assistant.process_message(&chat.history).await {
                    Ok(turn) => {
                        println!("{}", turn.response);
                        if let Some(suggested) = &turn.suggested_document {
                            println!("(Suggested document: {})", suggested);
                        }
                        chat.history
                            .push(ChatMessage::assistant(turn.response.clone()));
                        chat.session = chat.session.apply_turn(&turn);
                        if chat.session.complete {
                            println!("\nAll details gathered. Use /preview or /save.");
                        }
                    }
                    Err(e) => {
                        // Drop the unanswered message so the user can retry.
                        chat.history.pop();
                        eprintln!("Error: {}", e);
                    }
                }
            }
        }
    }

    let usage = assistant.usage();
    debug!(
        calls = usage.calls,
        tokens = usage.total_tokens(),
        cache_hits = usage.cache_hits,
        "Chat finished"
    );
    Ok(())
}

fn run_docs(store_path: &Path, user: UserId, command: DocsCommand) -> Result<()> {
    let store = DocumentStore::open(store_path)?;

    match command {
        DocsCommand::List => {
            for doc in store.list(user) {
                println!(
                    "{:>4}  {:<32} {:<22} {}",
                    doc.id,
                    doc.title,
                    doc.document_type.as_str(),
                    doc.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        DocsCommand::Show { id } => {
            let state = store.load(id, user)?;
            println!("{}", state.to_json_pretty()?);
        }
        DocsCommand::Save { title, state } => {
            let record = store.save(user, title, &load_state(&state)?)?;
            store.save_to_file(store_path)?;
            println!("{}", record.id);
        }
        DocsCommand::Delete { id } => {
            store.delete(id, user)?;
            store.save_to_file(store_path)?;
        }
    }
    Ok(())
}
