use std::{collections::VecDeque, io::Write as _, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use client_core::HttpRosterClient;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, oneshot},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod ui;

use config::load_settings;
use controller::{
    events::{AlwaysConfirm, Confirm, UiEvent},
    orchestration::{AppController, Document},
};
use ui::{
    terminal::layout,
    view::{to_html, Element, Node},
};

#[derive(Parser, Debug)]
#[command(name = "activity-roster", about = "Browse and edit the activity roster")]
struct Args {
    /// Roster server base url, e.g. http://127.0.0.1:8000
    #[arg(long)]
    server_url: Option<String>,
    /// tracing filter directive; RUST_LOG still wins when set
    #[arg(long)]
    log_filter: Option<String>,
    /// Config file (defaults to ./roster.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the confirmation prompt before unregistering
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Refresh,
    Html,
    Help,
    Quit,
    Signup { email: String, activity: String },
    Remove { card: usize, row: usize },
}

const HELP: &str = "\
commands:
  list                             show the roster
  refresh                          fetch the roster again
  signup <email> <activity name>   sign up for an activity
  remove <card#> <row#>            unregister a participant
  html                             print the page markup
  help                             this text
  quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".into());
    };
    match verb {
        "list" | "ls" => Ok(Command::List),
        "refresh" => Ok(Command::Refresh),
        "html" => Ok(Command::Html),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "signup" => {
            let email = words.next().ok_or("usage: signup <email> <activity name>")?;
            let activity = words.collect::<Vec<_>>().join(" ");
            if activity.is_empty() {
                return Err("usage: signup <email> <activity name>".into());
            }
            Ok(Command::Signup {
                email: email.to_string(),
                activity,
            })
        }
        "remove" | "rm" => {
            let mut position = || {
                words
                    .next()
                    .and_then(|w| w.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| "usage: remove <card#> <row#> (numbers start at 1)".to_string())
            };
            let card = position()?;
            let row = position()?;
            Ok(Command::Remove {
                card: card - 1,
                row: row - 1,
            })
        }
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

type ConfirmRequest = (String, oneshot::Sender<bool>);

/// Hands each prompt to the input loop, which answers it with the next line
/// typed.
struct StdinConfirm {
    requests: mpsc::UnboundedSender<ConfirmRequest>,
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        if self.requests.send((prompt.to_string(), reply)).is_err() {
            warn!("input loop is gone; treating confirmation as declined");
            return false;
        }
        answer.await.unwrap_or(false)
    }
}

/// Confirmations waiting for an answer, asked one at a time in order.
#[derive(Default)]
struct PendingPrompts {
    waiting: VecDeque<ConfirmRequest>,
}

impl PendingPrompts {
    /// Queues `request`; returns its prompt when it is the one now being asked.
    fn push(&mut self, request: ConfirmRequest) -> Option<String> {
        self.waiting.push_back(request);
        (self.waiting.len() == 1).then(|| self.waiting[0].0.clone())
    }

    fn is_asking(&self) -> bool {
        !self.waiting.is_empty()
    }

    /// Answers the prompt being asked; returns the next prompt to ask, if any.
    fn answer(&mut self, line: &str) -> Option<String> {
        if let Some((_, reply)) = self.waiting.pop_front() {
            // The asking task may have been dropped on shutdown.
            let _ = reply.send(is_yes(line));
        }
        self.waiting.front().map(|(prompt, _)| prompt.clone())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes")
}

fn ask(prompt: &str) {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
}

/// Runs a network-bound event off the input loop and prints the result
/// when it is done.
fn spawn_event(controller: &Arc<AppController>, event: UiEvent) {
    let controller = controller.clone();
    tokio::spawn(async move {
        controller.handle_event(event).await;
        print_page(&controller.snapshot().await);
        print_feedback(&controller).await;
    });
}

fn spawn_refresh(controller: &Arc<AppController>) {
    let controller = controller.clone();
    tokio::spawn(async move {
        controller.refresh().await;
        print_page(&controller.snapshot().await);
    });
}

fn print_page(doc: &Document) {
    for (index, node) in doc.roster.iter().enumerate() {
        let is_card = node
            .as_element()
            .is_some_and(|element| element.has_class("activity-card"));
        if is_card {
            println!("[{}]", index + 1);
        }
        print!("{}", layout(std::slice::from_ref(node)));
    }
}

async fn print_feedback(controller: &AppController) {
    if let Some(message) = controller.feedback().await {
        println!("({}) {}", message.kind.as_str(), message.text);
    }
}

fn page_html(doc: &Document, feedback: Option<Node>) -> String {
    let select = Element::new("select")
        .attr("id", "activity")
        .attr("name", "activity");
    let select = doc
        .activity_options
        .iter()
        .cloned()
        .fold(select, |select, option| select.child(option));
    let mut html = format!(
        "<div id=\"activities-list\">{}</div>\n{}\n",
        to_html(&doc.roster),
        Node::from(select).to_html()
    );
    if let Some(feedback) = feedback {
        html.push_str(&feedback.to_html());
        html.push('\n');
    }
    html
}

async fn run_command(controller: &Arc<AppController>, command: Command) {
    match command {
        Command::Help => println!("{HELP}"),
        Command::List => {
            print_page(&controller.snapshot().await);
            print_feedback(controller).await;
        }
        Command::Html => {
            let feedback = controller.feedback().await.map(|m| m.to_node());
            print!("{}", page_html(&controller.snapshot().await, feedback));
        }
        Command::Refresh => spawn_refresh(controller),
        Command::Signup { email, activity } => {
            controller
                .handle_event(UiEvent::FormChanged { email, activity })
                .await;
            spawn_event(controller, UiEvent::SubmitPressed);
        }
        Command::Remove { card, row } => {
            match controller.snapshot().await.removal_target_at(card, row) {
                Some(target) => spawn_event(controller, UiEvent::RemovalClicked(target)),
                None => println!("no participant at card {} row {}", card + 1, row + 1),
            }
        }
        Command::Quit => {}
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())
        .context("failed to load settings")?
        .with_overrides(args.server_url, args.log_filter)
        .validated()
        .context("invalid settings")?;
    init_tracing(&settings.log_filter);

    let api = HttpRosterClient::new(&settings.server_url)
        .with_context(|| format!("failed to build client for {}", settings.server_url))?;
    info!(server_url = %settings.server_url, "starting activity roster client");

    let (requests, mut prompt_rx) = mpsc::unbounded_channel();
    let confirm: Arc<dyn Confirm> = if args.yes {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(StdinConfirm { requests })
    };
    let controller = Arc::new(AppController::new(Arc::new(api), confirm));

    controller.handle_event(UiEvent::PageLoaded).await;
    print_page(&controller.snapshot().await);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prompts = PendingPrompts::default();
    print!("> ");
    std::io::stdout().flush().context("failed to flush stdout")?;

    loop {
        let line = tokio::select! {
            Some(request) = prompt_rx.recv() => {
                if let Some(prompt) = prompts.push(request) {
                    println!();
                    ask(&prompt);
                }
                continue;
            }
            line = lines.next_line() => line.context("failed to read command")?,
        };
        let Some(line) = line else {
            break;
        };

        if prompts.is_asking() {
            if let Some(next) = prompts.answer(&line) {
                ask(&next);
            }
            continue;
        }

        if !line.trim().is_empty() {
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => run_command(&controller, command).await,
                Err(message) => println!("{message}"),
            }
        }
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;
    }

    Ok(())
}
