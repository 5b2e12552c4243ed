// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::QueryConfig;
use crate::console::executor::AskRequestExecutor;
use crate::console::format;
use crate::console::state::{ConsoleSession, Refusal, SubmitOutcome};

pub const HELP: &str = "\
Type a question and press Enter to ask it.
  :k N          set top-k (suggested 1-50)
  :doc ID       only search document ID
  :doc          search all documents
  :select N     inspect source N (also :N)
  :sources      list the ranked sources again
  :open         show viewer and page image links of the selection
  :status       show current parameters and whether a question is being answered
  :help         show this help
  :quit         leave the console";

/// One line of console input
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Ask(String),
    TopK(u32),
    Document(Option<String>),
    Select(usize),
    Sources,
    Open,
    Status,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> ConsoleCommand {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleCommand::Empty;
    }

    let Some(command) = line.strip_prefix(':') else {
        return ConsoleCommand::Ask(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "k" | "top-k" | "topk" => match arg.parse::<u32>() {
            Ok(top_k) => ConsoleCommand::TopK(top_k),
            Err(_) => ConsoleCommand::Invalid(format!("top-k must be a number, got '{}'", arg)),
        },
        "doc" | "pdf" => {
            if arg.is_empty() {
                ConsoleCommand::Document(None)
            } else {
                ConsoleCommand::Document(Some(arg.to_string()))
            }
        }
        "select" | "s" => match arg.parse::<usize>() {
            Ok(rank) => ConsoleCommand::Select(rank),
            Err(_) => ConsoleCommand::Invalid(format!("source number expected, got '{}'", arg)),
        },
        "sources" | "ls" => ConsoleCommand::Sources,
        "open" => ConsoleCommand::Open,
        "status" => ConsoleCommand::Status,
        "help" | "h" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        other => match other.parse::<usize>() {
            Ok(rank) => ConsoleCommand::Select(rank),
            Err(_) => ConsoleCommand::Invalid(format!("unknown command ':{}'", other)),
        },
    }
}

/// Interactive console over stdin/stdout.
///
/// Questions are answered on a spawned task so the prompt keeps accepting
/// parameter edits and inspection commands while a request is in flight.
/// Finished answers come back through `completed` and are printed by `run`.
pub struct Repl {
    session: Arc<ConsoleSession>,
    executor: AskRequestExecutor,
    query_config: QueryConfig,
    log_dir: Option<PathBuf>,
    answers: mpsc::UnboundedSender<String>,
    completed: mpsc::UnboundedReceiver<String>,
}

impl Repl {
    pub fn new(
        session: ConsoleSession,
        executor: AskRequestExecutor,
        query_config: QueryConfig,
    ) -> Self {
        let (answers, completed) = mpsc::unbounded_channel();
        Self {
            session: Arc::new(session),
            executor,
            query_config,
            log_dir: None,
            answers,
            completed,
        }
    }

    /// Show where the console writes its logs in the banner
    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }

    fn banner(&self) -> String {
        let mut banner = format!("{}\n", "Document RAG evidence console".bold());
        if let Some(log_dir) = &self.log_dir {
            banner.push_str(&format!("Logs: {}\n", log_dir.display()).bright_black().to_string());
        }
        banner.push_str(HELP);
        banner.push_str("\n\n");
        banner
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(stdin()).lines();
        let mut stdout = stdout();

        stdout.write_all(self.banner().as_bytes()).await?;
        prompt(&mut stdout).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("EOF received, leaving console");
                        break;
                    };

                    let command = parse_command(&line);
                    if command == ConsoleCommand::Quit {
                        break;
                    }

                    let output = self.handle(command).await;
                    write_block(&mut stdout, &output).await?;
                    prompt(&mut stdout).await?;
                }
                Some(output) = self.completed.recv() => {
                    stdout.write_all(b"\n").await?;
                    write_block(&mut stdout, &output).await?;
                    prompt(&mut stdout).await?;
                }
            }
        }

        if self.session.is_in_flight() {
            debug!("Leaving console with a request still in flight");
        }

        Ok(())
    }

    /// Apply one command and return the text to print right away
    pub async fn handle(&self, command: ConsoleCommand) -> String {
        match command {
            ConsoleCommand::Empty | ConsoleCommand::Quit => String::new(),
            ConsoleCommand::Help => HELP.to_string(),
            ConsoleCommand::Invalid(message) => message.yellow().to_string(),
            ConsoleCommand::TopK(top_k) => {
                self.session.set_top_k(top_k).await;
                let params = self.session.snapshot().await.params;
                match params.top_k_hint(&self.query_config) {
                    Some(hint) => format!("top-k set to {} ({})", top_k, hint.yellow()),
                    None => format!("top-k set to {}", top_k),
                }
            }
            ConsoleCommand::Document(pdf_id) => {
                let message = match &pdf_id {
                    Some(id) => format!("searching only '{}'", id),
                    None => "searching all documents".to_string(),
                };
                self.session.set_pdf_id(pdf_id.unwrap_or_default()).await;
                message
            }
            ConsoleCommand::Status => {
                let state = self.session.snapshot().await;
                let filter = state
                    .params
                    .document_filter()
                    .unwrap_or_else(|| "(all documents)".to_string());
                let request = if self.session.is_in_flight() {
                    ASKING.yellow().to_string()
                } else {
                    "idle".to_string()
                };
                format!(
                    "{}\nDocument filter: {}\nRequest: {}",
                    format::format_header(&state),
                    filter,
                    request
                )
            }
            ConsoleCommand::Sources => {
                let state = self.session.snapshot().await;
                format::format_sources(&state.results)
            }
            ConsoleCommand::Open => {
                let state = self.session.snapshot().await;
                format::format_viewer(&state.results.viewer())
            }
            ConsoleCommand::Select(rank) => match self.session.select_rank(rank).await {
                Some(_) => {
                    let state = self.session.snapshot().await;
                    format::format_viewer(&state.results.viewer())
                }
                None => {
                    let count = self.session.snapshot().await.results.sources().len();
                    format!("no source #{} (have {})", rank, count)
                        .yellow()
                        .to_string()
                }
            },
            ConsoleCommand::Ask(question) => self.ask(question).await,
        }
    }

    /// Dispatch a question and answer it on a background task.
    /// A refused question leaves the current question and answer untouched.
    async fn ask(&self, question: String) -> String {
        if self.session.is_in_flight() {
            return ALREADY_ASKING.yellow().to_string();
        }

        self.session.set_question(question).await;
        let dispatched = match self.executor.dispatch(&self.session).await {
            Ok(dispatched) => dispatched,
            Err(Refusal::BlankQuestion) => return String::new(),
            Err(Refusal::InFlight) => return ALREADY_ASKING.yellow().to_string(),
        };

        let session = self.session.clone();
        let answers = self.answers.clone();
        tokio::spawn(async move {
            let output = match dispatched.finish(&session).await {
                SubmitOutcome::Answered { .. } => format::format_view(&session.snapshot().await),
                SubmitOutcome::Failed(err) => format!("{} {}", "Error:".red().bold(), err),
                SubmitOutcome::Refused(_) => return,
            };
            if answers.send(output).is_err() {
                debug!("Console closed before the answer arrived");
            }
        });

        ASKING.bright_black().to_string()
    }
}

const ASKING: &str = "asking...";
const ALREADY_ASKING: &str = "a question is already being answered";

async fn prompt(stdout: &mut Stdout) -> Result<()> {
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}

async fn write_block(stdout: &mut Stdout, output: &str) -> Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    stdout.write_all(output.as_bytes()).await?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
