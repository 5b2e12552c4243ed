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

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{Commands, OutputFormat};
use crate::config::Config;
use crate::console::format;
use crate::console::repl::Repl;
use crate::console::state::Refusal;
use crate::console::{
    AskRequestExecutor, ConsoleSession, HttpAskTransport, QueryParameters, SubmitOutcome,
};

/// Run one command. `log_dir` is where file logging goes, if enabled.
pub async fn execute(
    config: &Config,
    command: Commands,
    log_dir: Option<PathBuf>,
) -> Result<()> {
    match command {
        Commands::Ask {
            question,
            top_k,
            pdf_id,
            select,
            format,
        } => {
            let mut params = initial_params(config, top_k, pdf_id);
            params.question = question.join(" ");
            ask(config, params, select, format).await
        }
        Commands::Console { top_k, pdf_id } => {
            let params = initial_params(config, top_k, pdf_id);
            console(config, params, log_dir).await
        }
    }
}

fn initial_params(config: &Config, top_k: Option<u32>, pdf_id: Option<String>) -> QueryParameters {
    let mut params = QueryParameters::from_config(&config.query);
    if let Some(top_k) = top_k {
        params.top_k = top_k;
    }
    if let Some(pdf_id) = pdf_id {
        params.pdf_id = pdf_id;
    }
    if let Some(hint) = params.top_k_hint(&config.query) {
        warn!("{}", hint);
    }
    params
}

fn executor(config: &Config) -> Result<AskRequestExecutor> {
    let transport = HttpAskTransport::new(&config.service)?;
    info!(endpoint = transport.endpoint(), "Using answer service");
    Ok(AskRequestExecutor::new(Arc::new(transport)))
}

async fn ask(
    config: &Config,
    params: QueryParameters,
    select: Option<usize>,
    output_format: OutputFormat,
) -> Result<()> {
    let session = ConsoleSession::new(params);

    match executor(config)?.submit(&session).await {
        SubmitOutcome::Answered { .. } => {}
        SubmitOutcome::Failed(err) => bail!("{}", err),
        SubmitOutcome::Refused(Refusal::BlankQuestion) => bail!("Question must not be empty"),
        SubmitOutcome::Refused(Refusal::InFlight) => bail!("A question is already in flight"),
    }

    if let Some(rank) = select {
        if session.select_rank(rank).await.is_none() {
            let count = session.snapshot().await.results.sources().len();
            bail!("No source #{} in the answer ({} sources)", rank, count);
        }
    }

    let state = session.snapshot().await;
    match output_format {
        OutputFormat::Text => println!("{}", format::format_view(&state)),
        OutputFormat::Json => println!("{}", format::format_json(&state.results)?),
    }

    Ok(())
}

async fn console(
    config: &Config,
    params: QueryParameters,
    log_dir: Option<PathBuf>,
) -> Result<()> {
    let repl = Repl::new(
        ConsoleSession::new(params),
        executor(config)?,
        config.query.clone(),
    )
    .with_log_dir(log_dir);
    repl.run().await
}
