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
use clap::Parser;

mod cli;
mod commands;
mod config;
mod console;
mod logging;
mod storage;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    // The interactive console keeps the terminal for the prompt and logs to files
    let log_dir = match cli.command {
        Commands::Console { .. } => Some(logging::init_console_logging(cli.debug)?),
        Commands::Ask { .. } => {
            logging::init_stderr_logging(cli.debug);
            None
        }
    };

    // Load configuration
    let config = Config::load()?.with_base_url(cli.base_url);

    // Execute the command
    if let Err(e) = commands::execute(&config, cli.command, log_dir).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
