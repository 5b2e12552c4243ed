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

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "evidence-console")]
#[command(version, author = "Muvon Un Limited <opensource@muvon.io>")]
#[command(about = "Ask questions about indexed documents and verify the answer against its cited pages", long_about = None)]
pub struct Cli {
    /// Base URL of the answer service (overrides config.toml)
    #[arg(long, global = true, env = "EVIDENCE_CONSOLE_BASE_URL")]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question and print the answer with its sources
    Ask {
        /// Question to ask (multiple words are joined)
        #[arg(required = true)]
        question: Vec<String>,

        /// Maximum number of sources to retrieve (suggested 1-50)
        #[arg(short = 'k', long)]
        top_k: Option<u32>,

        /// Only search this document
        #[arg(short = 'd', long)]
        pdf_id: Option<String>,

        /// Inspect this source (1-based rank) instead of the top-ranked one
        #[arg(short, long)]
        select: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Start the interactive evidence console
    Console {
        /// Initial top-k (suggested 1-50)
        #[arg(short = 'k', long)]
        top_k: Option<u32>,

        /// Initial document filter
        #[arg(short = 'd', long)]
        pdf_id: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
