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

use std::path::PathBuf;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, fmt::Layer, prelude::*, registry::Registry, EnvFilter};

fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("warn,evidence_console=debug")
        } else {
            EnvFilter::new("evidence_console=warn")
        }
    })
}

/// Logging for one-shot commands: compact lines on stderr
pub fn init_stderr_logging(debug_mode: bool) {
    fmt()
        .with_env_filter(env_filter(debug_mode))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Logging for the interactive console.
/// Logs go to rotating JSON files so they never interleave with the prompt.
pub fn init_console_logging(debug_mode: bool) -> Result<PathBuf, anyhow::Error> {
    let log_dir = crate::storage::get_log_dir()?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "console.log");

    let file_layer = Layer::new()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json();

    Registry::default()
        .with(file_layer)
        .with(env_filter(debug_mode))
        .init();

    info!(
        log_directory = %log_dir.display(),
        debug_mode = debug_mode,
        "Console logging initialized"
    );

    Ok(log_dir)
}
