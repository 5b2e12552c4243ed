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

use colored::Colorize;
use serde::Serialize;

use crate::console::profile::ProfileDistribution;
use crate::console::selection::{self, ViewerBinding};
use crate::console::state::{ConsoleState, ResultStore};
use crate::console::types::Source;

const SNIPPET_PREVIEW_CHARS: usize = 240;

pub const EMPTY_ANSWER: &str = "Ask a question to see the answer here.";
pub const PAGE_IMAGE_PLACEHOLDER: &str = "Select a source to show its PDF page.";

pub fn format_header(state: &ConsoleState) -> String {
    let results = &state.results;
    format!(
        "{} {}   {} {}   {} {}   {} {}",
        "Sources".blue().bold(),
        results.sources().len(),
        "Profiles".blue().bold(),
        results.profile_distribution().len(),
        "Selected".blue().bold(),
        selection::page_marker(results.selected()),
        "Top-K".blue().bold(),
        state.params.top_k
    )
}

pub fn format_answer(results: &ResultStore) -> String {
    let mut output = String::new();
    output.push_str(&"Answer".bold().to_string());
    output.push('\n');

    match results.answer() {
        Some(answer) if !answer.is_empty() => output.push_str(answer),
        _ => output.push_str(&EMPTY_ANSWER.bright_black().to_string()),
    }
    output.push('\n');

    output
}

/// Profile badges, e.g. `[dense_text · 2] [unknown · 1]`. Empty when there are no sources.
pub fn format_profile_badges(dist: &ProfileDistribution) -> String {
    dist.iter()
        .map(|(profile, count)| format!("[{} · {}]", profile, count))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_sources(results: &ResultStore) -> String {
    let sources = results.sources();
    let mut output = String::new();

    output.push_str(&format!("{} ({})", "Sources".bold(), sources.len()));
    output.push('\n');

    let profiles = results.profile_distribution();
    if !profiles.is_empty() {
        output.push_str(&format_profile_badges(&profiles).cyan().to_string());
        output.push('\n');
    }

    for (index, source) in sources.iter().enumerate() {
        output.push_str(&"─".repeat(60));
        output.push('\n');
        output.push_str(&format_source_line(index + 1, source, results.is_selected(source)));
        output.push('\n');
        output.push_str(&source.viewer_url.bright_black().to_string());
        output.push('\n');

        if let Some(snippet) = source.snippet.as_deref().filter(|s| !s.is_empty()) {
            let preview = if snippet.chars().count() > SNIPPET_PREVIEW_CHARS {
                format!("{}...", truncate_chars(snippet, SNIPPET_PREVIEW_CHARS))
            } else {
                snippet.to_string()
            };
            output.push_str(&preview);
            output.push('\n');
        }
    }

    output
}

fn format_source_line(rank: usize, source: &Source, active: bool) -> String {
    let marker = if active { ">" } else { " " };
    let mut details = format!("p.{} · chunk {}", source.display_page(), source.chunk_id);
    if let Some(profile) = &source.chunk_profile {
        details.push_str(&format!(" · {}", profile));
    }

    let title = format!("{} {:>2}. {}", marker, rank, source.pdf_id);
    let title = if active {
        title.blue().bold().to_string()
    } else {
        title.bold().to_string()
    };

    format!("{}  {}", title, details.bright_black())
}

pub fn format_viewer(binding: &ViewerBinding) -> String {
    let mut output = String::new();
    output.push_str(&"PDF viewer".bold().to_string());
    output.push('\n');
    output.push_str(&binding.label);
    output.push('\n');

    if let Some(viewer_url) = &binding.viewer_url {
        output.push_str(&format!("Open: {}", viewer_url.green()));
        output.push('\n');
    }

    match &binding.page_image_url {
        Some(url) => output.push_str(&format!("Page image: {}", url.green())),
        None => output.push_str(&PAGE_IMAGE_PLACEHOLDER.bright_black().to_string()),
    }
    output.push('\n');

    output
}

/// Full console view: header stats, answer, ranked sources and viewer panel
pub fn format_view(state: &ConsoleState) -> String {
    let mut output = String::new();
    output.push_str(&format_header(state));
    output.push_str("\n\n");
    output.push_str(&format_answer(&state.results));
    output.push('\n');
    output.push_str(&format_sources(&state.results));
    output.push('\n');
    output.push_str(&format_viewer(&state.results.viewer()));
    output
}

/// Machine-readable view for `--format json`
#[derive(Debug, Serialize)]
pub struct AnswerView<'a> {
    pub answer: Option<&'a str>,
    pub sources: &'a [Source],
    pub profiles: ProfileDistribution,
    pub selected_rank: Option<usize>,
    pub viewer: ViewerBinding,
}

pub fn format_json(results: &ResultStore) -> serde_json::Result<String> {
    let view = AnswerView {
        answer: results.answer(),
        sources: results.sources(),
        profiles: results.profile_distribution(),
        selected_rank: results.selected_rank(),
        viewer: results.viewer(),
    };
    serde_json::to_string_pretty(&view)
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
