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

use serde::{Deserialize, Serialize};

/// Category used when a source carries no chunk profile
pub const UNKNOWN_PROFILE: &str = "unknown";

/// One retrieved passage cited as evidence for the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub pdf_id: String,
    pub pdf_path: String,
    /// Zero-based page index inside the document
    pub page_no: u32,
    pub chunk_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_profile: Option<String>,
    pub pdf_url: String,
    pub viewer_url: String,
    #[serde(default)]
    pub page_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Source {
    /// Same `(pdf_id, chunk_id)` pair, regardless of the other fields
    pub fn same_passage(&self, other: &Source) -> bool {
        self.pdf_id == other.pdf_id && self.chunk_id == other.chunk_id
    }

    /// One-based page number for display. Widened so the last `u32` page still has a successor.
    pub fn display_page(&self) -> u64 {
        u64::from(self.page_no) + 1
    }

    pub fn profile(&self) -> &str {
        self.chunk_profile.as_deref().unwrap_or(UNKNOWN_PROFILE)
    }
}

/// Generated answer plus its ranked supporting sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// Wire body of `POST /pdf/ask`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: u32,
    pub pdf_id: Option<String>,
}

/// Best-effort shape of an error body returned by the service
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        [self.detail.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
pub(crate) fn sample_source(
    pdf_id: &str,
    page_no: u32,
    chunk_id: i64,
    profile: Option<&str>,
) -> Source {
    Source {
        pdf_id: pdf_id.to_string(),
        pdf_path: format!("data/pdfs/{}.pdf", pdf_id),
        page_no,
        chunk_id,
        chunk_profile: profile.map(str::to_string),
        pdf_url: format!("/files/{}.pdf", pdf_id),
        viewer_url: format!("/files/{}.pdf#page={}", pdf_id, page_no + 1),
        page_image_url: Some(format!("/pdf/page-image?pdf_id={}&page={}", pdf_id, page_no)),
        snippet: None,
    }
}
