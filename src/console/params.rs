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

use crate::config::QueryConfig;
use crate::console::types::AskRequest;

/// User-editable inputs of a question. They survive across submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub question: String,
    pub top_k: u32,
    pub pdf_id: String,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            question: String::new(),
            top_k: 10,
            pdf_id: String::new(),
        }
    }
}

impl QueryParameters {
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            top_k: config.default_top_k,
            ..Self::default()
        }
    }

    /// Submission is allowed only for a question with visible text
    pub fn is_submittable(&self) -> bool {
        !self.question.trim().is_empty()
    }

    /// Document filter as sent on the wire: blank means no filter
    pub fn document_filter(&self) -> Option<String> {
        let trimmed = self.pdf_id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Build the wire request, or `None` when the question is blank
    pub fn to_request(&self) -> Option<AskRequest> {
        if !self.is_submittable() {
            return None;
        }

        Some(AskRequest {
            question: self.question.trim().to_string(),
            top_k: self.top_k,
            pdf_id: self.document_filter(),
        })
    }

    /// Warning text when top-k falls outside the advisory bounds.
    /// Out-of-range values are still sent unchanged.
    pub fn top_k_hint(&self, config: &QueryConfig) -> Option<String> {
        if self.top_k < config.min_top_k || self.top_k > config.max_top_k {
            Some(format!(
                "top-k {} is outside the suggested range {}-{}",
                self.top_k, config.min_top_k, config.max_top_k
            ))
        } else {
            None
        }
    }
}
