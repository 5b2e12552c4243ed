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

use std::fmt::Display;
use thiserror::Error;

use crate::console::types::ErrorBody;

const GENERIC_FAILURE: &str = "Request failed";

/// Failure of a single ask round trip. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AskError {
    /// Network unreachable, connection reset, timeout
    #[error("{0}")]
    Transport(String),

    /// Non-success HTTP status reported by the service
    #[error("{message}")]
    Service { status: u16, message: String },

    /// Success status with a body that is not a valid answer
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl AskError {
    pub fn transport(err: impl Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            AskError::Transport(GENERIC_FAILURE.to_string())
        } else {
            AskError::Transport(message)
        }
    }

    /// Build a service error from a non-success response.
    /// The body is parsed best-effort; an unreadable body falls back to the status code.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();
        let message = parsed
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} (HTTP {})", GENERIC_FAILURE, status));

        AskError::Service { status, message }
    }

    /// Short tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            AskError::Transport(_) => "transport",
            AskError::Service { .. } => "service",
            AskError::MalformedResponse(_) => "malformed_response",
        }
    }
}
