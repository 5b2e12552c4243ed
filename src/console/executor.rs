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

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::console::state::{ConsoleSession, InFlightGuard, Refusal, SubmitOutcome};
use crate::console::transport::AskTransport;
use crate::console::types::AskRequest;

/// Runs ask round trips against a session.
///
/// Only one request is active per session: the in-flight guard is taken at
/// dispatch and released after the completion transition, on every exit path.
#[derive(Clone)]
pub struct AskRequestExecutor {
    transport: Arc<dyn AskTransport>,
}

impl AskRequestExecutor {
    pub fn new(transport: Arc<dyn AskTransport>) -> Self {
        Self { transport }
    }

    /// Dispatch and wait for the completion transition
    pub async fn submit(&self, session: &ConsoleSession) -> SubmitOutcome {
        match self.dispatch(session).await {
            Ok(dispatched) => dispatched.finish(session).await,
            Err(refusal) => SubmitOutcome::Refused(refusal),
        }
    }

    /// Dispatch transition only. On success the flag is held and the previous
    /// answer is cleared; the round trip runs when the returned ask is finished.
    pub async fn dispatch(&self, session: &ConsoleSession) -> Result<DispatchedAsk, Refusal> {
        let dispatch = {
            let mut state = session.state().lock().await;
            state.begin(session.in_flight())
        };

        let (request, guard) = dispatch.map_err(|refusal| {
            debug!(?refusal, "Submission refused");
            refusal
        })?;

        let request_id = Uuid::new_v4();
        let span = info_span!(
            "ask",
            request_id = %request_id,
            top_k = request.top_k,
            pdf_id = request.pdf_id.as_deref().unwrap_or("-")
        );

        Ok(DispatchedAsk {
            transport: self.transport.clone(),
            request,
            guard,
            span,
            started: Instant::now(),
        })
    }
}

/// A request that holds the in-flight flag. Dropping it unfinished releases the flag.
pub struct DispatchedAsk {
    transport: Arc<dyn AskTransport>,
    request: AskRequest,
    guard: InFlightGuard,
    span: Span,
    started: Instant,
}

impl DispatchedAsk {
    pub async fn finish(self, session: &ConsoleSession) -> SubmitOutcome {
        let DispatchedAsk {
            transport,
            request,
            guard,
            span,
            started,
        } = self;

        let response = transport.ask(&request).instrument(span.clone()).await;

        let outcome = session.state().lock().await.complete(response);

        span.in_scope(|| match &outcome {
            SubmitOutcome::Answered { sources } => debug!(
                sources = *sources,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Answer received"
            ),
            SubmitOutcome::Failed(err) => warn!(
                kind = err.kind(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Ask request failed: {}",
                err
            ),
            SubmitOutcome::Refused(_) => {}
        });

        drop(guard);
        outcome
    }
}
