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

//! Console state container.
//!
//! `ConsoleState` owns the query parameters and the result store and exposes one
//! transition per user or network event. `ConsoleSession` pairs it with the
//! in-flight flag so that the executor can hold the flag across the request
//! without holding the state lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::console::error::AskError;
use crate::console::params::QueryParameters;
use crate::console::profile::ProfileDistribution;
use crate::console::selection::{self, ViewerBinding};
use crate::console::types::{AnswerResult, AskRequest, Source};

/// Latest successful answer and the selected source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    result: Option<AnswerResult>,
    selected: Option<Source>,
}

impl ResultStore {
    pub fn clear(&mut self) {
        self.result = None;
        self.selected = None;
    }

    /// Replace the store wholesale and select the top-ranked source
    pub fn accept(&mut self, result: AnswerResult) {
        self.selected = result.sources.first().cloned();
        self.result = Some(result);
    }

    pub fn select(&mut self, source: Source) {
        self.selected = Some(source);
    }

    /// Select by one-based rank. Out-of-range ranks leave the selection untouched.
    pub fn select_rank(&mut self, rank: usize) -> Option<&Source> {
        let source = rank
            .checked_sub(1)
            .and_then(|index| self.sources().get(index))
            .cloned()?;
        self.select(source);
        self.selected.as_ref()
    }

    #[cfg(test)]
    pub fn result(&self) -> Option<&AnswerResult> {
        self.result.as_ref()
    }

    pub fn answer(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.answer.as_str())
    }

    pub fn sources(&self) -> &[Source] {
        self.result
            .as_ref()
            .map(|r| r.sources.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected(&self) -> Option<&Source> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, source: &Source) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|selected| selected.same_passage(source))
    }

    /// One-based rank of the selected source in the current result
    pub fn selected_rank(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.sources()
            .iter()
            .position(|s| s.same_passage(selected))
            .map(|index| index + 1)
    }

    pub fn profile_distribution(&self) -> ProfileDistribution {
        ProfileDistribution::aggregate(self.sources())
    }

    pub fn viewer(&self) -> ViewerBinding {
        selection::bind(self.selected())
    }
}

/// Why a submission did not dispatch a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    BlankQuestion,
    InFlight,
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Answered { sources: usize },
    Failed(AskError),
    Refused(Refusal),
}

/// Shared in-flight marker. Set by `try_acquire`, cleared when the guard drops.
#[derive(Debug, Clone, Default)]
pub struct InFlightFlag(Arc<AtomicBool>);

impl InFlightFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard(self.0.clone()))
    }
}

#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Query parameters plus result store, with one transition per event
#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    pub params: QueryParameters,
    pub results: ResultStore,
}

impl ConsoleState {
    pub fn new(params: QueryParameters) -> Self {
        Self {
            params,
            results: ResultStore::default(),
        }
    }

    /// Dispatch transition: validate, take the flag, then clear the previous answer.
    /// A refused submission leaves the state untouched.
    pub fn begin(
        &mut self,
        in_flight: &InFlightFlag,
    ) -> Result<(AskRequest, InFlightGuard), Refusal> {
        let request = self.params.to_request().ok_or(Refusal::BlankQuestion)?;
        let guard = in_flight.try_acquire().ok_or(Refusal::InFlight)?;
        self.results.clear();
        Ok((request, guard))
    }

    /// Completion transition. Failures keep the store as cleared at dispatch.
    pub fn complete(&mut self, outcome: Result<AnswerResult, AskError>) -> SubmitOutcome {
        match outcome {
            Ok(result) => {
                let sources = result.sources.len();
                self.results.accept(result);
                SubmitOutcome::Answered { sources }
            }
            Err(err) => SubmitOutcome::Failed(err),
        }
    }
}

/// Centrally owned console state shared between the view and the executor
#[derive(Debug, Default)]
pub struct ConsoleSession {
    state: Mutex<ConsoleState>,
    in_flight: InFlightFlag,
}

impl ConsoleSession {
    pub fn new(params: QueryParameters) -> Self {
        Self {
            state: Mutex::new(ConsoleState::new(params)),
            in_flight: InFlightFlag::default(),
        }
    }

    pub fn state(&self) -> &Mutex<ConsoleState> {
        &self.state
    }

    pub fn in_flight(&self) -> &InFlightFlag {
        &self.in_flight
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_set()
    }

    pub async fn snapshot(&self) -> ConsoleState {
        self.state.lock().await.clone()
    }

    pub async fn set_question(&self, question: impl Into<String>) {
        self.state.lock().await.params.question = question.into();
    }

    pub async fn set_top_k(&self, top_k: u32) {
        self.state.lock().await.params.top_k = top_k;
    }

    pub async fn set_pdf_id(&self, pdf_id: impl Into<String>) {
        self.state.lock().await.params.pdf_id = pdf_id.into();
    }

    pub async fn select_rank(&self, rank: usize) -> Option<Source> {
        self.state.lock().await.results.select_rank(rank).cloned()
    }
}
