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

#[cfg(test)]
mod tests {
    use super::super::error::AskError;
    use super::super::params::QueryParameters;
    use super::super::state::{ConsoleState, InFlightFlag, Refusal, ResultStore, SubmitOutcome};
    use super::super::types::{sample_source, AnswerResult};

    fn answer() -> AnswerResult {
        AnswerResult {
            answer: "Leave is accrued monthly.".to_string(),
            sources: vec![
                sample_source("handbook", 4, 7, Some("dense_text")),
                sample_source("handbook", 9, 21, None),
                sample_source("policy", 0, 3, Some("table")),
            ],
        }
    }

    #[test]
    fn test_in_flight_flag_is_exclusive() {
        let flag = InFlightFlag::default();
        assert!(!flag.is_set());

        let guard = flag.try_acquire().expect("first acquire succeeds");
        assert!(flag.is_set());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_set());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_accept_selects_first_source() {
        let mut store = ResultStore::default();
        store.accept(answer());

        assert_eq!(store.answer(), Some("Leave is accrued monthly."));
        assert_eq!(store.sources().len(), 3);
        assert_eq!(store.selected().map(|s| s.chunk_id), Some(7));
    }

    #[test]
    fn test_select_changes_only_selection() {
        let mut store = ResultStore::default();
        let result = answer();
        store.accept(result.clone());

        let third = result.sources[2].clone();
        store.select(third.clone());

        assert_eq!(store.result(), Some(&result));
        assert_eq!(store.selected(), Some(&third));
        assert_eq!(store.selected_rank(), Some(3));
        assert!(store.is_selected(&third));
        assert!(!store.is_selected(&result.sources[0]));
    }

    #[test]
    fn test_reselecting_equal_source_is_idempotent() {
        let mut store = ResultStore::default();
        store.accept(answer());

        let mut refetched = answer().sources[1].clone();
        refetched.snippet = Some("same passage, fresh copy".to_string());

        store.select(refetched.clone());
        let once = store.selected_rank();
        store.select(refetched);
        assert_eq!(store.selected_rank(), once);
        assert_eq!(once, Some(2));
    }

    #[test]
    fn test_select_rank_bounds() {
        let mut store = ResultStore::default();
        store.accept(answer());

        assert_eq!(store.select_rank(2).map(|s| s.chunk_id), Some(21));
        assert!(store.select_rank(0).is_none());
        assert!(store.select_rank(4).is_none());
        assert_eq!(store.selected().map(|s| s.chunk_id), Some(21));
    }

    #[test]
    fn test_select_rank_without_result() {
        let mut store = ResultStore::default();
        assert!(store.select_rank(1).is_none());
        assert_eq!(store.selected(), None);
        assert!(store.sources().is_empty());
        assert!(store.profile_distribution().is_empty());
    }

    #[test]
    fn test_derived_views_follow_selection() {
        let mut store = ResultStore::default();
        store.accept(answer());

        let dist = store.profile_distribution();
        assert_eq!(dist.count("dense_text"), 1);
        assert_eq!(dist.count("unknown"), 1);
        assert_eq!(dist.count("table"), 1);

        assert_eq!(store.viewer().label, "handbook · p.5 · chunk 7");
        store.select_rank(3);
        assert_eq!(store.viewer().label, "policy · p.1 · chunk 3");
    }

    #[test]
    fn test_begin_clears_previous_result() {
        let flag = InFlightFlag::default();
        let mut state = ConsoleState::new(QueryParameters {
            question: "next question".to_string(),
            ..QueryParameters::default()
        });
        state.results.accept(answer());

        let (request, guard) = state.begin(&flag).unwrap();
        assert_eq!(request.question, "next question");
        assert_eq!(state.results, ResultStore::default());
        assert!(flag.is_set());

        drop(guard);
        assert!(!flag.is_set());
    }

    #[test]
    fn test_begin_refusals_leave_state_untouched() {
        let flag = InFlightFlag::default();
        let mut state = ConsoleState::default();
        state.results.accept(answer());
        let before = state.results.clone();

        assert_eq!(state.begin(&flag).unwrap_err(), Refusal::BlankQuestion);
        assert!(!flag.is_set());

        state.params.question = "question".to_string();
        let _held = flag.try_acquire().unwrap();
        assert_eq!(state.begin(&flag).unwrap_err(), Refusal::InFlight);
        assert_eq!(state.results, before);
    }

    #[test]
    fn test_complete_failure_keeps_cleared_store() {
        let mut state = ConsoleState::default();
        let outcome = state.complete(Err(AskError::transport("connection reset")));

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(AskError::Transport("connection reset".to_string()))
        );
        assert_eq!(state.results, ResultStore::default());
    }
}
