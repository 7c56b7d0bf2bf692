//! Search request lifecycle
//!
//! `Idle -> InFlight -> {Success, Failure}` with validation in front and at most
//! one outstanding request. The empty-result view is derived, never stored.

use uuid::Uuid;

use crate::backend::types::{SearchQuery, SearchResultItem};

pub const QUERY_REQUIRED: &str = "검색어를 입력해주세요.";
pub const SEARCH_FAILED: &str = "검색에 실패했습니다.";
pub const SEARCH_CANCELLED: &str = "검색이 취소되었습니다.";
pub const EMPTY_RESULT: &str = "검색 결과가 없습니다.";

pub type RequestId = Uuid;

/// Outcome of a submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Accepted; the caller must issue exactly this request and report back with its id
    Dispatch { id: RequestId, query: SearchQuery },
    /// A request is already outstanding; nothing changed
    Suppressed,
    /// Blank query; failure recorded without a network call
    Invalid,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    results: Vec<SearchResultItem>,
    in_flight: Option<RequestId>,
    error: Option<&'static str>,
    has_searched: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn submit(&mut self, sido: &str, sigungu: &str) -> Submission {
        if let Some(id) = self.in_flight {
            tracing::debug!(%id, "Submission suppressed, request still in flight");
            return Submission::Suppressed;
        }

        if self.query.trim().is_empty() {
            tracing::debug!("Submission rejected: empty query");
            self.results.clear();
            self.error = Some(QUERY_REQUIRED);
            return Submission::Invalid;
        }

        let id = Uuid::new_v4();
        let query = SearchQuery::new(self.query.clone(), sido, sigungu);
        tracing::info!(%id, query = %query.query, sido = ?query.sido, sigungu = ?query.sigungu, "Search dispatched");

        self.in_flight = Some(id);
        self.error = None;
        self.has_searched = true;
        Submission::Dispatch { id, query }
    }

    /// Apply a finished request. Returns false when `id` is not the outstanding request.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        id: RequestId,
        outcome: Result<Vec<SearchResultItem>, E>,
    ) -> bool {
        if self.in_flight != Some(id) {
            tracing::debug!(%id, "Discarding stale search completion");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(results) => {
                tracing::info!(%id, count = results.len(), "Search complete");
                self.results = results;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(%id, "Search failed: {}", e);
                self.results.clear();
                self.error = Some(SEARCH_FAILED);
            }
        }
        true
    }

    /// Abandon the outstanding request, if any, and return its id
    pub fn cancel(&mut self) -> Option<RequestId> {
        let id = self.in_flight.take()?;
        tracing::info!(%id, "Search cancelled");
        self.error = Some(SEARCH_CANCELLED);
        Some(id)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// A completed search that legitimately found nothing
    pub fn is_empty_result(&self) -> bool {
        self.has_searched && self.results.is_empty() && !self.is_loading() && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa() -> SearchResultItem {
        SearchResultItem {
            name: "소파".to_string(),
            category: "가구".to_string(),
            spec: None,
            fee: 15000,
            similarity: 0.92,
            sido: "서울".to_string(),
            sigungu: "강남구".to_string(),
        }
    }

    fn dispatched(session: &mut SearchSession, query: &str) -> RequestId {
        session.set_query(query);
        match session.submit("", "") {
            Submission::Dispatch { id, .. } => id,
            other => panic!("Expected Dispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_query_is_rejected() {
        let mut session = SearchSession::new();
        let id = dispatched(&mut session, "소파");
        session.complete::<String>(id, Ok(vec![sofa()]));

        for blank in ["", "   ", "\t\n"] {
            session.set_query(blank);
            assert_eq!(session.submit("서울", ""), Submission::Invalid);
            assert_eq!(session.error(), Some(QUERY_REQUIRED));
            assert!(session.results().is_empty());
            assert!(!session.is_loading());
        }
    }

    #[test]
    fn test_dispatch_carries_filters() {
        let mut session = SearchSession::new();
        session.set_query("티비");
        match session.submit("서울", "") {
            Submission::Dispatch { query, .. } => {
                assert_eq!(query.query, "티비");
                assert_eq!(query.sido.as_deref(), Some("서울"));
                assert_eq!(query.sigungu, None);
            }
            other => panic!("Expected Dispatch, got {:?}", other),
        }
        assert!(session.is_loading());
        assert!(session.has_searched());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_submit_while_loading_is_suppressed() {
        let mut session = SearchSession::new();
        let id = dispatched(&mut session, "소파");

        session.set_query("");
        assert_eq!(session.submit("", ""), Submission::Suppressed);
        assert_eq!(session.in_flight(), Some(id));
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_success_keeps_backend_order() {
        let mut session = SearchSession::new();
        let id = dispatched(&mut session, "소파");
        let mut second = sofa();
        second.name = "소파베드".to_string();
        second.similarity = 0.81;

        assert!(session.complete::<String>(id, Ok(vec![sofa(), second.clone()])));
        assert_eq!(session.results(), [sofa(), second]);
        assert!(!session.is_loading());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_failure_clears_results() {
        let mut session = SearchSession::new();
        let id = dispatched(&mut session, "소파");
        session.complete::<String>(id, Ok(vec![sofa()]));

        let id = dispatched(&mut session, "소파");
        assert!(session.complete(id, Err("HTTP 500")));
        assert!(session.results().is_empty());
        assert_eq!(session.error(), Some(SEARCH_FAILED));
        assert!(!session.is_loading());
        assert!(!session.is_empty_result());
    }

    #[test]
    fn test_empty_result_view() {
        let mut session = SearchSession::new();
        assert!(!session.is_empty_result());

        let id = dispatched(&mut session, "냉장고");
        assert!(!session.is_empty_result());

        session.complete::<String>(id, Ok(Vec::new()));
        assert!(session.is_empty_result());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_validation_failure_is_not_empty_result() {
        let mut session = SearchSession::new();
        let id = dispatched(&mut session, "냉장고");
        session.complete::<String>(id, Ok(Vec::new()));

        session.set_query(" ");
        session.submit("", "");
        assert!(!session.is_empty_result());
    }

    #[test]
    fn test_cancel_discards_late_completion() {
        let mut session = SearchSession::new();
        let id = dispatched(&mut session, "소파");

        assert_eq!(session.cancel(), Some(id));
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some(SEARCH_CANCELLED));
        assert!(!session.is_empty_result());

        assert!(!session.complete::<String>(id, Ok(vec![sofa()])));
        assert!(session.results().is_empty());

        // The session accepts new work after cancelling.
        let next = dispatched(&mut session, "소파");
        assert_ne!(next, id);
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut session = SearchSession::new();
        assert_eq!(session.cancel(), None);
        assert_eq!(session.error(), None);
    }
}
