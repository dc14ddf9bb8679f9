use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tokio::sync::mpsc;

use crate::modules::archiving::core::archive_request::{ArchiveRequest, RequestError};
use crate::modules::archiving::core::execution_context::ExecutionContext;
use crate::modules::archiving::use_cases::authenticate::gate::AUTH_FAILURE_HTML;
use crate::modules::archiving::use_cases::select_log_sink::selector::SinkOutputs;
use crate::shell::state::AppState;

/// Raw query pairs, in request order.
type QueryPairs = Vec<(String, String)>;

/// Last value of `name`; a repeated parameter overrides earlier ones.
fn last_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArchiveParams {
    pub url: Option<String>,
    pub force_idsites: Option<String>,
    pub skip_idsites: Option<String>,
    pub force_periods: Option<String>,
    pub force_date_range: Option<String>,
}

impl ArchiveParams {
    /// Unknown parameters are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            url: last_value(pairs, "url"),
            force_idsites: last_value(pairs, "force_idsites"),
            skip_idsites: last_value(pairs, "skip_idsites"),
            force_periods: last_value(pairs, "force_periods"),
            force_date_range: last_value(pairs, "force_date_range"),
        }
    }

    fn to_request(&self) -> Result<ArchiveRequest, RequestError> {
        ArchiveRequest::from_options(
            self.url.clone(),
            self.force_idsites.as_deref(),
            self.skip_idsites.as_deref(),
            self.force_periods.as_deref(),
            self.force_date_range.as_deref(),
        )
    }
}

/// Browser-triggered archiving. Progress is streamed into the response body.
///
/// The gate runs on the raw pairs so that no malformed query can answer
/// before it.
pub async fn handle(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Response {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let context = ExecutionContext::http(last_value(&pairs, "token_auth"));
    let run = match state.run_archive.authorize(context) {
        Ok(run) => run,
        Err(err) => {
            tracing::warn!(error = %err, "refused browser-triggered archiving");
            return (StatusCode::FORBIDDEN, Html(AUTH_FAILURE_HTML)).into_response();
        }
    };

    let request = match ArchiveParams::from_pairs(&pairs).to_request() {
        Ok(request) => request,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let handler = state.run_archive.clone();
    tokio::spawn(async move {
        if let Err(err) = handler
            .execute(run, &request, SinkOutputs::response_stream(tx))
            .await
        {
            tracing::error!(error = %err, "browser-triggered archiving failed");
        }
    });

    let lines = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (Ok::<_, Infallible>(line), rx))
    });
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(lines),
    )
        .into_response()
}
