use crate::modules::archiving::adapters::outbound::cron_archiver::{
    CronArchiver, CronArchiverSettings,
};
use crate::modules::archiving::adapters::outbound::in_memory_site_archiver::InMemorySiteArchiver;
use crate::modules::archiving::core::archive_request::Period;
use crate::modules::archiving::core::ports::{ArchivingCoordinator, SiteArchiveError};
use crate::modules::archiving::use_cases::authenticate::gate::AUTH_FAILURE_HTML;
use crate::modules::archiving::use_cases::run_archive::handler::RunArchiveHandler;
use crate::modules::archiving::use_cases::select_log_sink::selector::LogSinkSelector;
use crate::shared::core::primitives::{AccessToken, SiteId};
use crate::shared::infrastructure::logging::line_formatter::LineMessageFormatter;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::tokens::{OTHER_TOKEN, SUPER_USER_TOKEN};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(archiver: Arc<InMemorySiteArchiver>) -> Router {
    let coordinator: Arc<dyn ArchivingCoordinator> = Arc::new(CronArchiver::new(
        archiver,
        vec![AccessToken::new(SUPER_USER_TOKEN)],
        CronArchiverSettings {
            max_attempts: 2,
            retry_delay: Duration::ZERO,
        },
    ));
    router(AppState {
        run_archive: Arc::new(RunArchiveHandler::new(
            coordinator,
            LogSinkSelector::new(LineMessageFormatter::new("%level% %message%")),
        )),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn streams_a_browser_triggered_run_to_the_super_user() {
    let archiver = Arc::new(InMemorySiteArchiver::new(vec![SiteId(1), SiteId(3)]));
    archiver
        .fail_next(SiteId(3), SiteArchiveError::Transient("deadlock".into()))
        .await;

    let (status, body) = get(
        app(archiver.clone()),
        &format!("/archive.php?token_auth={SUPER_USER_TOKEN}&force_idsites=3&force_periods=month"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("INFO Starting archiving\n"));
    assert!(body.contains("INFO Archived website id = 3"));
    assert!(!body.contains("DEBUG"));
    assert_eq!(archiver.archived().await, vec![(SiteId(3), Period::Month)]);
}

#[tokio::test]
async fn refuses_browser_triggered_runs_without_a_super_user_token() {
    let archiver = Arc::new(InMemorySiteArchiver::new(vec![SiteId(1)]));

    let (status, body) = get(
        app(archiver.clone()),
        &format!("/archive?token_auth={OTHER_TOKEN}"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, AUTH_FAILURE_HTML);
    assert!(archiver.archived().await.is_empty());
}
