// Spy coordinator for use case and inbound adapter tests.
//
// Records how often the token predicate and main are called, and which sinks were
// attached when main ran.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::modules::archiving::core::archive_request::ArchiveRequest;
use crate::modules::archiving::core::job::JobReport;
use crate::modules::archiving::core::ports::{ArchivingCoordinator, CoordinatorError};
use crate::shared::infrastructure::logging::sinks::{LogSinks, SinkKind};
use crate::tests::fixtures::tokens::SUPER_USER_TOKEN;

#[derive(Default)]
pub struct RecordingCoordinator {
    pub token_checks: AtomicUsize,
    pub main_calls: AtomicUsize,
    pub requests: Mutex<Vec<ArchiveRequest>>,
    sinks_seen: Mutex<Vec<Vec<SinkKind>>>,
    fatal: Option<String>,
}

impl RecordingCoordinator {
    pub fn failing_with(reason: impl Into<String>) -> Self {
        Self {
            fatal: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn sinks_seen(&self) -> Vec<Vec<SinkKind>> {
        self.sinks_seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ArchivingCoordinator for RecordingCoordinator {
    fn is_token_auth_super_user_token(&self, token: &str) -> bool {
        self.token_checks.fetch_add(1, Ordering::SeqCst);
        token == SUPER_USER_TOKEN
    }

    async fn main(
        &self,
        request: &ArchiveRequest,
        log: &LogSinks,
    ) -> Result<JobReport, CoordinatorError> {
        self.main_calls.fetch_add(1, Ordering::SeqCst);
        self.sinks_seen.lock().unwrap().push(log.kinds());
        self.requests.lock().unwrap().push(request.clone());
        log.info("Starting archiving");
        if let Some(reason) = &self.fatal {
            return Err(CoordinatorError::Fatal(reason.clone()));
        }
        Ok(JobReport::from_outcomes(Vec::new(), Duration::ZERO))
    }
}
