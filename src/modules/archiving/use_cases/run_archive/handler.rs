use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::modules::archiving::core::archive_request::ArchiveRequest;
use crate::modules::archiving::core::execution_context::ExecutionContext;
use crate::modules::archiving::core::job::JobReport;
use crate::modules::archiving::core::ports::{ArchivingCoordinator, CoordinatorError};
use crate::modules::archiving::use_cases::authenticate::gate::{AuthError, authenticate};
use crate::modules::archiving::use_cases::select_log_sink::selector::{
    LogSinkSelector, SinkError, SinkOutputs,
};
use crate::shared::infrastructure::logging::sinks::LogSinks;

/// Tag rendered by `%tag%` for archiving progress.
pub const LOG_TAG: &str = "CronArchive";

#[derive(Debug, Error)]
pub enum RunArchiveError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

/// A context that went through the authentication gate.
///
/// Only [`RunArchiveHandler::authorize`] builds one, so no archiving can start
/// for a context the gate has not seen.
#[derive(Debug)]
pub struct AuthorizedRun {
    context: ExecutionContext,
}

impl AuthorizedRun {
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }
}

pub struct RunArchiveHandler<TCoordinator>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    coordinator: Arc<TCoordinator>,
    selector: LogSinkSelector,
}

impl<TCoordinator> RunArchiveHandler<TCoordinator>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    pub fn new(coordinator: Arc<TCoordinator>, selector: LogSinkSelector) -> Self {
        Self {
            coordinator,
            selector,
        }
    }

    pub fn authorize(&self, context: ExecutionContext) -> Result<AuthorizedRun, AuthError> {
        authenticate(&context, self.coordinator.as_ref())?;
        Ok(AuthorizedRun { context })
    }

    /// Attaches the invocation's sink, then runs the coordinator once.
    ///
    /// A fatal coordinator error is written to the sink before it is returned.
    pub async fn execute(
        &self,
        run: AuthorizedRun,
        request: &ArchiveRequest,
        outputs: SinkOutputs,
    ) -> Result<JobReport, RunArchiveError> {
        let request_id = Uuid::now_v7().to_string();
        let mode = run.context.mode();
        let span = tracing::info_span!("archive_run", request_id = %request_id, mode = ?mode);

        async move {
            let mut sinks = LogSinks::new(LOG_TAG, request_id);
            self.selector.attach(&mut sinks, mode, &outputs)?;

            let report = match self.coordinator.main(request, &sinks).await {
                Ok(report) => report,
                Err(err) => {
                    sinks.error(&err.to_string());
                    return Err(RunArchiveError::Coordinator(err));
                }
            };
            tracing::info!(
                status = ?report.status,
                sites = report.outcomes.len(),
                errors = report.error_count(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                "archiving finished"
            );
            Ok::<_, RunArchiveError>(report)
        }
        .instrument(span)
        .await
    }

    pub async fn run(
        &self,
        context: ExecutionContext,
        request: &ArchiveRequest,
        outputs: SinkOutputs,
    ) -> Result<JobReport, RunArchiveError> {
        let run = self.authorize(context)?;
        self.execute(run, request, outputs).await
    }
}
