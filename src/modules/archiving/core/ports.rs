// Ports define what the archiving entry point needs from the outside world.
//
// Purpose
// - Describe the archiving coordinator and the per-site archiver as traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits.
//
// Error contract
// - SiteArchiver reports Transient and Locked failures; the coordinator absorbs them
//   into the JobReport. Only Fatal conditions cross the coordinator boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::modules::archiving::core::archive_request::{ArchiveRequest, DateRange, Period};
use crate::modules::archiving::core::job::JobReport;
use crate::shared::core::primitives::SiteId;
use crate::shared::infrastructure::logging::sinks::LogSinks;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SiteArchiveError {
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("site {0} is locked by another archiving process")]
    Locked(SiteId),

    #[error("fatal: {0}")]
    Fatal(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("archiving is misconfigured: {0}")]
    Misconfigured(String),

    #[error("archiving aborted: {0}")]
    Fatal(String),
}

#[async_trait]
pub trait SiteArchiver: Send + Sync {
    async fn list_sites(&self) -> Result<Vec<SiteId>, SiteArchiveError>;

    /// Returns the number of reports archived.
    async fn archive(
        &self,
        site: SiteId,
        period: Period,
        date_range: Option<DateRange>,
    ) -> Result<u32, SiteArchiveError>;
}

#[async_trait]
pub trait ArchivingCoordinator: Send + Sync {
    /// Pure predicate; false for anything malformed.
    fn is_token_auth_super_user_token(&self, token: &str) -> bool;

    /// Runs the full sweep. Operational failures end up in the report,
    /// only fatal ones are returned as errors.
    async fn main(
        &self,
        request: &ArchiveRequest,
        log: &LogSinks,
    ) -> Result<JobReport, CoordinatorError>;
}
