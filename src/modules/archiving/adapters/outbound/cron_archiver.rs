use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::modules::archiving::core::archive_request::{ArchiveRequest, DateRange, Period};
use crate::modules::archiving::core::job::{JobReport, SiteOutcome};
use crate::modules::archiving::core::ports::{
    ArchivingCoordinator, CoordinatorError, SiteArchiveError, SiteArchiver,
};
use crate::shared::core::primitives::{AccessToken, SiteId};
use crate::shared::infrastructure::logging::sinks::LogSinks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CronArchiverSettings {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for CronArchiverSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Sweeps every site and period through a [`SiteArchiver`].
///
/// Each site is isolated: a locked site or one that keeps failing transiently is
/// recorded in the report and the sweep moves on. A fatal archiver error, or a
/// site list that cannot be read, aborts the sweep.
pub struct CronArchiver<TArchiver>
where
    TArchiver: SiteArchiver + 'static,
{
    archiver: Arc<TArchiver>,
    super_user_tokens: Vec<AccessToken>,
    settings: CronArchiverSettings,
}

impl<TArchiver> CronArchiver<TArchiver>
where
    TArchiver: SiteArchiver + 'static,
{
    pub fn new(
        archiver: Arc<TArchiver>,
        super_user_tokens: Vec<AccessToken>,
        settings: CronArchiverSettings,
    ) -> Self {
        Self {
            archiver,
            super_user_tokens,
            settings,
        }
    }

    async fn sites_to_archive(
        &self,
        request: &ArchiveRequest,
    ) -> Result<Vec<SiteId>, CoordinatorError> {
        let candidates = match &request.force_idsites {
            Some(forced) => forced.clone(),
            None => self.archiver.list_sites().await.map_err(|e| {
                CoordinatorError::Fatal(format!("cannot list websites to archive: {e}"))
            })?,
        };
        let mut sites = Vec::with_capacity(candidates.len());
        for site in candidates {
            if !request.skip_idsites.contains(&site) && !sites.contains(&site) {
                sites.push(site);
            }
        }
        Ok(sites)
    }

    async fn archive_site(
        &self,
        site: SiteId,
        request: &ArchiveRequest,
        log: &LogSinks,
    ) -> Result<SiteOutcome, CoordinatorError> {
        let started = Instant::now();
        log.info(&format!("Archiving website id = {site}"));

        let mut reports = 0;
        for &period in &request.periods {
            match self
                .archive_with_retries(site, period, request.date_range, log)
                .await
            {
                Ok(count) => reports += count,
                Err(SiteArchiveError::Locked(_)) => {
                    log.warn(&format!(
                        "Skipped website id = {site}, another process is archiving it"
                    ));
                    return Ok(SiteOutcome::Locked { site });
                }
                Err(SiteArchiveError::Transient(reason)) => {
                    log.error(&format!(
                        "Archiving website id = {site}, period = {period} failed after {} attempts: {reason}",
                        self.settings.max_attempts
                    ));
                    return Ok(SiteOutcome::Failed {
                        site,
                        period,
                        reason,
                    });
                }
                Err(SiteArchiveError::Fatal(reason)) => {
                    return Err(CoordinatorError::Fatal(reason));
                }
            }
        }

        log.info(&format!(
            "Archived website id = {site}, {reports} reports, Time elapsed: {:.3}s",
            started.elapsed().as_secs_f64()
        ));
        Ok(SiteOutcome::Archived {
            site,
            periods: request.periods.clone(),
        })
    }

    async fn archive_with_retries(
        &self,
        site: SiteId,
        period: Period,
        date_range: Option<DateRange>,
        log: &LogSinks,
    ) -> Result<u32, SiteArchiveError> {
        let mut attempt = 1;
        loop {
            match self.archiver.archive(site, period, date_range).await {
                Err(SiteArchiveError::Transient(reason)) if attempt < self.settings.max_attempts => {
                    log.debug(&format!(
                        "Attempt {attempt} for website id = {site}, period = {period} failed, retrying: {reason}"
                    ));
                    attempt += 1;
                    if !self.settings.retry_delay.is_zero() {
                        tokio::time::sleep(self.settings.retry_delay).await;
                    }
                }
                result => return result,
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[async_trait::async_trait]
impl<TArchiver> ArchivingCoordinator for CronArchiver<TArchiver>
where
    TArchiver: SiteArchiver + 'static,
{
    fn is_token_auth_super_user_token(&self, token: &str) -> bool {
        if !AccessToken::new(token).is_well_formed() {
            return false;
        }
        self.super_user_tokens
            .iter()
            .any(|known| constant_time_eq(known.expose().as_bytes(), token.as_bytes()))
    }

    async fn main(
        &self,
        request: &ArchiveRequest,
        log: &LogSinks,
    ) -> Result<JobReport, CoordinatorError> {
        if self.settings.max_attempts == 0 {
            return Err(CoordinatorError::Misconfigured(
                "max attempts must be at least 1".into(),
            ));
        }

        let started = Instant::now();
        match &request.url {
            Some(url) => log.info(&format!("Starting archiving for {url}")),
            None => log.info("Starting archiving"),
        }
        if let Some(range) = request.date_range {
            log.info(&format!("Forcing date range {range}"));
        }

        let sites = self.sites_to_archive(request).await?;
        if sites.is_empty() {
            log.warn("No websites to archive");
        } else {
            log.info(&format!("Will archive {} websites", sites.len()));
        }

        let mut outcomes = Vec::with_capacity(sites.len());
        for site in sites {
            outcomes.push(self.archive_site(site, request, log).await?);
        }

        let report = JobReport::from_outcomes(outcomes, started.elapsed());
        log.info(&format!(
            "Done archiving! Processed {} websites, {} errors, Time elapsed: {:.3}s",
            report.outcomes.len(),
            report.error_count(),
            report.elapsed.as_secs_f64()
        ));
        Ok(report)
    }
}
