use std::process::ExitCode;
use std::time::Duration;

use crate::modules::archiving::core::archive_request::Period;
use crate::shared::core::primitives::SiteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    PartialFailure,
    Failure,
}

impl JobStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            JobStatus::Success => ExitCode::SUCCESS,
            JobStatus::PartialFailure | JobStatus::Failure => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    Archived {
        site: SiteId,
        periods: Vec<Period>,
    },
    /// Another process holds the site.
    Locked { site: SiteId },
    Failed {
        site: SiteId,
        period: Period,
        reason: String,
    },
}

impl SiteOutcome {
    pub fn site(&self) -> SiteId {
        match self {
            SiteOutcome::Archived { site, .. }
            | SiteOutcome::Locked { site }
            | SiteOutcome::Failed { site, .. } => *site,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SiteOutcome::Archived { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub status: JobStatus,
    pub elapsed: Duration,
    pub outcomes: Vec<SiteOutcome>,
}

impl JobReport {
    /// Status follows from the outcomes: all good, some good, or none good.
    pub fn from_outcomes(outcomes: Vec<SiteOutcome>, elapsed: Duration) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let status = if succeeded == outcomes.len() {
            JobStatus::Success
        } else if succeeded > 0 {
            JobStatus::PartialFailure
        } else {
            JobStatus::Failure
        };
        Self {
            status,
            elapsed,
            outcomes,
        }
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

#[cfg(test)]
mod job_report_tests {
    use super::*;
    use rstest::rstest;

    fn archived(id: u32) -> SiteOutcome {
        SiteOutcome::Archived {
            site: SiteId(id),
            periods: vec![Period::Day],
        }
    }

    #[rstest]
    fn it_should_succeed_when_every_site_is_archived() {
        let report = JobReport::from_outcomes(vec![archived(1), archived(2)], Duration::ZERO);
        assert_eq!(report.status, JobStatus::Success);
        assert_eq!(report.error_count(), 0);
    }

    #[rstest]
    fn it_should_succeed_when_there_is_nothing_to_archive() {
        let report = JobReport::from_outcomes(Vec::new(), Duration::ZERO);
        assert_eq!(report.status, JobStatus::Success);
    }

    #[rstest]
    fn it_should_partially_fail_when_some_sites_fail() {
        let report = JobReport::from_outcomes(
            vec![archived(1), SiteOutcome::Locked { site: SiteId(2) }],
            Duration::ZERO,
        );
        assert_eq!(report.status, JobStatus::PartialFailure);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.outcomes[1].site(), SiteId(2));
    }

    #[rstest]
    fn it_should_fail_when_every_site_fails() {
        let report = JobReport::from_outcomes(
            vec![SiteOutcome::Failed {
                site: SiteId(1),
                period: Period::Week,
                reason: "timeout".into(),
            }],
            Duration::ZERO,
        );
        assert_eq!(report.status, JobStatus::Failure);
    }
}
