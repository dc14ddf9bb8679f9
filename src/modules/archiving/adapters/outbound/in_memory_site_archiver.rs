// In memory implementation of the SiteArchiver port.
//
// Purpose
// - Support coordinator tests and local runs without an analytics backend.
//
// Responsibilities
// - Serve a fixed site list and record every archived (site, period) pair.
// - Let callers script failures: queued errors per site, locked sites, or an
//   offline site registry.

use std::collections::{HashMap, HashSet, VecDeque};

use tokio::sync::Mutex;

use crate::modules::archiving::core::archive_request::{DateRange, Period};
use crate::modules::archiving::core::ports::{SiteArchiveError, SiteArchiver};
use crate::shared::core::primitives::SiteId;

#[derive(Default)]
pub struct InMemorySiteArchiver {
    sites: Vec<SiteId>,
    offline: bool,
    scripted: Mutex<HashMap<SiteId, VecDeque<SiteArchiveError>>>,
    locked: Mutex<HashSet<SiteId>>,
    archived: Mutex<Vec<(SiteId, Period)>>,
}

impl InMemorySiteArchiver {
    pub fn new(sites: Vec<SiteId>) -> Self {
        Self {
            sites,
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    /// Queues an error returned by the next archive call for `site`.
    pub async fn fail_next(&self, site: SiteId, error: SiteArchiveError) {
        self.scripted
            .lock()
            .await
            .entry(site)
            .or_default()
            .push_back(error);
    }

    pub async fn lock_site(&self, site: SiteId) {
        self.locked.lock().await.insert(site);
    }

    pub async fn archived(&self) -> Vec<(SiteId, Period)> {
        self.archived.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SiteArchiver for InMemorySiteArchiver {
    async fn list_sites(&self) -> Result<Vec<SiteId>, SiteArchiveError> {
        if self.offline {
            return Err(SiteArchiveError::Fatal("site registry offline".into()));
        }
        Ok(self.sites.clone())
    }

    async fn archive(
        &self,
        site: SiteId,
        period: Period,
        _date_range: Option<DateRange>,
    ) -> Result<u32, SiteArchiveError> {
        if self.locked.lock().await.contains(&site) {
            return Err(SiteArchiveError::Locked(site));
        }
        if let Some(error) = self
            .scripted
            .lock()
            .await
            .get_mut(&site)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        self.archived.lock().await.push((site, period));
        Ok(1)
    }
}
