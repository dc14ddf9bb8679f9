use std::sync::Arc;

use crate::modules::archiving::core::ports::ArchivingCoordinator;
use crate::modules::archiving::use_cases::run_archive::handler::RunArchiveHandler;

#[derive(Clone)]
pub struct AppState {
    pub run_archive: Arc<RunArchiveHandler<dyn ArchivingCoordinator>>,
}
