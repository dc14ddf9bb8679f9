use std::io::Write;
use std::path::PathBuf;

use crate::modules::archiving::core::deprecation::{DeprecationNotice, is_legacy_invocation};
use crate::modules::archiving::core::execution_context::ExecutionContext;
use crate::modules::archiving::core::invocation_plan::{InvocationPlan, plan_invocation};

pub struct InvocationRouter {
    home: PathBuf,
    notice: DeprecationNotice,
}

impl InvocationRouter {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            notice: DeprecationNotice::new(),
        }
    }

    /// Prints the deprecation banner for legacy callers, then picks the path.
    ///
    /// Failing to print the banner never blocks the run.
    pub fn route(
        &self,
        context: &ExecutionContext,
        dispatch_available: bool,
        out: &mut impl Write,
    ) -> InvocationPlan {
        if is_legacy_invocation(context.callee()) {
            if let Err(err) = self.notice.emit_once(out, &self.home, context.args()) {
                tracing::warn!(error = %err, "could not print the deprecation notice");
            }
        }

        let plan = plan_invocation(context, dispatch_available);
        if plan == InvocationPlan::Direct {
            tracing::debug!(mode = ?context.mode(), "command dispatch unavailable, invoking the archiver directly");
        }
        plan
    }

    pub fn notice_emitted(&self) -> bool {
        self.notice.was_emitted()
    }
}
