use crate::modules::archiving::core::execution_context::{ExecutionContext, InvocationMode};

/// Canonical command the dispatch facility runs.
pub const ARCHIVE_COMMAND: &str = "core:archive";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationPlan {
    /// Hand these arguments to the command-dispatch facility.
    Dispatch(Vec<String>),
    /// Call the archiving coordinator directly.
    Direct,
}

/// Injects [`ARCHIVE_COMMAND`] right after `argv[0]`, leaving the rest untouched.
pub fn dispatch_args(args: &[String]) -> Vec<String> {
    let mut dispatched = Vec::with_capacity(args.len() + 1);
    let (script, rest) = match args.split_first() {
        Some((script, rest)) => (script.clone(), rest),
        None => (String::new(), args),
    };
    dispatched.push(script);
    dispatched.push(ARCHIVE_COMMAND.to_string());
    dispatched.extend(rest.iter().cloned());
    dispatched
}

/// HTTP invocations carry no argument vector and always go direct.
pub fn plan_invocation(context: &ExecutionContext, dispatch_available: bool) -> InvocationPlan {
    match context.mode() {
        InvocationMode::Cli if dispatch_available => {
            InvocationPlan::Dispatch(dispatch_args(context.args()))
        }
        _ => InvocationPlan::Direct,
    }
}
