use thiserror::Error;

use crate::modules::archiving::core::execution_context::{ExecutionContext, InvocationMode};
use crate::modules::archiving::core::ports::ArchivingCoordinator;

/// Body returned when a browser-triggered run is refused. Tooling greps for it; keep it byte for byte.
pub const AUTH_FAILURE_HTML: &str = concat!(
    "<b>You must specify the Super User token_auth as a parameter to this script, eg. <code>?token_auth=XYZ</code> if you wish to run this script through the browser. </b><br>\n",
    "                    However it is recommended to run it <a href=\"http://piwik.org/docs/setup-auto-archiving/\">via cron in the command line</a>, since it can take a long time to run.<br/>\n",
    "                    In a shell, execute for example the following to trigger archiving on the local Piwik server:<br/>\n",
    "                    <code>$ /path/to/php /path/to/piwik/console core:archive --url=http://your-website.org/path/to/piwik/</code>",
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token_auth does not identify a super user")]
    NotSuperUser,
}

/// CLI runs are trusted as local execution; HTTP runs need a super-user token.
pub fn authenticate<TCoordinator>(
    context: &ExecutionContext,
    coordinator: &TCoordinator,
) -> Result<(), AuthError>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    match context.mode() {
        InvocationMode::Cli => Ok(()),
        InvocationMode::Http => {
            let token = context.access_token().map(|t| t.expose()).unwrap_or_default();
            if coordinator.is_token_auth_super_user_token(token) {
                Ok(())
            } else {
                Err(AuthError::NotSuperUser)
            }
        }
    }
}
