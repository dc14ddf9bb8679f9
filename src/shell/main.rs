use std::io;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use cron_archive::modules::archiving::adapters::outbound::cron_archiver::CronArchiver;
use cron_archive::modules::archiving::adapters::outbound::in_memory_site_archiver::InMemorySiteArchiver;
use cron_archive::modules::archiving::core::execution_context::ExecutionContext;
use cron_archive::modules::archiving::core::invocation_plan::InvocationPlan;
use cron_archive::modules::archiving::core::ports::ArchivingCoordinator;
use cron_archive::modules::archiving::use_cases::route_invocation::router::InvocationRouter;
use cron_archive::modules::archiving::use_cases::run_archive::handler::RunArchiveHandler;
use cron_archive::modules::archiving::use_cases::run_archive::inbound::console::{
    Console, run_direct,
};
use cron_archive::modules::archiving::use_cases::select_log_sink::selector::LogSinkSelector;
use cron_archive::shared::infrastructure::logging::line_formatter::LineMessageFormatter;
use cron_archive::shared::infrastructure::logging::subscriber::{
    init_subscriber, install_panic_hook,
};
use cron_archive::shell::config::Config;
use cron_archive::shell::http::router;
use cron_archive::shell::state::AppState;

type Handler = Arc<RunArchiveHandler<dyn ArchivingCoordinator>>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_subscriber(&config.log)?;
    if config.bootstrap.error_handler {
        install_panic_hook();
    }
    tracing::debug!(
        dispatch = config.bootstrap.dispatch,
        error_handler = config.bootstrap.error_handler,
        session_start = config.bootstrap.session_start,
        "bootstrap flags"
    );

    // In-memory archiver for now
    let archiver = Arc::new(InMemorySiteArchiver::new(config.sites.clone()));
    let coordinator: Arc<dyn ArchivingCoordinator> = Arc::new(CronArchiver::new(
        archiver,
        config.super_user_tokens.clone(),
        config.archiver,
    ));
    let handler: Handler = Arc::new(RunArchiveHandler::new(
        coordinator,
        LogSinkSelector::new(LineMessageFormatter::new(config.log.format.clone())),
    ));

    match config.http_listen {
        Some(addr) => serve(addr, handler).await,
        None => Ok(run_cli(&config, handler).await),
    }
}

async fn serve(addr: SocketAddr, handler: Handler) -> anyhow::Result<ExitCode> {
    let app = router(AppState {
        run_archive: handler,
    });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("archive endpoint: http://{}/archive", addr);
    axum::serve(listener, app).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_cli(config: &Config, handler: Handler) -> ExitCode {
    let context = ExecutionContext::cli(std::env::args().collect());
    let dispatch_available =
        Console::<dyn ArchivingCoordinator>::is_supported(&context, config.console_enabled);
    let plan = InvocationRouter::new(config.install_dir.clone()).route(
        &context,
        dispatch_available,
        &mut io::stdout(),
    );

    let result = match plan {
        InvocationPlan::Dispatch(args) => Console::new(handler).run(args).await,
        InvocationPlan::Direct => run_direct(&handler, context, None).await,
    };
    result.unwrap_or_else(|err| {
        tracing::error!(error = %err, "archiving failed");
        ExitCode::FAILURE
    })
}
