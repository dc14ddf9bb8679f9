use crate::modules::archiving::adapters::outbound::cron_archiver::{
    CronArchiver, CronArchiverSettings,
};
use crate::modules::archiving::adapters::outbound::in_memory_site_archiver::InMemorySiteArchiver;
use crate::modules::archiving::core::archive_request::Period;
use crate::modules::archiving::core::execution_context::ExecutionContext;
use crate::modules::archiving::core::invocation_plan::InvocationPlan;
use crate::modules::archiving::core::ports::ArchivingCoordinator;
use crate::modules::archiving::use_cases::route_invocation::router::InvocationRouter;
use crate::modules::archiving::use_cases::run_archive::handler::RunArchiveHandler;
use crate::modules::archiving::use_cases::run_archive::inbound::console::{Console, run_direct};
use crate::modules::archiving::use_cases::select_log_sink::selector::LogSinkSelector;
use crate::shared::core::primitives::{AccessToken, SiteId};
use crate::shared::infrastructure::logging::console_sink::{ConsoleOutput, Verbosity};
use crate::shared::infrastructure::logging::line_formatter::LineMessageFormatter;
use crate::tests::fixtures::buffers::SharedBuffer;
use crate::tests::fixtures::tokens::SUPER_USER_TOKEN;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

fn handler(
    archiver: Arc<InMemorySiteArchiver>,
) -> Arc<RunArchiveHandler<dyn ArchivingCoordinator>> {
    let coordinator: Arc<dyn ArchivingCoordinator> = Arc::new(CronArchiver::new(
        archiver,
        vec![AccessToken::new(SUPER_USER_TOKEN)],
        CronArchiverSettings {
            max_attempts: 2,
            retry_delay: Duration::ZERO,
        },
    ));
    Arc::new(RunArchiveHandler::new(
        coordinator,
        LogSinkSelector::new(LineMessageFormatter::new("%level% %message%")),
    ))
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn archives_every_site_through_the_legacy_script() {
    let archiver = Arc::new(InMemorySiteArchiver::new(vec![SiteId(1), SiteId(2)]));
    archiver.lock_site(SiteId(2)).await;
    let handler = handler(archiver.clone());
    let router = InvocationRouter::new("/srv/analytics");
    let terminal = SharedBuffer::default();
    let context = ExecutionContext::cli(args(&[
        "/srv/analytics/misc/cron/archive.php",
        "--url=http://analytics.example/",
        "--force-periods=day",
    ]));

    let plan = router.route(&context, true, &mut terminal.clone());
    let InvocationPlan::Dispatch(dispatched) = plan else {
        panic!("expected dispatch, got {plan:?}");
    };
    let exit = Console::new(handler)
        .with_output(ConsoleOutput::from_writer(Verbosity::Verbose, terminal.clone()))
        .run(dispatched)
        .await
        .unwrap();

    let output = terminal.contents();
    assert!(output.contains(
        "console core:archive --url=http://analytics.example/--force-periods=day"
    ));
    assert!(output.contains("INFO Starting archiving for http://analytics.example/"));
    assert!(output.contains("WARNING Skipped website id = 2, another process is archiving it"));
    assert!(output.contains("Done archiving!"));
    assert_eq!(archiver.archived().await, vec![(SiteId(1), Period::Day)]);
    assert_eq!(format!("{exit:?}"), format!("{:?}", ExitCode::FAILURE));
}

#[tokio::test]
async fn archives_directly_when_dispatch_is_switched_off() {
    let archiver = Arc::new(InMemorySiteArchiver::new(vec![SiteId(1), SiteId(2)]));
    let handler = handler(archiver.clone());
    let router = InvocationRouter::new("/srv/analytics");
    let terminal = SharedBuffer::default();
    let context = ExecutionContext::cli(args(&["cron-archive", "--skip-idsites=1", "-q"]));

    let plan = router.route(&context, false, &mut terminal.clone());
    assert_eq!(plan, InvocationPlan::Direct);
    let exit = run_direct(
        &handler,
        context,
        Some(ConsoleOutput::from_writer(Verbosity::Quiet, terminal.clone())),
    )
    .await
    .unwrap();

    assert!(!router.notice_emitted());
    assert_eq!(terminal.contents(), "");
    assert_eq!(
        archiver.archived().await,
        Period::DEFAULTS
            .iter()
            .map(|&p| (SiteId(2), p))
            .collect::<Vec<_>>()
    );
    assert_eq!(format!("{exit:?}"), format!("{:?}", ExitCode::SUCCESS));
}
