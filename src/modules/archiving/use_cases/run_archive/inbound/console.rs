// Command line inbound adapters.
//
// - Console: the command-dispatch facility. Routes `core:archive` and its options to
//   the run archive handler.
// - run_direct: the fallback when dispatch is unavailable. Parses the same options
//   straight from the argument vector.

use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::modules::archiving::core::archive_request::{ArchiveRequest, RequestError};
use crate::modules::archiving::core::execution_context::{ExecutionContext, InvocationMode};
use crate::modules::archiving::core::invocation_plan::ARCHIVE_COMMAND;
use crate::modules::archiving::core::ports::ArchivingCoordinator;
use crate::modules::archiving::use_cases::run_archive::handler::{
    RunArchiveError, RunArchiveHandler,
};
use crate::modules::archiving::use_cases::select_log_sink::selector::SinkOutputs;
use crate::shared::infrastructure::logging::console_sink::{ConsoleOutput, Verbosity};

#[derive(Debug, Clone, Default, Args)]
pub struct ArchiveArgs {
    /// Base URL of the analytics instance to archive.
    #[arg(long)]
    pub url: Option<String>,

    /// Only archive these site ids (comma separated).
    #[arg(long)]
    pub force_idsites: Option<String>,

    /// Never archive these site ids (comma separated).
    #[arg(long)]
    pub skip_idsites: Option<String>,

    /// Periods to archive: day, week, month, year, range (comma separated).
    #[arg(long)]
    pub force_periods: Option<String>,

    /// Archive this inclusive date range instead: YYYY-MM-DD,YYYY-MM-DD.
    #[arg(long)]
    pub force_date_range: Option<String>,

    /// Increase output verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print nothing.
    #[arg(short, long)]
    pub quiet: bool,
}

impl ArchiveArgs {
    pub fn to_request(&self) -> Result<ArchiveRequest, RequestError> {
        ArchiveRequest::from_options(
            self.url.clone(),
            self.force_idsites.as_deref(),
            self.skip_idsites.as_deref(),
            self.force_periods.as_deref(),
            self.force_date_range.as_deref(),
        )
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[derive(Debug, Parser)]
#[command(name = "console", about = "Analytics maintenance console")]
pub struct ConsoleCli {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConsoleCommand {
    /// Runs the archiver for every website.
    #[command(name = "core:archive")]
    CoreArchive(ArchiveArgs),
}

#[derive(Debug, Parser)]
#[command(name = "archive", about = "Runs the archiver for every website")]
pub struct DirectCli {
    #[command(flatten)]
    pub archive: ArchiveArgs,
}

fn usage_exit(err: clap::Error) -> ExitCode {
    // Help and version land here too, with a zero exit code.
    let _ = err.print();
    ExitCode::from(err.exit_code().clamp(0, 255) as u8)
}

async fn archive<TCoordinator>(
    handler: &RunArchiveHandler<TCoordinator>,
    context: ExecutionContext,
    args: &ArchiveArgs,
    output: Option<ConsoleOutput>,
    command: clap::Command,
) -> Result<ExitCode, RunArchiveError>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    let request = match args.to_request() {
        Ok(request) => request,
        Err(err) => {
            let mut command = command;
            return Ok(usage_exit(command.error(ErrorKind::InvalidValue, err)));
        }
    };
    let output = output.unwrap_or_else(|| ConsoleOutput::stdout(args.verbosity()));
    let report = handler
        .run(context, &request, SinkOutputs::console(output))
        .await?;
    Ok(report.status.exit_code())
}

pub struct Console<TCoordinator>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    handler: Arc<RunArchiveHandler<TCoordinator>>,
    output: Option<ConsoleOutput>,
}

impl<TCoordinator> Console<TCoordinator>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    pub fn new(handler: Arc<RunArchiveHandler<TCoordinator>>) -> Self {
        Self {
            handler,
            output: None,
        }
    }

    /// Sends progress to `output` instead of stdout.
    pub fn with_output(mut self, output: ConsoleOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Dispatch needs a real command line and must not be switched off.
    pub fn is_supported(context: &ExecutionContext, enabled: bool) -> bool {
        enabled && context.mode() == InvocationMode::Cli
    }

    pub async fn run(&self, args: Vec<String>) -> Result<ExitCode, RunArchiveError> {
        let cli = match ConsoleCli::try_parse_from(&args) {
            Ok(cli) => cli,
            Err(err) => return Ok(usage_exit(err)),
        };
        match cli.command {
            ConsoleCommand::CoreArchive(archive_args) => {
                let command = ConsoleCli::command()
                    .find_subcommand(ARCHIVE_COMMAND)
                    .cloned()
                    .unwrap_or_else(ConsoleCli::command);
                archive(
                    &self.handler,
                    ExecutionContext::cli(args),
                    &archive_args,
                    self.output.clone(),
                    command,
                )
                .await
            }
        }
    }
}

/// Runs the archiver without the dispatch facility.
pub async fn run_direct<TCoordinator>(
    handler: &RunArchiveHandler<TCoordinator>,
    context: ExecutionContext,
    output: Option<ConsoleOutput>,
) -> Result<ExitCode, RunArchiveError>
where
    TCoordinator: ArchivingCoordinator + ?Sized,
{
    let cli = match DirectCli::try_parse_from(context.args()) {
        Ok(cli) => cli,
        Err(err) => return Ok(usage_exit(err)),
    };
    archive(handler, context, &cli.archive, output, DirectCli::command()).await
}
