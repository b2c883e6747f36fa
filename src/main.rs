use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

use toggl_tickets::config::TogglConfig;
use toggl_tickets::console::{ConsoleMarkdownList, ConsolePresenter};
use toggl_tickets::daily_command::{DailyArgs, DailyCommand};
use toggl_tickets::monthly_command::{MonthlyArgs, MonthlyCommand};
use toggl_tickets::tag_command::{TagArgs, TagCommand};
use toggl_tickets::toggl::TogglClient;

/// Togglのtime entryをチケットとJiraへの記録状況で整理するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- daily
/// $ cargo run -- monthly --unlogged
/// $ cargo run -- tag --id 123 -t ABC-1 -t Jira
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(short = 'v', long = "verbose", global = true, help = "Show debug logs")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Daily(DailyArgs),
    Monthly(MonthlyArgs),
    Tag(TagArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logger(args.verbose)?;

    let config = TogglConfig::from_env().context("Failed to load configuration")?;
    let client = TogglClient::new(config);
    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut stdout);

    match args.subcommand {
        SubCommands::Daily(daily) => {
            let time_entries = DailyCommand::new(&client).run(daily).await?;
            presenter.show_time_entries(&time_entries)?;
        }
        SubCommands::Monthly(monthly) => {
            let durations = MonthlyCommand::new(&client).run(monthly).await?;
            presenter.show_ticket_durations(&durations)?;
        }
        SubCommands::Tag(tag) => {
            let saved = TagCommand::new(&client).run(tag).await?;
            presenter.show_time_entries(&[saved])?;
        }
    }

    Ok(())
}

/// 標準エラー出力にログを出力する。
fn setup_logger(verbose: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("Failed to initialize logger")?;

    Ok(())
}
