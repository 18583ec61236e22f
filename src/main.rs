mod app;
mod calendar;
mod config;
mod help;
mod jumpto;
mod theme;
use crate::app::App;
use crate::calendar::{CalendarView, PositionStyler, ScrollDirection};
use crate::config::CalendarConfig;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, OffsetDateTime,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Filter directives used when `RUST_LOG` is not set
static DEFAULT_LOG_FILTER: &str = "monthpager=debug";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<Date>,
        direction: ScrollDirection,
        months: Option<NonZeroUsize>,
        log: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut direction = ScrollDirection::Horizontal;
        let mut months = None;
        let mut log = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("vertical") => direction = ScrollDirection::Vertical,
                Arg::Long("months") => months = Some(parser.value()?.parse::<NonZeroUsize>()?),
                Arg::Long("log") => log = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            date,
            direction,
            months,
            log,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                direction,
                months,
                log,
            } => {
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                if let Some(path) = log {
                    init_logging(&path)?;
                }
                let mut config = CalendarConfig::default().direction(direction);
                if let Some(qty) = months {
                    config = config.initial_month_count(qty);
                }
                let calendar =
                    CalendarView::new(today, date.unwrap_or(today), config, PositionStyler)
                        .context("invalid calendar configuration")?;
                tracing::info!(%today, ?direction, "starting calendar");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: monthpager [OPTIONS] [YYYY-MM-DD]");
                println!();
                println!("Infinite-scrolling month-paged terminal calendar");
                println!();
                println!("Options:");
                println!("  --vertical        Scroll between months vertically");
                println!("  --months <N>      Number of months to load at startup [default: 12]");
                println!("  --log <FILE>      Write debug logs to FILE");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Send `tracing` output to the file at `path`, as the terminal is taken up
/// by the calendar
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("monthpager").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run {
                date: None,
                direction: ScrollDirection::Horizontal,
                months: None,
                log: None,
            }
        );
    }

    #[test]
    fn test_all_options() {
        assert_eq!(
            parse(&["--vertical", "--months", "24", "--log", "cal.log", "2024-03-15"]).unwrap(),
            Command::Run {
                date: Some(date!(2024 - 03 - 15)),
                direction: ScrollDirection::Vertical,
                months: NonZeroUsize::new(24),
                log: Some(PathBuf::from("cal.log")),
            }
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["--months", "0"]).is_err());
        assert!(parse(&["--months", "many"]).is_err());
        assert!(parse(&["2024-13-01"]).is_err());
        assert!(parse(&["2024-03-15", "2024-03-16"]).is_err());
        assert!(parse(&["--horizontal"]).is_err());
    }
}
