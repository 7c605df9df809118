//! Terminal front-end and entry point.
//!
//! This binary plays the part of the media-center host: it owns the list
//! widget ([`MemoryList`]), forwards key commands to the [`ScreenController`]
//! as control and action ids, and redraws the list after every command.
//!
//! # Commands
//!
//! Commands are read line by line from stdin:
//!
//! - `j` / `k`: Move selection down / up
//! - `enter` (empty line): Open the details view for the selected recording
//! - `r`: Refresh from the data source
//! - `s`: Cycle the sort key
//! - `a`: Toggle ascending / descending
//! - `q`: Go back (persists settings and exits)
//!
//! Inside the details view:
//!
//! - `n` / `p`: Next / previous recording (wraps)
//! - `d`: Delete the recording shown
//! - `b`: Back to the list

use clap::Parser;
use reclist::app::{ActionId, ControlId, CyclingBidiIterator, DetailsContext, DetailsOutcome, DetailsView};
use reclist::observability::init_tracing;
use reclist::ui::{compute_viewmodel, render_frame, MemoryList};
use reclist::{build_services, load_theme, Config, Program, RecListError, ScreenController, ScreenState, Theme};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const DEFAULT_ROWS: usize = 24;
const DEFAULT_COLS: usize = 80;

#[derive(Parser, Debug)]
#[command(name = "reclist", version, about = "Browse recorded TV programs")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recordings file (overrides the configuration)
    #[arg(long)]
    recordings: Option<PathBuf>,

    /// Data directory for settings, thumbnails and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    trace_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("reclist: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> reclist::Result<()> {
    let config = load_config(cli)?;
    init_tracing(&config);
    tracing::info!(recordings = ?config.recordings_file, "starting reclist");

    let theme = load_theme(&config);
    let list = Arc::new(MemoryList::new());
    let details = TerminalDetails { theme: theme.clone() };
    let services = build_services(&config, list.clone(), Box::new(details))?;

    let mut screen = ScreenController::new(services);
    screen.on_init();
    screen.on_focus(ControlId::ProgramsList.raw());

    let (rows, cols) = terminal_size();
    let mut last_error = None;
    let stdin = io::stdin();

    loop {
        last_error = list.take_errors().pop().or(last_error);
        let vm = compute_viewmodel(&list.snapshot(), rows, last_error.clone());
        print!("{}", render_frame(&vm, &theme, rows, cols));
        io::stdout().flush()?;

        let Some(command) = read_command(&mut stdin.lock())? else {
            tracing::info!("stdin closed");
            screen.on_action(ActionId::PreviousMenu.raw());
            break;
        };

        match command.as_str() {
            "j" => list.move_selection_down(),
            "k" => list.move_selection_up(),
            "" => screen.on_click(ControlId::ProgramsList.raw()),
            "r" => {
                last_error = None;
                screen.on_click(ControlId::Refresh.raw());
            }
            "s" => screen.on_click(ControlId::SortBy.raw()),
            "a" => screen.on_click(ControlId::SortAscending.raw()),
            "q" => screen.on_action(ActionId::PreviousMenu.raw()),
            other => tracing::debug!(command = other, "unknown command"),
        }

        if screen.state() == ScreenState::Closed {
            break;
        }
    }

    print!("\u{1b}[2J\u{1b}[1;1H");
    io::stdout().flush()?;
    Ok(())
}

/// Layers the command-line flags over the configuration file.
fn load_config(cli: &Cli) -> reclist::Result<Config> {
    let mut map = match &cli.config {
        Some(path) => Config::read_map(path)?,
        None => BTreeMap::new(),
    };

    let overrides = [
        ("recordings_file", cli.recordings.as_ref().map(|p| p.display().to_string())),
        ("data_dir", cli.data_dir.as_ref().map(|p| p.display().to_string())),
        ("trace_level", cli.trace_level.clone()),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            map.insert(key.to_string(), value);
        }
    }

    Ok(Config::from_map(&map))
}

/// Reads one trimmed command line, or `None` at end of input.
fn read_command(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

/// Terminal size from `LINES`/`COLUMNS`, else 24x80.
fn terminal_size() -> (usize, usize) {
    let read = |name: &str| std::env::var(name).ok().and_then(|v| v.parse::<usize>().ok());
    (
        read("LINES").unwrap_or(DEFAULT_ROWS),
        read("COLUMNS").unwrap_or(DEFAULT_COLS),
    )
}

/// Details window drawn as a plain-text page with a command prompt.
struct TerminalDetails {
    theme: Theme,
}

impl TerminalDetails {
    fn draw(&self, program: &Program, position: usize, total: usize, context: &DetailsContext) {
        let colors = &self.theme.colors;
        let thumbnail = context.thumbnails.get(program).map_or_else(
            |e| {
                tracing::debug!(error = %e, "no thumbnail for details");
                "(none)".to_string()
            },
            |path| path.display().to_string(),
        );

        print!("\u{1b}[2J\u{1b}[1;1H");
        println!(
            "{}{}{}{}  ({}/{total})",
            Theme::bold(),
            Theme::fg(&colors.header_fg),
            program.full_title(),
            Theme::reset(),
            position + 1
        );
        println!("{}", Theme::fg(&colors.text_dim));
        println!("Channel:     {}", program.channel);
        println!("Recorded:    {}", program.start_time.format("%Y-%m-%d %H:%M"));
        println!("Aired:       {}", program.formatted_air_date());
        println!("Thumbnail:   {thumbnail}");
        println!("{}", Theme::reset());
        if let Some(description) = &program.description {
            println!("{description}");
            println!();
        }
        print!("[n]ext  [p]revious  [d]elete  [b]ack > ");
    }
}

impl DetailsView for TerminalDetails {
    fn show(
        &mut self,
        programs: &mut CyclingBidiIterator<Arc<Program>>,
        context: &DetailsContext,
    ) -> reclist::Result<DetailsOutcome> {
        let stdin = io::stdin();
        loop {
            let program = programs
                .current()
                .cloned()
                .ok_or_else(|| RecListError::Details("no recordings to show".to_string()))?;
            self.draw(&program, programs.index(), programs.len(), context);
            io::stdout().flush()?;

            let Some(command) = read_command(&mut stdin.lock())? else {
                return Ok(DetailsOutcome::default());
            };
            match command.as_str() {
                "n" => {
                    programs.next();
                }
                "p" => {
                    programs.previous();
                }
                "d" => {
                    context.source.delete_recording(&program)?;
                    tracing::info!(recording_id = %program.recording_id, "recording deleted");
                    return Ok(DetailsOutcome { deleted: true });
                }
                "b" | "q" => return Ok(DetailsOutcome::default()),
                other => tracing::debug!(command = other, "unknown details command"),
            }
        }
    }
}
