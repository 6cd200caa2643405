use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use skyburst::config::{DisplayConfig, SchedulerConfig};
use skyburst::display::FireworksDisplay;
use skyburst::surface::Rgb;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const FIXED_DT: f32 = 1.0 / 60.0;

/// Fireworks in the terminal. Hold the left mouse button to launch towards
/// the pointer. Press 'q', ESC, or Ctrl+C to exit.
#[derive(Debug, Parser)]
#[command(name = "skyburst", version, about)]
struct Cli {
    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = Rgb::from_hex)]
    bg_color: Option<Rgb>,

    /// Seed for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output to this file (filter with RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // stderr shares the screen with the show, stay quiet unless asked
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }
    builder.try_init().context("logger already initialised")
}

fn is_quit(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.code == KeyCode::Char('q')
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn run_show<W: Write>(out: &mut W, cli: &Cli) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("cannot read terminal size")?;
    let rng = cli.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let display_config = DisplayConfig {
        background: cli.bg_color.unwrap_or_default(),
        ..DisplayConfig::default()
    };
    let mut display = FireworksDisplay::new(
        cols.into(),
        rows.into(),
        SchedulerConfig::default(),
        &display_config,
        rng,
    )?;

    let step = Duration::from_secs_f32(FIXED_DT);
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            if is_quit(&event) {
                break;
            }
            if let Event::Resize(cols, rows) = event {
                display.resize(cols.into(), rows.into())?;
                execute!(out, Clear(ClearType::All))?;
            } else {
                display.handle_event(&event);
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            display.update(step);
            accumulator -= FIXED_DT;
        }

        display.render(out)?;
    }

    let cancelled = display.stop();
    info!("exiting, dropped {cancelled} pending launches");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut out = BufWriter::with_capacity(1024 * 64, stdout());
    terminal::enable_raw_mode().context("cannot enable raw mode")?;
    execute!(
        out,
        EnterAlternateScreen,
        Hide,
        Clear(ClearType::All),
        EnableMouseCapture
    )?;

    let result = run_show(&mut out, &cli);
    restore_terminal(&mut out, result)
}

/// Leaves the show's screen setup and reports the first error, the show's own
/// error taking precedence. Raw mode is dropped even when leaving the
/// alternate screen fails.
fn restore_terminal<W: Write>(out: &mut W, result: anyhow::Result<()>) -> anyhow::Result<()> {
    let screen = execute!(out, Show, LeaveAlternateScreen, DisableMouseCapture)
        .context("cannot leave alternate screen");
    let raw = terminal::disable_raw_mode().context("cannot restore terminal");
    result.and(screen).and(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn restore_writes_teardown_sequence() {
        let mut out = Vec::new();
        restore_terminal(&mut out, Ok(())).expect("restore");
        assert!(!out.is_empty());
    }

    #[test]
    fn failed_screen_restore_is_reported() {
        let err = restore_terminal(&mut Broken, Ok(())).expect_err("broken writer");
        assert_eq!(err.to_string(), "cannot leave alternate screen");
    }

    #[test]
    fn show_error_wins_over_teardown_error() {
        let err = restore_terminal(&mut Broken, Err(anyhow::anyhow!("show failed")))
            .expect_err("show error");
        assert_eq!(err.to_string(), "show failed");
    }
}
