use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{
    poll as event_poll, read as event_read, DisableMouseCapture, EnableMouseCapture,
    Event as CrosstermEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use windlass::app::Shell;
use windlass::config::ShellConfig;

/// Terminal front-end for the windlass download daemon
#[derive(Parser, Debug)]
#[command(name = "windlass")]
#[command(about = "Terminal front-end for the windlass download daemon", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory to load page templates from instead of the built-ins
    #[arg(long, value_name = "DIR")]
    assets_dir: Option<PathBuf>,

    /// Daemon command to spawn, overrides the configured one
    #[arg(long, value_name = "CMD")]
    backend: Option<String>,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Handle --dump-config early, no terminal setup needed
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(&args)?;
    tracing::info!("Shell starting");

    // Raw mode must not survive a panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        original_hook(panic);
    }));

    let mut terminal = setup_terminal()?;
    let size = terminal.size()?;
    let result = run_shell(config, size.width, size.height, &mut terminal);
    restore_terminal()?;
    result
}

fn load_config(args: &Args) -> AnyhowResult<ShellConfig> {
    let mut config = if let Some(path) = &args.config {
        ShellConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        ShellConfig::load_or_default()
    };

    if let Some(dir) = &args.assets_dir {
        config.assets_dir = Some(dir.clone());
    }
    if let Some(cmd) = &args.backend {
        config.backend.command = cmd.clone();
    }
    Ok(config)
}

fn init_tracing(args: &Args) -> AnyhowResult<()> {
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("windlass.log"));
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log dir {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let default_filter = if args.debug {
        "windlass=debug"
    } else {
        "windlass=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> AnyhowResult<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(out))?;
    Ok(terminal)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

fn run_shell(
    config: ShellConfig,
    width: u16,
    height: u16,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    let idle_poll = Duration::from_millis(config.tick_rate_ms.max(1));
    let mut shell = Shell::new(config, width, height).context("Failed to start the shell")?;
    shell.startup();
    run_event_loop(&mut shell, terminal, idle_poll)
}

fn run_event_loop(
    shell: &mut Shell,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    idle_poll: Duration,
) -> AnyhowResult<()> {
    const FRAME_DURATION: Duration = Duration::from_millis(16); // 60fps
    let mut last_render = Instant::now();
    let mut needs_render = true;

    loop {
        if shell.process_async_messages() {
            needs_render = true;
        }
        shell.tick();
        if shell.is_animating() {
            needs_render = true;
        }

        if shell.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| shell.render(frame))?;
            last_render = Instant::now();
            needs_render = false;
        }

        let timeout = if needs_render {
            FRAME_DURATION.saturating_sub(last_render.elapsed())
        } else {
            idle_poll
        };
        if event_poll(timeout)? {
            match event_read()? {
                CrosstermEvent::Key(key_event) => {
                    if key_event.kind == KeyEventKind::Press {
                        shell.handle_key(key_event.code, key_event.modifiers)?;
                        needs_render = true;
                    }
                }
                CrosstermEvent::Mouse(mouse_event) => {
                    if shell.handle_mouse(mouse_event)? {
                        needs_render = true;
                    }
                }
                CrosstermEvent::Resize(width, height) => {
                    shell.resize(width, height);
                    needs_render = true;
                }
                _ => {}
            }
        }
    }

    Ok(())
}
