use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use smoothscroll_core::AppConfig;
use smoothscroll_tui::{
    event::{AppEvent, EventHandler},
    App, CellMetrics, TextView, Workspace,
};

pub async fn run(config: Arc<AppConfig>, file: &Path, split: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let title = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let metrics = CellMetrics::from_config(&config.ui);
    let mut panes = vec![TextView::new(title.clone(), &text, metrics)];
    if split {
        panes.push(TextView::new(title.clone(), &text, metrics));
    }
    info!(file = %file.display(), panes = panes.len(), "Opening viewer");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle(format!("smoothscroll - {}", title))
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), Workspace::new(panes));
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    let result = event_loop(&mut terminal, &mut app, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    let mut redraw = true;
    let frame_interval = event_handler.poll_interval(true);
    let mut last_frame = Instant::now();

    loop {
        if redraw || app.workspace.take_dirty() {
            terminal.draw(|frame| app.render(frame))?;
            redraw = false;
        }

        // Poll at frame rate while any pane is animating
        let animating = app.needs_fast_update();
        match event_handler.next(animating)? {
            Some(AppEvent::Tick) => {}
            Some(AppEvent::Resize(..)) => redraw = true,
            Some(event) => {
                app.handle_event(event);
                redraw = true;
            }
            None => {}
        }

        // Input wakes the loop early; keep frames on the animation clock
        if app.needs_fast_update() && last_frame.elapsed() >= frame_interval {
            app.on_frame();
            last_frame = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
