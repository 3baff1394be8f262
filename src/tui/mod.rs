//! Interactive terminal view of the active page

mod view;

pub use view::{ViewModel, draw};

use crate::app::AppContext;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

pub async fn launch(ctx: Arc<AppContext>, route: String) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, ctx, route).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

enum Action {
    Quit,
    Refresh,
    ToggleMenu,
    Outside,
    Install,
    Dismiss,
}

fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('n') => Some(Action::ToggleMenu),
            KeyCode::Char('i') => Some(Action::Install),
            KeyCode::Char('d') => Some(Action::Dismiss),
            KeyCode::Esc => Some(Action::Outside),
            _ => None,
        },
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => Some(Action::Outside),
        _ => None,
    }
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, ctx: Arc<AppContext>, route: String) -> Result<()> {
    let loading = Arc::new(AtomicUsize::new(0));
    spawn_loading(&loading, {
        let ctx = Arc::clone(&ctx);
        async move {
            ctx.bootstrap(&route).await;
        }
    });

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            let Some(action) = action_for(&event) else {
                continue;
            };

            match action {
                Action::Quit => {
                    info!("Leaving terminal UI");
                    return Ok(());
                }
                Action::Refresh => {
                    if loading.load(Ordering::SeqCst) > 0 {
                        debug!("Refresh requested while loading; issuing anyway");
                    }
                    let ctx = Arc::clone(&ctx);
                    spawn_loading(&loading, async move {
                        ctx.refresh().await;
                    });
                }
                Action::ToggleMenu => {
                    if let Some(controller) = ctx.active() {
                        controller.shell().toggle_navigation();
                    }
                }
                Action::Outside => {
                    if let Some(controller) = ctx.active() {
                        let width = terminal.size()?.width;
                        controller.shell().outside_interaction(width);
                    }
                }
                Action::Install => {
                    if let Some(controller) = ctx.active() {
                        tokio::spawn(async move {
                            controller.shell().activate_install().await;
                        });
                    }
                }
                Action::Dismiss => {
                    ctx.notifier().dismiss_latest();
                }
            }
        }

        let view = view_model(&ctx, loading.load(Ordering::SeqCst) > 0);
        terminal.draw(|frame| draw(frame, &view))?;

        if let Some(remaining) = FRAME_INTERVAL.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }
}

/// Counts one in-flight load until dropped
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(loading: &Arc<AtomicUsize>) -> Self {
        loading.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(loading))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Run `work` on tokio; `loading` stays non-zero while any such work runs
fn spawn_loading<F>(loading: &Arc<AtomicUsize>, work: F) -> tokio::task::JoinHandle<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let in_flight = InFlight::start(loading);
    tokio::spawn(async move {
        work.await;
        drop(in_flight);
    })
}

fn view_model(ctx: &AppContext, loading: bool) -> ViewModel {
    let active = ctx.active();
    ViewModel {
        targets: active
            .as_ref()
            .map(|c| c.page().snapshot())
            .unwrap_or_default(),
        toasts: ctx.notifier().active(),
        menu_open: active.as_ref().is_some_and(|c| c.shell().navigation_open()),
        loading,
    }
}
