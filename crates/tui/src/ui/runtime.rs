//! Runtime: unified event loop and input routing for the cross menu.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode, mouse capture).
//! - Drive a single event loop over terminal input, transition requests
//!   from the navigator's port, finished moves, and an animation ticker.
//! - Run moves as spawned tasks against the shared navigator so the loop
//!   keeps animating while a move waits for its completion signals.
//!
//! Smart ticking: ~60 fps while tweens or pulses are running, a slow
//! interval otherwise.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};
use xmb_engine::{MoveOutcome, Navigator};
use xmb_types::Direction;
use xmb_util::{BlogPost, XmbConfig};

use crate::app::{App, Effect, Msg};
use crate::port::AnimationPort;
use crate::ui::components::Component;
use crate::ui::main_view::MainView;

const FAST_TICK: Duration = Duration::from_millis(16);
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Spawn a dedicated input task that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// Mouse move events are throttled to one per frame.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);

    tokio::task::spawn_blocking(move || {
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(FAST_TICK) {
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                    continue;
                }
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "failed to poll terminal events");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < FAST_TICK {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => app.update(Msg::Resize(width, height)),
        Event::Key(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Start the navigator call behind a move effect.
fn spawn_move(navigator: &Arc<Navigator<AnimationPort>>, effect: Effect) -> Option<JoinHandle<MoveOutcome>> {
    let navigator = Arc::clone(navigator);
    let handle = match effect {
        Effect::Move(Direction::Horizontal(direction)) => tokio::spawn(async move { navigator.move_horizontal(direction).await }),
        Effect::Move(Direction::Vertical(direction)) => tokio::spawn(async move { navigator.move_vertical(direction).await }),
        Effect::JumpMenu(target) => tokio::spawn(async move { navigator.set_active_menu_index(target).await }),
        Effect::JumpSub { menu_index, sub_index } => {
            tokio::spawn(async move { navigator.set_active_sub_index(menu_index, sub_index).await })
        }
        Effect::ReloadPosts | Effect::Quit => return None,
    };
    Some(handle)
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal on exit.
pub async fn run_app(config: XmbConfig, posts: Vec<BlogPost>) -> Result<()> {
    let (width, _) = crossterm::terminal::size().unwrap_or((80, 24));
    let (mut app, mut transitions) = App::new(&config, posts, width)?;
    let mut main_view = MainView::default();

    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;
    let mut pending_moves: FuturesUnordered<JoinHandle<MoveOutcome>> = FuturesUnordered::new();

    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;
    info!("entered cross menu");

    'event_loop: loop {
        let target_interval = if app.is_animating() || !pending_moves.is_empty() { FAST_TICK } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut effects = Vec::new();
        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                if is_ctrl_c(&event) {
                    break;
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            Some(request) = transitions.recv() => {
                effects.extend(app.update(Msg::Transition(request)));
                needs_render = true;
            }

            Some(joined) = pending_moves.next(), if !pending_moves.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| {
                    warn!(%error, "move task failed");
                    MoveOutcome::Abandoned
                });
                effects.extend(app.update(Msg::MoveFinished(outcome)));
                needs_render = true;
            }

            _ = ticker.tick() => {
                needs_render = app.is_animating();
                effects.extend(app.update(Msg::Tick));
            }

            _ = signal::ctrl_c() => { break; }
        }

        for effect in effects {
            match effect {
                Effect::Quit => break 'event_loop,
                Effect::ReloadPosts => {
                    app.status = Some(match app.reload_posts() {
                        Ok(count) => format!("{count} posts loaded"),
                        Err(error) => {
                            warn!(error = %format!("{error:#}"), "reload refused");
                            "busy, try again".to_string()
                        }
                    });
                }
                other => pending_moves.extend(spawn_move(&app.navigator, other)),
            }
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    info!("left cross menu");
    Ok(())
}
