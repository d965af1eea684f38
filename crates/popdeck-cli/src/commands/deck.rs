//! `popdeck deck`: the interactive panel deck.
//!
//! Keys `1`-`6` switch panels, each panel's action keys run its actions,
//! `e` toggles edit mode, `w` replaces the draft with a typed line (`\n`
//! becomes a newline), `x` dismisses all statuses and `q` quits.

use crate::commands::ChromeOptions;
use crate::render;
use crate::session::Session;
use anyhow::Result;
use console::{Key, Term};
use popdeck_browser::{ChromeFinder, ChromeLauncher, ProfileManager};
use popdeck_core::panels::EDIT_KEY;
use popdeck_core::status::StatusFeedConfig;
use popdeck_core::{EditMode, PanelId, PanelRegistry, PanelShell};
use std::path::Path;
use std::process::Child;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

enum Input {
    Key(char),
    /// Replacement text for the draft
    Line(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Flags shared between the deck loop and the keyboard thread
#[derive(Default)]
struct Prompt {
    editing: AtomicBool,
    active: AtomicBool,
}

pub fn execute(
    port: u16,
    chrome: Option<ChromeOptions>,
    first: Option<PanelId>,
    store: &Path,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        // Held for the whole session; a temporary profile is removed on drop
        let mut launched: Option<(Child, ProfileManager)> = None;
        if let Some(options) = chrome {
            launched = Some(launch_chrome(options, port)?);
        }

        let result = run_deck(port, first, store).await;

        if let Some((mut child, _profile)) = launched {
            tracing::info!("Stopping Chrome");
            let _ = child.kill();
            let _ = child.wait();
        }
        result
    })
}

fn launch_chrome(options: ChromeOptions, port: u16) -> Result<(Child, ProfileManager)> {
    let binary = ChromeFinder::new(options.chrome_path.clone()).find()?;
    tracing::info!("Found Chrome at: {}", binary.display());

    let profile = match options.profile_name() {
        Some(name) => ProfileManager::named(name)?,
        None => ProfileManager::temporary()?,
    };
    tracing::info!("Using profile: {}", profile.path().display());

    let child = ChromeLauncher::new(binary, profile.path().to_path_buf())
        .with_url(options.url)
        .with_port(port)
        .launch()?;
    Ok((child, profile))
}

async fn run_deck(port: u16, first: Option<PanelId>, store: &Path) -> Result<()> {
    let session = Session::attach(port, store).await?;
    let events = session.browser.watch().await?;
    let _guard = events.guard;
    let mut inbound = events.inbound;
    let _listener = session.tracker.listen(events.tabs);

    let mut shell = PanelShell::new(
        PanelRegistry::builtin(),
        session.gateway.clone(),
        session.tracker.clone(),
        StatusFeedConfig::default(),
    );
    if let Some(id) = first {
        shell.select(id)?;
    }

    let term = Term::stdout();
    let prompt = Arc::new(Prompt::default());
    let mut keys = spawn_keyboard(term.clone(), Arc::clone(&prompt));
    let mut tab_changes = session.tracker.subscribe();

    loop {
        let editing = shell.active_view().edit_mode() == EditMode::Editing;
        prompt.editing.store(editing, Ordering::SeqCst);

        let mut statuses = shell.active_view().feed().subscribe();
        if !prompt.active.load(Ordering::SeqCst) {
            draw(&term, &shell)?;
        }

        tokio::select! {
            input = keys.recv() => {
                let Some(input) = input else {
                    break;
                };
                if handle_input(&mut shell, input)? == Flow::Quit {
                    break;
                }
                // Let a freshly spawned action mark itself busy before redrawing
                tokio::task::yield_now().await;
            }
            Some(message) = inbound.recv() => {
                shell.dispatch(&message);
            }
            Ok(()) = statuses.changed() => {}
            Ok(()) = tab_changes.changed() => {}
        }
    }

    term.clear_screen()?;
    Ok(())
}

fn draw(term: &Term, shell: &PanelShell) -> Result<()> {
    term.clear_screen()?;
    for line in render::frame(&shell.snapshot()) {
        term.write_line(&line)?;
    }
    Ok(())
}

/// Read keys on a dedicated thread; `w` while editing reads a whole line
fn spawn_keyboard(term: Term, prompt: Arc<Prompt>) -> mpsc::UnboundedReceiver<Input> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        loop {
            let key = match term.read_key() {
                Ok(key) => key,
                Err(e) => {
                    tracing::debug!("Keyboard closed: {}", e);
                    break;
                }
            };

            let input = match key {
                Key::Char('w') if prompt.editing.load(Ordering::SeqCst) => {
                    prompt.active.store(true, Ordering::SeqCst);
                    let _ = term.write_str("\nNew text: ");
                    let line = term.read_line();
                    prompt.active.store(false, Ordering::SeqCst);
                    match line {
                        Ok(line) => Input::Line(line.replace("\\n", "\n")),
                        Err(_) => break,
                    }
                }
                Key::Char(c) => Input::Key(c.to_ascii_lowercase()),
                Key::Escape => Input::Key('q'),
                _ => continue,
            };

            if tx.send(input).is_err() {
                break;
            }
        }
    });

    rx
}

fn handle_input(shell: &mut PanelShell, input: Input) -> Result<Flow> {
    let key = match input {
        Input::Line(text) => {
            if let Err(e) = shell.active_view().edit(text) {
                tracing::debug!("Ignoring typed text: {}", e);
            }
            return Ok(Flow::Continue);
        }
        Input::Key(key) => key,
    };

    match key {
        'q' => return Ok(Flow::Quit),
        'x' => shell.active_view().feed().dismiss_all(),
        key if key == EDIT_KEY => {
            shell.active_view().toggle_edit();
        }
        key if key.is_ascii_digit() => {
            let picked = key
                .to_digit(10)
                .and_then(|n| (n as usize).checked_sub(1))
                .and_then(|index| shell.registry().ids().nth(index));
            if let Some(id) = picked {
                shell.select(id)?;
            }
        }
        key => {
            let panel = shell.active_view().clone();
            if let Some(action) = panel.spec().action_for_key(key) {
                tokio::spawn(async move {
                    if let Err(e) = panel.trigger(action.id).await {
                        tracing::warn!("{}", e);
                    }
                });
            }
        }
    }

    Ok(Flow::Continue)
}
