pub mod app;
pub mod command;
pub mod view;
pub mod widgets;

pub use app::{Msg, ReportApp};
pub use command::Command;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::sync::mpsc;

use crate::api::ReportClient;
use crate::report::validate;

/// Run the report screen until the user quits.
pub async fn run(client: ReportClient) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: ReportClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Msg>();
    let (mut app, startup) = ReportApp::new(client, validate::today_local());
    if apply(startup, &tx) {
        return Ok(());
    }

    // No mouse capture: everything is keyboard driven, and the terminal keeps
    // its native scrollback behavior.
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| view::draw(frame, &mut app))?;

        // Wait for a terminal event or a finished async command.
        let msg = tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => Msg::Key(key),
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => return Err(error.into()),
                    None => return Ok(()),
                }
            }
            Some(msg) = rx.recv() => msg,
        };

        if apply(app.update(msg), &tx) {
            return Ok(());
        }
    }
}

/// Execute a command, feeding async results back through the channel.
/// Returns true when the app asked to quit.
fn apply(command: Command<Msg>, tx: &mpsc::UnboundedSender<Msg>) -> bool {
    match command {
        Command::None => false,
        Command::Perform(future) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(future.await);
            });
            false
        }
        Command::Quit => true,
    }
}
