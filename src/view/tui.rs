//! Terminal front end: turns key events into directory actions and redraws
//! the page after each one.

use std::future::Future;
use std::io::{self, Stdout};

use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clients::DirectoryClient;
use crate::domain::{UserField, UserId};
use crate::error::DirectoryError;
use crate::view::input::{action_for, Action};
use crate::view::render::{draw, MessageKind, Screen, StatusMessage};
use crate::view::ViewState;

type Finished = (&'static str, Result<(), DirectoryError>);

enum Flow {
    Continue,
    Spawned,
    Quit,
}

pub struct Tui<B: Backend> {
    client: DirectoryClient,
    terminal: Terminal<B>,
    /// Latest snapshot of the directory
    view: ViewState,
    selected: usize,
    focus: usize,
    message: Option<StatusMessage>,
}

/// Puts the terminal into raw mode on the alternate screen. A scripted
/// session leaves the terminal as it is.
pub fn enter_terminal(scripted: bool) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    if !scripted {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
    }
    Terminal::new(CrosstermBackend::new(stdout))
}

pub fn leave_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>, scripted: bool) -> io::Result<()> {
    if !scripted {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
    }
    Ok(())
}

impl<B: Backend> Tui<B> {
    pub fn new(client: DirectoryClient, terminal: Terminal<B>) -> Self {
        Self {
            client,
            terminal,
            view: ViewState::default(),
            selected: 0,
            focus: 0,
            message: None,
        }
    }

    pub fn into_terminal(self) -> Terminal<B> {
        self.terminal
    }

    #[cfg(test)]
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Mounts the page (starting the initial load) and handles events until
    /// a quit key, the end of `events`, or a Ctrl+C signal.
    ///
    /// Load, submit and delete run in the background so keys keep being
    /// handled while they are in flight. Quitting and the end of input wait
    /// for them; the signal does not.
    pub async fn run(&mut self, mut events: mpsc::Receiver<Event>) -> io::Result<()> {
        let (finished_tx, mut finished_rx) = mpsc::unbounded_channel::<Finished>();
        let mut pending = 0usize;

        let loader = self.client.clone();
        spawn_action(&finished_tx, "load", async move { loader.load().await.map(|_| ()) });
        pending += 1;

        self.refresh().await?;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Event source ended");
                        break;
                    };
                    // Keys act on what the directory holds now, not on the last frame.
                    self.sync_view().await?;
                    match self.handle_event(event, &finished_tx).await {
                        Flow::Quit => break,
                        Flow::Spawned => pending += 1,
                        Flow::Continue => {}
                    }
                    self.refresh().await?;
                }
                Some((action, result)) = finished_rx.recv() => {
                    pending -= 1;
                    debug!(action, "Action finished");
                    self.report(action, result);
                    self.refresh().await?;
                }
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, leaving");
                    return Ok(());
                }
            }
        }

        while pending > 0 {
            tokio::select! {
                Some((action, result)) = finished_rx.recv() => {
                    pending -= 1;
                    debug!(action, "Action finished");
                    self.report(action, result);
                    self.refresh().await?;
                }
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, leaving");
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: Event, finished: &mpsc::UnboundedSender<Finished>) -> Flow {
        // Anything else (resize, focus) only needs the redraw that follows.
        let Event::Key(key) = event else {
            return Flow::Continue;
        };
        let Some(action) = action_for(key, self.view.is_modal_visible()) else {
            return Flow::Continue;
        };
        self.message = None;

        let user_count = self.view.users().len();
        match action {
            Action::Quit => return Flow::Quit,
            Action::SelectNext => {
                if user_count > 0 {
                    self.selected = (self.selected + 1) % user_count;
                }
            }
            Action::SelectPrevious => {
                if user_count > 0 {
                    self.selected = (self.selected + user_count - 1) % user_count;
                }
            }
            Action::FocusNext => {
                self.focus = (self.focus + 1) % UserField::FORM.len();
            }
            Action::FocusPrevious => {
                self.focus = (self.focus + UserField::FORM.len() - 1) % UserField::FORM.len();
            }
            Action::OpenCreate => {
                self.focus = 0;
                let result = self.client.open_create().await;
                self.report("open_create", result);
            }
            Action::EditSelected => {
                if let Some(id) = self.selected_id() {
                    self.focus = 0;
                    let result = self.client.open_edit(id).await;
                    self.report("open_edit", result);
                }
            }
            Action::DeleteSelected => {
                if let Some(id) = self.selected_id() {
                    let client = self.client.clone();
                    spawn_action(finished, "delete", async move { client.delete(id).await });
                    return Flow::Spawned;
                }
            }
            Action::Type(ch) => self.edit_focused(|value| value.push(ch)).await,
            Action::Erase => {
                self.edit_focused(|value| {
                    value.pop();
                })
                .await
            }
            Action::Submit => {
                let client = self.client.clone();
                spawn_action(finished, "submit", async move { client.submit().await });
                return Flow::Spawned;
            }
            Action::Cancel => {
                let result = self.client.cancel().await;
                self.report("cancel", result);
            }
        }
        Flow::Continue
    }

    fn selected_id(&self) -> Option<UserId> {
        self.view.users().get(self.selected).and_then(|user| user.id)
    }

    async fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let field = UserField::FORM[self.focus];
        let mut value = field.get(self.view.draft()).to_string();
        edit(&mut value);
        let result = self.client.change_field(field, value).await;
        self.report("change_field", result);
    }

    /// Shows input mistakes and completed saves. Remote failures have
    /// already been logged by the directory and are not shown.
    fn report(&mut self, action: &'static str, result: Result<(), DirectoryError>) {
        let message = match (action, result) {
            (
                _,
                Err(
                    e @ (DirectoryError::NotFound(_)
                    | DirectoryError::Validation(_)
                    | DirectoryError::MissingId
                    | DirectoryError::FormClosed),
                ),
            ) => StatusMessage {
                kind: MessageKind::Error,
                text: e.to_string(),
            },
            ("submit", Ok(())) => StatusMessage {
                kind: MessageKind::Info,
                text: "User saved".to_string(),
            },
            ("delete", Ok(())) => StatusMessage {
                kind: MessageKind::Info,
                text: "User deleted".to_string(),
            },
            _ => return,
        };
        self.message = Some(message);
    }

    async fn sync_view(&mut self) -> io::Result<()> {
        self.view = self
            .client
            .snapshot()
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e))?;

        let user_count = self.view.users().len();
        if self.selected >= user_count {
            self.selected = user_count.saturating_sub(1);
        }
        Ok(())
    }

    async fn refresh(&mut self) -> io::Result<()> {
        self.sync_view().await?;

        let screen = Screen {
            selected: self.selected,
            focus: self.focus,
            message: self.message.as_ref(),
        };
        let view = &self.view;
        self.terminal.draw(|frame| draw(frame, view, &screen))?;
        Ok(())
    }
}

fn spawn_action<F>(finished: &mpsc::UnboundedSender<Finished>, action: &'static str, call: F)
where
    F: Future<Output = Result<(), DirectoryError>> + Send + 'static,
{
    let finished = finished.clone();
    tokio::spawn(async move {
        let result = call.await;
        let _ = finished.send((action, result));
    });
}
