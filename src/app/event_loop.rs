use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{App, Focus, Message, Model, update};

const IDLE_POLL: Duration = Duration::from_millis(250);

impl App {
    /// Run the interactive editor until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the terminal cannot be
    /// initialized, or terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        let text = super::effects::read_outline(&self.file_path)?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal (mindmark requires an interactive terminal)")?;
        let size = terminal.size()?;

        let mut model = self.initial_model(&text, (size.width, size.height));
        info!(
            path = %model.file_path.display(),
            nodes = model.tree_pane.order().len(),
            "editor started"
        );

        let result = execute!(stdout(), EnableMouseCapture)
            .context("Failed to enable mouse capture")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        result
    }

    pub(super) fn initial_model(&self, text: &str, size: (u16, u16)) -> Model {
        let mut model = Model::new(self.file_path.clone(), text, size);
        model.tree_visible = self.tree_visible;
        model.tree_style = self.tree_style;
        if self.tree_focus && self.tree_visible {
            model.focus = Focus::Tree;
        }
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let poll = if needs_render { Duration::ZERO } else { IDLE_POLL };
            if event::poll(poll)? {
                Self::dispatch(model, &event::read()?, &mut needs_render);
                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    Self::dispatch(model, &event::read()?, &mut needs_render);
                }
            }

            if needs_render {
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(model: &mut Model, event: &event::Event, needs_render: &mut bool) {
        let Some(msg) = Self::handle_event(event, model) else {
            return;
        };
        debug!(?msg, "message");
        *model = update(std::mem::take(model), msg.clone());
        Self::handle_message_side_effects(model, &msg);
        *needs_render = true;
    }
}
