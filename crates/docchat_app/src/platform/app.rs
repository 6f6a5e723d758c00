use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use docchat_core::{update, AppState, Msg, PickedFile};
use docchat_engine::ServiceSettings;
use docchat_logging::{docchat_info, docchat_warn};

use super::cli::Args;
use super::effects::{now_timestamp, EffectRunner};
use super::logging;
use super::ui::commands::{self, Command};
use super::ui::constants::{BANNER, HELP, WAITING_FOR_ANSWER};
use super::ui::render::{self, TerminalRenderer};

/// Everything the dispatch loop reacts to, funnelled through one channel so
/// state is only ever touched from the loop.
pub enum Inbox {
    Core(Msg),
    Line(String),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::initialize(args.log, args.log_level);

    let settings = ServiceSettings {
        upload_chunk_size: args.upload_chunk_kib as usize * 1024,
        ..ServiceSettings::new(args.server_url.clone())
    };
    settings
        .endpoint("")
        .with_context(|| format!("invalid server url {:?}", args.server_url))?;
    docchat_info!("Starting docchat against {}", settings.base_url);

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(settings, inbox_tx.clone())?;
    spawn_stdin_reader(inbox_tx);

    let mut app = App::new(runner);
    app.print_lines([BANNER.to_string()]);
    app.print_lines(HELP.iter().map(|line| line.to_string()));
    app.dispatch(Msg::Started);
    if !args.upload.is_empty() {
        app.pick_files(args.upload.into_iter().map(PickedFile::new).collect(), Vec::new());
    }

    for item in inbox_rx {
        let flow = match item {
            Inbox::Core(msg) => {
                app.dispatch(msg);
                Flow::Continue
            }
            Inbox::Line(line) => app.handle_line(&line),
            Inbox::Closed => Flow::Quit,
        };
        if flow == Flow::Quit {
            break;
        }
    }

    docchat_info!("Exiting docchat");
    Ok(())
}

fn spawn_stdin_reader(inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if inbox.send(Inbox::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    docchat_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = inbox.send(Inbox::Closed);
    });
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer: TerminalRenderer::default(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        if was_dirty {
            let lines = self.renderer.render(&self.state.view());
            self.print_lines(lines);
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let view = self.state.view();
        match commands::parse(line, &view) {
            Command::Ask(text) => {
                if !text.trim().is_empty() {
                    if view.input_disabled {
                        let reason = if view.input_locked {
                            view.placeholder
                        } else {
                            WAITING_FOR_ANSWER
                        };
                        self.print_lines([format!("(input disabled: {reason})")]);
                    } else if view.selected_count == 0 {
                        self.print_lines([format!("({})", view.selection_summary)]);
                    }
                }
                self.dispatch(Msg::InputChanged(text));
                self.dispatch(Msg::QuerySubmitted {
                    timestamp: now_timestamp(),
                });
            }
            Command::Upload { files, rejected } => self.pick_files(files, rejected),
            Command::Toggle(ids) => {
                for id in ids {
                    self.dispatch(Msg::DocumentToggled(id));
                }
            }
            Command::ShowDocuments => self.print_lines(render::document_lines(&view)),
            Command::Help => self.print_lines(HELP.iter().map(|line| line.to_string())),
            Command::Quit => return Flow::Quit,
            Command::Invalid(reason) => self.print_lines([reason]),
        }
        Flow::Continue
    }

    fn pick_files(&mut self, files: Vec<PickedFile>, rejected: Vec<String>) {
        let rejected = rejected
            .into_iter()
            .chain(
                files
                    .iter()
                    .filter(|file| !commands::is_pdf(&file.path))
                    .map(|file| file.path.display().to_string()),
            )
            .collect::<Vec<_>>();
        for path in &rejected {
            docchat_warn!("Skipping non-PDF file {}", path);
        }
        self.print_lines(rejected.iter().map(|path| format!("skipped (not a PDF): {path}")));

        let files: Vec<_> = files
            .into_iter()
            .filter(|file| commands::is_pdf(&file.path))
            .collect();
        if !files.is_empty() {
            self.dispatch(Msg::FilesPicked(files));
        }
    }

    fn print_lines(&self, lines: impl IntoIterator<Item = String>) {
        let mut out = io::stdout().lock();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}
