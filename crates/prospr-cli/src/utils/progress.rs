use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use prospr_core::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
}

/// Bridges engine progress events onto an indicatif spinner on stderr.
#[derive(Clone, Default)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("progress bar mutex was poisoned; cannot update the spinner");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    let bar = ProgressBar::new_spinner();
                    bar.set_draw_target(ProgressDrawTarget::stderr());
                    bar.enable_steady_tick(Duration::from_millis(80));
                    bar.set_style(spinner_style());
                    bar.set_message(name.to_string());
                    if let Some(previous) = state.active_bar.replace(bar) {
                        previous.finish_and_clear();
                    }
                }
                Progress::PhaseFinish => {
                    if let Some(bar) = state.active_bar.take() {
                        bar.finish_and_clear();
                    }
                }
                Progress::Message(msg) => match state.active_bar.as_ref() {
                    Some(bar) => bar.println(format!("  {msg}")),
                    None => eprintln!("  {msg}"),
                },
            }
        })
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("invalid spinner template")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
