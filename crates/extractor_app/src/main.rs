mod effects;
mod logging;
mod persistence;
mod render;

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use client_logging::client_info;
use extractor_client::{check_upload, ApiSettings};
use extractor_core::{update, AppState, Mode, Msg, Phase};

use effects::EffectRunner;

/// How long the main loop waits for any event before giving up.
const EVENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Submits a document to the knowledge-extraction service and tracks
/// the conversion until it finishes.
#[derive(Debug, Parser)]
#[command(name = "extractor", version)]
struct Cli {
    /// Document to convert (.docx or .pptx).
    file: PathBuf,

    /// Processing mode: new or append.
    #[arg(long, default_value = "append")]
    mode: String,

    /// Model to run the analysis with; defaults to the saved choice.
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the extraction service.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// API key forwarded with every request.
    #[arg(long)]
    api_key: Option<String>,

    /// Directory the result document and settings are kept in.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Print a preview of the generated knowledge base when done.
    #[arg(long)]
    preview: bool,

    /// Skip saving the result document.
    #[arg(long)]
    no_download: bool,

    /// Remember the chosen model for future runs.
    #[arg(long)]
    save_settings: bool,
}

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::File);
    let cli = Cli::parse();

    let mode = Mode::parse(&cli.mode)
        .with_context(|| format!("unknown mode {:?}, expected new or append", cli.mode))?;

    let metadata =
        std::fs::metadata(&cli.file).with_context(|| format!("cannot read {:?}", cli.file))?;
    check_upload(&cli.file, metadata.len())?;
    let filename = cli
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .context("file name is not valid UTF-8")?
        .to_string();

    let settings = ApiSettings {
        base_url: cli.server.clone(),
        api_key: cli.api_key.clone(),
        ..ApiSettings::default()
    };

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx, settings, cli.file.clone(), cli.output_dir.clone())?;
    let mut state = AppState::new();

    // Saved model first, then command-line choices on top.
    let saved = persistence::load_saved_model(&cli.output_dir);
    dispatch(&mut state, Msg::SettingsRestored { model: saved }, &runner);
    dispatch(&mut state, Msg::ModeSelected(mode), &runner);
    if let Some(model) = cli.model.clone() {
        dispatch(&mut state, Msg::ModelSelected(model), &runner);
    }
    if cli.save_settings {
        dispatch(&mut state, Msg::SettingsSaveRequested, &runner);
    }

    dispatch(&mut state, Msg::FileAccepted { filename }, &runner);

    // Outstanding preview/download responses after the terminal status.
    let mut pending = 0usize;
    let mut finishing = false;
    let mut failed = false;

    loop {
        let msg = match msg_rx.recv_timeout(EVENT_TIMEOUT) {
            Ok(msg) => msg,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                bail!("no event from the service in {}s", EVENT_TIMEOUT.as_secs())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => bail!("event channel closed"),
        };
        let settles_pending = matches!(
            msg,
            Msg::PreviewLoaded { .. } | Msg::DownloadFinished { .. }
        );
        let upload_rejected =
            matches!(&msg, Msg::UploadFinished { result } if result.is_err());
        dispatch(&mut state, msg, &runner);

        if upload_rejected {
            bail!("submission rejected");
        }
        if settles_pending {
            pending = pending.saturating_sub(1);
        }

        if !finishing {
            if let Some(progress) = state.view().progress {
                if progress.terminal {
                    finishing = true;
                    failed = progress.phase == Phase::Failed;
                    if !failed {
                        if cli.preview {
                            dispatch(&mut state, Msg::PreviewRequested, &runner);
                            pending += 1;
                        }
                        if !cli.no_download {
                            dispatch(&mut state, Msg::DownloadRequested, &runner);
                            pending += 1;
                        }
                    }
                }
            }
        }

        if finishing && pending == 0 {
            break;
        }
    }

    if failed {
        bail!("conversion failed");
    }
    client_info!("conversion finished");
    Ok(())
}

fn dispatch(state: &mut AppState, msg: Msg, runner: &EffectRunner) {
    let current = std::mem::take(state);
    let (mut next, effects) = update(current, msg);
    if next.consume_dirty() {
        render::render(&next.view());
    }
    *state = next;
    runner.enqueue(effects);
}
