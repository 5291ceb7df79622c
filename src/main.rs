use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use lapwatch::app::{App, Flow};
use lapwatch::board::Board;
use lapwatch::clock::MonotonicClock;
use lapwatch::config::{Config, Resolution};
use lapwatch::events;
use lapwatch::input::KeyboardListener;
use lapwatch::logging;
use lapwatch::sampler::TokioSampler;
use lapwatch::speech::{Silent, SpeechSink, SystemSpeech};
use lapwatch::tui::Tui;

#[derive(Parser)]
#[command(name = "lapwatch", about = "Terminal stopwatch with laps and spoken minutes")]
struct Cli {
    /// Config file [default: lapwatch.toml when present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of stopwatches side by side (1-9)
    #[arg(short = 'n', long)]
    instances: Option<usize>,

    /// Sample every 100 ms and hide deciseconds
    #[arg(long)]
    coarse: bool,

    /// Disable the lap key
    #[arg(long)]
    no_laps: bool,

    /// Disable spoken announcements
    #[arg(long)]
    mute: bool,

    /// Speech recognizer command, printing transcripts on stdout.
    /// Enables saying "go" to start the selected watch.
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    voice_cmd: Option<Vec<String>>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags override the config file
    fn apply(&self, config: &mut Config) {
        if let Some(n) = self.instances {
            config.instances = n;
        }
        if self.coarse {
            config.display.resolution = Resolution::Coarse;
        }
        if self.no_laps {
            config.laps = false;
        }
        if self.mute {
            config.speech.enabled = false;
        }
        if let Some(command) = &self.voice_cmd {
            config.voice.enabled = true;
            config.voice.command = command.clone();
        }
        if let Some(path) = &self.log_file {
            config.log.file = path.clone();
        }
        config.normalize();
    }
}

#[hotpath::main]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    logging::init(&config.log.file, &config.log.level)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building runtime")?
        .block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        instances = config.instances,
        resolution = ?config.display.resolution,
        laps = config.laps,
        speech = config.speech.enabled,
        voice = config.voice.enabled,
        "starting"
    );

    let (tx, rx) = events::channel();
    let resolution = config.display.resolution;

    let sampler = TokioSampler::new(tokio::runtime::Handle::current(), tx.clone());
    let board = Board::new(
        sampler,
        MonotonicClock::new(),
        config.instances,
        resolution.interval(),
        config.laps,
        config.speech.rate,
    );

    let speech: Box<dyn SpeechSink> = if config.speech.enabled {
        Box::new(SystemSpeech::new())
    } else {
        Box::new(Silent)
    };

    let mut tui = Tui::new(resolution).context("setting up terminal")?;
    let (width, _) = Tui::size();

    let mut app = App::new(board, speech, tx.clone(), width);
    if config.voice.enabled {
        app = app.with_voice(config.voice.command.clone());
        app.listen();
    }

    let listener = KeyboardListener::attach(tx);
    tui.draw(app.board())?;

    'events: while let Ok(event) = rx.recv_async().await {
        if app.handle(event) == Flow::Quit {
            break;
        }
        // Coalesce whatever queued up while handling, then draw once
        while let Ok(event) = rx.try_recv() {
            if app.handle(event) == Flow::Quit {
                break 'events;
            }
        }
        tui.draw(app.board())?;
    }

    drop(listener);
    drop(app);
    drop(tui);
    info!("exiting");
    Ok(())
}
