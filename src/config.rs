use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::announce::ANNOUNCE_RATE;

pub const DEFAULT_CONFIG_PATH: &str = "lapwatch.toml";
pub const MAX_INSTANCES: usize = 9;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_instances")]
    pub instances: usize,
    #[serde(default = "default_laps")]
    pub laps: bool,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instances: default_instances(),
            laps: default_laps(),
            display: DisplayConfig::default(),
            speech: SpeechConfig::default(),
            voice: VoiceConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_instances() -> usize {
    1
}

fn default_laps() -> bool {
    true
}

// ============================================================================
// Display Config
// ============================================================================

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// 50 ms sampling, deciseconds shown
    #[default]
    Fine,
    /// 100 ms sampling, seconds only
    Coarse,
}

impl Resolution {
    pub fn interval(self) -> Duration {
        match self {
            Resolution::Fine => Duration::from_millis(50),
            Resolution::Coarse => Duration::from_millis(100),
        }
    }

    pub fn shows_deciseconds(self) -> bool {
        self == Resolution::Fine
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub resolution: Resolution,
}

// ============================================================================
// Speech Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,
    /// Multiplier on the synthesizer's normal rate
    #[serde(default = "default_speech_rate")]
    pub rate: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            rate: default_speech_rate(),
        }
    }
}

fn default_speech_enabled() -> bool {
    true
}

fn default_speech_rate() -> f32 {
    ANNOUNCE_RATE
}

// ============================================================================
// Voice Config
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct VoiceConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Recognizer argv; must print transcripts to stdout, one per line
    #[serde(default)]
    pub command: Vec<String>,
}

// ============================================================================
// Log Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    /// Used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("lapwatch.log")
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load from `path`, or from `lapwatch.toml` when no path is given.
    ///
    /// A missing default file yields defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        if !required && !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.normalize();
        Ok(config)
    }

    /// Clamp values into their supported ranges
    pub fn normalize(&mut self) {
        self.instances = self.instances.clamp(1, MAX_INSTANCES);
        if !self.speech.rate.is_finite() {
            self.speech.rate = default_speech_rate();
        }
        self.speech.rate = self.speech.rate.clamp(0.1, 10.0);
    }
}
