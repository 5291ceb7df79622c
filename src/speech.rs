//! Spoken announcements
//!
//! Speech is best-effort: when no synthesizer is available the sink stays
//! silent and the stopwatch carries on.

use tracing::{debug, info};

/// Fire-and-forget speech output
pub trait SpeechSink {
    /// Speak `text` at `rate` times the synthesizer's normal rate
    fn speak(&mut self, text: &str, rate: f32);
}

impl<T: SpeechSink + ?Sized> SpeechSink for Box<T> {
    fn speak(&mut self, text: &str, rate: f32) {
        (**self).speak(text, rate)
    }
}

/// Sink that drops everything
pub struct Silent;

impl SpeechSink for Silent {
    fn speak(&mut self, text: &str, _rate: f32) {
        debug!(text, "speech disabled");
    }
}

// ============================================================================
// Platform speech synthesizer
// ============================================================================

/// espeak's default speed in words per minute
#[cfg(target_os = "linux")]
const ESPEAK_NORMAL_WPM: f32 = 175.0;

pub struct SystemSpeech {
    #[cfg(not(target_os = "linux"))]
    tts: Option<tts::Tts>,
}

impl SystemSpeech {
    #[cfg(not(target_os = "linux"))]
    pub fn new() -> Self {
        let tts = match tts::Tts::default() {
            Ok(engine) => {
                info!("speech: system synthesizer ready");
                Some(engine)
            }
            Err(e) => {
                tracing::warn!("speech unavailable: {}", e);
                None
            }
        };
        Self { tts }
    }

    #[cfg(target_os = "linux")]
    pub fn new() -> Self {
        info!("speech: espeak");
        Self {}
    }
}

impl Default for SystemSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSink for SystemSpeech {
    #[cfg(not(target_os = "linux"))]
    fn speak(&mut self, text: &str, rate: f32) {
        let Some(tts) = self.tts.as_mut() else {
            return;
        };
        let scaled = (tts.normal_rate() * rate).clamp(tts.min_rate(), tts.max_rate());
        if let Err(e) = tts.set_rate(scaled) {
            debug!("speech rate not applied: {}", e);
        }
        if let Err(e) = tts.speak(text, false) {
            tracing::warn!("speech failed: {}", e);
        }
    }

    #[cfg(target_os = "linux")]
    fn speak(&mut self, text: &str, rate: f32) {
        use std::process::{Command, Stdio};

        let wpm = espeak_wpm(rate);
        let text = text.to_string();
        std::thread::spawn(move || {
            let result = Command::new("espeak")
                .arg("-s")
                .arg(wpm.to_string())
                .arg(&text)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if let Err(e) = result {
                debug!("espeak unavailable: {}", e);
            }
        });
    }
}

#[cfg(target_os = "linux")]
fn espeak_wpm(rate: f32) -> u32 {
    (ESPEAK_NORMAL_WPM * rate).round().clamp(80.0, 450.0) as u32
}
