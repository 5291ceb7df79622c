//! Panel layout and text for each stopwatch

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::board::Watch;
use crate::clock::Clock;
use crate::config::Resolution;
use crate::engine::StopwatchEngine;
use crate::events::WatchId;
use crate::format::TimeParts;

pub const FOOTER: &str =
    "space start/stop/resume │ r reset │ l lap │ 1-9/tab select │ v voice │ q quit";

/// Main time readout for the given resolution
pub fn time_line(parts: TimeParts, resolution: Resolution) -> String {
    if resolution.shows_deciseconds() {
        parts.to_string()
    } else {
        parts.clock()
    }
}

/// Buttons that make sense in the watch's current state
pub fn actions_line<C: Clock>(engine: &StopwatchEngine<C>, laps_enabled: bool) -> String {
    let toggle = if engine.is_running() {
        "Stop"
    } else if engine.elapsed_ms() == 0 {
        "Start"
    } else {
        "Resume"
    };
    let mut line = format!("[space] {}  [r] Reset", toggle);
    if laps_enabled {
        line.push_str("  [l] Lap");
    }
    line
}

/// Every text line of one panel, top to bottom.
///
/// The lap list keeps the most recent `max_laps` entries, numbered from the
/// first lap.
pub fn panel_lines<H, C: Clock>(
    watch: &Watch<H, C>,
    resolution: Resolution,
    laps_enabled: bool,
    max_laps: usize,
) -> Vec<String> {
    let engine = watch.engine();
    let mut lines = vec![format!("#{}", watch.id())];

    lines.push(match engine.last_lap() {
        Some(lap) => format!("LAP {}", lap.parts().lap()),
        None => String::new(),
    });
    lines.push(time_line(engine.parts(), resolution));
    lines.push(actions_line(engine, laps_enabled));

    let laps = engine.laps();
    if !laps.is_empty() && max_laps > 0 {
        lines.push(String::new());
        lines.push("LAPS".to_string());
        let skip = laps.len().saturating_sub(max_laps);
        for (i, lap) in laps.iter().enumerate().skip(skip) {
            lines.push(format!("{}. {}", i + 1, lap.parts().clock()));
        }
    }
    lines
}

/// Width of each column when `count` panels share `total` columns
pub fn panel_width(total: u16, count: usize) -> u16 {
    if count == 0 {
        return total;
    }
    (total / count as u16).max(1)
}

/// Which panel a terminal column falls into
pub fn panel_at(column: u16, total: u16, count: usize) -> Option<WatchId> {
    if count == 0 || column >= total {
        return None;
    }
    let index = (column / panel_width(total, count)) as usize;
    Some(index.min(count - 1) + 1)
}

/// Pad `text` on both sides to center it within `width` display columns,
/// truncating on the right when it does not fit
pub fn center(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        let mut out = String::new();
        let mut used = 0;
        for c in text.chars() {
            used += c.width().unwrap_or(0);
            if used > width {
                break;
            }
            out.push(c);
        }
        return out;
    }
    let left = (width - text_width) / 2;
    let right = width - text_width - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
