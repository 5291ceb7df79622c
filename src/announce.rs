//! Spoken minute announcements

/// Speech rate relative to the host's normal synthesis rate
pub const ANNOUNCE_RATE: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub text: String,
    pub rate: f32,
}

impl Announcement {
    pub fn minutes(minutes: u64, rate: f32) -> Self {
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        Self {
            text: format!("{} {}!", minutes, unit),
            rate,
        }
    }
}

/// Fires once per change of the minute component, never for zero
#[derive(Debug)]
pub struct AnnouncementTrigger {
    last_minutes: u64,
    rate: f32,
}

impl AnnouncementTrigger {
    pub fn new(rate: f32) -> Self {
        Self {
            last_minutes: 0,
            rate,
        }
    }

    pub fn observe(&mut self, minutes: u64) -> Option<Announcement> {
        if minutes == self.last_minutes {
            return None;
        }
        self.last_minutes = minutes;
        if minutes == 0 {
            return None;
        }
        Some(Announcement::minutes(minutes, self.rate))
    }
}

impl Default for AnnouncementTrigger {
    fn default() -> Self {
        Self::new(ANNOUNCE_RATE)
    }
}
