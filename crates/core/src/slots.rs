//! Slot grid generator
//!
//! The offerable grid is fixed configuration: it is the availability fetch
//! that varies per day, never the grid itself.

use studiobook_domain::constants::{CLOSE_HOUR, OPEN_HOUR, SLOT_STEP_MINUTES};
use studiobook_domain::Slot;

/// Produce the fixed set of offerable time slots for any day, in ascending
/// chronological order. Deterministic; 05:00 through 23:45 in 15-minute
/// steps yields 76 slots.
pub fn generate_slots() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(studiobook_domain::constants::SLOTS_PER_DAY);
    for hour in OPEN_HOUR..CLOSE_HOUR {
        for minute in (0..60).step_by(SLOT_STEP_MINUTES as usize) {
            slots.push(Slot {
                label: format!("{hour:02}:{minute:02}"),
                start_offset_minutes: (hour * 60 + minute) as u16,
            });
        }
    }
    slots
}
