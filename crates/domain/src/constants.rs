//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! booking core.

// Operating window: the studio offers slots from 05:00 to 24:00 in
// 15-minute increments.
pub const OPEN_HOUR: u32 = 5;
pub const CLOSE_HOUR: u32 = 24;
pub const SLOT_STEP_MINUTES: u32 = 15;
pub const SLOTS_PER_DAY: usize =
    ((CLOSE_HOUR - OPEN_HOUR) * 60 / SLOT_STEP_MINUTES) as usize;

// Booking duration bounds (hours)
pub const MIN_DURATION_HOURS: u8 = 1;
pub const MAX_DURATION_HOURS: u8 = 12;

// Pricing defaults (whole currency units per hour, VAT fraction)
pub const DEFAULT_HOURLY_RATE: i64 = 215;
pub const DEFAULT_VAT_RATE: f64 = 0.18;

// Operating timezone for local date/time arithmetic
pub const DEFAULT_TIMEZONE: &str = "Asia/Jerusalem";

// Upstream calendar colour ids used to tag event categories
pub const COLOR_ID_RENT: &str = "9";
pub const COLOR_ID_SERVICE: &str = "10";
pub const COLOR_ID_EXTERNAL: &str = "11";
