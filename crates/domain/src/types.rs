//! Domain types for availability, drafts and checkout results

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    COLOR_ID_EXTERNAL, COLOR_ID_RENT, COLOR_ID_SERVICE, MAX_DURATION_HOURS, MIN_DURATION_HOURS,
};
use crate::errors::{Result, StudiobookError};

// ============================================================================
// Time intervals
// ============================================================================

/// Half-open time range `[start, end)`.
///
/// Invariant: `start < end`. Constructed once at the integration boundary
/// and never mutated afterwards, only compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting empty or inverted ranges.
    ///
    /// # Errors
    /// Returns `StudiobookError::InvalidInput` when `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(StudiobookError::InvalidInput(format!(
                "interval end must be after start ({start} >= {end})"
            )));
        }
        Ok(Self { start, end })
    }
}

/// Category tag carried by a busy interval, derived from the upstream
/// colour/classification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyCategory {
    Rent,
    Service,
    External,
    Unknown,
}

impl BusyCategory {
    /// Map an upstream colour id to a category.
    ///
    /// Unmapped codes fall back to `Rent`. This is a deliberate fallback
    /// inherited from the calendar colour scheme, not an omission; absent
    /// codes stay `Unknown`.
    pub fn from_color_id(color_id: Option<&str>) -> Self {
        match color_id {
            Some(COLOR_ID_RENT) => Self::Rent,
            Some(COLOR_ID_SERVICE) => Self::Service,
            Some(COLOR_ID_EXTERNAL) => Self::External,
            Some(_) => Self::Rent,
            None => Self::Unknown,
        }
    }

    /// The colour id to attach when writing an event of this category.
    pub fn color_id(self) -> &'static str {
        match self {
            Self::Rent | Self::Unknown => COLOR_ID_RENT,
            Self::Service => COLOR_ID_SERVICE,
            Self::External => COLOR_ID_EXTERNAL,
        }
    }
}

/// A time range reported as occupied by the external calendar.
///
/// Created fresh on every availability fetch for a displayed day and
/// discarded when the day selection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyInterval {
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub category: BusyCategory,
    pub summary: Option<String>,
}

/// Busy intervals for one displayed day plus an optional non-fatal warning.
///
/// The warning is set when the upstream source is unreachable, malformed or
/// not configured at all; the interval list is then empty (fail-open).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayAvailability {
    pub intervals: Vec<BusyInterval>,
    pub warning: Option<String>,
}

// ============================================================================
// Slots
// ============================================================================

/// One offerable discrete start time within the operating window.
///
/// Generated once per process; identical for every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// "HH:MM" display label
    pub label: String,
    /// Minutes since local midnight
    pub start_offset_minutes: u16,
}

impl Slot {
    /// The slot's local wall-clock start time.
    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt(u32::from(self.start_offset_minutes) * 60, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

// ============================================================================
// Services
// ============================================================================

/// Closed enumeration of bookable service offerings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Studio,
    #[serde(rename = "content-2-hours")]
    ContentTwoHours,
    Business,
    Fashion,
    Artist,
}

impl ServiceKind {
    /// Stable string id used in URLs and payloads.
    pub fn id(self) -> &'static str {
        match self {
            Self::Studio => "studio",
            Self::ContentTwoHours => "content-2-hours",
            Self::Business => "business",
            Self::Fashion => "fashion",
            Self::Artist => "artist",
        }
    }

    /// Parse a service id; unknown ids are rejected, the enumeration is
    /// closed.
    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "studio" => Ok(Self::Studio),
            "content-2-hours" => Ok(Self::ContentTwoHours),
            "business" => Ok(Self::Business),
            "fashion" => Ok(Self::Fashion),
            "artist" => Ok(Self::Artist),
            other => Err(StudiobookError::InvalidInput(format!(
                "unknown service id: {other}"
            ))),
        }
    }

    /// Human-readable label used for event titles and lead names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Studio => "Studio rental",
            Self::ContentTwoHours => "Content shoot (2 hours)",
            Self::Business => "Business shoot",
            Self::Fashion => "Fashion shoot",
            Self::Artist => "Artist shoot",
        }
    }

    /// Calendar category for an event booked with this service.
    pub fn category(self) -> BusyCategory {
        match self {
            Self::Studio => BusyCategory::Rent,
            _ => BusyCategory::Service,
        }
    }
}

// ============================================================================
// Booking draft
// ============================================================================

/// Contact details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub business: Option<String>,
    pub business_number: Option<String>,
}

impl ContactDetails {
    /// Required fields are name, phone and email.
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.email.trim().is_empty()
    }
}

/// Consent checkboxes; both must be ticked before commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consents {
    pub privacy: bool,
    pub rules: bool,
}

impl Consents {
    pub fn all_given(self) -> bool {
        self.privacy && self.rules
    }
}

/// The in-progress, uncommitted booking selection.
///
/// Lives only in session memory; has no identity until commit. The
/// `commit_token` is generated client-side and rides along in the calendar
/// event description and CRM note so duplicate submissions can be
/// reconciled by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<NaiveTime>,
    pub service: ServiceKind,
    pub duration_hours: u8,
    pub contact: ContactDetails,
    pub consents: Consents,
    pub commit_token: Uuid,
}

impl BookingDraft {
    /// Fresh draft for the given service with the default 2-hour duration.
    pub fn new(service: ServiceKind) -> Self {
        Self {
            selected_date: None,
            selected_time: None,
            service,
            duration_hours: 2,
            contact: ContactDetails::default(),
            consents: Consents::default(),
            commit_token: Uuid::new_v4(),
        }
    }

    /// Clamp a requested duration into the allowed 1..=12 hour range.
    pub fn clamp_duration(hours: u8) -> u8 {
        hours.clamp(MIN_DURATION_HOURS, MAX_DURATION_HOURS)
    }

    /// Whether the draft can be committed: date, time, required contact
    /// fields and both consents.
    pub fn is_complete(&self) -> bool {
        self.selected_date.is_some()
            && self.selected_time.is_some()
            && self.contact.has_required_fields()
            && self.consents.all_given()
    }
}

// ============================================================================
// Pricing
// ============================================================================

/// Price breakdown in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: i64,
    pub vat: i64,
    pub total: i64,
}

// ============================================================================
// Commit results
// ============================================================================

/// Which external phase of the checkout sequence an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPhase {
    Calendar,
    Crm,
}

/// One failed phase of the commit sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitError {
    pub phase: CommitPhase,
    pub message: String,
}

/// Terminal outcome of one checkout attempt.
///
/// Never retried automatically. The calendar is authoritative: the booking
/// counts as created iff `calendar_event_id` is present, regardless of how
/// the CRM phase went.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitResult {
    pub calendar_event_id: Option<String>,
    pub calendar_event_link: Option<String>,
    pub crm_lead_id: Option<String>,
    pub crm_lead_url: Option<String>,
    pub crm_skipped: bool,
    pub errors: Vec<CommitError>,
}

impl CommitResult {
    /// True when the calendar event exists, i.e. the booking itself
    /// succeeded even if the CRM phase did not.
    pub fn booking_created(&self) -> bool {
        self.calendar_event_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn interval_rejects_inverted_range() {
        assert!(TimeInterval::new(utc(10), utc(9)).is_err());
        assert!(TimeInterval::new(utc(10), utc(10)).is_err());
        assert!(TimeInterval::new(utc(9), utc(10)).is_ok());
    }

    #[test]
    fn category_lookup_maps_known_codes() {
        assert_eq!(BusyCategory::from_color_id(Some("9")), BusyCategory::Rent);
        assert_eq!(BusyCategory::from_color_id(Some("10")), BusyCategory::Service);
        assert_eq!(BusyCategory::from_color_id(Some("11")), BusyCategory::External);
    }

    #[test]
    fn category_lookup_defaults_unmapped_codes_to_rent() {
        assert_eq!(BusyCategory::from_color_id(Some("4")), BusyCategory::Rent);
        assert_eq!(BusyCategory::from_color_id(None), BusyCategory::Unknown);
    }

    #[test]
    fn service_ids_round_trip() {
        for kind in [
            ServiceKind::Studio,
            ServiceKind::ContentTwoHours,
            ServiceKind::Business,
            ServiceKind::Fashion,
            ServiceKind::Artist,
        ] {
            assert_eq!(ServiceKind::from_id(kind.id()).unwrap(), kind);
        }
        assert!(ServiceKind::from_id("wedding").is_err());
    }

    #[test]
    fn draft_completeness_requires_contact_and_consents() {
        let mut draft = BookingDraft::new(ServiceKind::Studio);
        draft.selected_date = NaiveDate::from_ymd_opt(2025, 6, 10);
        draft.selected_time = NaiveTime::from_hms_opt(14, 0, 0);
        assert!(!draft.is_complete());

        draft.contact = ContactDetails {
            name: "Dana Levi".into(),
            phone: "+972500000000".into(),
            email: "dana@example.com".into(),
            ..ContactDetails::default()
        };
        assert!(!draft.is_complete());

        draft.consents = Consents { privacy: true, rules: true };
        assert!(draft.is_complete());
    }

    #[test]
    fn duration_is_clamped_to_bounds() {
        assert_eq!(BookingDraft::clamp_duration(0), 1);
        assert_eq!(BookingDraft::clamp_duration(6), 6);
        assert_eq!(BookingDraft::clamp_duration(30), 12);
    }
}
