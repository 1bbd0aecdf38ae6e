//! Pricing calculator

use studiobook_domain::PriceBreakdown;

/// Derive the checkout price from rate × duration.
///
/// VAT is rounded to the nearest whole currency unit before adding;
/// subtotal and total are not independently rounded.
pub fn quote(duration_hours: u8, hourly_rate: i64, vat_rate: f64) -> PriceBreakdown {
    let subtotal = hourly_rate * i64::from(duration_hours);
    #[allow(clippy::cast_possible_truncation)]
    let vat = (subtotal as f64 * vat_rate).round() as i64;
    PriceBreakdown { subtotal, vat, total: subtotal + vat }
}
