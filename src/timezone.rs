//! Resolves canonical time zone names to the UTC offset used for calendar days.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The time zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Get the UTC offset of `canonical_timezone` at the instant `at`.
///
/// Returns `None` if `canonical_timezone` is not a known time zone name.
pub fn get_offset_at(canonical_timezone: &str, at: OffsetDateTime) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone).map(|tz| tz.get_offset_utc(&at).to_utc())
}

/// Get the current local time in `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known time zone name.
pub fn now_in(canonical_timezone: &str) -> Result<OffsetDateTime, Error> {
    let now = OffsetDateTime::now_utc();
    let offset = get_offset_at(canonical_timezone, now)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

    Ok(now.to_offset(offset))
}

#[cfg(test)]
mod tests {
    use time::{UtcOffset, macros::{datetime, offset}};

    use crate::Error;

    use super::{get_offset_at, now_in};

    #[test]
    fn resolves_daylight_saving_offsets() {
        let winter = datetime!(2025-07-01 00:00 UTC);
        let summer = datetime!(2025-01-01 00:00 UTC);

        assert_eq!(get_offset_at("Pacific/Auckland", winter), Some(offset!(+12)));
        assert_eq!(get_offset_at("Pacific/Auckland", summer), Some(offset!(+13)));
    }

    #[test]
    fn utc_has_zero_offset() {
        assert_eq!(
            get_offset_at("Etc/UTC", datetime!(2025-01-01 00:00 UTC)),
            Some(UtcOffset::UTC)
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert_eq!(
            now_in("Mars/Olympus_Mons"),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
