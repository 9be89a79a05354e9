use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Largest serial Excel accepts in the 1900 system (9999-12-31).
const MAX_SERIAL_1900: i64 = 2_958_465;
/// Offset between the 1900 and 1904 systems, in days.
const SYSTEM_1904_OFFSET: i64 = 1_462;
/// The fictitious 1900-02-29.
const PHANTOM_LEAP_DAY: i64 = 60;

/// Spreadsheet date system used to interpret serial day offsets.
///
/// - `Excel1900`: day 0 is 1899-12-31 and day 60 is the non-existent 1900-02-29
///   (the Lotus 1-2-3 leap year bug), so every serial from 61 on is shifted by one.
/// - `Excel1904`: day 0 is 1904-01-01, no quirk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateSystem {
    #[serde(rename = "excel1900")]
    Excel1900,
    #[serde(rename = "excel1904")]
    Excel1904,
}

impl Default for DateSystem {
    fn default() -> Self {
        Self::Excel1900
    }
}

impl DateSystem {
    /// Convert a whole-day serial into a calendar date.
    ///
    /// Returns `None` for negative serials, serials past 9999-12-31, and the 1900 system's
    /// phantom leap day, which has no calendar counterpart.
    pub fn serial_to_date(self, serial: i64) -> Option<NaiveDate> {
        if serial < 0 {
            return None;
        }

        match self {
            DateSystem::Excel1900 => {
                if serial > MAX_SERIAL_1900 || serial == PHANTOM_LEAP_DAY {
                    return None;
                }
                let days = if serial < PHANTOM_LEAP_DAY {
                    serial
                } else {
                    serial - 1
                };
                NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_days(Days::new(days as u64))
            }
            DateSystem::Excel1904 => {
                if serial > MAX_SERIAL_1900 - SYSTEM_1904_OFFSET {
                    return None;
                }
                NaiveDate::from_ymd_opt(1904, 1, 1)?.checked_add_days(Days::new(serial as u64))
            }
        }
    }

    /// Inverse of [`DateSystem::serial_to_date`]; `None` for dates before the epoch.
    pub fn date_to_serial(self, date: NaiveDate) -> Option<i64> {
        match self {
            DateSystem::Excel1900 => {
                let epoch = NaiveDate::from_ymd_opt(1899, 12, 31)?;
                let days = date.signed_duration_since(epoch).num_days();
                if days < 0 {
                    return None;
                }
                let serial = if days < PHANTOM_LEAP_DAY {
                    days
                } else {
                    days + 1
                };
                (serial <= MAX_SERIAL_1900).then_some(serial)
            }
            DateSystem::Excel1904 => {
                let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)?;
                let days = date.signed_duration_since(epoch).num_days();
                (days >= 0).then_some(days)
            }
        }
    }
}
