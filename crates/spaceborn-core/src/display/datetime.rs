//! Timestamp formatting in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zoned = self.0.to_zoned(TimeZone::system());
        write!(f, "{}", zoned.strftime("%Y-%m-%d %H:%M:%S %Z"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_time_shape() {
        let ts = Timestamp::from_millisecond(1_640_995_200_123).unwrap();
        let output = LocalDateTime(&ts).to_string();
        // Date and time parts are fixed width whatever the zone.
        let (date_time, _zone) = output.split_at(19);
        assert_eq!(date_time.len(), 19);
        assert_eq!(&date_time[4..5], "-");
        assert_eq!(&date_time[13..14], ":");
    }
}
