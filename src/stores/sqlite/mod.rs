//! SQLite backed implementations of the store traits.

mod category;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use time::{OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

/// How creation timestamps are stored in the database, e.g. "2025-07-20 13:45:09".
///
/// Timestamps are stored in UTC at second precision so that string comparison
/// in SQL matches chronological order.
const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Format `timestamp` for storage, truncating to whole seconds.
fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, time::error::Format> {
    timestamp.format(DATE_TIME_FORMAT)
}

/// Parse a stored timestamp back into an [OffsetDateTime] in UTC.
fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(text, DATE_TIME_FORMAT).map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod timestamp_tests {
    use time::macros::datetime;

    use super::{format_timestamp, parse_timestamp};

    #[test]
    fn format_and_parse_round_trip() {
        let timestamp = datetime!(2025-07-20 13:45:09 UTC);

        let text = format_timestamp(timestamp).unwrap();
        let parsed = parse_timestamp(&text).unwrap();

        assert_eq!(text, "2025-07-20 13:45:09");
        assert_eq!(parsed, timestamp);
    }

    #[test]
    fn format_truncates_subseconds() {
        let timestamp = datetime!(2025-07-20 13:45:09.987 UTC);

        let text = format_timestamp(timestamp).unwrap();

        assert_eq!(text, "2025-07-20 13:45:09");
    }
}
