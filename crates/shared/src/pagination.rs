//! Keyset-pagination cursors for booking lists.
//!
//! Cursors encode the (scheduled_date, id) pair of the last row returned as
//! base64("YYYY-MM-DD:uuid"), keeping pagination stable under inserts.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Error type for cursor parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
}

/// Position of the last row in a date-ordered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    pub date: NaiveDate,
    pub id: Uuid,
}

impl DateCursor {
    /// Encodes the cursor as an opaque URL-safe string.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.date.format("%Y-%m-%d"), self.id))
    }

    /// Decodes a cursor produced by [`DateCursor::encode`].
    pub fn decode(cursor: &str) -> Result<Self, CursorError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(cursor)
            .map_err(|_| CursorError::InvalidFormat)?;
        let cursor_str = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

        let (date_part, id_part) = cursor_str
            .split_once(':')
            .ok_or(CursorError::InvalidFormat)?;

        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| CursorError::InvalidFormat)?;
        let id = Uuid::parse_str(id_part).map_err(|_| CursorError::InvalidFormat)?;

        Ok(Self { date, id })
    }
}

/// Clamps a caller-supplied page size into the allowed range.
pub fn clamp_limit(requested: Option<i32>, default: i32, max: i32) -> i32 {
    requested.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = DateCursor {
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
        };

        let encoded = cursor.encode();
        let decoded = DateCursor::decode(&encoded).unwrap();

        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_decode_invalid_base64() {
        assert_eq!(
            DateCursor::decode("!!!not-base64!!!"),
            Err(CursorError::InvalidFormat)
        );
    }

    #[test]
    fn test_cursor_decode_wrong_shape() {
        let encoded = URL_SAFE_NO_PAD.encode("no-separator-here");
        assert_eq!(DateCursor::decode(&encoded), Err(CursorError::InvalidFormat));
    }

    #[test]
    fn test_cursor_decode_bad_date() {
        let encoded = URL_SAFE_NO_PAD.encode("2025-13-40:550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(DateCursor::decode(&encoded), Err(CursorError::InvalidFormat));
    }

    #[test]
    fn test_cursor_decode_bad_uuid() {
        let encoded = URL_SAFE_NO_PAD.encode("2025-03-14:not-a-uuid");
        assert_eq!(DateCursor::decode(&encoded), Err(CursorError::InvalidFormat));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 20, 50), 20);
        assert_eq!(clamp_limit(Some(10), 20, 50), 10);
        assert_eq!(clamp_limit(Some(0), 20, 50), 1);
        assert_eq!(clamp_limit(Some(999), 20, 50), 50);
    }
}
