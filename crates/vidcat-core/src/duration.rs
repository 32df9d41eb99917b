//! Running-time formatting.
//!
//! Durations are stored as whole seconds and edited as `HH:MM:SS`.

use crate::error::{Error, Result};

/// Render seconds as zero-padded `HH:MM:SS`. Negative input renders as zero.
pub fn int_to_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Parse `HH:MM:SS`, `MM:SS`, or a bare second count.
///
/// Minutes and seconds must be below 60 whenever a larger unit precedes them.
pub fn duration_to_int(text: &str) -> Result<i64> {
    let invalid = || Error::InvalidInput(format!("is not a duration: {}", text.trim()));

    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }
    let mut values = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        values.push(part.parse::<i64>().map_err(|_| invalid())?);
    }

    let (h, m, s) = match values.as_slice() {
        [s] => (0, 0, *s),
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };
    if values.len() > 1 && s >= 60 {
        return Err(invalid());
    }
    if values.len() > 2 && m >= 60 {
        return Err(invalid());
    }
    h.checked_mul(3600)
        .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(s))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_duration() {
        assert_eq!(int_to_duration(0), "00:00:00");
        assert_eq!(int_to_duration(59), "00:00:59");
        assert_eq!(int_to_duration(3725), "01:02:05");
        assert_eq!(int_to_duration(360_000), "100:00:00");
        assert_eq!(int_to_duration(-5), "00:00:00");
    }

    #[test]
    fn test_duration_to_int_forms() {
        assert_eq!(duration_to_int("01:02:05").unwrap(), 3725);
        assert_eq!(duration_to_int("2:05").unwrap(), 125);
        assert_eq!(duration_to_int("90").unwrap(), 90);
        assert_eq!(duration_to_int(" 00:00:07 ").unwrap(), 7);
    }

    #[test]
    fn test_duration_to_int_rejects_malformed() {
        for bad in ["", "abc", "1:2:3:4", "01:60:00", "01:00:60", "1::2", "-5", "1:-2"] {
            let err = duration_to_int(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_formatted_duration_parses_back() {
        for secs in [0, 1, 61, 3599, 3600, 86_399] {
            assert_eq!(duration_to_int(&int_to_duration(secs)).unwrap(), secs);
        }
    }
}
