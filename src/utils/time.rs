use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Relative label for a posting date: "Just now", "5h ago", "3d ago".
/// Strings that are not RFC 3339 timestamps are shown as they are.
pub fn posted_label(posted: &str, now: DateTime<Utc>) -> String {
    let posted = posted.trim();
    if posted.is_empty() {
        return String::new();
    }
    let Ok(at) = from_rfc3339(posted) else {
        return posted.to_string();
    };

    let elapsed = now.signed_duration_since(at);
    if elapsed.num_hours() < 1 {
        "Just now".to_string()
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn labels_by_elapsed_time() {
        let now = from_rfc3339("2024-06-10T12:00:00Z").unwrap();
        assert_eq!(posted_label("2024-06-10T11:30:00Z", now), "Just now");
        assert_eq!(posted_label("2024-06-10T07:00:00+00:00", now), "5h ago");
        assert_eq!(posted_label("2024-06-07T11:00:00Z", now), "3d ago");
        assert_eq!(posted_label(&to_rfc3339(now + Duration::minutes(5)), now), "Just now");
    }

    #[test]
    fn unparseable_dates_fall_back_to_raw_text() {
        let now = now();
        assert_eq!(posted_label("N/A", now), "N/A");
        assert_eq!(posted_label("", now), "");
    }
}
