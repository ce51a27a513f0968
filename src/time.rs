/// Format a millisecond duration as `[H:]MM:SS.mmm`.
///
/// Hours appear unpadded and only when the duration reaches one hour;
/// minutes are zero-padded only when hours are shown.
pub fn format_duration(ms: u64) -> String {
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
    } else {
        format!("{}:{:02}.{:03}", mins, secs, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_sub_minute() {
        assert_eq!(format_duration(0), "0:00.000");
        assert_eq!(format_duration(123), "0:00.123");
        assert_eq!(format_duration(59999), "0:59.999");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(60000), "1:00.000");
        assert_eq!(format_duration(3599999), "59:59.999");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(3600000), "1:00:00.000");
        assert_eq!(format_duration(3661234), "1:01:01.234");
        assert_eq!(format_duration(36000000 + 83045), "10:01:23.045");
    }

    #[test]
    fn test_format_duration_components_recompose() {
        // 2h 3m 4s 56ms
        let ms = ((2 * 60 + 3) * 60 + 4) * 1000 + 56;
        assert_eq!(format_duration(ms), "2:03:04.056");
    }
}
