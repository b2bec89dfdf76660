use chrono::{Days, Local, NaiveDate};

pub const MAX_VISIBLE_DAYS: usize = 30;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_key() -> String {
    date_key(0)
}

pub fn date_key(offset_days: u32) -> String {
    date_key_at(today(), offset_days)
}

/// Offsets past the start of the calendar clamp to `NaiveDate::MIN`.
pub fn date_key_at(today: NaiveDate, offset_days: u32) -> String {
    let day = today
        .checked_sub_days(Days::new(u64::from(offset_days)))
        .unwrap_or(NaiveDate::MIN);
    format_key(day)
}

pub fn visible_window(len: usize) -> Vec<String> {
    visible_window_at(today(), len)
}

pub fn visible_window_at(today: NaiveDate, len: usize) -> Vec<String> {
    (0..len)
        .map(|index| date_key_at(today, (len - 1 - index) as u32))
        .collect()
}

pub fn format_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn pretty_date(key: &str) -> String {
    match parse_key(key) {
        Some(date) => date.format("%b %-d").to_string(),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_key_counts_back_from_today() {
        let today = day(2026, 3, 1);
        assert_eq!(date_key_at(today, 0), "2026-03-01");
        assert_eq!(date_key_at(today, 1), "2026-02-28");
        assert_eq!(date_key_at(today, 366), "2025-02-28");
    }

    #[test]
    fn huge_offset_clamps_instead_of_overflowing() {
        let key = date_key_at(day(2026, 1, 2), u32::MAX);
        assert_eq!(key, format_key(NaiveDate::MIN));
    }

    #[test]
    fn date_keys_strictly_decrease_with_offset() {
        let today = day(2026, 1, 2);
        let keys: Vec<String> = (0..100).map(|offset| date_key_at(today, offset)).collect();
        assert!(keys.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn live_date_key_matches_local_calendar() {
        let before = format_key(Local::now().date_naive());
        let key = date_key(0);
        let after = format_key(Local::now().date_naive());
        assert!(key == before || key == after);
        assert_eq!(key.len(), 10);
    }

    #[test]
    fn window_is_oldest_first_and_ends_today() {
        let today = day(2026, 1, 10);
        let window = visible_window_at(today, MAX_VISIBLE_DAYS);
        assert_eq!(window.len(), 30);
        assert_eq!(window.first().unwrap(), "2025-12-12");
        assert_eq!(window.last().unwrap(), "2026-01-10");
        assert!(window.windows(2).all(|pair| pair[0] < pair[1]));

        let live = visible_window(MAX_VISIBLE_DAYS);
        assert_eq!(live.len(), 30);
        assert!(parse_key(live.last().unwrap()).is_some());
    }

    #[test]
    fn pretty_date_uses_short_month() {
        assert_eq!(pretty_date("2026-10-08"), "Oct 8");
        assert_eq!(pretty_date("garbage"), "garbage");
    }
}
