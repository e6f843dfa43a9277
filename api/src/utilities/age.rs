use chrono::Duration;

/// Short relative age for the history sidebar.
///
/// Past one day the buckets use fixed hour divisors (24, 168, 730, 8760),
/// so months and years are approximate. Negative ages, from clock skew,
/// read as `Now`.
pub fn relative_age(age: Duration) -> String {
    let seconds = age.num_seconds();
    if seconds < 10 {
        return "Now".to_string();
    }
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let minutes = age.num_minutes();
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = age.num_hours();
    match hours {
        h if h < 24 => format!("{h}h"),
        h if h < 168 => format!("{}d", h / 24),
        h if h < 730 => format!("{}w", h / 168),
        h if h < 8760 => format!("{}mo", h / 730),
        h => format!("{}y", h / 8760),
    }
}
