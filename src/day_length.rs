/// Computes the elapsed wall-clock time between two "H:MM AM/PM" strings
/// as an "Hh Mm" label.
///
/// A sunset that nominally precedes the sunrise wraps across midnight, so
/// the result is always a non-negative duration below 24 hours. Returns
/// None when either string does not match the expected shape, leaving the
/// caller to render a placeholder instead of failing the whole snapshot.
///
/// # Arguments
///
/// * 'sunrise' - sunrise time, e.g. "6:15 AM"
/// * 'sunset' - sunset time, e.g. "6:45 PM"
pub fn day_length(sunrise: &str, sunset: &str) -> Option<String> {
    let start = minutes_since_midnight(sunrise)?;
    let end = minutes_since_midnight(sunset)?;

    let mut total = end - start;
    if total < 0 {
        total += 24 * 60;
    }

    Some(format!("{}h {}m", total / 60, total % 60))
}

/// Parses a 12-hour clock string into minutes since midnight, using the
/// standard conversion where 12 AM maps to hour 0 and 12 PM to hour 12
fn minutes_since_midnight(text: &str) -> Option<i32> {
    let mut parts = text.trim().split_whitespace();
    let clock = parts.next()?;
    let period = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (hours, minutes) = clock.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(1..=12).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }

    let hours = match period.to_ascii_uppercase().as_str() {
        "AM" if hours == 12 => 0,
        "AM" => hours,
        "PM" if hours == 12 => 12,
        "PM" => hours + 12,
        _ => return None,
    };

    Some(hours * 60 + minutes)
}
