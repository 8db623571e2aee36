const DATE_UNITS: [(char, u64); 1] = [('D', 86_400)];
const TIME_UNITS: [(char, u64); 3] = [('H', 3_600), ('M', 60), ('S', 1)];

/// Decode an ISO-8601 style duration token (`PT1H2M3S`, `P1DT4M`) into seconds.
///
/// Upstream data is outside our control, so anything unparseable decodes to 0.
pub fn decode_duration(token: &str) -> u64 {
    parse_token(token.trim()).unwrap_or(0)
}

/// Render seconds as `H:MM:SS`, or `M:SS` below one hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

fn parse_token(token: &str) -> Option<u64> {
    let body = token.strip_prefix('P')?;
    let (date, time) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };

    let mut total = sum_components(date, &DATE_UNITS)?;
    if let Some(time) = time {
        if time.is_empty() {
            return None;
        }
        total = total.checked_add(sum_components(time, &TIME_UNITS)?)?;
    }
    Some(total)
}

/// Sum `<digits><unit>` components; units must appear in table order, each at most once.
/// Only the seconds component may carry a fraction, which is truncated.
fn sum_components(mut rest: &str, units: &[(char, u64)]) -> Option<u64> {
    let mut total: u64 = 0;
    let mut next_unit = 0;

    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit())?;
        if digits == 0 {
            return None;
        }
        let value: u64 = rest[..digits].parse().ok()?;
        let mut tail = &rest[digits..];

        let mut fractional = false;
        if let Some(after_dot) = tail.strip_prefix(|c: char| c == '.' || c == ',') {
            let frac_digits = after_dot.find(|c: char| !c.is_ascii_digit())?;
            if frac_digits == 0 {
                return None;
            }
            tail = &after_dot[frac_digits..];
            fractional = true;
        }

        let designator = tail.chars().next()?;
        let offset = units[next_unit..]
            .iter()
            .position(|(unit, _)| *unit == designator)?;
        let (unit, scale) = units[next_unit + offset];
        if fractional && unit != 'S' {
            return None;
        }

        total = total.checked_add(value.checked_mul(scale)?)?;
        next_unit += offset + 1;
        rest = &tail[designator.len_utf8()..];
    }

    Some(total)
}
