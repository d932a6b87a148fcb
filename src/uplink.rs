//! Remote cut-command parsing and validation.
//!
//! Format: `CUT,<serial>,<token>` (case-insensitive literal `CUT`,
//! trailing whitespace ignored). Any deviation is rejected silently —
//! there is no partial-match or error-reporting path back to the sender.

/// Returns `true` if `line` is a well-formed cut command addressed to
/// `serial` carrying exactly `expected_token`.
pub fn parse_cut_command(line: &str, serial: u32, expected_token: &str) -> bool {
    let trimmed = line.trim();
    let mut parts = trimmed.split(',');

    let Some(verb) = parts.next() else {
        return false;
    };
    if !verb.eq_ignore_ascii_case("cut") {
        return false;
    }

    let Some(serial_str) = parts.next() else {
        return false;
    };
    let Ok(parsed_serial) = serial_str.parse::<u32>() else {
        return false;
    };
    if parsed_serial != serial {
        return false;
    }

    let Some(token) = parts.next() else {
        return false;
    };
    if parts.next().is_some() {
        return false;
    }

    token == expected_token
}
