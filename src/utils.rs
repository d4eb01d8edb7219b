/// Format a BTC amount with the full 8 decimal places.
pub fn format_btc(amount: f64) -> String {
    format!("{:.8}", amount)
}

/// Format a signed BTC amount, always showing the sign.
pub fn format_signed_btc(amount: f64) -> String {
    if amount > 0.0 {
        format!("+{:.8}", amount)
    } else {
        format!("{:.8}", amount)
    }
}

/// USD equivalent of `balance`, or `None` while the rate is unknown.
///
/// An unknown rate never collapses to zero: callers must be able to tell
/// "not yet known" from "worth nothing".
pub fn effective_usd_value(balance: f64, rate: Option<f64>) -> Option<f64> {
    rate.map(|r| balance * r)
}

/// Format a USD value rounded half-up to cents with `,` thousands grouping.
///
/// `11704.98745` renders as `11,704.99`.
pub fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    // f64::round is half away from zero, which is half-up for the magnitude.
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}

/// Parse a user-entered BTC amount.
pub fn parse_btc(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shorten a long address or hash for list display: `bc1qla…7fth3l`.
pub fn shorten_middle(value: &str, keep: usize) -> String {
    let count = value.chars().count();
    if count <= keep * 2 + 1 {
        return value.to_string();
    }
    let head: String = value.chars().take(keep).collect();
    let tail: String = value.chars().skip(count - keep).collect();
    format!("{}…{}", head, tail)
}
