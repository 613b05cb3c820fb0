//! Compact USD formatting for headline metrics.

/// Format a dollar amount the way the dashboard metrics show it.
///
/// Trillions and billions are abbreviated to two decimals (`$2.41T`,
/// `$87.10B`); smaller amounts get thousands separators (`$1,234.50`).
pub fn format_usd(n: f64) -> String {
    let (sign, abs) = if n < 0.0 { ("-", -n) } else { ("", n) };
    if abs >= 1e12 {
        format!("{}${:.2}T", sign, abs / 1e12)
    } else if abs >= 1e9 {
        format!("{}${:.2}B", sign, abs / 1e9)
    } else {
        format!("{}${}", sign, group_thousands(&format!("{:.2}", abs)))
    }
}

/// Format a percentage with two decimals and a trailing `%`.
pub fn format_pct(n: f64) -> String {
    format!("{:.2}%", n)
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, ""));
    let digits = int_part.as_bytes();
    let mut out = String::with_capacity(fixed.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*d as char);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
