//! Currency formatting for display

/// Format an amount in the given currency, e.g. `$1,234.50` or `LKR 99.00`
pub fn format_money(value: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let (symbol, decimals) = match code.as_str() {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "INR" => ("₹", 2),
        "LKR" => ("Rs ", 2),
        "JPY" => ("¥", 0),
        _ => return format!("{} {:.2}", code, value),
    };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, group_thousands(value.abs(), decimals))
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}
