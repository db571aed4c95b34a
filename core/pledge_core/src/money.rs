//! Formatting of minor-unit amounts as dollar strings.

/// Render `cents` as dollars, without the currency sign.
///
/// * `show_cents`: always print two decimals. Non-zero cents are printed
///   regardless.
/// * `pretty`: group the whole dollars by thousands (`1,500`).
pub fn format_cents(cents: u64, show_cents: bool, pretty: bool) -> String {
    let dollars = cents / 100;
    let rest = cents % 100;

    let whole = if pretty {
        group_thousands(dollars)
    } else {
        dollars.to_string()
    };

    if show_cents || rest != 0 {
        format!("{whole}.{rest:02}")
    } else {
        whole
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
