//! BRL price formatting.

use rust_decimal::Decimal;

/// Format an amount as Brazilian reais, pt-BR style: `R$ 1.234,56`.
///
/// Rounds to two decimal places; thousands are separated with `.` and
/// the decimal separator is `,`.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("R$ {sign}{},{frac_part}", group_thousands(int_part))
}

/// Insert `.` separators every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl_plain() {
        assert_eq!(format_brl(Decimal::new(17990, 2)), "R$ 179,90");
    }

    #[test]
    fn test_format_brl_thousands() {
        assert_eq!(format_brl(Decimal::new(123_456, 2)), "R$ 1.234,56");
        assert_eq!(format_brl(Decimal::new(100_000_000, 2)), "R$ 1.000.000,00");
    }

    #[test]
    fn test_format_brl_zero_and_padding() {
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::new(5, 1)), "R$ 0,50");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        assert_eq!(format_brl(Decimal::new(19_995, 3)), "R$ 20,00");
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(Decimal::new(-17990, 2)), "R$ -179,90");
    }
}
