/// One decimal place, without a trailing `.0`. Ties round away from zero (`0.25` reads
/// `0.3`), unlike `{:.1}` which rounds them to even.
pub fn one_decimal(value: f64) -> String {
    let text = format!("{:.1}", (value * 10.0).round() / 10.0);
    match text.strip_suffix(".0") {
        Some(whole) if whole == "-0" => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => text,
    }
}

/// The numeric value `one_decimal` displays. Snapping compares against this, so a dragged
/// quantity snaps exactly when its label would read as a preset.
pub fn round_one_decimal(value: f64) -> f64 {
    one_decimal(value).parse().unwrap_or(value)
}

pub fn volume(quantity: f64, unit: &str) -> String {
    format!("{} {unit}", one_decimal(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_decimal() {
        let cases = vec![
            (5.0, "5"),
            (5.2, "5.2"),
            (5.24, "5.2"),
            (5.26, "5.3"),
            (9.96, "10"),
            (20.0, "20"),
            (-0.01, "0"),
            (0.25, "0.3"),
            (2.5, "2.5"),
        ];

        for (value, expected) in cases {
            assert_eq!(one_decimal(value), expected, "formatting {value}");
        }
    }

    #[test]
    fn test_round_one_decimal_matches_label() {
        assert_eq!(round_one_decimal(10.000000000000002), 10.0);
        assert_eq!(round_one_decimal(9.96), 10.0);
        assert_eq!(round_one_decimal(7.43), 7.4);
    }

    #[test]
    fn test_volume_label() {
        assert_eq!(volume(12.5, "GB"), "12.5 GB");
        assert_eq!(volume(15.0, "GB"), "15 GB");
    }
}
