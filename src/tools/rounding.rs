/// 取到指定小數位數，恰好一半時取偶數（`0.125` → `0.12`）
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round_ties_even() / factor
}

/// 四捨五入後以最短形式輸出，至少保留一位小數（例如 `1.0`、`0.02`）
#[must_use]
pub fn format_rounded(value: f64, places: u32) -> String {
    format!("{:?}", round_to(value, places))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert!((round_to(29.970_029_97, 3) - 29.97).abs() < f64::EPSILON);
        assert!((round_to(1.666_666, 3) - 1.667).abs() < 1e-12);
        assert!((round_to(0.016_67, 2) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_format_rounded_keeps_fraction() {
        assert_eq!(format_rounded(1.0, 2), "1.0");
        assert_eq!(format_rounded(0.016_67, 2), "0.02");
        assert_eq!(format_rounded(12.345_6, 2), "12.35");
        assert_eq!(format_rounded(0.0, 2), "0.0");
    }

    #[test]
    fn test_halves_round_to_even() {
        assert_eq!(format_rounded(0.125, 2), "0.12");
        assert_eq!(format_rounded(0.375, 2), "0.38");
        assert_eq!(format_rounded(2.5, 0), "2.0");
        assert!((round_to(0.0625, 3) - 0.062).abs() < 1e-12);
    }
}
