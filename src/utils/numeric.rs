/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 365.0, 4), 0.0055);
        assert_eq!(round_to(363.6364, 1), 363.6);
        assert_eq!(round_to(464.0, 1), 464.0);
        assert_eq!(round_to(0.0, 4), 0.0);
    }
}
