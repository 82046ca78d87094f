/// Convert a raw tap counter into points.
///
/// 1 point per tap, plus a 9-point bonus riding on every 11th tap, so
/// the 11th, 22nd, ... tap is worth 10 points instead of 1.
pub fn score_from_taps(taps: i32) -> i32 {
    taps + (taps / 11) * 9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_taps_is_zero_points() {
        assert_eq!(score_from_taps(0), 0);
    }

    #[test]
    fn plain_taps_score_one_each() {
        assert_eq!(score_from_taps(1), 1);
        assert_eq!(score_from_taps(10), 10);
    }

    #[test]
    fn every_eleventh_tap_is_worth_ten() {
        assert_eq!(score_from_taps(11), 20);
        assert_eq!(score_from_taps(12), 21);
        assert_eq!(score_from_taps(22), 40);
        assert_eq!(score_from_taps(33), 60);
    }

    #[test]
    fn score_is_strictly_increasing() {
        let mut previous = score_from_taps(0);
        for taps in 1..100 {
            let score = score_from_taps(taps);
            assert!(score > previous, "score dropped at {} taps", taps);
            previous = score;
        }
    }
}
