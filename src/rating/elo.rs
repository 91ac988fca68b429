use crate::config::settings::RatingSettings;

use super::types::SettledRatings;

/// Probability of the first player beating the second on the standard
/// 400-point logistic curve.
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10_f64.powf((opponent_rating - rating) / 400.0))
}

/// Computes both players' post-match ratings.
///
/// Each side moves by its own K-factor: players still inside the provisional
/// window converge faster than established ones. Pure math; persisting the
/// result is the settlement service's job.
pub fn rate_match(
    winner_rating: f64,
    loser_rating: f64,
    winner_matches: i32,
    loser_matches: i32,
    config: &RatingSettings,
) -> SettledRatings {
    let winner_expected = expected_score(winner_rating, loser_rating);
    let loser_expected = 1.0 - winner_expected;

    let winner_k = k_factor(winner_matches, config);
    let loser_k = k_factor(loser_matches, config);

    SettledRatings {
        winner: winner_rating + winner_k * (1.0 - winner_expected),
        loser: loser_rating + loser_k * (0.0 - loser_expected),
    }
}

fn k_factor(matches_played: i32, config: &RatingSettings) -> f64 {
    if matches_played < config.provisional_matches {
        config.provisional_k_factor
    } else {
        config.k_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RatingSettings {
        RatingSettings::default()
    }

    #[test]
    fn expected_score_is_half_for_equal_ratings() {
        let expected = expected_score(1000.0, 1000.0);
        assert!((expected - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expected_score_favours_the_higher_rating() {
        let expected = expected_score(1200.0, 1000.0);
        assert!(expected > 0.7);
        assert!(expected < 0.8);
    }

    #[test]
    fn expected_scores_sum_to_one() {
        let a = expected_score(1340.0, 1085.0);
        let b = expected_score(1085.0, 1340.0);
        assert!((a + b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn equal_established_players_swap_half_the_k_factor() {
        let result = rate_match(1000.0, 1000.0, 50, 50, &settings());
        assert!((result.winner - 1016.0).abs() < 1e-9);
        assert!((result.loser - 984.0).abs() < 1e-9);
    }

    #[test]
    fn provisional_players_move_faster() {
        let config = settings();
        let provisional = rate_match(1000.0, 1000.0, 2, 50, &config);
        let established = rate_match(1000.0, 1000.0, 50, 50, &config);
        assert!(provisional.winner - 1000.0 > established.winner - 1000.0);
        // The established loser moves by the established K either way.
        assert!((provisional.loser - established.loser).abs() < 1e-9);
    }

    #[test]
    fn upset_win_pays_more_than_expected_win() {
        let config = settings();
        let upset = rate_match(900.0, 1300.0, 50, 50, &config);
        let routine = rate_match(1300.0, 900.0, 50, 50, &config);
        assert!(upset.winner - 900.0 > routine.winner - 1300.0);
    }

    #[test]
    fn same_k_factor_makes_the_exchange_zero_sum() {
        let result = rate_match(1100.0, 1050.0, 30, 30, &settings());
        let total_before = 1100.0 + 1050.0;
        let total_after = result.winner + result.loser;
        assert!((total_before - total_after).abs() < 1e-9);
    }

    #[test]
    fn loser_never_gains() {
        let result = rate_match(1500.0, 800.0, 12, 12, &settings());
        assert!(result.loser < 800.0);
        assert!(result.winner > 1500.0);
    }
}
