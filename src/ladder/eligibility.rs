use std::collections::HashSet;

use crate::config::settings::LadderSettings;
use crate::domain::{PlayerProfile, RankedProfile, ScoringConfig};

use super::ranks::calculate_ranks;

/// Returns the opponents `my_profile` may legally challenge, in ladder order.
///
/// `all_players` must be the sport's full ladder sorted by rating descending
/// (the same precondition as `calculate_ranks`). A challenge always targets a
/// strictly better rank, within `max_challenge_range` ranks upward (sport
/// config, else the configured default); a novice with no settled matches
/// gets at least `novice_range_floor` ranks so newcomers near the bottom can
/// find opponents. Recent opponents are excluded for the rematch cooldown.
///
/// If `my_profile` is not present in `all_players` the result is empty; that
/// is the only degenerate case and it is not an error.
pub fn challengeable_players(
    all_players: &[PlayerProfile],
    my_profile: &PlayerProfile,
    config: Option<&ScoringConfig>,
    recent_opponent_ids: &HashSet<i64>,
    settings: &LadderSettings,
) -> Vec<RankedProfile> {
    let ranked = calculate_ranks(all_players);

    let my_rank = match ranked.iter().find(|r| r.profile.id == my_profile.id) {
        Some(entry) => entry.rank,
        None => return Vec::new(),
    };

    let range = effective_range(config, my_profile, settings);
    let min_rank = my_rank.saturating_sub(range).max(1);

    ranked
        .into_iter()
        .filter(|r| {
            r.profile.id != my_profile.id
                && r.rank < my_rank
                && r.rank >= min_rank
                && !recent_opponent_ids.contains(&r.profile.id)
        })
        .collect()
}

/// How many ranks upward the player may reach. Novices always get at least
/// the floor, regardless of the sport's configured range.
fn effective_range(
    config: Option<&ScoringConfig>,
    my_profile: &PlayerProfile,
    settings: &LadderSettings,
) -> u32 {
    let base = config
        .and_then(|c| c.max_challenge_range)
        .unwrap_or(settings.default_challenge_range);

    if my_profile.is_novice() {
        base.max(settings.novice_range_floor)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64, rating: f64, matches_played: i32) -> PlayerProfile {
        PlayerProfile {
            id,
            sport_id: 1,
            display_name: format!("Player {id}"),
            rating,
            matches_played,
        }
    }

    fn ladder() -> Vec<PlayerProfile> {
        vec![
            profile(1, 1200.0, 20),
            profile(2, 1200.0, 15),
            profile(3, 1100.0, 12),
            profile(4, 1000.0, 8),
        ]
    }

    fn config_with_range(range: u32) -> ScoringConfig {
        ScoringConfig {
            max_challenge_range: Some(range),
            ..ScoringConfig::default()
        }
    }

    fn ids(result: &[RankedProfile]) -> Vec<i64> {
        result.iter().map(|r| r.profile.id).collect()
    }

    #[test]
    fn targets_are_strictly_better_ranked_within_range() {
        let players = ladder();
        let me = players[2].clone(); // rank 3
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(2)),
            &HashSet::new(),
            &LadderSettings::default(),
        );
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn never_includes_self() {
        let players = ladder();
        let me = players[2].clone();
        let result = challengeable_players(
            &players,
            &me,
            None,
            &HashSet::new(),
            &LadderSettings::default(),
        );
        assert!(result.iter().all(|r| r.profile.id != me.id));
    }

    #[test]
    fn tied_players_are_not_challengeable() {
        // Players 1 and 2 share rank 1; neither is strictly better than the
        // other, so the tied peer is excluded.
        let players = ladder();
        let me = players[1].clone();
        let result = challengeable_players(
            &players,
            &me,
            None,
            &HashSet::new(),
            &LadderSettings::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn range_limits_how_far_up_a_challenge_reaches() {
        let players: Vec<PlayerProfile> = (1..=8)
            .map(|i| profile(i, 1600.0 - 50.0 * i as f64, 10))
            .collect();
        let me = players[7].clone(); // rank 8
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(3)),
            &HashSet::new(),
            &LadderSettings::default(),
        );
        // Ranks 5..=7 only.
        assert_eq!(ids(&result), vec![5, 6, 7]);
    }

    #[test]
    fn novice_gets_at_least_a_ten_rank_window() {
        let players: Vec<PlayerProfile> = (1..=12)
            .map(|i| {
                let matches = if i == 12 { 0 } else { 10 };
                profile(i, 1600.0 - 25.0 * i as f64, matches)
            })
            .collect();
        let me = players[11].clone(); // rank 12, novice
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(3)),
            &HashSet::new(),
            &LadderSettings::default(),
        );
        // Configured range 3 would allow ranks 9..=11; the novice floor of 10
        // widens the window down to rank 2.
        assert_eq!(ids(&result), (2..=11).collect::<Vec<i64>>());
    }

    #[test]
    fn novice_window_is_bounded_by_available_ranks() {
        let players = ladder();
        let mut me = players[2].clone(); // rank 3
        me.matches_played = 0;
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(2)),
            &HashSet::new(),
            &LadderSettings::default(),
        );
        // min_rank clamps to 1; everyone above is eligible.
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn recent_opponents_are_excluded() {
        let players = ladder();
        let me = players[2].clone();
        let recent: HashSet<i64> = [2].into_iter().collect();
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(2)),
            &recent,
            &LadderSettings::default(),
        );
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn unknown_profile_yields_empty_result() {
        let players = ladder();
        let stranger = profile(99, 1050.0, 4);
        let result = challengeable_players(
            &players,
            &stranger,
            None,
            &HashSet::new(),
            &LadderSettings::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn empty_ladder_yields_empty_result() {
        let me = profile(1, 1000.0, 3);
        let result = challengeable_players(
            &[],
            &me,
            None,
            &HashSet::new(),
            &LadderSettings::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn zero_range_leaves_no_targets_for_a_ranked_player() {
        let players = ladder();
        let me = players[3].clone(); // rank 4, 8 matches
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(0)),
            &HashSet::new(),
            &LadderSettings::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn missing_config_falls_back_to_default_range() {
        let players: Vec<PlayerProfile> = (1..=9)
            .map(|i| profile(i, 1600.0 - 40.0 * i as f64, 10))
            .collect();
        let me = players[8].clone(); // rank 9
        let result = challengeable_players(
            &players,
            &me,
            None,
            &HashSet::new(),
            &LadderSettings::default(),
        );
        // Default range 5 reaches ranks 4..=8.
        assert_eq!(ids(&result), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn every_result_sits_inside_the_window() {
        let players: Vec<PlayerProfile> = (1..=20)
            .map(|i| profile(i, 2000.0 - 10.0 * i as f64, 10))
            .collect();
        let me = players[14].clone(); // rank 15
        let range = 4u32;
        let result = challengeable_players(
            &players,
            &me,
            Some(&config_with_range(range)),
            &HashSet::new(),
            &LadderSettings::default(),
        );
        let min_rank = 15 - range;
        assert!(!result.is_empty());
        for entry in &result {
            assert!(entry.rank < 15);
            assert!(entry.rank >= min_rank);
        }
    }

    #[test]
    fn result_preserves_ladder_order() {
        let players = ladder();
        let me = players[3].clone();
        let result = challengeable_players(
            &players,
            &me,
            None,
            &HashSet::new(),
            &LadderSettings::default(),
        );
        let ranks: Vec<u32> = result.iter().map(|r| r.rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }
}
