use crate::domain::{PlayerProfile, RankedProfile};

/// Assigns dense competition ranks ("1224") to a ladder.
///
/// The caller must supply `players` already sorted by rating descending; no
/// sorting or validation happens here, and the output is meaningless for an
/// unsorted input. Tied ratings share a rank and the next distinct rating
/// takes its 1-based position, so ties leave gaps (1, 2, 2, 4).
pub fn calculate_ranks(players: &[PlayerProfile]) -> Vec<RankedProfile> {
    let mut ranked = Vec::with_capacity(players.len());
    let mut current_rank = 1u32;

    for (idx, player) in players.iter().enumerate() {
        if !ties_previous(players, idx) {
            current_rank = (idx + 1) as u32;
        }
        ranked.push(RankedProfile {
            profile: player.clone(),
            rank: current_rank,
        });
    }

    ranked
}

fn ties_previous(players: &[PlayerProfile], idx: usize) -> bool {
    idx > 0 && players[idx].rating == players[idx - 1].rating
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64, rating: f64) -> PlayerProfile {
        PlayerProfile {
            id,
            sport_id: 1,
            display_name: format!("Player {id}"),
            rating,
            matches_played: 5,
        }
    }

    #[test]
    fn empty_ladder_yields_empty_output() {
        assert!(calculate_ranks(&[]).is_empty());
    }

    #[test]
    fn single_player_gets_rank_one() {
        let ranked = calculate_ranks(&[profile(1, 1500.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn distinct_ratings_rank_by_position() {
        let players = vec![profile(1, 1300.0), profile(2, 1200.0), profile(3, 1100.0)];
        let ranks: Vec<u32> = calculate_ranks(&players).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn tied_ratings_share_rank_and_leave_a_gap() {
        let players = vec![
            profile(1, 1200.0),
            profile(2, 1200.0),
            profile(3, 1100.0),
            profile(4, 1000.0),
        ];
        let ranks: Vec<u32> = calculate_ranks(&players).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);
    }

    #[test]
    fn all_tied_ratings_all_rank_one() {
        let players = vec![profile(1, 1000.0), profile(2, 1000.0), profile(3, 1000.0)];
        let ranks: Vec<u32> = calculate_ranks(&players).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 1]);
    }

    #[test]
    fn tie_run_in_the_middle() {
        let players = vec![
            profile(1, 1400.0),
            profile(2, 1300.0),
            profile(3, 1300.0),
            profile(4, 1300.0),
            profile(5, 1200.0),
        ];
        let ranks: Vec<u32> = calculate_ranks(&players).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 2, 5]);
    }

    #[test]
    fn rank_never_exceeds_position() {
        let players = vec![
            profile(1, 1500.0),
            profile(2, 1500.0),
            profile(3, 1400.0),
            profile(4, 1400.0),
            profile(5, 1400.0),
            profile(6, 1100.0),
        ];
        for (idx, entry) in calculate_ranks(&players).iter().enumerate() {
            assert!(entry.rank as usize <= idx + 1);
        }
    }

    #[test]
    fn output_preserves_input_order() {
        let players = vec![profile(7, 1300.0), profile(3, 1200.0), profile(9, 1200.0)];
        let ids: Vec<i64> = calculate_ranks(&players)
            .iter()
            .map(|r| r.profile.id)
            .collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }

    #[test]
    fn recomputation_is_stable() {
        let players = vec![profile(1, 1250.0), profile(2, 1250.0), profile(3, 900.0)];
        let first: Vec<u32> = calculate_ranks(&players).iter().map(|r| r.rank).collect();
        let second: Vec<u32> = calculate_ranks(&players).iter().map(|r| r.rank).collect();
        assert_eq!(first, second);
    }
}
