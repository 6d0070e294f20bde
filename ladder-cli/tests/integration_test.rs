//! Integration tests for the ladder pairing engine
//!
//! Tests the full stack: attendance, promotion, cost model, pairing and
//! history updates across rounds

use ladder_core::{Group, GroupMatches, League, Match, Player, Schedule, COLOR_STEP, HISTORY_LEN};
use ladder_pairing::{
    build_cost_matrix, build_lineup, minimize_triagonal, recompute_group_lineup,
    recompute_group_schedule, run_round, schedule_round, CostWeights, EngineConfig,
    PromotionPolicy,
};
use rustc_hash::FxHashSet;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const GROUP_NAMES: [&str; 4] = ["Keizer", "Loper", "Dame", "Toren"];

fn player(level: u32, rank: u32) -> Player {
    let initials = format!("{}{}", &GROUP_NAMES[level as usize][..1], rank);
    Player::new(rank, &format!("{} {}", GROUP_NAMES[level as usize], rank), &initials, level)
        .with_rating(2000 - 100 * level - rank)
        .with_points(200 - 10 * rank as i32)
}

fn group(level: u32, size: u32) -> Group {
    Group::new(level, GROUP_NAMES[level as usize])
        .with_players((1..=size).map(|rank| player(level, rank)).collect())
}

fn league(period: u32, round: u32, sizes: &[u32]) -> League {
    let groups = sizes
        .iter()
        .enumerate()
        .map(|(level, &size)| group(level as u32, size))
        .collect();
    League::new(period, round).with_groups(groups)
}

fn sequential() -> EngineConfig {
    EngineConfig::default().with_parallel(false)
}

fn pair_key(game: &Match) -> (u32, u32) {
    (game.white.id.min(game.black.id), game.white.id.max(game.black.id))
}

fn assert_disjoint(matches: &GroupMatches) {
    let mut seen = FxHashSet::default();
    for game in &matches.series[0].matches {
        assert!(seen.insert(game.white.id), "player {} paired twice", game.white.id);
        assert!(seen.insert(game.black.id), "player {} paired twice", game.black.id);
    }
}

// ============================================================================
// END-TO-END SCENARIOS
// ============================================================================

#[test]
fn test_six_fresh_players_pair_by_rank() {
    let working = league(2, 2, &[4, 6]);
    let outcome = schedule_round(&working, &sequential()).unwrap();
    let matches = outcome.schedule.group(1).unwrap();

    let pairs: Vec<(u32, u32)> = matches.all_matches().map(pair_key).collect();
    assert_eq!(pairs, vec![(1, 2), (3, 4), (5, 6)]);
    assert!(!matches.has_trio());

    // equal preferences: the higher ranked player of each pair has white
    for game in matches.all_matches() {
        assert!(game.white.id < game.black.id);
    }
}

#[test]
fn test_five_players_with_two_series() {
    let working = league(2, 2, &[6, 5]);
    let outcome = schedule_round(&working, &sequential()).unwrap();
    let matches = outcome.schedule.group(1).unwrap();

    assert_eq!(matches.series.len(), 1);
    assert_eq!(matches.match_count(), 5);
    assert!(!matches.has_trio());
    for game in matches.all_matches() {
        assert_ne!(game.white.id, game.black.id);
    }

    let group = outcome.league.group(1).unwrap();
    for player in &group.players {
        assert_eq!(player.history.len(), 2, "{} plays twice", player.initials);
    }
}

#[test]
fn test_even_groups_pair_everyone_once() {
    for size in [2u32, 4, 8, 10, 14] {
        let working = league(3, 3, &[size, 6]);
        let outcome = schedule_round(&working, &sequential()).unwrap();
        let matches = outcome.schedule.group(0).unwrap();
        assert_eq!(matches.match_count(), size as usize / 2);
        assert!(!matches.has_trio());
        assert_disjoint(matches);
    }
}

#[test]
fn test_odd_groups_get_one_trio() {
    for size in [3u32, 7, 9, 11] {
        let working = league(3, 3, &[6, size]);
        let outcome = schedule_round(&working, &sequential()).unwrap();
        let matches = outcome.schedule.group(1).unwrap();
        assert_eq!(matches.series[0].len(), (size as usize - 3) / 2);
        assert_eq!(matches.trio.len(), 3);

        let ids: Vec<u32> = matches.all_matches().map(|m| m.id).collect();
        assert_eq!(ids, (1..=ids.len() as u32).collect::<Vec<_>>());
    }
}

#[test]
fn test_white_has_the_higher_preference() {
    let mut working = league(3, 3, &[8, 9]);
    for (i, p) in working.groups[0].players.iter_mut().enumerate() {
        p.color_preference = if i % 3 == 0 { 2.2 } else { -1.1 };
    }
    for (i, p) in working.groups[1].players.iter_mut().enumerate() {
        p.color_preference = (i as f64 - 4.0) * 0.55;
    }
    let outcome = schedule_round(&working, &sequential()).unwrap();
    for game in outcome.schedule.groups.iter().flat_map(GroupMatches::all_matches) {
        assert!(game.white.color_preference >= game.black.color_preference);
    }
}

#[test]
fn test_history_and_color_updates() {
    let mut working = league(3, 3, &[6]);
    working.groups[0].players[0].history = vec!["X".into(), "Y".into(), "Z".into(), "W".into()];
    let before = working.groups[0].clone();

    let outcome = schedule_round(&working, &sequential()).unwrap();
    let matches = outcome.schedule.group(0).unwrap();
    let after = outcome.league.group(0).unwrap();

    for game in matches.all_matches() {
        let white = after.player_by_id(game.white.id).unwrap();
        let black = after.player_by_id(game.black.id).unwrap();
        assert!(white.history.len() <= HISTORY_LEN);
        assert_eq!(white.history.last(), Some(&game.black.initials));
        assert_eq!(black.history.last(), Some(&game.white.initials));

        let white_before = before.player_by_id(game.white.id).unwrap();
        let black_before = before.player_by_id(game.black.id).unwrap();
        assert!((white_before.color_preference - white.color_preference - COLOR_STEP).abs() < 1e-9);
        assert!((black.color_preference - black_before.color_preference - COLOR_STEP).abs() < 1e-9);
    }

    // input is left untouched
    assert_eq!(working.groups[0], before);
}

#[test]
fn test_cost_matrix_properties() {
    let mut players = group(1, 7).players;
    players[0].history = vec!["L2".into(), "L3".into()];
    players[4].color_preference = 2.2;
    players[5].level = 2;

    let weights = CostWeights::default();
    let first = build_cost_matrix(&players, 1, 1, &weights).unwrap();
    let second = build_cost_matrix(&players, 1, 1, &weights).unwrap();
    assert_eq!(first, second);
    for i in 0..players.len() {
        assert_eq!(first.get(i, i), 0);
    }

    let a = minimize_triagonal(&first, 10, 99);
    let b = minimize_triagonal(&second, 10, 99);
    assert_eq!(a, b);
}

// ============================================================================
// PROMOTION
// ============================================================================

#[test]
fn test_round_five_keeps_fourth_when_destination_would_be_odd() {
    let source = league(1, 5, &[7, 8]);
    let working = build_lineup(&source, &PromotionPolicy::default());
    // three promoted make 10; the fourth would make 11
    assert_eq!(working.groups[0].len(), 10);
    assert_eq!(working.groups[1].len(), 5);
    assert_eq!(working.groups[1].players[0].initials, "L4");
}

#[test]
fn test_round_eight_margin() {
    let mut source = league(1, 8, &[6, 6]);
    source.groups[1].players[0].points = 120;
    source.groups[1].players[1].points = 110;
    let working = build_lineup(&source, &PromotionPolicy::default());
    assert_eq!(working.groups[0].len(), 7);

    source.groups[1].players[1].points = 116;
    let working = build_lineup(&source, &PromotionPolicy::default());
    assert_eq!(working.groups[0].len(), 6);
}

#[test]
fn test_promoted_players_are_displaced_in_pairing() {
    let source = league(1, 4, &[6, 8, 6]);
    let outcome = run_round(&source, &sequential()).unwrap();

    let top = outcome.league.group(0).unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top.displaced_players().len(), 4);
    assert_eq!(outcome.schedule.group(0).unwrap().match_count(), 5);

    // every present player plays
    let played: usize = outcome.league.groups.iter().map(|g| g.len()).sum();
    assert_eq!(played, 20);
    for group in &outcome.league.groups {
        for p in &group.players {
            assert!(!p.history.is_empty(), "{} did not play", p.initials);
        }
    }
}

#[test]
fn test_absent_players_sit_out() {
    let mut source = league(2, 2, &[6, 6]);
    source.groups[1].players[2].present = false;
    source.groups[1].players[3].present = false;
    let outcome = run_round(&source, &sequential()).unwrap();
    assert_eq!(outcome.league.group(1).unwrap().len(), 4);
    assert_eq!(outcome.schedule.group(1).unwrap().match_count(), 2);
}

// ============================================================================
// MULTI-ROUND AND RECOMPUTE
// ============================================================================

#[test]
fn test_history_steers_next_round() {
    let mut league = league(2, 2, &[6]);
    let config = EngineConfig::backtracking().with_parallel(false);

    let first = run_round(&league, &config).unwrap();
    let first_pairs: Vec<(String, String)> = first
        .schedule
        .groups[0]
        .all_matches()
        .map(|m| (m.white.initials.clone(), m.black.initials.clone()))
        .collect();

    league = first.league.clone();
    league.advance_round();
    let second = run_round(&league, &config).unwrap();
    for game in second.schedule.groups[0].all_matches() {
        let pair = (game.white.initials.clone(), game.black.initials.clone());
        let reversed = (pair.1.clone(), pair.0.clone());
        assert!(!first_pairs.contains(&pair) && !first_pairs.contains(&reversed));
    }
}

#[test]
fn test_season_wraps_after_last_round() {
    let mut league = league(4, 8, &[4]);
    league.advance_round();
    assert_eq!((league.period, league.round), (1, 1));
}

#[test]
fn test_recompute_one_group() {
    let source = league(1, 4, &[6, 8, 6]);
    let config = sequential();
    let working = build_lineup(&source, &config.promotion);
    let outcome = schedule_round(&working, &config).unwrap();

    // a member of the middle group turns out to be absent
    let mut corrected = source.clone();
    corrected.groups[1].players[7].present = false;
    let attendance = corrected.attendance_copy();
    let relineup = recompute_group_lineup(&attendance, &working, 1).unwrap();
    assert_eq!(relineup.group(1).unwrap().len(), working.group(1).unwrap().len() - 1);
    assert_eq!(relineup.group(0), working.group(0));

    let recomputed = recompute_group_schedule(&outcome.schedule, &relineup, 1, &config)
        .unwrap()
        .unwrap();
    assert_eq!(recomputed.schedule.group(0), outcome.schedule.group(0));
    assert_eq!(recomputed.schedule.group(2), outcome.schedule.group(2));
    assert_ne!(recomputed.schedule.group(1), outcome.schedule.group(1));
}

#[test]
fn test_backtracking_and_optimizer_agree_on_counts() {
    let source = league(1, 3, &[8, 7, 5, 6]);
    let optimizer = run_round(&source, &sequential()).unwrap();
    let backtracking = run_round(&source, &EngineConfig::backtracking()).unwrap();
    for level in 0..4 {
        assert_eq!(
            optimizer.schedule.group(level).map(GroupMatches::match_count),
            backtracking.schedule.group(level).map(GroupMatches::match_count)
        );
    }
}

#[test]
fn test_schedule_json_round_trip() {
    let source = league(1, 2, &[6, 7]);
    let outcome = run_round(&source, &sequential()).unwrap();
    let json = serde_json::to_string(&outcome.schedule).unwrap();
    assert_eq!(Schedule::from_json(&json).unwrap(), outcome.schedule);

    let json = serde_json::to_string(&outcome.league).unwrap();
    assert_eq!(League::from_json(&json).unwrap(), outcome.league);
}
