use std::collections::VecDeque;

use snake_tournament::{
    match_record::parse_match_output,
    prelude::*,
    tournament_stats::RankKey,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Replays a fixed list of game outputs, as the real game would print them.
struct ScriptedGame {
    participants: usize,
    outputs: VecDeque<Result<String, String>>,
    played: Vec<u32>,
}

impl ScriptedGame {
    fn new(participants: usize, outputs: Vec<Result<&str, &str>>) -> Self {
        Self {
            participants,
            outputs: outputs
                .into_iter()
                .map(|o| o.map(str::to_owned).map_err(str::to_owned))
                .collect(),
            played: vec![],
        }
    }
}

impl MatchSource for ScriptedGame {
    fn run_one_match(&mut self, game: u32) -> Result<MatchRecord, TournamentError> {
        self.played.push(game);
        match self.outputs.pop_front() {
            Some(Ok(text)) => Ok(parse_match_output(&text, self.participants).record),
            Some(Err(reason)) => Err(TournamentError::ExternalProcess { game, reason }),
            None => Err(TournamentError::ExternalProcess {
                game,
                reason: "script exhausted".into(),
            }),
        }
    }
}

/// Hands out ready-made records, whatever their length.
struct RecordList(VecDeque<MatchRecord>);

impl MatchSource for RecordList {
    fn run_one_match(&mut self, game: u32) -> Result<MatchRecord, TournamentError> {
        self.0.pop_front().ok_or(TournamentError::ExternalProcess {
            game,
            reason: "no more records".into(),
        })
    }
}

fn init_test_logger() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

const GAME_1: &str = "\
Game seed: 0x0000000000000001
=== FINAL RESULTS ===
Snake scores:
Snake 1: 10 points (survived) spent 100.000ms
Snake 2: 10 points (survived) spent 101.000ms
";

const GAME_2: &str = "\
Game seed: 0x0000000000000002
=== FINAL RESULTS ===
Snake 1: 10 points (survived) spent 100.000ms
Snake 2: 10 points (died in round 12) spent 110.000ms
";

const GAME_3: &str = "\
Game seed: 0x0000000000000003
=== FINAL RESULTS ===
Snake 1: 2 points (died in round 7) spent 40.000ms
Snake 2: 6 points (survived) spent 80.000ms
";

#[test]
fn two_snake_tournament() {
    init_test_logger();
    let config = Configuration::new().with_games(3).with_participants(2);
    let mut game = ScriptedGame::new(2, vec![Ok(GAME_1), Ok(GAME_2), Ok(GAME_3)]);

    let tournament = Tournament::new(config).unwrap();
    assert_eq!(tournament.config().games(), 3);
    let summary = tournament.run(&mut game).unwrap();
    assert_eq!(game.played, vec![1, 2, 3]);

    let stats = &summary.stats;
    assert_eq!(stats.games(), 3);
    assert_eq!(stats.draws(), 1);
    assert_eq!(
        stats.seeds(),
        ["0x0000000000000001", "0x0000000000000002", "0x0000000000000003"]
    );

    let [first, second] = stats.participants() else {
        panic!("two participants expected");
    };
    // game 1: draw 2.5/2.5, game 2: 3/2 and both win on score, game 3: 2/3
    assert_eq!(first.battle_points, 7.5);
    assert_eq!(second.battle_points, 7.5);
    assert_eq!((first.wins, second.wins), (1, 2));
    assert_eq!((first.survived, first.died), (2, 1));
    assert_eq!((second.survived, second.died), (2, 1));
    assert_eq!(first.total_score, 22);
    assert_eq!(second.total_time, 291.0);
    assert_eq!(first.rank_counts[&RankKey(1.5)], 1);
    assert_eq!(first.rank_counts[&RankKey(1.0)], 1);
    assert_eq!(first.rank_counts[&RankKey(2.0)], 1);
    assert_eq!(first.scores, vec![10, 10, 2]);
    assert_eq!(second.times, vec![101.0, 110.0, 80.0]);

    let report = stats.report();
    // equal points keep slot order
    assert_eq!(report.standings[0].participant, 0);
    assert_eq!(report.standings[1].participant, 1);
    assert!((report.draw_rate - 1.0 / 3.0).abs() < 1e-12);
    assert!((report.standings[1].win_rate - 2.0 / 3.0).abs() < 1e-12);
    let spread = report.standings[0].score_spread.unwrap();
    assert_eq!((spread.min, spread.max), (2, 10));

    for p in stats.participants() {
        assert_eq!(p.survived + p.died, stats.games());
        assert!(p.wins + stats.draws() <= stats.games());
    }
}

#[test]
fn invalid_participant_count_is_rejected_before_any_match() {
    for n in [1, 3, 5] {
        let err = Tournament::new(Configuration::new().with_participants(n)).unwrap_err();
        assert_eq!(err, TournamentError::InvalidParticipantCount(n));
        assert!(err.is_configuration());
    }
}

#[test]
fn record_length_mismatch_aborts_the_run() {
    let config = Configuration::new().with_games(3).with_participants(4);
    let good = MatchRecord::from_columns(
        "a",
        &[4, 3, 2, 1],
        &[1.0, 1.0, 1.0, 1.0],
        &[true; 4],
    )
    .unwrap();
    let short = MatchRecord::from_columns("b", &[4, 3], &[1.0, 1.0], &[true; 2]).unwrap();
    let mut source = RecordList(VecDeque::from([good.clone(), short, good]));

    let err = Tournament::new(config).unwrap().run(&mut source).unwrap_err();
    assert_eq!(
        err,
        TournamentError::ParticipantMismatch {
            expected: 4,
            found: 2
        }
    );
    // the third record was never requested
    assert_eq!(source.0.len(), 1);
}

#[test]
fn collaborator_failure_aborts_the_run() {
    let config = Configuration::new().with_games(3).with_participants(2);
    let mut game = ScriptedGame::new(2, vec![Ok(GAME_1), Err("exit status: 1"), Ok(GAME_3)]);
    let err = Tournament::new(config).unwrap().run(&mut game).unwrap_err();
    assert_eq!(
        err,
        TournamentError::ExternalProcess {
            game: 2,
            reason: "exit status: 1".into()
        }
    );
    assert_eq!(game.played, vec![1, 2]);
}

#[test]
fn malformed_output_is_scored_with_defaults() {
    let config = Configuration::new().with_games(1).with_participants(4);
    let partial = "\
Snake 1: 3 points (survived) spent 10.000ms
Snake 3: 3 points (died in round 4) spent 10.100ms
";
    let mut game = ScriptedGame::new(4, vec![Ok(partial)]);
    let summary = Tournament::new(config).unwrap().run(&mut game).unwrap();

    let points = summary
        .stats
        .participants()
        .iter()
        .map(|p| p.battle_points)
        .collect::<Vec<_>>();
    // slots 1 and 3 default to 0 points and 0ms: zero anchors are never merged
    assert_eq!(points, vec![2.5, 1.0, 2.5, 0.0]);
    assert_eq!(summary.stats.draws(), 1);
    assert_eq!(summary.stats.participants()[1].died, 1);
}

#[test]
fn zero_games_give_an_empty_report() {
    let config = Configuration::new().with_games(0).with_participants(2);
    let mut game = ScriptedGame::new(2, vec![]);
    let summary = Tournament::new(config).unwrap().run(&mut game).unwrap();
    assert!(game.played.is_empty());
    let report = summary.stats.report();
    assert_eq!(report.total_games, 0);
    assert_eq!(report.standings.len(), 2);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_games"], 0);
}
