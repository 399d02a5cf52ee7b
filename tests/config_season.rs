// Integration tests for configuration loading and the season board
use chrono::NaiveDate;
use crypto_realm::config::Config;
use crypto_realm::realm::{reward_for_rank, BattleRules, GameStore, OffsetRange, SeededRng};
use tempfile::tempdir;

#[tokio::test]
async fn test_default_config_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();

    Config::create_default(path).await.unwrap();
    let config = Config::load(path).await.unwrap();
    assert_eq!(config.battle_rules().unwrap(), BattleRules::default());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.session.seed, None);
}

#[tokio::test]
async fn test_custom_values_are_applied() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("realm.toml");
    std::fs::write(
        &path,
        r#"
[session]
seed = 42
starting_tokens = 250

[battle]
pvp_offset = { low = -2, high = 2 }
defend_multiplier = 2.0

[season]
start = "2026-03-01"
length_days = 14
"#,
    )
    .unwrap();

    let config = Config::load(path.to_str().unwrap()).await.unwrap();
    let rules = config.battle_rules().unwrap();
    assert_eq!(rules.pvp_offset, OffsetRange::new(-2, 2));
    assert_eq!(rules.pve_offset, OffsetRange::new(-3, 4));
    assert_eq!(rules.defend_multiplier, 2.0);

    let clock = config.season_clock().unwrap();
    let day = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
    assert_eq!(clock.season_number(day), 2);
    assert_eq!(clock.days_remaining(day), 9);

    let store = GameStore::new(SeededRng::from_optional_seed(config.session.seed), rules)
        .with_starting_tokens(config.session.starting_tokens);
    assert_eq!(store.balance(), 250);
    assert_eq!(store.total_earned(), 0);
}

#[tokio::test]
async fn test_invalid_files_are_rejected() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("absent.toml");
    let err = Config::load(missing.to_str().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read"), "{}", err);

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[battle\nlow = ").unwrap();
    assert!(Config::load(broken.to_str().unwrap()).await.is_err());

    let inverted = dir.path().join("inverted.toml");
    std::fs::write(&inverted, "[battle]\npve_offset = { low = 4, high = -3 }\n").unwrap();
    let err = Config::load(inverted.to_str().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("pve_offset"), "{}", err);

    let no_wagers = dir.path().join("wagers.toml");
    std::fs::write(&no_wagers, "[battle]\nwager_options = []\n").unwrap();
    let err = Config::load(no_wagers.to_str().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("wager_options"), "{}", err);

    let bad_date = dir.path().join("date.toml");
    std::fs::write(&bad_date, "[season]\nstart = \"soon\"\n").unwrap();
    assert!(Config::load(bad_date.to_str().unwrap()).await.is_err());
}

#[test]
fn test_leaderboard_places_new_player_last() {
    let mut store = GameStore::seeded(7);
    assert_eq!(store.leaderboard().len(), 10);
    assert!(store.leaderboard().iter().all(|e| !e.is_player));

    store.create_character("Aria", "ranger").unwrap();
    let board = store.leaderboard();
    assert_eq!(board.len(), 11);
    let me = board.iter().find(|e| e.is_player).unwrap();
    // level 1, 0 xp
    assert_eq!(me.score, 100);
    assert_eq!(me.rank, 11);
    assert_eq!(me.class_name, "Ranger");
    assert_eq!(reward_for_rank(me.rank).unwrap().tokens, 100);
    assert_eq!(board[0].name, "DragonSlayer99");
    assert_eq!(reward_for_rank(board[0].rank).unwrap().tokens, 5_000);
    assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_seeded_sessions_repeat() {
    let play = |seed: u64| {
        let mut store = GameStore::seeded(seed);
        store.create_character("Aria", "warrior").unwrap();
        store.start_battle("dark_skeleton").unwrap();
        let mut damages = Vec::new();
        for _ in 0..2 {
            let report = store.attack().unwrap();
            damages.push(report.damage);
            if let crypto_realm::realm::TurnResult::OpponentTurn(ticket) = report.next {
                damages.push(store.resolve_opponent_turn(ticket).unwrap().damage);
            }
        }
        damages
    };
    assert_eq!(play(99), play(99));
}
