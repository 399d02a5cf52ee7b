//! Battle engine integration tests driven through the session store.
//!
//! Rolls are scripted with `SequenceRng` so damage and rewards are exact.
//! With a constant 0.4 every PvE and PvP offset lands on 0.
use crypto_realm::realm::{
    BattleMode, BattleRules, EncounterPhase, GameStore, RealmError, SequenceRng, TurnResult, TurnTicket,
};

fn warrior_store(roll: f64) -> GameStore<SequenceRng> {
    let mut store = GameStore::new(SequenceRng::constant(roll), BattleRules::default());
    store.create_character("Aria", "warrior").unwrap();
    store
}

fn expect_ticket(next: TurnResult) -> TurnTicket {
    match next {
        TurnResult::OpponentTurn(ticket) => ticket,
        other => panic!("expected opponent turn, got {:?}", other),
    }
}

#[test]
fn warrior_defeats_wolf_and_collects_in_order() {
    let mut store = warrior_store(0.4);
    let id = store.start_battle("forest_wolf").unwrap();
    assert_eq!(id, 1);
    assert_eq!(store.encounter_phase(), EncounterPhase::Fighting);

    // Warrior atk = floor(85*0.4 + 40*0.2) = 42, wolf def 3
    let first = store.attack().unwrap();
    assert_eq!(first.damage, 39);
    assert!(first.outcome.is_none());
    let ticket = expect_ticket(first.next);
    assert_eq!(store.pending_ticket(), Some(ticket));

    // Wolf atk 12 against def 18 floors to 1
    let reply = store.resolve_opponent_turn(ticket).unwrap();
    assert_eq!(reply.damage, 1);
    assert_eq!(reply.next, TurnResult::PlayerTurn);
    assert_eq!(store.battle().unwrap().player().hp, 99);

    let finish = store.attack().unwrap();
    assert_eq!(finish.next, TurnResult::Victory);
    let outcome = finish.outcome.expect("victory settles the battle");
    assert!(outcome.victory);
    assert_eq!(
        outcome.mode,
        BattleMode::Pve {
            enemy_id: "forest_wolf".to_string()
        }
    );

    let reward = outcome.reward.expect("victory pays out");
    // floor(60*0.5 + 0.4*50), floor(60*0.3 + 0.4*20)
    assert_eq!(reward.tokens, 50);
    assert_eq!(reward.xp, 26);
    // single drop, Uncommon tier, first item of that pool
    assert_eq!(reward.loot.len(), 1);
    assert_eq!(reward.loot[0].id, "bone_staff");

    assert_eq!(store.balance(), 50);
    assert_eq!(store.total_earned(), 50);
    assert_eq!(store.character().unwrap().xp, 26);
    assert_eq!(store.item_quantity("bone_staff"), 1);
    assert_eq!(store.counters().battle_wins, 1);
    assert_eq!(outcome.unlocked, vec!["first_blood".to_string()]);
    assert_eq!(store.quest("daily_hunt").unwrap().progress, 1);
    assert_eq!(store.quest("daily_earn").unwrap().progress, 50);
    assert_eq!(store.encounter_phase(), EncounterPhase::Victory);
    assert_eq!(store.last_outcome().map(|o| o.battle_id), Some(1));
}

#[test]
fn defend_boosts_only_the_next_hit() {
    let mut store = warrior_store(0.4);
    store.start_battle("crystal_golem").unwrap();

    let ticket = store.defend().unwrap();
    assert!(store.battle().unwrap().is_defending());
    // 22 - 18*1.5 + 0 floors to 1
    let braced = store.resolve_opponent_turn(ticket).unwrap();
    assert_eq!(braced.damage, 1);
    assert!(!store.battle().unwrap().is_defending());

    let strike = store.attack().unwrap();
    assert_eq!(strike.damage, 30);
    let open = store.resolve_opponent_turn(expect_ticket(strike.next)).unwrap();
    assert_eq!(open.damage, 4);
}

#[test]
fn actions_out_of_turn_are_rejected() {
    let mut store = warrior_store(0.4);
    assert_eq!(store.attack().unwrap_err(), RealmError::NoActiveBattle);

    store.start_battle("dark_skeleton").unwrap();
    let ticket = expect_ticket(store.attack().unwrap().next);
    assert_eq!(store.attack().unwrap_err(), RealmError::NotPlayerTurn);
    assert_eq!(store.defend().unwrap_err(), RealmError::NotPlayerTurn);
    assert_eq!(store.start_battle("forest_wolf").unwrap_err(), RealmError::BattleInProgress);

    store.resolve_opponent_turn(ticket).unwrap();
    // The same ticket cannot be replayed
    assert_eq!(
        store.resolve_opponent_turn(ticket).unwrap_err(),
        RealmError::StaleTurn { battle_id: 1 }
    );
}

#[test]
fn leaving_a_battle_invalidates_its_ticket() {
    let mut store = warrior_store(0.4);
    store.start_battle("crystal_golem").unwrap();
    let old = expect_ticket(store.attack().unwrap().next);
    let golem_hp = store.battle().unwrap().opponent().hp;

    assert_eq!(store.leave_battle(), Some(1));
    assert_eq!(store.encounter_phase(), EncounterPhase::Select);
    assert_eq!(store.resolve_opponent_turn(old).unwrap_err(), RealmError::StaleTurn { battle_id: 1 });

    // A new battle owing a turn still refuses the old ticket
    store.start_battle("crystal_golem").unwrap();
    let fresh = expect_ticket(store.attack().unwrap().next);
    assert_eq!(fresh.battle_id, 2);
    assert!(store.resolve_opponent_turn(old).is_err());
    assert_eq!(store.battle().unwrap().player().hp, 100);
    assert_eq!(store.battle().unwrap().opponent().hp, golem_hp);
    assert!(store.resolve_opponent_turn(fresh).is_ok());
}

#[test]
fn mage_falls_to_the_drake() {
    let mut store = GameStore::new(SequenceRng::constant(0.0), BattleRules::default());
    store.create_character("Bren", "mage").unwrap();
    store.start_battle("shadow_drake").unwrap();

    let outcome = loop {
        let strike = store.attack().unwrap();
        // Mage atk 12 against def 15 floors to 1
        assert_eq!(strike.damage, 1);
        let reply = store.resolve_opponent_turn(expect_ticket(strike.next)).unwrap();
        // 30 - 6 - 3
        assert_eq!(reply.damage, 21);
        if let Some(outcome) = reply.outcome {
            break outcome;
        }
    };

    assert!(!outcome.victory);
    assert!(outcome.reward.is_none());
    assert_eq!(store.encounter_phase(), EncounterPhase::Defeat);
    assert_eq!(store.battle().unwrap().player().hp, 0);
    assert_eq!(store.counters().defeats, 1);
    assert_eq!(store.counters().battle_wins, 0);
    assert_eq!(store.balance(), 0);
    assert_eq!(store.attack().unwrap_err(), RealmError::WrongPhase);
}

#[test]
fn battle_log_keeps_only_recent_lines() {
    let rules = BattleRules {
        log_capacity: 3,
        ..BattleRules::default()
    };
    let mut store = GameStore::new(SequenceRng::constant(0.4), rules);
    store.create_character("Aria", "warrior").unwrap();
    store.start_battle("shadow_drake").unwrap();
    for _ in 0..3 {
        let ticket = expect_ticket(store.attack().unwrap().next);
        store.resolve_opponent_turn(ticket).unwrap();
    }
    let lines: Vec<&str> = store.battle().unwrap().log().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.last().unwrap().starts_with("Shadow Drake hits Aria"));
}
