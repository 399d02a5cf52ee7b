// Integration tests for arena matches: opponent selection, wagers and payout
use crypto_realm::realm::{
    BattleMode, BattleRules, EncounterPhase, GameStore, RealmError, SequenceRng, TurnResult,
};

fn funded_store(tokens: u64) -> GameStore<SequenceRng> {
    let mut store = GameStore::new(SequenceRng::constant(0.4), BattleRules::default()).with_starting_tokens(tokens);
    store.create_character("Aria", "warrior").unwrap();
    store
}

#[test]
fn test_wager_is_staked_and_doubled_on_win() {
    let mut store = funded_store(500);
    store.select_opponent("shadowblade").unwrap();
    assert_eq!(
        store.encounter_phase(),
        EncounterPhase::Wager {
            opponent_id: "shadowblade".to_string()
        }
    );

    store.start_pvp(100).unwrap();
    assert_eq!(store.balance(), 400);

    // 42 - 8 = 34 per hit against 90 hp; ShadowBlade deals 20 - 18 = 2
    let outcome = loop {
        let strike = store.attack().unwrap();
        assert_eq!(strike.damage, 34);
        if let Some(outcome) = strike.outcome {
            break outcome;
        }
        match strike.next {
            TurnResult::OpponentTurn(ticket) => {
                let reply = store.resolve_opponent_turn(ticket).unwrap();
                assert_eq!(reply.damage, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    };

    assert!(outcome.victory);
    assert_eq!(
        outcome.mode,
        BattleMode::Pvp {
            opponent_id: "shadowblade".to_string(),
            opponent_level: 3,
            wager: 100
        }
    );
    let reward = outcome.reward.unwrap();
    assert_eq!(reward.tokens, 200);
    // floor(3*15 + 0.4*20)
    assert_eq!(reward.xp, 53);
    assert!(reward.loot.is_empty());

    assert_eq!(store.balance(), 600);
    // The opening balance is not income
    assert_eq!(store.total_earned(), 200);
    assert_eq!(store.counters().pvp_wins, 1);
    assert!(outcome.unlocked.contains(&"arena_debut".to_string()));
    assert!(store.quest("daily_arena").unwrap().is_claimable());
}

#[test]
fn test_wager_guards() {
    let mut store = funded_store(80);
    assert_eq!(store.start_pvp(50).unwrap_err(), RealmError::WrongPhase);
    assert_eq!(
        store.select_opponent("nobody").unwrap_err(),
        RealmError::UnknownOpponent("nobody".to_string())
    );

    store.select_opponent("irontitan").unwrap();
    assert_eq!(store.start_pvp(0).unwrap_err(), RealmError::InvalidAmount(0));
    assert_eq!(
        store.start_pvp(100).unwrap_err(),
        RealmError::InsufficientFunds { have: 80, need: 100 }
    );
    // Rejected wagers leave the selection and balance alone
    assert_eq!(store.balance(), 80);
    assert!(matches!(store.encounter_phase(), EncounterPhase::Wager { .. }));

    store.start_pvp(80).unwrap();
    assert_eq!(store.balance(), 0);
    assert_eq!(store.encounter_phase(), EncounterPhase::Fighting);
}

#[test]
fn test_forfeited_wager_is_not_refunded() {
    let mut store = funded_store(250);
    store.select_opponent("darksorcerer").unwrap();
    store.start_pvp(250).unwrap();
    assert_eq!(store.leave_battle(), Some(1));
    assert_eq!(store.balance(), 0);
    assert_eq!(store.encounter_phase(), EncounterPhase::Select);
}
