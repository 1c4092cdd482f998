//! Exercises the async worker facade end to end on a fast tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;

use combat_core::config::CombatConfig;
use combat_core::snapshot::Levels;
use combat_core::types::{ActorId, Position};

use combat_content::npcs::NpcCatalog;
use combat_content::weapons::WeaponCatalog;
use combat_content::zones::OpenWorldRules;

use combat_runtime::{ActorBlueprint, CombatEngine, CombatWorker, GameEvent};

const VENOM_FANG: u32 = 101;

#[tokio::test]
async fn worker_resolves_a_fight_end_to_end() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = CombatConfig {
        tick_millis: 5,
        ..CombatConfig::new()
    };
    let engine = CombatEngine::new(config, Arc::new(OpenWorldRules::new()), 11);
    let npcs = NpcCatalog::embedded().unwrap();
    let weapons = WeaponCatalog::embedded().unwrap();
    let (handle, join) = CombatWorker::spawn(engine, npcs, weapons);
    let mut events = handle.subscribe();

    let hero = handle
        .spawn_player(ActorBlueprint::player("hero", Levels::uniform(80)).at(Position::new(0, 0)))
        .await
        .unwrap();
    let rat = handle.spawn_npc(1, Position::new(0, 1)).await.unwrap();
    assert!(handle.spawn_npc(999, Position::new(0, 2)).await.is_err());

    handle.equip_weapon(hero, VENOM_FANG).await.unwrap();
    assert!(handle.equip_weapon(hero, 9999).await.is_err());
    assert!(handle.equip_weapon(ActorId::new(999), VENOM_FANG).await.is_err());

    handle.attack(hero, rat).await.unwrap();

    let death = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match events.recv().await {
                Ok(GameEvent::ActorDied { victim, killer }) => break (victim, killer),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => panic!("event bus closed mid-fight"),
            }
        }
    })
    .await
    .expect("fight should finish well inside the deadline");
    assert_eq!(death, (rat, Some(hero)));

    let view = handle.inspect(rat).await.unwrap().expect("corpse persists");
    assert_eq!(view.health, 0);

    handle.despawn(rat).await.unwrap();
    assert!(handle.inspect(rat).await.unwrap().is_none());

    drop(handle);
    join.await.unwrap();
}
