use std::time::Duration;

use synaptic_wars_core::{
    config::GameConfig, AbilityKind, ActivationError, Command, EegMode, Event,
};
use synaptic_wars_system_classifier::LocalInference;
use synaptic_wars_system_session::{NoInput, Session};
use synaptic_wars_world::query;

const STEP: Duration = Duration::from_millis(100);

fn config() -> GameConfig {
    GameConfig {
        seed: 0xdead_beef,
        ..GameConfig::default()
    }
}

fn started(config: GameConfig) -> (Session, Vec<Event>) {
    let mut session = Session::with_backend(config, Box::new(LocalInference));
    let mut events = Vec::new();
    session.handle(Command::StartGame, &mut events);
    (session, events)
}

fn run(session: &mut Session, steps: usize, events: &mut Vec<Event>) {
    for _ in 0..steps {
        session.tick(STEP, &NoInput, events);
    }
}

fn spawned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::TanglerSpawned { .. }))
        .count()
}

fn classified(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EmotionalStateClassified { .. }))
        .count()
}

#[test]
fn idle_session_ignores_ticks() {
    let mut session = Session::with_backend(config(), Box::new(LocalInference));
    let mut events = Vec::new();
    run(&mut session, 30, &mut events);
    assert!(events.is_empty());
    assert_eq!(session.clock(), Duration::ZERO);
}

#[test]
fn start_schedules_opening_spawns_and_keeps_population_floor() {
    let (mut session, mut events) = started(config());
    assert_eq!(events, vec![Event::GameStarted]);
    assert!(session.state().game_active);

    run(&mut session, 1, &mut events);
    assert_eq!(spawned(&events), 2, "opening spawn plus population floor");

    run(&mut session, 9, &mut events);
    assert_eq!(spawned(&events), 3);

    run(&mut session, 15, &mut events);
    assert_eq!(spawned(&events), 4);
    assert_eq!(query::tangler_count(session.world()), 4);
}

#[test]
fn every_tick_publishes_a_snapshot() {
    let (mut session, mut events) = started(config());
    run(&mut session, 5, &mut events);

    let updates: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::GameStateUpdate(snapshot) => Some(snapshot),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 5);

    let last = updates.last().expect("five updates");
    assert_eq!(last.tangler_count, query::tangler_count(session.world()));
    assert_eq!(last.abilities.len(), AbilityKind::ALL.len());
    assert!(last.state.game_active);
}

#[test]
fn insufficient_energy_leaves_state_untouched() {
    let mut config = config();
    config.player.initial_energy = 15.0;
    let (mut session, mut events) = started(config);
    events.clear();

    session.handle(
        Command::UseAbility {
            name: "dendritic_lightning".to_owned(),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::AbilityRejected {
            reason: ActivationError::InsufficientEnergy {
                required: 20.0,
                available: 15.0,
            },
        }]
    );
    assert!((session.state().player_energy - 15.0).abs() < f32::EPSILON);
    assert!(session
        .abilities()
        .info("dendritic_lightning")
        .expect("registered")
        .ready);
}

#[test]
fn lethal_lightning_awards_score() {
    let mut config = config();
    config.abilities.dendritic_lightning.base_damage = 1_000.0;
    let (mut session, mut events) = started(config);
    run(&mut session, 1, &mut events);
    events.clear();

    session.handle(
        Command::UseAbility {
            name: "dendritic_lightning".to_owned(),
        },
        &mut events,
    );
    assert_eq!(session.state().score, 10);
    assert!((session.state().player_energy - 80.0).abs() < 1e-3);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TanglerEliminated { .. })));
    assert!(matches!(
        events.last(),
        Some(Event::AbilityActivated { .. })
    ));
}

#[test]
fn tsunami_restores_energy_and_calms_tanglers() {
    let mut config = config();
    config.player.initial_energy = 50.0;
    let (mut session, mut events) = started(config);

    session.handle(
        Command::UseAbility {
            name: "serotonin_tsunami".to_owned(),
        },
        &mut events,
    );
    assert!((session.state().player_energy - 45.0).abs() < 1e-3);
    assert!(query::calm_active(session.world()));
}

#[test]
fn repeated_ability_use_is_rejected_while_cooling_down() {
    let (mut session, mut events) = started(config());
    for _ in 0..2 {
        session.handle(
            Command::UseAbility {
                name: "quantum_entanglement".to_owned(),
            },
            &mut events,
        );
    }
    assert!(query::entanglement_active(session.world()));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::AbilityRejected {
            reason: ActivationError::OnCooldown { .. }
        }
    )));
    assert!((session.state().player_energy - 60.0).abs() < 1e-3);
}

#[test]
fn energy_recovers_up_to_maximum() {
    let mut config = config();
    config.player.initial_energy = 50.0;
    let (mut session, mut events) = started(config);

    run(&mut session, 10, &mut events);
    assert!((session.state().player_energy - 60.0).abs() < 1e-3);

    run(&mut session, 100, &mut events);
    assert!((session.state().player_energy - 100.0).abs() < f32::EPSILON);
}

#[test]
fn eeg_mode_commands_are_validated() {
    let (mut session, mut events) = started(config());
    events.clear();

    session.handle(
        Command::SetEegMode {
            mode: "asleep".to_owned(),
        },
        &mut events,
    );
    assert!(events.is_empty());

    session.handle(
        Command::SetEegMode {
            mode: "focused".to_owned(),
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::EegModeChanged {
            mode: EegMode::Focused
        }]
    );
}

#[test]
fn resolved_classifications_drive_adaptation() {
    let (mut session, mut events) = started(config());
    run(&mut session, 10, &mut events);
    assert_eq!(classified(&events), 1, "one sample per second, local rules answer at once");
    assert_eq!(session.director().history_len(), 1);
    assert_eq!(session.performance_report().adaptation_total, 1);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AdaptationSettingsChanged { .. })));
}

#[test]
fn remote_results_arrive_after_latency() {
    let mut session = Session::new(config());
    let mut events = Vec::new();
    session.handle(Command::StartGame, &mut events);

    run(&mut session, 10, &mut events);
    assert_eq!(session.pending_classifications(), 1);
    assert_eq!(classified(&events), 0);

    run(&mut session, 3, &mut events);
    assert_eq!(session.pending_classifications(), 0);
    assert_eq!(classified(&events), 1);
}

#[test]
fn in_flight_results_are_dropped_when_the_game_ends() {
    let mut session = Session::new(config());
    let mut events = Vec::new();
    session.handle(Command::StartGame, &mut events);
    run(&mut session, 10, &mut events);
    assert_eq!(session.pending_classifications(), 1);

    session.handle(Command::EndGame, &mut events);
    assert!(!session.state().game_active);
    assert_eq!(session.pending_classifications(), 0);

    session.handle(Command::StartGame, &mut events);
    run(&mut session, 5, &mut events);
    assert_eq!(classified(&events), 0);
    assert_eq!(session.director().history_len(), 0);
}

#[test]
fn export_collects_histories() {
    let (mut session, mut events) = started(config());
    run(&mut session, 35, &mut events);

    let document = session.export(1_234);
    assert_eq!(document.file_name(), "neuro-data-1234.json");
    assert_eq!(document.emotional_history.len(), 3);
    assert_eq!(document.adaptation_history.len(), 3);
    assert_eq!(document.performance_report.adaptation_total, 3);

    let json = document.to_json().expect("serializable");
    assert!(json.contains("\"export_timestamp\": 1234"));
    assert!(json.contains("\"emotional_history\""));
}

#[test]
fn identical_scripts_replay_identically() {
    let script = |seed| {
        let mut config = config();
        config.seed = seed;
        let mut session = Session::new(config);
        let mut events = Vec::new();
        session.handle(Command::StartGame, &mut events);
        for step in 0..120 {
            if step % 25 == 0 {
                session.handle(
                    Command::UseAbility {
                        name: "dendritic_lightning".to_owned(),
                    },
                    &mut events,
                );
            }
            if step == 60 {
                session.handle(
                    Command::SetEegMode {
                        mode: "stressed".to_owned(),
                    },
                    &mut events,
                );
            }
            session.tick(STEP, &NoInput, &mut events);
        }
        events
    };
    assert_eq!(script(5), script(5));
}

#[test]
fn unbounded_opening_spacing_keeps_the_loop_running() {
    let mut config = config();
    config.game.opening_spawn_spacing = f32::INFINITY;
    let (mut session, mut events) = started(config);
    run(&mut session, 5, &mut events);
    assert!(session.state().game_active);
    assert_eq!(spawned(&events), 2, "first opening spawn plus population floor");
}
