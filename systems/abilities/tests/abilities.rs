use synaptic_wars_core::{config::AbilitiesConfig, AbilityKind, ActivationError};
use synaptic_wars_system_abilities::AbilityRegistry;

fn registry() -> AbilityRegistry {
    AbilityRegistry::new(&AbilitiesConfig::default())
}

#[test]
fn registry_lists_every_ability_ready() {
    let registry = registry();
    let info = registry.all_info();
    assert_eq!(info.len(), AbilityKind::ALL.len());
    for (snapshot, kind) in info.iter().zip(AbilityKind::ALL) {
        assert_eq!(snapshot.ability, kind);
        assert!(snapshot.ready);
        assert!(snapshot.current_cooldown.abs() < f32::EPSILON);
    }
    assert_eq!(info[0].name, "Dendritic Lightning");
}

#[test]
fn insufficient_energy_is_rejected_without_side_effects() {
    let mut registry = registry();
    let result = registry.activate("dendritic_lightning", 15.0);
    assert_eq!(
        result,
        Err(ActivationError::InsufficientEnergy {
            required: 20.0,
            available: 15.0,
        })
    );
    let info = registry.info("dendritic_lightning").expect("registered");
    assert!(info.ready, "a rejected activation must not start the cooldown");
}

#[test]
fn unknown_ability_is_not_found() {
    let mut registry = registry();
    assert_eq!(
        registry.activate("mind_blast", 100.0),
        Err(ActivationError::NotFound {
            name: "mind_blast".to_owned()
        })
    );
    assert!(registry.info("mind_blast").is_none());
}

#[test]
fn activation_scales_with_multipliers() {
    let mut registry = registry();
    registry.set_multipliers(1.3, 1.2);

    let activation = registry
        .activate("serotonin_tsunami", 100.0)
        .expect("affordable");
    assert_eq!(activation.ability, AbilityKind::SerotoninTsunami);
    assert!((activation.cost - 25.0).abs() < 1e-4);
    assert!((activation.cooldown - 5.0 / 1.3).abs() < 1e-4);
    assert!((activation.healing - 30.0).abs() < 1e-4);
    assert!((activation.duration - 3.6).abs() < 1e-4);
    assert!(activation.damage.abs() < f32::EPSILON);
    assert!((activation.remaining_energy - 75.0).abs() < 1e-4);
}

#[test]
fn cooldown_blocks_until_drained() {
    let mut registry = registry();
    let _ = registry
        .activate("dendritic_lightning", 100.0)
        .expect("first activation");

    match registry.activate("dendritic_lightning", 100.0) {
        Err(ActivationError::OnCooldown { ability, remaining }) => {
            assert_eq!(ability, AbilityKind::DendriticLightning);
            assert!((remaining - 3.0).abs() < 1e-6);
        }
        other => panic!("expected cooldown rejection, got {other:?}"),
    }

    let mut previous = f32::INFINITY;
    for _ in 0..4 {
        registry.tick(1.0);
        let info = registry.info("dendritic_lightning").expect("registered");
        assert!(info.current_cooldown >= 0.0);
        assert!(info.current_cooldown <= previous, "cooldown never grows");
        previous = info.current_cooldown;
    }

    assert!(registry.info("dendritic_lightning").expect("registered").ready);
    assert!(registry.activate("dendritic_lightning", 100.0).is_ok());
}

#[test]
fn faster_recovery_drains_cooldown_sooner() {
    let mut registry = registry();
    let _ = registry
        .activate("quantum_entanglement", 100.0)
        .expect("activation");
    registry.set_multipliers(2.0, 1.0);
    registry.tick(3.0);
    let info = registry.info("quantum_entanglement").expect("registered");
    assert!((info.current_cooldown - 2.0).abs() < 1e-5);
    assert!((info.adjusted_cooldown - 4.0).abs() < 1e-5);
}

#[test]
fn reset_cooldowns_readies_everything() {
    let mut registry = registry();
    for kind in AbilityKind::ALL {
        let _ = registry.activate(kind.key(), 1_000.0).expect("activation");
    }
    assert!(registry.all_info().iter().all(|info| !info.ready));

    registry.reset_cooldowns();
    assert!(registry.all_info().iter().all(|info| info.ready));
}

#[test]
fn zero_cooldown_ability_stays_ready() {
    let mut config = AbilitiesConfig::default();
    config.dendritic_lightning.base_cooldown = 0.0;
    let mut registry = AbilityRegistry::new(&config);

    let first = registry
        .activate("dendritic_lightning", 100.0)
        .expect("first activation");
    assert!(first.cooldown.abs() < f32::EPSILON);
    assert!(registry.info("dendritic_lightning").expect("registered").ready);

    let second = registry.activate("dendritic_lightning", first.remaining_energy);
    assert!(second.is_ok(), "a zero cooldown never blocks reuse: {second:?}");

    for _ in 0..10 {
        registry.tick(0.1);
    }
    let info = registry.info("dendritic_lightning").expect("registered");
    assert!(info.ready);
    assert!(info.current_cooldown.abs() < f32::EPSILON);
}
