//! End-to-end scenarios driven through the engine's inbound interface.

use valor_core::config::EngineConfig;
use valor_core::pack::PACK_FILE_NAME;
use valor_core::prelude::*;
use valor_logic::snapshot::{VesselInfo, VesselType};
use valor_logic::stats::StatUpdate;

fn vessel(mass: f64) -> VesselInfo {
    VesselInfo {
        total_mass: mass,
        vessel_type: VesselType::Ship,
        parts: Vec::new(),
        gee_force: 1.0,
        gee_force_sustained: 0.0,
        mach_horizontal: 0.0,
    }
}

fn snap(situation: Situation, body: &str) -> VesselSnapshot {
    VesselSnapshot {
        is_eva: false,
        situation,
        main_body: Some(body.to_string()),
        altitude: 0.0,
        atm_density: 0.0,
        apoapsis: 0.0,
        periapsis: 0.0,
        origin: Some(vessel(10.0)),
        flag_planted: false,
        moved_on_surface: false,
        is_launch: false,
        mission_time: 0.0,
        universal_time: 1_000.0,
    }
}

fn ready_engine() -> AchievementEngine {
    let mut engine = AchievementEngine::new();
    engine.complete_setup();
    engine
}

fn crew(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn dangerous_eva_requires_a_previous_state() {
    let engine = ready_engine();
    let mut eva = snap(Situation::SubOrbital, "Terra");
    eva.is_eva = true;

    // a freshly tracked EVA has no previous state and earns nothing
    engine.on_transition(&crew(&["Sam"]), None, &eva);
    assert!(!engine.has_ribbon("Sam", "DE"));

    let prev = snap(Situation::SubOrbital, "Terra");
    engine.on_transition(&crew(&["Sam"]), Some(&prev), &eva);
    assert!(engine.has_ribbon("Sam", "DE"));
}

#[test]
fn fast_orbit_tiers_follow_mission_time() {
    let engine = ready_engine();
    let prev = snap(Situation::SubOrbital, "Terra");
    let mut orbit = snap(Situation::Orbiting, "Terra");
    orbit.mission_time = 130.0;

    engine.on_transition(&crew(&["Sam"]), Some(&prev), &orbit);
    // 130 seconds beats the 150 tier but not the 120 tier
    assert!(engine.has_ribbon("Sam", "FO:150"));
    assert!(engine.has_ribbon("Sam", "FO:250"));
    assert!(!engine.has_ribbon("Sam", "FO:120"));
}

#[test]
fn heavy_vehicle_landing_ignores_the_launch_pad() {
    let engine = ready_engine();
    let mut landed = snap(Situation::Landed, "Terra");
    landed.origin = Some(vessel(1_200.0));

    // rolling off the pad is not a landing
    let pad = snap(Situation::Prelaunch, "Terra");
    engine.on_transition(&crew(&["Sam"]), Some(&pad), &landed);
    assert!(!engine.has_ribbon("Sam", "HS:1000"));

    let flying = snap(Situation::Flying, "Terra");
    engine.on_transition(&crew(&["Sam"]), Some(&flying), &landed);
    assert!(engine.has_ribbon("Sam", "HS:1000"));
    assert!(engine.has_ribbon("Sam", "HS:250"));
    assert!(!engine.has_ribbon("Sam", "HS:2000"));
    // mass alone also earns the crew ribbon for the same vessel
    assert!(engine.has_ribbon("Sam", "H:1000"));
}

#[test]
fn ribbon_pack_ribbons_are_awardable_after_scan() {
    let dir = tempfile::tempdir().unwrap();
    let pack_dir = dir.path().join("packs/expedition");
    std::fs::create_dir_all(&pack_dir).unwrap();
    std::fs::write(
        pack_dir.join(PACK_FILE_NAME),
        "NAME:Expedition\nFOLDER:packs/expedition\nBASE:200\n\
         0:exp1:Expedition I:Awarded for the first expedition:75\n",
    )
    .unwrap();

    let mut engine = AchievementEngine::new();
    assert_eq!(engine.scan_ribbon_packs(dir.path()), 1);
    engine.complete_setup();

    assert!(engine.award_ribbon_to("Sam", "X200", 10.0));
    let prestige = engine
        .hall_of_fame()
        .with_entry("Sam", |e| e.prestige())
        .unwrap();
    assert_eq!(prestige, 75);
}

#[test]
fn grand_tour_fires_once_across_many_transitions() {
    let engine = ready_engine();
    let bodies = engine.catalog().non_sun_names();
    for body in &bodies {
        let prev = snap(Situation::Escaping, "Helios");
        let cur = snap(Situation::Orbiting, body);
        // visit twice; the second pass must not re-fire anything
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
        engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
    }
    assert!(engine.has_ribbon("Sam", "GT"));
    assert!(engine.has_ribbon("Sam", "JT"));
    let gt_count = engine
        .hall_of_fame()
        .with_entry("Sam", |entry| {
            entry
                .logbook()
                .iter()
                .filter(|line| line.code == "GT")
                .count()
        })
        .unwrap();
    assert_eq!(gt_count, 1);
}

#[test]
fn hall_of_fame_survives_a_save_load_cycle() {
    let engine = ready_engine();
    let prev = snap(Situation::Escaping, "Terra");
    let cur = snap(Situation::Orbiting, "Luna");
    engine.on_transition(&crew(&["Sam", "Alex"]), Some(&prev), &cur);
    engine.on_stat_update(
        "Sam",
        &StatUpdate::MissionCompleted { duration: 3_600.0 },
        2_000.0,
    );
    engine.record_log("Sam", "Smooth ride all the way", 2_100.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("halloffame.bin");
    let file = std::fs::File::create(&path).unwrap();
    engine.save(file).expect("save failed");

    let mut restored = AchievementEngine::new();
    restored.complete_setup();
    let file = std::fs::File::open(&path).unwrap();
    restored.load(file).expect("load failed");

    assert_eq!(restored.hall_of_fame().entry_count(), 2);
    assert!(restored.has_ribbon("Sam", "O1:Luna"));
    assert!(restored.has_ribbon("Alex", "O1:Luna"));
    restored
        .hall_of_fame()
        .with_entry("Sam", |entry| {
            assert_eq!(entry.stats.missions_flown, 1);
            assert!(entry.visited_bodies().any(|b| b == "Luna"));
            assert!(entry.logbook().iter().any(|line| line.code == "LOG"));
        })
        .unwrap();

    // a restored ledger keeps first ribbons claimed
    let restored_ranking = restored.hall_of_fame().ranking();
    assert_eq!(restored_ranking.len(), 2);
    restored.on_transition(&crew(&["Zoe"]), Some(&prev), &cur);
    assert!(!restored.has_ribbon("Zoe", "O1:Luna"));
    assert!(restored.has_ribbon("Zoe", "O:Luna"));
}

#[test]
fn disabled_codes_from_config_never_award() {
    let mut engine = AchievementEngine::new();
    engine.apply_config(EngineConfig {
        disabled_codes: vec!["O:Luna".to_string(), "O1:Luna".to_string()],
        ..Default::default()
    });
    engine.complete_setup();
    let prev = snap(Situation::Escaping, "Terra");
    let cur = snap(Situation::Orbiting, "Luna");
    engine.on_transition(&crew(&["Sam"]), Some(&prev), &cur);
    assert!(!engine.has_ribbon("Sam", "O:Luna"));
    assert!(!engine.has_ribbon("Sam", "O1:Luna"));
    // the sphere of influence ribbon is untouched
    assert!(engine.has_ribbon("Sam", "I:Luna"));
}

#[test]
fn eva_accumulation_awards_endurance_and_total_time() {
    let engine = ready_engine();
    engine.on_stat_update("Sam", &StatUpdate::EvaStarted { universal_time: 0.0 }, 0.0);
    // forty minutes in five minute steps
    for minute in (5..=40).step_by(5) {
        engine.on_stat_update(
            "Sam",
            &StatUpdate::EvaProgress {
                universal_time: f64::from(minute) * 60.0,
            },
            f64::from(minute) * 60.0,
        );
    }
    engine.on_stat_update(
        "Sam",
        &StatUpdate::EvaEnded {
            universal_time: 2_400.0,
        },
        2_400.0,
    );

    // 2400 seconds: clears the 30 minute endurance tier, not the hour
    assert!(engine.has_ribbon("Sam", "EM:1800"));
    assert!(!engine.has_ribbon("Sam", "EM:3600"));
    let stats = engine.hall_of_fame().stats_of("Sam");
    assert!((stats.total_eva_time - 2_400.0).abs() < 1e-9);
}
