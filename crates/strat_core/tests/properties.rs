use strat_core::curve::{build_stint, full_life_laps, StintStart};
use strat_core::{
    assemble, derive_worn_profile, enumerate, Compound, TireInventory, TireUnit, TrackProfile,
};

fn miami() -> TrackProfile {
    serde_json::from_str(
        r#"{
            "id": "miami",
            "lap_time": { "soft": 91.985, "medium": 92.42, "hard": 92.848 },
            "competitive_laps": { "soft": 15.5, "medium": 23, "hard": 32 },
            "average_deg": { "soft": 0.16, "medium": 0.1, "hard": 0.07 },
            "pit_loss": 22,
            "total_laps": 57,
            "presets": [["medium", "hard"], ["hard", "medium", "medium"], ["medium", "hard", "soft"]]
        }"#,
    )
    .unwrap()
}

fn units(conditions: &[(Compound, u32)]) -> Vec<TireUnit> {
    conditions
        .iter()
        .map(|&(compound, condition)| TireUnit {
            compound,
            condition,
            available: true,
        })
        .collect()
}

fn mixed_inventory() -> TireInventory {
    TireInventory::from_units(&units(&[
        (Compound::Soft, 100),
        (Compound::Soft, 72),
        (Compound::Soft, 35),
        (Compound::Medium, 100),
        (Compound::Medium, 88),
        (Compound::Hard, 100),
        (Compound::Hard, 100),
    ]))
}

#[test]
fn test_curves_are_monotonic_for_every_compound() {
    let track = miami();
    for compound in Compound::ALL {
        let params = track.compound_params(compound).unwrap();
        let curve = build_stint(
            full_life_laps(params.wear_per_lap, 57),
            StintStart::fresh(),
            &params,
        );
        for pair in curve.per_lap_time.windows(2) {
            assert!(pair[1] >= pair[0], "{compound} lap time dropped");
        }
        for condition in [90, 75, 50, 25] {
            if let Some(worn) = derive_worn_profile(&curve, condition, 57, &params) {
                for pair in worn.per_lap_time.windows(2) {
                    assert!(pair[1] >= pair[0], "{compound}@{condition} lap time dropped");
                }
            }
        }
    }
}

#[test]
fn test_every_result_covers_requested_laps() {
    let track = miami();
    let inventory = mixed_inventory();
    for laps in [3, 12, 30, 57] {
        let results = assemble(&track, laps, &inventory);
        assert!(!results.is_empty(), "no strategy for {laps} laps");
        for result in &results {
            let pitted: u32 = result.pit.iter().sum();
            assert_eq!(pitted as usize + result.final_stint_laps(), laps as usize);
            assert_eq!(result.total_laps(), laps as usize);
            assert_eq!(result.pit.len() + 1, result.stints.len());
        }
    }
}

#[test]
fn test_total_time_exceeds_no_degradation_floor() {
    let track = miami();
    let fastest_base = track
        .lap_time
        .values()
        .copied()
        .fold(f64::INFINITY, f64::min);
    for laps in [1, 20, 57] {
        for result in assemble(&track, laps, &mixed_inventory()) {
            assert!(
                result.time > fastest_base * f64::from(laps),
                "{} at {laps} laps: {}",
                result.id,
                result.time
            );
        }
    }
}

#[test]
fn test_full_race_never_single_compound() {
    let track = miami();
    let inventory = mixed_inventory();
    for strategy in enumerate(&track, track.total_laps, &inventory) {
        let first = strategy.stints[0].compound;
        assert!(
            strategy.stints.iter().any(|t| t.compound != first),
            "{} is single-compound",
            strategy.id
        );
    }
    let partial = enumerate(&track, 25, &inventory);
    assert!(partial.iter().any(|s| s.id == "S"));
    assert!(partial.iter().any(|s| s.id == "H-H"));
}

#[test]
fn test_worn_sets_are_bound_after_fresh_ones() {
    let track = miami();
    let inventory = mixed_inventory();
    let strategies = enumerate(&track, 40, &inventory);
    let triple_soft = strategies.iter().find(|s| s.id == "S-S-S").unwrap();
    let conditions: Vec<u32> = triple_soft.stints.iter().map(|t| t.condition).collect();
    assert_eq!(conditions, vec![100, 72, 35]);
}

#[test]
fn test_worn_labels_show_conditions() {
    let track = miami();
    let results = assemble(&track, 30, &mixed_inventory());
    let worn = results
        .iter()
        .find(|r| r.id == "S-S")
        .expect("S-S should be feasible over 30 laps");
    assert_eq!(worn.label, "S-S (100/72)");
}

#[test]
fn test_inventory_filters_and_clamps_units() {
    let inventory = TireInventory::from_units(&[
        TireUnit {
            compound: Compound::Soft,
            condition: 0,
            available: true,
        },
        TireUnit {
            compound: Compound::Soft,
            condition: 80,
            available: false,
        },
        TireUnit {
            compound: Compound::Soft,
            condition: 140,
            available: true,
        },
        TireUnit {
            compound: Compound::Soft,
            condition: 40,
            available: true,
        },
    ]);
    assert_eq!(inventory.conditions(Compound::Soft), &[100, 40]);
    assert_eq!(inventory.count(Compound::Hard), 0);
    assert_eq!(inventory.compounds().collect::<Vec<_>>(), vec![Compound::Soft]);
}

#[test]
fn test_results_serialize_for_consumers() {
    let track = miami();
    let results = assemble(&track, track.total_laps, &mixed_inventory());
    let json = serde_json::to_value(&results).unwrap();
    let first = &json[0];
    assert!(first["id"].is_string());
    assert!(first["time"].as_f64().unwrap() > 0.0);
    assert!(first["pit"].is_array());
    assert_eq!(first["laptimes"].as_array().unwrap().len(), 57);
    assert!(first["stints"][0]["compound"].is_string());
}
