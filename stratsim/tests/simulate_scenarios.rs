use approx::assert_relative_eq;
use stratsim::core::circuit::{find_circuit, CircuitContext};
use stratsim::core::errors::SimError;
use stratsim::core::gap::{integrate, ManeuverClass, Outcome};
use stratsim::core::handle_sim::{simulate, OpponentPlan, PrimaryPlan, RaceState};
use stratsim::core::opponent::{project_opponent_stint, ReactivePolicy};
use stratsim::core::pace::{ArtifactStore, LabelEncoder, PacePredictor};
use stratsim::core::stint::project_stint;
use stratsim::core::tire::{Compound, TireState};
use stratsim::pre::read_sim_pars::{read_encoder, read_model_file, read_sim_pars, SimPars};
use std::path::PathBuf;

fn input_path(rel: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "..", "input", rel].iter().collect()
}

fn bahrain_store() -> ArtifactStore {
    let model_file = read_model_file(&input_path("models/Bahrain.json")).unwrap();
    let encoder = read_encoder(&input_path("models/compound_encoder.json")).unwrap();
    let mut store = ArtifactStore::new().with_encoder(encoder);
    store.insert_model(&model_file.circuit, model_file.model);
    store
}

fn dashboard_plans(policy: ReactivePolicy) -> (PrimaryPlan, OpponentPlan) {
    (
        PrimaryPlan {
            tire: TireState::new(Compound::Soft, 25),
            pit_to: Compound::Medium,
        },
        OpponentPlan {
            tire: TireState::new(Compound::Hard, 15),
            policy,
            pit_to: None,
        },
    )
}

#[test]
fn bahrain_lap_40_scenario_is_well_formed_and_deterministic() {
    let store = bahrain_store();
    let context = CircuitContext::new(57, 22.5);
    let (my_plan, opp_plan) = dashboard_plans(ReactivePolicy::StayOut);
    let race_state = RaceState {
        current_lap: 40,
        gap_to_reference: 18.0,
    };

    let first = simulate(&store, "Bahrain", &context, &my_plan, &opp_plan, &race_state, 8).unwrap();
    let second =
        simulate(&store, "Bahrain", &context, &my_plan, &opp_plan, &race_state, 8).unwrap();

    assert_eq!(first.len(), 9);
    assert_eq!(first.racetimes_me.len(), 9);
    assert_eq!(first.racetimes_opp.len(), 9);
    assert_eq!(first.lap_idxs, (40..=48).collect::<Vec<u32>>());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    // 18 s behind plus a full pit loss cannot be recovered within eight laps
    assert_eq!(first.outcome, Outcome::Defended);
    assert_eq!(first.catch_lap, None);
    assert_eq!(first.maneuver, ManeuverClass::Undercut);
}

#[test]
fn scenario_file_runs_end_to_end() {
    let sim_pars = read_sim_pars(&input_path("scenarios/bahrain_undercut.json")).unwrap();

    let result = sim_pars.run(&bahrain_store()).unwrap();
    assert_eq!(result.len(), 9);
}

#[test]
fn missing_circuit_model_is_reported() {
    let context = find_circuit("Japan").unwrap().context(None);
    let (my_plan, opp_plan) = dashboard_plans(ReactivePolicy::Cover);
    let race_state = RaceState {
        current_lap: 20,
        gap_to_reference: 2.0,
    };

    let err = simulate(&bahrain_store(), "Japan", &context, &my_plan, &opp_plan, &race_state, 8)
        .unwrap_err();
    assert!(matches!(err, SimError::ModelUnavailable { .. }));
}

const MONACO_JSON: &str = r#"{
    "circuit": "Monaco",
    "circuit_pars": {"name": "Monte Carlo", "tot_no_laps": 78, "pit_loss": 19.0},
    "my_car": {"tire": {"compound": "MEDIUM", "age": 30}, "pit_to": "HARD"},
    "opponent": {"tire": {"compound": "MEDIUM", "age": 28}, "policy": "COVER"},
    "race_state": {"current_lap": 74, "gap_to_reference": 1.5},
    "horizon_laps": 8
}"#;

#[test]
fn custom_circuit_uses_scenario_circuit_for_model_lookup() {
    let sim_pars: SimPars = serde_json::from_str(MONACO_JSON).unwrap();

    let mut store = ArtifactStore::new().with_encoder(LabelEncoder::default());
    store.insert_model("Monaco", |_: [u32; 3]| 75.0);
    let result = sim_pars.run(&store).unwrap();

    // laps 74..=78, the race ends before the horizon
    assert_eq!(result.lap_idxs, (74..=78).collect::<Vec<u32>>());
    assert_relative_eq!(result.racetimes_me[0], 75.0 + 19.0 + 1.5, epsilon = 1e-9);

    // a model filed under the layout name is not the one asked for
    let mut store = ArtifactStore::new().with_encoder(LabelEncoder::default());
    store.insert_model("Monte Carlo", |_: [u32; 3]| 75.0);
    let err = sim_pars.run(&store).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SimError>(),
        Some(&SimError::ModelUnavailable {
            circuit: "Monaco".to_owned()
        })
    );
}

#[test]
fn encoder_missing_the_new_compound_fails_simulation() {
    let model_file = read_model_file(&input_path("models/Bahrain.json")).unwrap();
    let mut store = ArtifactStore::new().with_encoder(LabelEncoder::fit(vec!["HARD", "SOFT"]));
    store.insert_model(&model_file.circuit, model_file.model);

    let context = CircuitContext::new(57, 22.5);
    let (my_plan, opp_plan) = dashboard_plans(ReactivePolicy::StayOut);
    let race_state = RaceState {
        current_lap: 40,
        gap_to_reference: 18.0,
    };

    let err = simulate(&store, "Bahrain", &context, &my_plan, &opp_plan, &race_state, 8)
        .unwrap_err();
    assert_eq!(
        err,
        SimError::UnknownCompound {
            label: "MEDIUM".to_owned()
        }
    );
}

#[test]
fn last_lap_gives_single_point_result() {
    let store = bahrain_store();
    let predictor = store.predictor("Bahrain").unwrap();
    let context = CircuitContext::new(57, 22.5);
    let (my_plan, opp_plan) = dashboard_plans(ReactivePolicy::Cover);

    let my_paces =
        project_stint(&predictor, &my_plan.tire, 57, 8, &context, my_plan.pit_to).unwrap();
    let opp_paces = project_opponent_stint(
        &predictor,
        &opp_plan.tire,
        57,
        8,
        &context,
        opp_plan.policy,
        Compound::Medium,
    )
    .unwrap();
    assert_eq!(my_paces.len(), 1);
    assert_eq!(opp_paces.len(), 1);

    let result = integrate(&my_paces, &opp_paces, 1.0, 57);
    assert_eq!(result.lap_idxs, vec![57]);
    assert_relative_eq!(
        result.gap_history[0],
        opp_paces[0] - (my_paces[0] + 1.0),
        epsilon = 1e-9
    );
}

#[test]
fn cover_adds_pit_loss_on_step_one_and_resets_age_on_step_two() {
    let encoder = LabelEncoder::default();
    // lap time equals tire age, compound and lap ignored
    let age_echo = |features: [u32; 3]| features[1] as f64;
    let predictor = PacePredictor::new(&age_echo, &encoder);
    let context = CircuitContext::new(57, 22.5);
    let start = TireState::new(Compound::Hard, 15);

    let stay_out = project_opponent_stint(
        &predictor,
        &start,
        40,
        8,
        &context,
        ReactivePolicy::StayOut,
        Compound::Medium,
    )
    .unwrap();
    let cover = project_opponent_stint(
        &predictor,
        &start,
        40,
        8,
        &context,
        ReactivePolicy::Cover,
        Compound::Medium,
    )
    .unwrap();

    assert_relative_eq!(cover[0], stay_out[0]);
    assert_relative_eq!(cover[1] - stay_out[1], 22.5);
    assert_relative_eq!(cover[2], 1.0);
    assert_relative_eq!(cover[8], 7.0);
}

#[test]
fn maneuver_class_both_directions() {
    let encoder = LabelEncoder::default();
    let context = CircuitContext::new(57, 10.0);
    let race_state = RaceState {
        current_lap: 20,
        gap_to_reference: 0.0,
    };
    let my_plan = PrimaryPlan {
        tire: TireState::new(Compound::Hard, 10),
        pit_to: Compound::Medium,
    };
    let opp_plan = OpponentPlan {
        tire: TireState::new(Compound::Medium, 10),
        policy: ReactivePolicy::StayOut,
        pit_to: None,
    };

    // flat pace: our decision lap is slower by exactly the pit loss
    let mut store = ArtifactStore::new().with_encoder(encoder.clone());
    store.insert_model("Flat", |_: [u32; 3]| 90.0);
    let result = simulate(&store, "Flat", &context, &my_plan, &opp_plan, &race_state, 3).unwrap();
    assert_eq!(result.maneuver, ManeuverClass::Undercut);

    // opponent's old MEDIUM set is far off the pace on the decision lap
    let mut store = ArtifactStore::new().with_encoder(encoder);
    store.insert_model("Cliff", |features: [u32; 3]| {
        if features[0] == 1 && features[1] >= 10 {
            120.0
        } else {
            90.0
        }
    });
    let result = simulate(&store, "Cliff", &context, &my_plan, &opp_plan, &race_state, 3).unwrap();
    assert_eq!(result.maneuver, ManeuverClass::Overcut);
}
