// ABOUTME: End-to-end pipeline test: ingest both datasets, validate, derive, analyze
// ABOUTME: Exercises the same path the batch binary runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;

use fitlife_core::AnalysisConfig;
use fitlife_insights::ingest::{load_public_csv, load_wearable_json};
use fitlife_insights::validation::{validate_records, RejectReason};
use fitlife_intelligence::{derive_all, run_all_analyses};

fn public_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut content = String::from(
        "ID,Data,Idade,Gênero,Altura,Peso,Duração,Calorias Queimadas,BPM,Passos,Nível de Fumante,Tipo de Atividade,Distancia\n",
    );
    // Smokers run with elevated heart rates in this fixture.
    for i in 0..6 {
        content.push_str(&format!(
            "S{i:03},2024-03-{:02},40,M,175.0,80.0,40.0,420.0,{},5500,Fumante Leve,Running,6.0\n",
            i + 1,
            150 + i,
        ));
    }
    for i in 0..8 {
        content.push_str(&format!(
            "N{i:03},2024-03-{:02},30,F,165.0,60.0,45.0,380.0,{},6000,Não Fumante,Running,7.0\n",
            i + 1,
            120 + i,
        ));
    }
    // A walker, an out-of-range row, and a duplicate.
    content.push_str("W001,2024-03-20,55,F,160.0,70.0,30.0,150.0,95,3000,Não Fumante,Walking,2.0\n");
    content.push_str("X001,2024-03-21,300,M,175.0,80.0,40.0,420.0,150,5500,Não Fumante,Running,6.0\n");
    content.push_str("S000,2024-03-01,40,M,175.0,80.0,40.0,420.0,150,5500,Fumante Leve,Running,6.0\n");
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn wearable_json() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let entries: Vec<serde_json::Value> = (0..5)
        .map(|i| {
            serde_json::json!({
                "id": format!("R{i:03}"),
                "data": format!("2024-04-{:02}", i + 1),
                "idade": 25 + i,
                "genero": "M",
                "altura_cm": 1.78,
                "peso_kg": 74.0,
                "distancia_km": 10.0,
                "duracao_min": 55.0,
                "calorias_kcal": 640.0,
                "bpm_medio": 155.0,
                "passos": 11000,
                "nivel_fumante": "Não Fumante"
            })
        })
        .collect();
    file.write_all(serde_json::to_string(&entries).unwrap().as_bytes())
        .unwrap();
    file
}

#[test]
fn full_pipeline_produces_all_four_analyses() {
    let csv = public_csv();
    let json = wearable_json();

    let mut raw = load_public_csv(csv.path()).unwrap();
    raw.extend(load_wearable_json(json.path()).unwrap());

    let (records, report) = validate_records(raw);
    // 17 usable public rows minus the invalid age and the duplicate, plus 5 wearable.
    assert_eq!(records.len(), 20);
    assert!(report
        .rejections
        .contains(&(RejectReason::InvalidAge, 1)));
    assert!(report.rejections.contains(&(RejectReason::Duplicate, 1)));

    // Wearable heights arrived in meters and must come out in centimeters.
    let wearable = records.iter().find(|r| r.id == "R000").unwrap();
    assert_eq!(wearable.height_cm, Some(178.0));

    let config = AnalysisConfig::default();
    let derived = derive_all(&records, &config);
    let suite = run_all_analyses(&derived, &config).unwrap();

    assert_eq!(suite.n_records, 20);
    assert_eq!(suite.smokers.comparison.group_a, "smoker");
    assert_eq!(suite.runners.comparison.group_a, "runner");
    assert!(!suite.practice_by_age.rows.is_empty());
    assert!(!suite.bpm_practitioners.global.summaries.is_empty());
}

#[test]
fn smoker_heart_rate_difference_is_detected() {
    let csv = public_csv();
    let raw = load_public_csv(csv.path()).unwrap();
    let (records, _) = validate_records(raw);

    let config = AnalysisConfig::default();
    let derived = derive_all(&records, &config);
    let suite = run_all_analyses(&derived, &config).unwrap();

    let bpm_test = suite
        .smokers
        .comparison
        .tests
        .iter()
        .find(|t| t.metric == "bpm")
        .expect("bpm test present");
    assert!(
        bpm_test.is_significant(),
        "separated bpm distributions should test significant: {bpm_test:?}"
    );
}

#[test]
fn walker_is_excluded_from_runner_group_but_counts_as_practitioner() {
    let csv = public_csv();
    let raw = load_public_csv(csv.path()).unwrap();
    let (records, _) = validate_records(raw);

    let config = AnalysisConfig::default();
    let derived = derive_all(&records, &config);

    let walker = derived.iter().find(|r| r.id() == "W001").unwrap();
    assert!(!walker.is_runner);
    assert!(walker.is_practitioner, "walking is a sport activity");
}
