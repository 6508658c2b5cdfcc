use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tfnet::clinical::Gender;
use tfnet::network::{read_node_link, EdgeAttrs, Measure};
use tfnet::{AnalysisConfig, AnalysisContext, AnalysisError, CountPolicy};

const S1: &str = "CLL_ATAC-seq_100_1-1-1_ATAC1-1_hg19";
const S2: &str = "CLL_ATAC-seq_200_1-1-2_ATAC1-2_hg19";
const S3: &str = "CLL_ATAC-seq_300_1-1-3_ATAC1-3_hg19";
// On the default QC exclusion list
const EXCLUDED: &str = "CLL_ATAC-seq_4851_1-5-45960_ATAC29-6_hg19";
const OTHER_ASSAY: &str = "CLL_ChIPmentation_100_1-1-1_CM1-1_hg19";

const CLINICAL: &str = "\
sample_id,diagnosis_date,diagnosis_disease,sample_collection_date,patient_gender,igvh_mutation_status,mutations,treatment_1_date,treatment_1_regimen,treatment_1_response,treatment_end_date
1-1-1,01/01/2010,CLL,20/01/2010,M,2,,,,,
1-1-2,2008,CLL,01/06/2012,F,1,del11q,01/01/2011,FCR,PR,
1-1-3,01/01/2005,CLL,01/06/2012,F,1,,01/2009,Chlorambucil,CR,01/01/2010
1-5-45960,01/01/2010,CLL,01/06/2011,M,2,,,,,
";

fn write_file(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn network_text(rows: &[(&str, &str, f64)]) -> String {
    let mut text = String::from("TF\tgene\tinteraction_score\tmotif\n");
    for (tf, gene, score) in rows {
        text.push_str(&format!("{tf}\t{gene}\t{score}\tM0001\n"));
    }
    text
}

/// Three cohort samples sharing the cycle A -> B -> C -> A, each with a private edge
fn fixture(policy: CountPolicy) -> (TempDir, AnalysisContext) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let config = AnalysisConfig {
        data_dir: root.join("data"),
        results_dir: root.join("results"),
        clinical_annotation: root.join("metadata/clinical_annotation.csv"),
        sample_sheet: root.join("metadata/samples.csv"),
        master_graph_output: root.join("results/master_graph.json"),
        description_output: Some(root.join("results/descriptions.csv")),
        count_policy: policy,
        ..AnalysisConfig::default()
    };

    write_file(&config.clinical_annotation, CLINICAL);
    write_file(
        &config.sample_sheet,
        &format!(
            "sampleName,cellLine,technique,patient\n{S1},CLL,ATAC-seq,100\n{OTHER_ASSAY},CLL,ChIPmentation,100\n{S2},CLL,ATAC-seq,200\n{EXCLUDED},CLL,ATAC-seq,4851\n{S3},CLL,ATAC-seq,300\n"
        ),
    );

    write_file(
        &config.network_path(S1),
        &network_text(&[("A", "B", 1.0), ("B", "C", 2.0), ("C", "A", 1.0), ("A", "D", 7.0)]),
    );
    write_file(
        &config.network_path(S2),
        &network_text(&[("C", "A", 4.0), ("A", "B", 2.0), ("B", "C", 2.0), ("D", "A", 1.0)]),
    );
    write_file(
        &config.network_path(S3),
        &network_text(&[("B", "C", 2.0), ("A", "B", 6.0), ("C", "A", 1.0), ("A", "D", 3.0)]),
    );

    let ctx = AnalysisContext::load(config).unwrap();
    (dir, ctx)
}

#[test]
fn test_end_to_end_symmetric_mean() {
    let (_dir, ctx) = fixture(CountPolicy::Symmetric);
    let outcome = tfnet::run(&ctx).unwrap();

    let names: Vec<&str> = outcome.samples.iter().map(|s| s.sample.as_str()).collect();
    assert_eq!(names, vec![S1, S2, S3]);
    assert_eq!(outcome.samples[0].nodes, 4);
    assert_eq!(outcome.samples[0].edges, 4);

    let master = &outcome.master;
    assert!(master.is_averaged());
    assert_eq!(master.edge_count(), 3);
    assert_eq!(master.nodes().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(master.edge("A", "B"), Some(&EdgeAttrs::counted(3.0, 3)));
    assert_eq!(master.edge("B", "C"), Some(&EdgeAttrs::counted(2.0, 3)));
    assert_eq!(master.edge("C", "A"), Some(&EdgeAttrs::counted(2.0, 3)));
    assert!(!master.has_edge("A", "D"));

    let written = read_node_link(&ctx.config.master_graph_output).unwrap();
    assert_eq!(&written, master);

    let csv = fs::read_to_string(ctx.config.description_output.as_ref().unwrap()).unwrap();
    // header + 4 nodes per sample
    assert_eq!(csv.lines().count(), 1 + 3 * 4);
}

#[test]
fn test_end_to_end_legacy_counts() {
    let (_dir, ctx) = fixture(CountPolicy::Legacy);
    let outcome = tfnet::run(&ctx).unwrap();

    // (1 + 2) with counts 1 + 2, then + 6 with count + 2
    let ab = outcome.master.edge("A", "B").unwrap();
    assert_eq!(ab.count, Some(5));
    assert!((ab.weight - 9.0 / 5.0).abs() < 1e-12);
}

#[test]
fn test_descriptions_follow_sample_order() {
    let (_dir, ctx) = fixture(CountPolicy::Symmetric);
    let samples = ctx.prepare_samples().unwrap();
    let outcome = tfnet::run_analysis(&ctx, &samples).unwrap();

    let table = &outcome.descriptions;
    assert_eq!(table.samples(), vec![S1, S2, S3]);
    assert_eq!(table.rows()[0].node, "A");
    assert_eq!(table.rows()[3].node, "D");

    let long = table.melt();
    assert_eq!(long.len(), table.len() * Measure::ALL.len());
    let ranked = table.ranked();
    assert!(ranked.iter().all(|r| r.rank >= 1.0 && r.rank <= table.len() as f64));

    let summary = table.summary();
    // nodes A, B, C, D across samples, nine measures each
    assert_eq!(summary.len(), 4 * Measure::ALL.len());
    let a_degree = summary
        .iter()
        .find(|s| s.node == "A" && s.measure == Measure::DegreeCentrality)
        .unwrap();
    assert_eq!(a_degree.samples, 3);
}

#[test]
fn test_selection_drops_excluded_and_other_assays() {
    let (_dir, ctx) = fixture(CountPolicy::Legacy);
    let annotated = ctx.annotated_samples().unwrap();
    assert_eq!(annotated.len(), 5);

    let selected = ctx.prepare_samples().unwrap();
    let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![S1, S2, S3]);
}

#[test]
fn test_clinical_annotations() {
    let (_dir, ctx) = fixture(CountPolicy::Legacy);
    let samples = ctx.annotated_samples().unwrap();
    let by_name = |name: &str| samples.iter().find(|s| s.name == name).unwrap();

    let s1 = &by_name(S1).annotation;
    assert_eq!(s1.mutated, Some(false));
    assert_eq!(s1.gender, Some(Gender::Male));
    assert_eq!(s1.mutations, None);
    assert_eq!(s1.timeline.diagnosis_collection, Some(true));
    assert_eq!(s1.timeline.treatment_active, Some(false));
    assert_eq!(s1.timeline.relapse, Some(false));

    let s2 = &by_name(S2).annotation;
    assert_eq!(s2.mutated, Some(true));
    assert_eq!(s2.mutations.as_deref(), Some("del11q"));
    assert_eq!(s2.timeline.treatment_active, Some(true));
    assert_eq!(s2.timeline.treatment_type.as_deref(), Some("FCR"));
    assert_eq!(s2.timeline.treatment_response.as_deref(), Some("PR"));
    assert_eq!(s2.timeline.time_since_treatment, Some(517));
    assert_eq!(s2.timeline.relapse, Some(true));

    let s3 = &by_name(S3).annotation;
    assert_eq!(s3.timeline.treatment_active, Some(false));
    assert_eq!(s3.timeline.treatment_type, None);
    assert_eq!(s3.timeline.previous_response.as_deref(), Some("CR"));
    assert_eq!(s3.timeline.relapse, Some(false));

    // Outside the cohort: nothing derived
    let other = &by_name(OTHER_ASSAY).annotation;
    assert_eq!(other, &Default::default());
}

#[test]
fn test_missing_network_is_fatal() {
    let (_dir, ctx) = fixture(CountPolicy::Symmetric);
    fs::remove_file(ctx.config.network_path(S2)).unwrap();

    match tfnet::run(&ctx) {
        Err(AnalysisError::MissingNetwork(path)) => assert_eq!(path, ctx.config.network_path(S2)),
        other => panic!("expected missing network, got {other:?}"),
    }
    assert!(!ctx.config.master_graph_output.exists());
}

#[test]
fn test_missing_clinical_record_is_fatal() {
    let (dir, ctx) = fixture(CountPolicy::Symmetric);
    let sheet = dir.path().join("metadata/extra.csv");
    write_file(
        &sheet,
        "sample_name,cell_line,technique\nCLL_ATAC-seq_9_9-9-9_X_hg19,CLL,ATAC-seq\n",
    );
    let mut config = ctx.config.clone();
    config.sample_sheet = sheet;
    let ctx = AnalysisContext::new(config, ctx.clinical);

    assert!(matches!(
        ctx.annotated_samples(),
        Err(AnalysisError::ClinicalRecordNotFound(id)) if id == "9-9-9"
    ));
}
