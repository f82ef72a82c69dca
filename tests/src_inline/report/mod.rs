use super::json::render_summary_json;
use super::*;

fn report(name: &str, status: TaskStatus) -> TaskReport {
    TaskReport {
        name: name.to_string(),
        status,
        rank: None,
        results_dir: None,
        error: None,
    }
}

fn summary(tasks: Vec<TaskReport>) -> PipelineSummary {
    PipelineSummary {
        tool: "kira-prerank".to_string(),
        version: "0.1.0".to_string(),
        gene_sets: "eco_kegg.gmt".to_string(),
        annotation: "features.txt.gz".to_string(),
        params: EnrichmentParams::default(),
        tasks,
    }
}

#[test]
fn test_failed_counts_non_completed() {
    let s = summary(vec![
        report("a", TaskStatus::Completed),
        report("b", TaskStatus::MissingInput),
        report("c", TaskStatus::RankFailed),
    ]);
    assert_eq!(s.failed(), 2);
    assert_eq!(summary(Vec::new()).failed(), 0);
}

#[test]
fn test_summary_json_shape() {
    let mut done = report("Early adaptation (D7 vs D1)", TaskStatus::Completed);
    done.rank = Some(RankStats {
        input: "res_D7_vs_D1.tabular".to_string(),
        output: "D7_vs_D1.rnk".to_string(),
        de_rows: 10,
        annotated_loci: 8,
        stat_source: StatSource::Mixed,
        derived_rows: 2,
        joined_rows: 8,
        unmatched_rows: 2,
        symbols: 7,
        top: Some("thrL".to_string()),
        bottom: None,
    });
    let mut failed = report("Late phase (D15 vs D1)", TaskStatus::EnrichmentFailed);
    failed.error = Some("enrichment routine exited with exit status: 1".to_string());

    let json = render_summary_json(&summary(vec![done, failed])).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tool"], "kira-prerank");
    assert_eq!(value["params"]["permutations"], 1000);
    assert_eq!(value["tasks"][0]["rank"]["stat_source"], "mixed");
    assert_eq!(value["tasks"][0]["rank"]["bottom"], serde_json::Value::Null);
    assert!(value["tasks"][0].get("error").is_none());
    assert_eq!(value["tasks"][1]["status"], "enrichment_failed");
    assert!(value["tasks"][1].get("results_dir").is_none());
}
