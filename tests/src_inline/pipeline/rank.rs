use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::StatSource;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_prerank_rank_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn annotation() -> Annotation {
    Annotation::from_pairs([("b0001", "thrL"), ("b0002", "thrA"), ("b0004", "thrA")])
}

#[test]
fn test_rank_named_table_end_to_end() {
    let dir = make_temp_dir();
    let input = dir.join("res.csv");
    let output = dir.join("processed").join("ranked_genes.rnk");
    fs::write(
        &input,
        "\"\",\"baseMean\",\"log2FoldChange\",\"lfcSE\",\"stat\",\"pvalue\",\"padj\"\n\
\"b0001\",10,-1,0.1,-0.5,0.3,0.4\n\
\"b0002\",10,2,0.1,3.0,0.01,0.02\n\
\"b0004\",10,1,0.1,1.0,0.2,0.3\n\
\"b0099\",10,5,0.1,9.0,0.001,0.01\n",
    )
    .unwrap();

    let stats = rank_de_table(&input, &output, &annotation(), &RankOptions::default()).unwrap();
    assert_eq!(stats.de_rows, 4);
    assert_eq!(stats.stat_source, StatSource::Precomputed);
    assert_eq!(stats.joined_rows, 3);
    assert_eq!(stats.unmatched_rows, 1);
    assert_eq!(stats.symbols, 2);
    assert_eq!(stats.top.as_deref(), Some("thrA"));
    assert_eq!(stats.bottom.as_deref(), Some("thrL"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "thrA\t2.0\nthrL\t-0.5\n");
}

#[test]
fn test_rank_positional_table_derives_statistic() {
    let dir = make_temp_dir();
    let input = dir.join("res_D7_vs_D1.tabular");
    let output = dir.join("D7_vs_D1.rnk");
    fs::write(
        &input,
        "b0001\t10\t2.0\t0.1\t\t0.01\t0.02\nb0002\t10\t-1.0\t0.1\t\t0.1\t0.2\n",
    )
    .unwrap();

    let stats = rank_de_table(&input, &output, &annotation(), &RankOptions::default()).unwrap();
    assert_eq!(stats.stat_source, StatSource::Derived);
    let back = crate::formats::rnk::read_rnk(&output).unwrap();
    assert_eq!(back[0].symbol, "thrL");
    assert!((back[0].score - 2.0).abs() < 1e-9);
    assert_eq!(back[1].symbol, "thrA");
    assert!((back[1].score + 1.0).abs() < 1e-9);
}

#[test]
fn test_empty_join_writes_nothing() {
    let dir = make_temp_dir();
    let input = dir.join("res.tabular");
    let output = dir.join("out.rnk");
    fs::write(&input, "x1\t1\t1\t1\t1\t0.1\t0.1\n").unwrap();

    let err = rank_de_table(&input, &output, &annotation(), &RankOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyJoin { .. }));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_is_reported() {
    let dir = make_temp_dir();
    let err = rank_de_table(
        &dir.join("absent.tabular"),
        &dir.join("out.rnk"),
        &annotation(),
        &RankOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Input(crate::input::InputError::MissingInput(_))
    ));
}
