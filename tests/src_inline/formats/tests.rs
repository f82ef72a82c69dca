use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::gmt::{count_in_size_window, format_gmt_line, read_gmt, write_gmt};
use super::rnk::{format_score, read_rnk, write_rnk};
use crate::input::InputError;
use crate::model::{GeneSet, MIN_GENE_SET_MEMBERS, RankedGene};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_prerank_formats_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn gene_set(id: &str, name: &str, genes: &[&str]) -> GeneSet {
    let mut set = GeneSet::new(id, name);
    set.genes = genes.iter().map(|g| g.to_string()).collect();
    set
}

#[test]
fn test_gmt_line_layout() {
    let set = gene_set("path:eco00010", "Glycolysis", &["pgi", "pfkA", "fbaA"]);
    assert_eq!(
        format_gmt_line(&set),
        "Glycolysis\tpath:eco00010\tpgi\tpfkA\tfbaA\n"
    );
}

#[test]
fn test_gmt_skips_small_sets_and_reads_back() {
    let dir = make_temp_dir();
    let path = dir.join("external_data").join("eco_kegg.gmt");
    let sets = vec![
        gene_set("path:eco00010", "Glycolysis", &["pgi", "pfkA", "fbaA", "tpiA"]),
        gene_set("path:eco00020", "TCA cycle", &["gltA", "acnB"]),
        gene_set("path:eco00030", "Pentose phosphate", &["zwf", "gnd", "rpe"]),
    ];

    let stats = write_gmt(&path, &sets, MIN_GENE_SET_MEMBERS).unwrap();
    assert_eq!(stats.written, 2);
    assert_eq!(stats.skipped_small, 1);

    let back = read_gmt(&path).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[0], sets[0]);
    assert_eq!(back[1], sets[2]);
    assert!(back.iter().all(|s| s.len() >= MIN_GENE_SET_MEMBERS));
}

#[test]
fn test_gmt_empty_input_writes_empty_file() {
    let dir = make_temp_dir();
    let path = dir.join("empty.gmt");
    let stats = write_gmt(&path, &[], MIN_GENE_SET_MEMBERS).unwrap();
    assert_eq!(stats.written, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_gmt_line_without_id_is_parse_error() {
    let dir = make_temp_dir();
    let path = dir.join("bad.gmt");
    fs::write(&path, "only_a_name\n").unwrap();
    let err = read_gmt(&path).unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
}

#[test]
fn test_size_window() {
    let sets = vec![
        gene_set("a", "a", &["1", "2", "3"]),
        gene_set("b", "b", &["1", "2", "3", "4", "5"]),
        gene_set("c", "c", &["1", "2", "3", "4", "5", "6", "7"]),
    ];
    assert_eq!(count_in_size_window(&sets, 5, 1000), 2);
    assert_eq!(count_in_size_window(&sets, 3, 5), 2);
    assert_eq!(count_in_size_window(&sets, 8, 10), 0);
}

#[test]
fn test_score_format_keeps_precision() {
    assert_eq!(format_score(2.0), "2.0");
    assert_eq!(format_score(-1.3010299956639813), "-1.3010299956639813");
    assert_eq!(format_score(0.0), "0.0");
}

#[test]
fn test_rnk_write_is_headerless_and_complete() {
    let dir = make_temp_dir();
    let path = dir.join("processed_data").join("D7_vs_D1.rnk");
    let genes = vec![
        RankedGene::new("thrA", 4.5),
        RankedGene::new("thrL", 2.0),
        RankedGene::new("lacZ", -3.25),
    ];
    write_rnk(&path, &genes).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "thrA\t4.5\nthrL\t2.0\nlacZ\t-3.25\n");
    assert!(!dir.join("processed_data").join("D7_vs_D1.rnk.partial").exists());

    let back = read_rnk(&path).unwrap();
    assert_eq!(back, genes);
}

#[test]
fn test_rnk_overwrites_previous_file() {
    let dir = make_temp_dir();
    let path = dir.join("ranked_genes.rnk");
    fs::write(&path, "stale\t1.0\nold\t0.5\n").unwrap();
    write_rnk(&path, &[RankedGene::new("fresh", 1.5)]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\t1.5\n");
}

#[test]
fn test_rnk_read_errors() {
    let dir = make_temp_dir();
    let empty = dir.join("empty.rnk");
    fs::write(&empty, "\n").unwrap();
    assert!(matches!(read_rnk(&empty), Err(InputError::Parse(_))));

    let bad = dir.join("bad.rnk");
    fs::write(&bad, "thrA\tup\n").unwrap();
    let err = read_rnk(&bad).unwrap_err();
    assert!(err.to_string().contains("line 1"));

    let missing = read_rnk(&dir.join("absent.rnk")).unwrap_err();
    assert!(matches!(missing, InputError::MissingInput(_)));
}
