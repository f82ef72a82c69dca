use std::cell::RefCell;
use std::ffi::OsStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_prerank_stage4_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[derive(Default)]
struct RecordingRunner {
    seen: RefCell<Vec<PathBuf>>,
}

impl EnrichmentRunner for RecordingRunner {
    fn prerank(&self, request: &PrerankRequest) -> Result<(), EnrichError> {
        self.seen.borrow_mut().push(request.out_dir.clone());
        Ok(())
    }
}

fn request(dir: &Path, gene_sets: GeneSetSource) -> PrerankRequest {
    PrerankRequest {
        rnk: dir.join("D7_vs_D1.rnk"),
        gene_sets,
        out_dir: dir.join("results").join("gsea_D7_vs_D1"),
        params: EnrichmentParams::default(),
        verbose: false,
    }
}

#[test]
fn test_default_params() {
    let params = EnrichmentParams::default();
    assert_eq!(params.permutations, 1000);
    assert_eq!(params.min_size, 5);
    assert_eq!(params.max_size, 1000);
    assert_eq!(params.seed, 42);
    assert_eq!(params.threads, 4);
}

#[test]
fn test_gene_set_source_parse() {
    let base = Path::new("/proj/data/external_data");
    assert_eq!(
        GeneSetSource::parse("eco_kegg.gmt", base),
        GeneSetSource::File(base.join("eco_kegg.gmt"))
    );
    assert_eq!(
        GeneSetSource::parse("sets/ppu.gmt.gz", base),
        GeneSetSource::File(base.join("sets/ppu.gmt.gz"))
    );
    assert_eq!(
        GeneSetSource::parse("KEGG_2019_Human", base),
        GeneSetSource::Library("KEGG_2019_Human".to_string())
    );
}

#[test]
fn test_gseapy_command_arguments() {
    let dir = PathBuf::from("/proj");
    let mut req = request(&dir, GeneSetSource::File(dir.join("eco_kegg.gmt")));
    req.verbose = true;
    let cmd = GseapyCli::new("gseapy").command(&req);
    assert_eq!(cmd.get_program(), OsStr::new("gseapy"));
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        vec![
            "prerank",
            "-r",
            "/proj/D7_vs_D1.rnk",
            "-g",
            "/proj/eco_kegg.gmt",
            "-o",
            "/proj/results/gsea_D7_vs_D1",
            "-n",
            "1000",
            "--min-size",
            "5",
            "--max-size",
            "1000",
            "-s",
            "42",
            "-p",
            "4",
            "-v",
        ]
    );
}

#[test]
fn test_missing_gene_set_file_stops_before_runner() {
    let dir = make_temp_dir();
    let runner = RecordingRunner::default();
    let req = request(&dir, GeneSetSource::File(dir.join("absent.gmt")));
    let err = run_stage4(&runner, &req).unwrap_err();
    assert!(matches!(err, EnrichError::MissingGeneSets(_)));
    assert!(runner.seen.borrow().is_empty());
    assert!(!req.out_dir.exists());
}

#[test]
fn test_runner_called_with_output_folder() {
    let dir = make_temp_dir();
    let gmt = dir.join("eco_kegg.gmt");
    fs::write(&gmt, "A\tpath:a\tx\ty\tz\n").unwrap();
    let runner = RecordingRunner::default();
    let req = request(&dir, GeneSetSource::File(gmt));
    run_stage4(&runner, &req).unwrap();
    assert!(req.out_dir.is_dir());
    assert_eq!(*runner.seen.borrow(), vec![req.out_dir.clone()]);
}

#[test]
fn test_library_source_skips_file_check() {
    let dir = make_temp_dir();
    let runner = RecordingRunner::default();
    let req = request(&dir, GeneSetSource::Library("KEGG_2019_Human".to_string()));
    run_stage4(&runner, &req).unwrap();
    assert_eq!(runner.seen.borrow().len(), 1);
}

#[test]
fn test_unlaunchable_program_is_spawn_error() {
    let dir = make_temp_dir();
    let req = request(&dir, GeneSetSource::Library("x".to_string()));
    let runner = GseapyCli::new(dir.join("no-such-gseapy"));
    let err = runner.prerank(&req).unwrap_err();
    assert!(matches!(err, EnrichError::Spawn { .. }));
}
