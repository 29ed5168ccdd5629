//! End-to-end tests of the bandscope binary
//!
//! Fixtures: genome `mini` with contigs A (ACGTACGTAC) and B (GGGGTTTTCC), and
//! one track `genes` with bands A:[2,5) and A:[7,10).

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FASTA: &str = ">A\nACGTACGTAC\n>B\nGGGGTTTTCC\n";

const BED: &str = "\
track name=genes
# two genes on A
A\t2\t5\tfirst\t100\t+
A\t7\t10\tsecond\t900\t-
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mini.fa"), FASTA).unwrap();
        fs::write(dir.path().join("genes.bed"), BED).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }
}

fn bandscope() -> Command {
    Command::cargo_bin("bandscope").unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_query_seed_window() {
    let fx = Fixture::new();
    bandscope()
        .args(["query", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--track", arg(&fx.path("genes.bed"))])
        .args(["--coordinate", "A:9", "--left", "1", "--right", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("second"))
        .stdout(predicate::str::contains("first").not())
        .stdout(predicate::str::contains("Rightmost: true"))
        .stdout(predicate::str::contains("Leftmost: false"));
}

#[test]
fn test_query_json_output() {
    let fx = Fixture::new();
    let output = bandscope()
        .args(["query", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--track", arg(&fx.path("genes.bed"))])
        .args(["--coordinate", "A:6", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["coordinate"], "A:6");
    let bands = json["bands"].as_array().unwrap();
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0]["name"], "first");
    assert_eq!(bands[0]["track"], "genes");
    assert_eq!(bands[1]["properties"]["strand"], "-");
    assert_eq!(json["is_leftmost"], true);
    assert_eq!(json["is_rightmost"], true);
}

#[test]
fn test_query_with_filter() {
    let fx = Fixture::new();
    let filter = fx.write(
        "filter.json",
        r#"{
            "attributes": [ { "id": "score", "type": "integer" } ],
            "clauses": [ { "id": "high", "attribute": "score", "operator": "ge", "values": ["500"] } ]
        }"#,
    );

    bandscope()
        .args(["query", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--track", arg(&fx.path("genes.bed"))])
        .args(["--coordinate", "A:3", "--format", "tsv"])
        .args(["--filter", arg(&filter)])
        .assert()
        .success()
        .stdout(predicate::str::contains("genes\tsecond\tA\t7\t10"))
        .stdout(predicate::str::contains("first").not());
}

#[test]
fn test_query_rejects_bad_filter() {
    let fx = Fixture::new();
    let filter = fx.write(
        "filter.json",
        r#"{
            "attributes": [ { "id": "score", "type": "integer" } ],
            "clauses": [ { "id": "c", "attribute": "score", "operator": "gt", "values": ["1"] } ],
            "aggregates": [ { "id": "a", "operator": "NAND", "members": ["c"] } ]
        }"#,
    );

    bandscope()
        .args(["query", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--track", arg(&fx.path("genes.bed"))])
        .args(["--coordinate", "A:3", "--filter", arg(&filter)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAND"));
}

#[test]
fn test_query_unknown_contig_fails() {
    let fx = Fixture::new();
    bandscope()
        .args(["query", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--track", arg(&fx.path("genes.bed"))])
        .args(["--coordinate", "Z:3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'Z'"));
}

#[test]
fn test_query_malformed_bed_names_line() {
    let fx = Fixture::new();
    let bed = fx.write("broken.bed", "A\t1\t4\tok\nA\tnine\t10\tbad\n");
    bandscope()
        .args(["query", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--track", arg(&bed)])
        .args(["--coordinate", "A:3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_sequence_crosses_contig_boundary() {
    let fx = Fixture::new();
    bandscope()
        .args(["sequence", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--coordinate", "A:8", "--prefix", "2", "--suffix", "4"])
        .assert()
        .success()
        .stdout(predicate::str::diff("GTACG\n"));
}

#[test]
fn test_sequence_tsv_fragments() {
    let fx = Fixture::new();
    bandscope()
        .args(["sequence", "--fasta", arg(&fx.path("mini.fa"))])
        .args(["--coordinate", "A:8", "--prefix", "2", "--suffix", "4"])
        .args(["--window", "3", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A\t6\t10\tGTAC"))
        .stdout(predicate::str::contains("B\t0\t1\tG"));
}

#[test]
fn test_contigs_from_catalog_file() {
    let fx = Fixture::new();
    let catalog = fx.write(
        "catalog.json",
        r#"{ "version": "1.0.0", "genomes": [ { "id": "mini", "fasta": "mini.fa" } ] }"#,
    );

    bandscope()
        .args(["contigs", "--catalog", arg(&catalog), "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::diff("rank\tcontig\tlength\n0\tA\t10\n1\tB\t10\n"));
}

#[test]
fn test_catalog_and_fasta_conflict() {
    let fx = Fixture::new();
    bandscope()
        .args(["contigs", "--catalog", "x.json", "--fasta", arg(&fx.path("mini.fa"))])
        .assert()
        .failure();
}

#[test]
fn test_help_lists_commands() {
    bandscope()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("sequence"))
        .stdout(predicate::str::contains("contigs"));
}
