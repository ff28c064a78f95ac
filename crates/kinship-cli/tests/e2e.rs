//! E2E CLI tests covering:
//! - Every subcommand against the `A-B, B-C, A-C, C-D` + isolated `E` graph
//! - Output modes (text, JSON) and stdin input
//! - Config loading (`--config`, `KINSHIP_CONFIG`) and validation errors
//! - Parse errors and unknown nodes with stable error codes
//!
//! Each test runs `kin` as a subprocess against files in a temp directory.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const SAMPLE: &str = "\
# triangle with a tail
A B
B C
A C
C D
E
";

/// Build a Command targeting the `kin` binary with logging silenced.
fn kin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kin"));
    cmd.env("KINSHIP_LOG", "error");
    cmd.env_remove("KINSHIP_CONFIG");
    cmd.env_remove("FORMAT");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn sample_graph() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(dir.path(), "graph.txt", SAMPLE);
    (dir, path)
}

/// Run `kin <args> --json` and parse stdout.
fn run_json(args: &[&str]) -> Value {
    let output = kin()
        .args(args)
        .arg("--json")
        .output()
        .expect("kin should not crash");
    assert!(
        output.status.success(),
        "kin {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[test]
fn neighbors_of_one_node() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["neighbors", g, "C"]);
    assert_eq!(json["node"], "C");
    assert_eq!(json["neighbors"], serde_json::json!(["A", "B", "D"]));
}

#[test]
fn neighbors_of_isolated_node_is_empty() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["neighbors", g, "E"]);
    assert_eq!(json["neighbors"], serde_json::json!([]));
}

#[test]
fn neighbors_text_without_node_is_adjacency() {
    let (_dir, graph) = sample_graph();

    kin()
        .args(["--format", "text", "neighbors"])
        .arg(&graph)
        .assert()
        .success()
        .stdout("A B C\nB A C\nC A B D\nD C\nE\n");
}

#[test]
fn components_split_off_isolated_node() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["components", g]);
    assert_eq!(json["count"], 2);
    assert_eq!(
        json["components"],
        serde_json::json!([["A", "B", "C", "D"], ["E"]])
    );
}

#[test]
fn centrality_matches_hand_computation() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["centrality", g]);
    let rows = json.as_array().expect("array of rows");
    assert_eq!(rows.len(), 5);

    let c = rows.iter().find(|r| r["node"] == "C").expect("row for C");
    let degree = c["degree"].as_f64().expect("degree");
    let closeness = c["closeness"].as_f64().expect("closeness");
    assert!((degree - 0.75).abs() < 1e-12, "degree(C) = {degree}");
    assert!((closeness - 1.0).abs() < 1e-12, "closeness(C) = {closeness}");

    let e = rows.iter().find(|r| r["node"] == "E").expect("row for E");
    assert_eq!(e["degree"], 0.0);
    assert_eq!(e["closeness"], 0.0);
}

#[test]
fn pagerank_ranks_hub_first_and_sums_to_one() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["pagerank", g]);
    assert_eq!(json["converged"], true);
    let scores = json["scores"].as_array().expect("scores");
    assert_eq!(scores[0]["node"], "C");
    let total: f64 = scores.iter().filter_map(|r| r["score"].as_f64()).sum();
    assert!((total - 1.0).abs() < 1e-9, "total = {total}");
}

#[test]
fn communities_keep_isolated_node_alone() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["communities", g]);
    let communities = json["communities"].as_array().expect("communities");
    assert!(communities.contains(&serde_json::json!(["E"])));
    let members: usize = communities
        .iter()
        .filter_map(Value::as_array)
        .map(Vec::len)
        .sum();
    assert_eq!(members, 5);
}

#[test]
fn recommend_for_tail_node() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["recommend", g, "--node", "D"]);
    let recs = json["recommendations"].as_array().expect("recommendations");
    let candidates: Vec<&str> = recs
        .iter()
        .filter_map(|r| r["candidate"].as_str())
        .collect();
    assert_eq!(candidates, vec!["A", "B"]);
    assert_eq!(recs[0]["breakdown"]["mutual_friends"], 1);
}

#[test]
fn recommend_top_truncates() {
    let (_dir, graph) = sample_graph();

    kin()
        .args(["--format", "text", "recommend"])
        .arg(&graph)
        .args(["--node", "D", "--top", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("A ").and(predicate::str::contains("B ").not()));
}

#[test]
fn recommend_all_covers_every_node() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let json = run_json(&["recommend", g]);
    let by_node = json.as_object().expect("map keyed by node");
    assert_eq!(by_node.len(), 5);
    assert_eq!(json["C"], serde_json::json!([]));
    assert_eq!(json["E"], serde_json::json!([]));
    assert_eq!(json["A"][0]["candidate"], "D");
}

#[test]
fn report_pretty_has_all_sections() {
    let (_dir, graph) = sample_graph();

    kin()
        .args(["--format", "pretty", "report"])
        .arg(&graph)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Summary")
                .and(predicate::str::contains("Adjacency"))
                .and(predicate::str::contains("Connected components"))
                .and(predicate::str::contains("Centrality"))
                .and(predicate::str::contains("PageRank"))
                .and(predicate::str::contains("Communities"))
                .and(predicate::str::contains("Friend recommendations")),
        );
}

#[test]
fn report_json_hash_is_stable() {
    let (_dir, graph) = sample_graph();
    let g = graph.to_str().expect("utf8 path");

    let first = run_json(&["report", g]);
    let second = run_json(&["report", g]);
    assert_eq!(first, second);
    assert!(
        first["content_hash"]
            .as_str()
            .is_some_and(|h| h.starts_with("blake3:"))
    );
}

// ---------------------------------------------------------------------------
// Input handling
// ---------------------------------------------------------------------------

#[test]
fn reads_graph_from_stdin() {
    let output = kin()
        .args(["components", "-", "--json"])
        .write_stdin(SAMPLE)
        .output()
        .expect("kin should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["count"], 2);
}

#[test]
fn empty_input_gives_empty_results() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "empty.txt", "# nothing here\n");
    let g = graph.to_str().expect("utf8 path");

    assert_eq!(run_json(&["pagerank", g])["scores"], serde_json::json!([]));
    assert_eq!(run_json(&["communities", g])["communities"], serde_json::json!([]));
    assert_eq!(run_json(&["components", g])["count"], 0);
}

#[test]
fn malformed_line_reports_line_number() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "bad.txt", "A B\nA B C\n");

    kin()
        .args(["components"])
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn malformed_line_json_error_has_code() {
    let dir = TempDir::new().expect("tempdir");
    let graph = write_file(dir.path(), "bad.txt", "A B C\n");

    kin()
        .args(["--json", "components"])
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E1003\""));
}

#[test]
fn json_error_stderr_is_a_single_document() {
    let output = kin()
        .args(["components", "-", "--json"])
        .write_stdin("A B C\n")
        .output()
        .expect("run kin");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let json: Value =
        serde_json::from_slice(&output.stderr).expect("stderr is exactly one JSON value");
    assert_eq!(json["error"]["error_code"], "E1003");
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("line 1"))
    );
}

#[test]
fn missing_input_file_fails() {
    let dir = TempDir::new().expect("tempdir");

    kin()
        .args(["components"])
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn unknown_node_has_error_code() {
    let (_dir, graph) = sample_graph();

    kin()
        .args(["--json", "neighbors"])
        .arg(&graph)
        .arg("Z")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_flag_changes_damping() {
    let (dir, graph) = sample_graph();
    let config = write_file(dir.path(), "kinship.toml", "[pagerank]\ndamping = 0.5\n");
    let g = graph.to_str().expect("utf8 path");
    let c = config.to_str().expect("utf8 path");

    let json = run_json(&["--config", c, "pagerank", g]);
    assert_eq!(json["damping"], 0.5);
}

#[test]
fn config_env_var_sets_top() {
    let (dir, graph) = sample_graph();
    let config = write_file(dir.path(), "kinship.toml", "[recommend]\ntop = 1\n");

    let output = kin()
        .env("KINSHIP_CONFIG", &config)
        .args(["recommend", "--json"])
        .arg(&graph)
        .args(["--node", "D"])
        .output()
        .expect("kin should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["recommendations"].as_array().map(Vec::len), Some(1));
}

#[test]
fn invalid_damping_is_rejected() {
    let (dir, graph) = sample_graph();
    let config = write_file(dir.path(), "kinship.toml", "[pagerank]\ndamping = 1.5\n");

    kin()
        .arg("--config")
        .arg(&config)
        .arg("pagerank")
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("damping"));
}

#[test]
fn invalid_weight_json_error_has_code() {
    let (dir, graph) = sample_graph();
    let config = write_file(dir.path(), "kinship.toml", "[recommend]\ndegree = inf\n");

    kin()
        .arg("--json")
        .arg("--config")
        .arg(&config)
        .arg("recommend")
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error_code\": \"E1002\""));
}

#[test]
fn missing_config_file_is_rejected() {
    let (dir, graph) = sample_graph();

    kin()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("pagerank")
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
