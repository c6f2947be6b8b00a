//! Integration tests for the nemo-export CLI.

use clap::Parser;
use nemo_export_cli::cli::{Cli, run_cli};
use std::fs::File;
use std::path::Path;

const MODEL_CONFIG: &str = "\
preprocessor:
  normalize: per_feature
encoder:
  subsampling_factor: 4
";

fn write_checkpoint(path: &Path) {
    let file = File::create(path).expect("failed to create checkpoint");
    let mut builder = tar::Builder::new(file);
    for (name, data) in [
        ("./model_config.yaml", MODEL_CONFIG),
        ("./c0ff_tokenizer.vocab", "▁bon\t-1.0\n▁dia\t-2.0\n"),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, data.as_bytes())
            .expect("failed to append entry");
    }
    builder.finish().expect("failed to finish checkpoint");
}

#[test]
fn export_from_local_artifacts_writes_the_model_directory() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");

    let checkpoint = tmp.path().join("stt.nemo");
    write_checkpoint(&checkpoint);

    let dist = tmp.path().join("dist");
    std::fs::create_dir_all(&dist).expect("failed to create dist dir");
    // ir_version = 8 plus an empty graph field.
    std::fs::write(dist.join("model.onnx"), [0x08, 0x08, 0x3a, 0x00])
        .expect("failed to write graph");

    let out = tmp.path().join("out");

    let cli = Cli::parse_from([
        "nemo-export",
        "export",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
        "--graph-dir",
        dist.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
    ]);

    run_cli(cli).expect("export should succeed");

    let tokens = std::fs::read_to_string(out.join("tokens.txt")).expect("tokens.txt should exist");
    assert_eq!(tokens, "▁bon 0\n▁dia 1\n<blk> 2\n");
    assert!(out.join("model.onnx").exists());
}

#[test]
fn inspect_prints_metadata_of_an_exported_graph() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("model.onnx");
    std::fs::write(&path, [0x08, 0x08]).expect("failed to write graph");
    nemo_export::onnx::append_metadata(
        &path,
        &[("vocab_size".to_string(), "3".to_string())],
    )
    .expect("append should succeed");

    let cli = Cli::parse_from(["nemo-export", "inspect", path.to_str().unwrap()]);
    run_cli(cli).expect("inspect should succeed");
}
