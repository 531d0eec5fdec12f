use degap_core::corpus::collect_samples;
use degap_core::storage::{FAILURE_SENTINEL, REPORT_FILE, ResultDir};
use std::path::Path;

#[test]
fn test_prepare_clears_previous_run() {
    let tmpdir = tempfile::tempdir().unwrap();
    let out = tmpdir.path().join("result");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("stale_prev1.py"), "print(1)\n").unwrap();

    let dir = ResultDir::prepare(&out, "python").unwrap();
    assert_eq!(std::fs::read_dir(dir.root()).unwrap().count(), 0);
}

#[test]
fn test_prepare_creates_missing_directory() {
    let tmpdir = tempfile::tempdir().unwrap();
    let out = tmpdir.path().join("nested").join("result");
    let dir = ResultDir::prepare(&out, "python").unwrap();
    assert!(dir.root().is_dir());
}

#[test]
fn test_write_artifact_and_sentinel() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = ResultDir::prepare(tmpdir.path(), "python").unwrap();

    let ok = dir
        .write_artifact(Path::new("sample/02.py"), 1, "for i in range(3):\n    print(i)\n")
        .unwrap();
    let failed = dir
        .write_artifact(Path::new("sample/02.py"), 2, FAILURE_SENTINEL)
        .unwrap();

    assert!(ok.ends_with("02_prev1.py"));
    assert_eq!(std::fs::read_to_string(&failed).unwrap(), FAILURE_SENTINEL);
}

#[test]
fn test_write_json_report() {
    let tmpdir = tempfile::tempdir().unwrap();
    let dir = ResultDir::prepare(tmpdir.path(), "python").unwrap();
    let path = dir
        .write_json(REPORT_FILE, &serde_json::json!({"gaps": 1}))
        .unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(parsed["gaps"], 1);
}

#[test]
fn test_collect_samples_sorted_and_filtered() {
    let tmpdir = tempfile::tempdir().unwrap();
    let sample_dir = tmpdir.path().join("sample");
    std::fs::create_dir_all(sample_dir.join("nested")).unwrap();
    std::fs::write(sample_dir.join("02_loops.py"), "for i in x:\n    pass\n").unwrap();
    std::fs::write(sample_dir.join("01_intro.py"), "if x:\n    pass\n").unwrap();
    std::fs::write(sample_dir.join("notes.txt"), "not code").unwrap();
    std::fs::write(sample_dir.join("nested").join("03.py"), "pass\n").unwrap();

    let samples = collect_samples(tmpdir.path(), "sample/*.py").unwrap();
    let ids: Vec<String> = samples.iter().map(|s| s.display_id()).collect();
    assert_eq!(ids, vec!["sample/01_intro.py", "sample/02_loops.py"]);
    assert!(samples[0].source.starts_with("if x:"));
}

#[test]
fn test_collect_samples_empty_corpus() {
    let tmpdir = tempfile::tempdir().unwrap();
    let samples = collect_samples(tmpdir.path(), "sample/*.py").unwrap();
    assert!(samples.is_empty());
}

#[test]
fn test_collect_samples_missing_root_is_error() {
    let tmpdir = tempfile::tempdir().unwrap();
    let missing = tmpdir.path().join("no-such-project");
    let err = collect_samples(&missing, "sample/*.py").unwrap_err();
    assert!(err.to_string().contains("failed to walk corpus"), "{err:#}");
}

#[test]
fn test_collect_samples_unreadable_sample_is_error() {
    let tmpdir = tempfile::tempdir().unwrap();
    let sample_dir = tmpdir.path().join("sample");
    std::fs::create_dir_all(&sample_dir).unwrap();
    std::fs::write(sample_dir.join("01_intro.py"), "if x:\n    pass\n").unwrap();
    std::fs::write(sample_dir.join("02_broken.py"), [0x66, 0x6f, 0xff, 0xfe, 0x0a]).unwrap();

    let err = collect_samples(tmpdir.path(), "sample/*.py").unwrap_err();
    assert!(err.to_string().contains("02_broken.py"), "{err:#}");
}
