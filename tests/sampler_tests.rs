//! Integration tests for the sampler against a fake proc tree.
//!
//! These tests build `/proc`-shaped directories with symlinked `exe`,
//! NUL-separated `cmdline` and `smaps_rollup` files, and run full sampling
//! passes through `ProcfsSource`.

#![cfg(unix)]

mod common;

use common::FakeProc;
use procmem_sampler::process::ArgvResolver;
use procmem_sampler::{ClassificationPredicate, ProcfsSource, Role, SampleError, Sampler};
use std::fs;

fn app_predicate() -> ClassificationPredicate {
    ClassificationPredicate::new(|exe| exe == "/opt/app/app", |cmd| cmd.contains("--parent"))
}

fn sampler_for(procfs: &FakeProc, predicate: ClassificationPredicate) -> Sampler {
    Sampler::new(
        Box::new(ProcfsSource::new(procfs.root())),
        Box::new(ArgvResolver),
        predicate,
    )
}

#[test]
fn test_parent_and_child_scenario() {
    let procfs = FakeProc::new();
    procfs.add(100, "/opt/app/app", &["app", "--parent"], 200_000, 150_000)
        .add(101, "/opt/app/app", &["app", "--child", "--type=worker"], 120_000, 40_000)
        .add(1, "/sbin/init", &["/sbin/init"], 9_000, 3_000);

    let report = sampler_for(&procfs, app_predicate()).sample(false).unwrap();

    assert_eq!(report.processes().len(), 2);
    assert_eq!(report.role_of(100), Some(Role::Parent));
    assert_eq!(report.role_of(101), Some(Role::Child));
    assert_eq!(report.parent_rss(), 200_000 * 1024);
    assert_eq!(report.children_uss(), 40_000 * 1024);
    assert_eq!(report.total(), report.parent_rss() + report.children_uss());
}

#[test]
fn test_no_process_match_scenario() {
    let procfs = FakeProc::new();
    procfs.add(1, "/sbin/init", &["/sbin/init"], 9_000, 3_000)
        .add(50, "/usr/bin/bash", &["bash"], 4_000, 1_000);
    // Kernel thread: no exe link, empty cmdline
    procfs.add_cmdline(2, &[]);

    let err = sampler_for(&procfs, app_predicate()).sample(false).unwrap_err();
    assert!(matches!(err, SampleError::NoProcessMatch));
}

#[test]
fn test_no_parent_match_scenario() {
    let procfs = FakeProc::new();
    procfs.add(7, "/opt/app/app", &["app", "--child"], 50_000, 20_000);

    let err = sampler_for(&procfs, app_predicate()).sample(false).unwrap_err();
    assert!(matches!(err, SampleError::NoParentMatch { children: 1 }));
}

#[test]
fn test_empty_cmdline_falls_back_to_exe() {
    let procfs = FakeProc::new();
    // Parent lost its cmdline (e.g. it rewrote argv); child is normal
    procfs.add(100, "/opt/app/app", &[], 200_000, 150_000)
        .add(101, "/opt/app/app", &["app", "--child"], 120_000, 40_000);

    let predicate = ClassificationPredicate::new(
        |exe| exe == "/opt/app/app",
        |cmd| !cmd.contains("--child"),
    );
    let report = sampler_for(&procfs, predicate).sample(true).unwrap();

    assert_eq!(report.processes().len(), 2);
    let parent = &report.processes()[0];
    assert_eq!(parent.pid, 100);
    assert_eq!(parent.role, Role::Parent);
    assert_eq!(parent.display, "/opt/app/app");
    assert_eq!(report.processes()[1].display, "app --child");
}

#[test]
fn test_missing_cmdline_file_falls_back_to_exe() {
    let procfs = FakeProc::new();
    procfs.add_exe(100, "/opt/app/app").add_rollup(100, 10_000, 5_000);

    let predicate = ClassificationPredicate::new(|exe| exe == "/opt/app/app", |_| true);
    let report = sampler_for(&procfs, predicate).sample(true).unwrap();
    assert_eq!(report.processes()[0].display, "/opt/app/app");
}

#[test]
fn test_unreadable_metrics_abort_the_pass() {
    let procfs = FakeProc::new();
    procfs.add(100, "/opt/app/app", &["app", "--parent"], 200_000, 150_000);
    // Matches the path filter but has no smaps at all
    procfs.add_exe(101, "/opt/app/app").add_cmdline(101, &["app", "--child"]);

    match sampler_for(&procfs, app_predicate()).sample(false) {
        Err(SampleError::MetricReadFailure { pid, .. }) => assert_eq!(pid, 101),
        other => panic!("expected MetricReadFailure, got {:?}", other),
    }
}

#[test]
fn test_unreadable_unrelated_process_is_ignored() {
    let procfs = FakeProc::new();
    procfs.add(100, "/opt/app/app", &["app", "--parent"], 200_000, 150_000);
    // Unrelated process without metrics: never read because its path does not match
    procfs.add_exe(300, "/usr/sbin/sshd");

    let report = sampler_for(&procfs, app_predicate()).sample(false).unwrap();
    assert_eq!(report.processes().len(), 1);
}

#[test]
fn test_full_smaps_used_without_rollup() {
    let procfs = FakeProc::new();
    procfs.add_exe(100, "/opt/app/app").add_cmdline(100, &["app", "--parent"]);
    let smaps = "\
00400000-00452000 r-xp 00000000 08:02 1    /opt/app/app
Rss:                 300 kB
Private_Clean:         0 kB
Private_Dirty:         0 kB
7f0000000000-7f0000021000 rw-p 00000000 00:00 0
Rss:                 100 kB
Private_Clean:        10 kB
Private_Dirty:        90 kB
";
    fs::write(procfs.root().join("100").join("smaps"), smaps).unwrap();

    let report = sampler_for(&procfs, app_predicate()).sample(false).unwrap();
    assert_eq!(report.parent_rss(), 400 * 1024);
}

#[test]
fn test_classification_is_idempotent() {
    let procfs = FakeProc::new();
    procfs.add(100, "/opt/app/app", &["app", "--parent"], 200_000, 150_000)
        .add(101, "/opt/app/app", &["app", "--child"], 120_000, 40_000)
        .add(102, "/opt/app/app", &["app", "--child"], 110_000, 30_000);

    let sampler = sampler_for(&procfs, app_predicate());
    let first = sampler.sample(false).unwrap();
    let second = sampler.sample(false).unwrap();

    for line in first.processes() {
        assert_eq!(second.role_of(line.pid), Some(line.role));
    }
    assert_eq!(first.total(), second.total());
}

#[test]
fn test_text_report_format() {
    let procfs = FakeProc::new();
    procfs.add(100, "/opt/app/app", &["app", "--parent"], 2, 1)
        .add(101, "/opt/app/app", &["app", "--child"], 2, 1);

    let text = sampler_for(&procfs, app_predicate())
        .sample(false)
        .unwrap()
        .to_string();

    let expected = "\
[100] - /opt/app/app
  * RSS - 2048
    USS - 1024
[101] - /opt/app/app
    RSS - 2048
  * USS - 1024

Total: 3,072 bytes";
    assert_eq!(text, expected);
}
