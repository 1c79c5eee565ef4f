//! Tests for the branch materializer (`togit`)

use std::path::PathBuf;

use stepsync::core::models::Resolution;
use stepsync::core::ports::VersionControl;
use stepsync::core::services::{MaterializeOptions, Materializer};
use stepsync::{Settings, StepsError};
use tempfile::TempDir;

use crate::common::fake_vcs::Tree;
use crate::common::fixtures::read;
use crate::common::{FakeVcs, StepsDir};

fn options(source: &StepsDir) -> MaterializeOptions {
    MaterializeOptions {
        source: Some(source.path().to_path_buf()),
        ..MaterializeOptions::from_settings(&Settings::default())
    }
}

fn tree(files: &[(&str, &str)]) -> Tree {
    files.iter().map(|(p, c)| (PathBuf::from(p), (*c).to_string())).collect()
}

/// Files that differ between two trees
fn changed(before: &Tree, after: &Tree) -> Vec<String> {
    let mut paths: Vec<String> = after
        .iter()
        .filter(|(path, content)| before.get(*path) != Some(*content))
        .map(|(path, _)| path.display().to_string())
        .collect();
    paths.extend(
        before
            .keys()
            .filter(|path| !after.contains_key(*path))
            .map(|path| path.display().to_string()),
    );
    paths.sort();
    paths
}

// =============================================================================
// Fresh repository
// =============================================================================

#[test]
fn two_steps_yield_two_commits() {
    let steps = StepsDir::new()
        .step("01", "hello", &[("a.txt", "hello")])
        .step("02", "world", &[("a.txt", "hello"), ("b.txt", "world")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    assert!(report.created_repository);
    assert!(!report.tracked_only);
    assert_eq!(report.branch, "steps");
    assert_eq!(vcs.current_branch(repo.path()), "steps");
    assert_eq!(vcs.subjects(repo.path(), "steps"), vec!["step 01 - hello", "step 02 - world"]);
    assert_eq!(report.steps.len(), 2);
    assert!(report.steps.iter().all(|s| s.resolution.is_lossless() && !s.drift));
}

#[test]
fn trees_are_cumulative_and_diffs_minimal() {
    let steps = StepsDir::new()
        .step("01", "first", &[("a.txt", "a")])
        .step("02", "second", &[("b.txt", "b")])
        .step("03", "third", &[("src/c.txt", "c")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    let trees = vcs.trees(repo.path(), "steps");
    assert_eq!(trees.len(), 3);
    assert_eq!(
        trees[2],
        tree(&[("a.txt", "a"), ("b.txt", "b"), ("src/c.txt", "c"), ("step.md", "# third\n")])
    );
    assert_eq!(changed(&Tree::new(), &trees[0]), vec!["a.txt", "step.md"]);
    assert_eq!(changed(&trees[0], &trees[1]), vec!["b.txt", "step.md"]);
    assert_eq!(changed(&trees[1], &trees[2]), vec!["src/c.txt", "step.md"]);
}

#[test]
fn working_tree_is_reset_to_branch_tip() {
    let steps = StepsDir::new()
        .step("01", "first", &[("a.txt", "a")])
        .step("02", "second", &[("b.txt", "b")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    assert_eq!(read(&repo.path().join("a.txt")), "a");
    assert_eq!(read(&repo.path().join("b.txt")), "b");
    assert_eq!(read(&repo.path().join("step.md")), "# second\n");
}

#[test]
fn metadata_file_is_not_copied_as_a_step_file() {
    let steps = StepsDir::new().step("01", "first", &[("a.txt", "a")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();
    assert_eq!(report.steps[0].files, vec![PathBuf::from("a.txt")]);
}

#[test]
fn git_metadata_inside_steps_is_skipped() {
    let steps = StepsDir::new().step("01", "first", &[("a.txt", "a"), (".git/HEAD", "ref")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();
    assert_eq!(report.steps[0].files, vec![PathBuf::from("a.txt")]);
}

#[test]
fn default_source_is_inside_the_repository() {
    let repo = TempDir::new().unwrap();
    let steps_root = repo.path().join(".steps/01");
    std::fs::create_dir_all(&steps_root).unwrap();
    std::fs::write(steps_root.join("step.md"), "# inside\n").unwrap();
    std::fs::write(steps_root.join("a.txt"), "a").unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings)
        .run(repo.path(), &MaterializeOptions::from_settings(&settings))
        .unwrap();

    assert_eq!(report.source, repo.path().join(".steps"));
    assert_eq!(vcs.subjects(repo.path(), "steps"), vec!["step 01 - inside"]);
}

// =============================================================================
// Existing repository
// =============================================================================

#[test]
fn existing_repository_gets_a_fresh_orphan_branch() {
    let steps = StepsDir::new().step("01", "first", &[("a.txt", "a")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    vcs.init_repo(repo.path(), "main");
    vcs.seed_commit(repo.path(), "main", "initial", &[("README", "readme")]);
    vcs.seed_commit(repo.path(), "steps", "old steps", &[]);
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    assert!(!report.created_repository);
    assert_eq!(report.branch, "steps-1");
    assert_eq!(vcs.subjects(repo.path(), "steps-1"), vec!["step 01 - first"]);
    assert_eq!(vcs.trees(repo.path(), "steps-1")[0], tree(&[("a.txt", "a"), ("step.md", "# first\n")]));
    assert_eq!(vcs.subjects(repo.path(), "steps"), vec!["old steps"]);
}

#[test]
fn rerun_never_overwrites_a_previous_branch() {
    let steps = StepsDir::new().step("01", "first", &[("a.txt", "a")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();
    let materializer = Materializer::new(&vcs, &settings);

    let first = materializer.run(repo.path(), &options(&steps)).unwrap();
    let second = materializer.run(repo.path(), &options(&steps)).unwrap();

    assert_eq!(first.branch, "steps");
    assert_eq!(second.branch, "steps-1");
    assert_eq!(vcs.subjects(repo.path(), "steps").len(), 1);
}

#[test]
fn messages_fall_back_to_reference_branch() {
    let steps = StepsDir::new().bare_step("01", &[("a.txt", "a")]).bare_step("02", &[("b.txt", "b")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    vcs.init_repo(repo.path(), "main");
    vcs.seed_commit(repo.path(), "main", "step 01 - recovered", &[]);
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    assert!(matches!(report.steps[0].resolution, Resolution::CommitLog { .. }));
    assert_eq!(report.steps[1].resolution, Resolution::Unknown);
    assert_eq!(
        vcs.subjects(repo.path(), "steps"),
        vec!["step 01 - recovered", "step 02 - cannot find message"]
    );
}

// =============================================================================
// Membership and failures
// =============================================================================

#[test]
fn tracked_sources_restrict_membership() {
    let steps = StepsDir::new().step("01", "first", &[("a.txt", "a"), ("scratch.log", "noise")]);
    let vcs = FakeVcs::new();
    vcs.track(steps.path(), &["01/a.txt", "01/step.md"]);
    let repo = TempDir::new().unwrap();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    assert!(report.tracked_only);
    assert_eq!(report.steps[0].files, vec![PathBuf::from("a.txt")]);
}

#[test]
fn tracked_but_deleted_files_are_skipped() {
    let steps = StepsDir::new().step("01", "first", &[("a.txt", "a")]);
    let vcs = FakeVcs::new();
    vcs.track(steps.path(), &["01/a.txt", "01/gone.txt"]);
    let repo = TempDir::new().unwrap();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();
    assert_eq!(report.steps[0].files, vec![PathBuf::from("a.txt")]);
    assert_eq!(vcs.subjects(repo.path(), "steps").len(), 1);
}

#[test]
fn files_gone_at_copy_time_are_reported_missing() {
    let repo = TempDir::new().unwrap();
    let source = repo.path().join(".steps");
    let step_dir = source.join("01");
    std::fs::create_dir_all(&step_dir).unwrap();
    std::fs::write(step_dir.join("step.md"), "# first\n").unwrap();
    std::fs::write(step_dir.join("a.txt"), "a").unwrap();

    // Sources tracked by the destination itself vanish with the branch switch
    let vcs = FakeVcs::new();
    vcs.init_repo(repo.path(), "main");
    vcs.add(repo.path(), &[PathBuf::from(".steps/01/a.txt")]).unwrap();
    vcs.track(&source, &["01/a.txt", "01/step.md"]);
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings)
        .run(repo.path(), &MaterializeOptions::from_settings(&settings))
        .unwrap();

    let step = &report.steps[0];
    assert!(step.files.is_empty());
    assert_eq!(step.missing, vec![PathBuf::from("a.txt")]);
    assert_eq!(vcs.subjects(repo.path(), "steps"), vec!["step 01 - first"]);
    assert_eq!(vcs.trees(repo.path(), "steps")[0], tree(&[("step.md", "# first\n")]));
}

#[test]
fn mismatched_reference_id_is_reported_as_drift() {
    let steps = StepsDir::new().bare_step("01", &[("a.txt", "a")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    vcs.init_repo(repo.path(), "main");
    vcs.seed_commit(repo.path(), "main", "step 05 - revisit step 01 - fix", &[]);
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    let step = &report.steps[0];
    assert!(step.drift);
    assert_eq!(step.resolution.id(), Some("05"));
    assert_eq!(vcs.subjects(repo.path(), "steps"), vec!["step 01 - revisit step 01 - fix"]);
}

#[test]
fn exact_reference_id_is_not_drift() {
    let steps = StepsDir::new().bare_step("01", &[("a.txt", "a")]);
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    vcs.init_repo(repo.path(), "main");
    vcs.seed_commit(repo.path(), "main", "step 01 - intro", &[]);
    vcs.seed_commit(repo.path(), "main", "step 05 - revisit step 01 - fix", &[]);
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();

    assert!(!report.steps[0].drift);
    assert_eq!(vcs.subjects(repo.path(), "steps"), vec!["step 01 - intro"]);
}

#[test]
fn missing_source_is_a_precondition_failure() {
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();
    let options = MaterializeOptions {
        source: Some(repo.path().join("nowhere")),
        ..MaterializeOptions::from_settings(&settings)
    };

    let err = Materializer::new(&vcs, &settings).run(repo.path(), &options).unwrap_err();

    assert!(matches!(err, StepsError::SourceMissing(_)));
    assert!(err.is_precondition());
    assert!(!vcs.is_repository(repo.path()));
}

#[test]
fn empty_source_creates_an_empty_branch() {
    let steps = StepsDir::new();
    let repo = TempDir::new().unwrap();
    let vcs = FakeVcs::new();
    let settings = Settings::default();

    let report = Materializer::new(&vcs, &settings).run(repo.path(), &options(&steps)).unwrap();
    assert!(report.steps.is_empty());
    assert!(vcs.subjects(repo.path(), "steps").is_empty());
}
