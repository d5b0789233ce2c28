// tests/cli_orchestration_test.rs
use git2::{Repository, Signature};
use git_semver::cli::{run, RunArgs};
use git_semver::strategy::StrategyKind;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Repository with two empty commits, the first tagged `1.0.0`
fn tagged_repository() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let first = repo
        .commit(Some("HEAD"), &sig, &sig, "first", &tree, &[])
        .unwrap();
    let first_commit = repo.find_commit(first).unwrap();
    repo.tag("1.0.0", first_commit.as_object(), &sig, "release", false)
        .unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "second", &tree, &[&first_commit])
        .unwrap();

    dir
}

/// Empty configuration file so the run does not depend on the user's files
fn empty_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"").unwrap();
    file.flush().unwrap();
    file
}

fn args(dir: &TempDir, config: &NamedTempFile) -> RunArgs {
    RunArgs {
        dir: dir.path().to_path_buf(),
        config_path: Some(config.path().to_str().unwrap().to_string()),
        ..RunArgs::default()
    }
}

#[test]
fn test_prints_version() {
    let dir = tagged_repository();
    let config = empty_config();
    assert_eq!(run(&args(&dir, &config)).unwrap(), vec!["1.0.1-1"]);
}

#[test]
fn test_prints_metadata() {
    let dir = tagged_repository();
    let config = empty_config();
    let args = RunArgs {
        metas: Some("BASE_TAG,COMMIT_DISTANCE,BRANCH_NAME,DIRTY,HEAD_TAGS".to_string()),
        ..args(&dir, &config)
    };

    let lines = run(&args).unwrap();
    assert_eq!(lines[0], "BASE_TAG=1.0.0");
    assert_eq!(lines[1], "COMMIT_DISTANCE=1");
    assert!(lines[2].starts_with("BRANCH_NAME="));
    assert_eq!(lines[3], "DIRTY=false");
    assert_eq!(lines[4], "HEAD_TAGS=No value found");
}

#[test]
fn test_all_metadata() {
    let dir = tagged_repository();
    let config = empty_config();
    let args = RunArgs {
        metas: Some("ALL".to_string()),
        ..args(&dir, &config)
    };

    let lines = run(&args).unwrap();
    assert_eq!(lines.len(), git_semver::Metadata::ALL.len());
    assert!(lines.contains(&"CALCULATED_VERSION=1.0.1-1".to_string()));
    assert!(lines.contains(&"NEXT_MAJOR_VERSION=2.0.0".to_string()));
}

#[test]
fn test_not_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config();
    assert_eq!(
        run(&args(&dir, &config)).unwrap(),
        vec!["0.0.0-NOT_GIT_VERSION"]
    );

    let args = RunArgs {
        metas: Some("CALCULATED_VERSION,BASE_TAG".to_string()),
        ..args(&dir, &config)
    };
    assert_eq!(
        run(&args).unwrap(),
        vec![
            "CALCULATED_VERSION=0.0.0-NOT_GIT_VERSION",
            "BASE_TAG=No value found"
        ]
    );
}

#[test]
fn test_strategy_override() {
    let dir = tagged_repository();
    let config = empty_config();
    let args = RunArgs {
        strategy: Some(StrategyKind::Maven),
        ..args(&dir, &config)
    };
    assert_eq!(run(&args).unwrap(), vec!["1.0.1-SNAPSHOT"]);
}

#[test]
fn test_strict_semver() {
    let dir = tagged_repository();
    let config = empty_config();
    let args = RunArgs {
        strict_semver: true,
        ..args(&dir, &config)
    };
    assert_eq!(run(&args).unwrap(), vec!["1.0.1-1"]);

    let repo = Repository::open(dir.path()).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch("feature_x", &head, false).unwrap();
    repo.set_head("refs/heads/feature_x").unwrap();

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[branching]\nuse_default_branching_policy = false\n\n[[branching.policies]]\npattern = \"(.*)\"\ntransforms = [\"IDENTITY\"]\n")
        .unwrap();
    file.flush().unwrap();
    let args = RunArgs {
        config_path: Some(file.path().to_str().unwrap().to_string()),
        ..args
    };
    assert!(run(&args).is_err());
}

#[test]
fn test_unknown_metadata_name() {
    let dir = tagged_repository();
    let config = empty_config();
    let args = RunArgs {
        metas: Some("NOT_A_KEY".to_string()),
        ..args(&dir, &config)
    };
    assert!(run(&args).is_err());
}
