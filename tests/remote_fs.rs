//! Release lifecycle through the shell-backed host filesystem
//!
//! Drives `RemoteHostFs` over a `LocalExecutor`, so the exact shell commands
//! sent to SSH hosts run against a temporary deployment root.

#![cfg(target_os = "linux")]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

use shipyard::application::{ActivationSwitch, ReleaseMerger, RetentionPruner};
use shipyard::domain::ports::HostFs;
use shipyard::domain::value_objects::{ReleaseLayout, RetentionPolicy, RevisionHash, StaticHash};
use shipyard::infrastructure::{LocalExecutor, RemoteHostFs};

const DAY: u64 = 86_400;

struct Host {
    dir: TempDir,
    layout: ReleaseLayout,
    fs: RemoteHostFs,
}

impl Host {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let base = dir.path().to_path_buf();
        let layout = ReleaseLayout::new(&base, "updating", "collected-static", base.join("static"), "c-");
        let fs = RemoteHostFs::new(Arc::new(LocalExecutor::default()));
        Self { dir, layout, fs }
    }

    /// Staging as rsync leaves it: contents and directory carrying the build's old mtime
    fn stage(&self, age_days: u64) -> PathBuf {
        let staging = self.layout.staging_path();
        fs::create_dir_all(staging.join("collected-static")).unwrap();
        fs::write(staging.join("app.py"), "print('hi')\n").unwrap();
        fs::write(staging.join("collected-static/app.css"), "body {}\n").unwrap();
        set_age(&staging, age_days);
        staging
    }

    fn merge(&self, name: &str) -> PathBuf {
        let staging = self.layout.staging_path();
        ReleaseMerger::new(&self.fs, &self.layout)
            .merge(&staging, &RevisionHash::parse(name).unwrap())
            .unwrap()
    }

    fn age_of(&self, name: &str) -> Duration {
        let info = self
            .fs
            .list_dirs(&self.layout.release_root())
            .unwrap()
            .into_iter()
            .find(|d| d.name == name)
            .unwrap();
        SystemTime::now()
            .duration_since(info.modified)
            .unwrap_or_default()
    }

    fn releases(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path().join("code"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn set_age(path: &Path, days: u64) {
    let at = SystemTime::now() - Duration::from_secs(days * DAY);
    filetime::set_file_mtime(path, FileTime::from_system_time(at)).unwrap();
}

#[test]
fn merged_release_takes_the_merge_time_not_the_staging_time() {
    let host = Host::new();
    host.stage(30);

    let release = host.merge("a1b2c3d");

    assert!(host.age_of("a1b2c3d") < Duration::from_secs(3_600));
    assert_eq!(
        fs::read_to_string(release.join("app.py")).unwrap(),
        "print('hi')\n"
    );
    assert!(host.layout.staging_path().join("app.py").exists());
}

#[test]
fn old_release_is_pruned_before_todays_releases() {
    let host = Host::new();
    host.stage(30);
    let old = host.merge("old1");
    set_age(&old, 10);
    host.merge("new2");
    let newest = host.merge("new3");
    ActivationSwitch::new(&host.fs, &host.layout)
        .activate(&newest)
        .unwrap();

    let outcome = RetentionPruner::new(&host.fs, &host.layout, RetentionPolicy::new(2).unwrap())
        .prune(&[])
        .unwrap();

    assert_eq!(outcome.removed, vec!["old1"]);
    assert_eq!(host.releases(), vec!["new2", "new3"]);
    assert_eq!(
        fs::read_link(host.dir.path().join("active")).unwrap(),
        PathBuf::from("code/new3")
    );
}

#[test]
fn static_links_survive_prune_and_orphans_are_swept() {
    let host = Host::new();
    host.stage(0);
    let old = host.merge("old1");
    set_age(&old, 10);
    let current = host.merge("new2");

    let stale = host.layout.static_link(&StaticHash::parse("deadbee").unwrap());
    let live = host.layout.static_link(&StaticHash::parse("f00dcaf").unwrap());
    host.fs
        .replace_symlink(&host.layout.release_static_dir(&old), &stale)
        .unwrap();
    host.fs
        .replace_symlink(&host.layout.release_static_dir(&current), &live)
        .unwrap();
    ActivationSwitch::new(&host.fs, &host.layout)
        .activate(&current)
        .unwrap();

    let pruner = RetentionPruner::new(&host.fs, &host.layout, RetentionPolicy::new(1).unwrap());
    let outcome = pruner.prune(&[]).unwrap();
    let swept = pruner.sweep_orphan_links().unwrap();

    assert_eq!(outcome.removed, vec!["old1"]);
    assert_eq!(swept, vec![stale.clone()]);
    assert!(fs::symlink_metadata(&stale).is_err());
    assert_eq!(
        fs::read_to_string(live.join("app.css")).unwrap(),
        "body {}\n"
    );
}

#[test]
fn removing_a_missing_file_is_not_an_error() {
    let host = Host::new();
    let path = host.dir.path().join("nothing/here.py");

    host.fs.remove_file(&path).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "x").unwrap();
    host.fs.remove_file(&path).unwrap();

    assert!(!path.exists());
}
