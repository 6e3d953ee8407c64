//! First deploy, redeploy, dry run and the history ledger

use crate::common::*;
use crate::{assert_active, assert_output_contains};

#[test]
fn first_deploy_activates_the_release() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");

    let result = env.run(&["deploy", "--branch", "HEAD"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_active!(env, &head);
    assert_output_contains!(result, "is active");
    assert_eq!(env.releases(), vec![head.clone()]);
    assert!(env.base_path(&format!("code/{head}/app.py")).exists());
}

#[test]
fn settings_are_rendered_into_the_release() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");

    let result = env.run(&["deploy", "--branch", "HEAD"]);
    assert!(result.is_success(), "{}", result.combined_output());

    let settings = env.read_base_file(&format!("code/{head}/project/settings/__init__.py"));
    assert!(settings.starts_with("DEBUG = False\n"));
    assert!(settings.contains("STATIC_URL = '/c-"));
}

#[test]
fn redeploy_of_same_revision_is_idempotent() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");

    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    let first = env.read_base_file(&format!("code/{head}/project/settings/__init__.py"));
    let result = env.run(&["deploy", "--branch", "HEAD"]);
    assert!(result.is_success(), "{}", result.combined_output());
    let second = env.read_base_file(&format!("code/{head}/project/settings/__init__.py"));

    assert_eq!(first, second);
    assert_eq!(env.releases(), vec![head.clone()]);
    assert_active!(env, &head);
}

#[test]
fn prep_then_deploy_uses_stamped_build() {
    let env = TestEnv::builder().without_build().build();
    let head = env.short_id("HEAD");

    let prep = env.run(&[
        "prep",
        "--branch",
        "HEAD",
        "--build-cmd",
        "mkdir -p build/project/settings build/collected-static && echo 'DEBUG = False' > build/project/settings/__init__.py && cp static/app.css build/collected-static/",
    ]);
    assert!(prep.is_success(), "{}", prep.combined_output());
    assert_eq!(env.read_project_stamp("CVERSION"), head);

    let deploy = env.run(&["deploy", "--branch", "HEAD"]);
    assert!(deploy.is_success(), "{}", deploy.combined_output());
    assert_active!(env, &head);
}

#[test]
fn stale_build_is_refused() {
    let env = TestEnv::builder().build();
    env.write_project_file("build/CVERSION", "0000000\n");

    let result = env.run(&["deploy", "--branch", "HEAD"]);

    assert!(!result.is_success());
    assert_output_contains!(result, "0000000");
    assert!(env.releases().is_empty());
}

#[test]
fn missing_build_fails_in_transfer() {
    let env = TestEnv::builder().without_build().build();

    let result = env.run(&["deploy", "--branch", "HEAD"]);

    assert!(!result.is_success());
    assert_output_contains!(result, "transferring");
    assert!(std::fs::read_link(env.base_path("active")).is_err());
}

#[test]
fn dry_run_reports_plan_without_touching_host() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");

    let result = env.run(&["deploy", "--branch", "HEAD", "--dry-run", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let plan = result
        .json_lines()
        .into_iter()
        .find(|v| v["event"] == "plan")
        .expect("plan event");
    assert_eq!(plan["host"], "dev");
    assert_eq!(plan["revision"], head.as_str());
    assert!(env.releases().is_empty());
    assert!(std::fs::read_link(env.base_path("active")).is_err());
}

#[test]
fn retention_keeps_newest_releases() {
    let env = TestEnv::builder().build();
    let mut deployed = Vec::new();
    for i in 0..4 {
        env.write_project_file("app.py", &format!("print({i})\n"));
        deployed.push(env.commit(&format!("change {i}")));
        let result = env.run(&["deploy", "--branch", "HEAD"]);
        assert!(result.is_success(), "{}", result.combined_output());
    }

    // max_keep = 3: only the first change is gone
    let releases = env.releases();
    assert_eq!(releases.len(), 3, "{releases:?}");
    assert!(!releases.contains(&deployed[0]));
    assert_active!(env, &deployed[3]);
}

#[test]
fn releases_lists_the_active_release_as_json() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    let result = env.run(&["releases", "dev", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let value = &result.json_lines()[0];
    let releases = value["releases"].as_array().expect("releases array");
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0]["name"], head.as_str());
    assert_eq!(releases[0]["active"], true);
}

#[test]
fn history_records_success_and_failure() {
    let env = TestEnv::builder().build();
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    assert!(!env.run(&["deploy", "--branch", "no-such-branch"]).is_success());

    let result = env.run(&["history", "--json"]);

    assert!(result.is_success(), "{}", result.combined_output());
    let deploys = result.json_lines()[0]["deploys"]
        .as_array()
        .expect("deploys array")
        .clone();
    assert_eq!(deploys.len(), 2);
    assert_eq!(deploys[0]["activated"], true);
    assert!(deploys[1]["error"].is_string());

    let limited = env.run(&["history", "-n", "1"]);
    assert_output_contains!(limited, "no-such-branch");
    assert!(!limited.stdout.contains("activated"));
}

#[test]
fn env_override_changes_retention() {
    let env = TestEnv::builder().build();
    for i in 0..3 {
        env.write_project_file("app.py", &format!("print({i})\n"));
        env.commit(&format!("change {i}"));
        let result = env.run_with_env(
            &["deploy", "--branch", "HEAD"],
            &[("SHIPYARD_MAX_KEEP", "1")],
        );
        assert!(result.is_success(), "{}", result.combined_output());
    }

    // The active release and the incoming one are both protected
    assert_eq!(env.releases().len(), 2);
}
