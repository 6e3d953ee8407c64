//! Manual activation and pruning

use crate::common::*;
use crate::{assert_active, assert_output_contains};

#[test]
fn activate_rolls_back_to_previous_release() {
    let env = TestEnv::builder().build();
    let first = env.short_id("HEAD");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    env.write_project_file("app.py", "print('v2')\n");
    let second = env.commit("v2");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    assert_active!(env, &second);

    let result = env.run(&["activate", "dev", &first]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_active!(env, &first);
    assert_output_contains!(result, &second);
}

#[test]
fn activate_unknown_release_fails_and_keeps_active() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    let result = env.run(&["activate", "dev", "deadbee"]);

    assert!(!result.is_success());
    assert_active!(env, &head);
}

#[test]
fn activate_same_release_is_noop() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    let result = env.run(&["activate", "dev", &head]);

    assert!(result.is_success());
    assert_output_contains!(result, "already active");
}

#[test]
fn prune_never_removes_the_active_release() {
    let env = TestEnv::builder().build();
    let first = env.short_id("HEAD");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    for i in 0..2 {
        env.write_project_file("app.py", &format!("print({i})\n"));
        env.commit(&format!("change {i}"));
        assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    }
    assert!(env.run(&["activate", "dev", &first]).is_success());

    let result = env.run_with_env(&["prune", "dev"], &[("SHIPYARD_MAX_KEEP", "1")]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(env.releases(), vec![first.clone()]);
    assert_active!(env, &first);
}
