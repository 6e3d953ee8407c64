//! Content-addressed static links

use crate::common::*;

fn static_links(env: &TestEnv) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(env.base_path("static"))
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.starts_with("c-"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[test]
fn code_only_commits_share_the_static_link() {
    let env = TestEnv::builder().build();
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    let before = static_links(&env);
    assert_eq!(before.len(), 1);

    env.write_project_file("app.py", "print('code only')\n");
    env.commit("code only");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    assert_eq!(static_links(&env), before);
}

#[test]
fn static_change_adds_a_new_link() {
    let env = TestEnv::builder().build();
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());
    let before = static_links(&env);

    env.write_project_file("static/app.css", "body { color: red; }\n");
    env.write_project_file("build/collected-static/app.css", "body { color: red; }\n");
    let head = env.commit("restyle");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    let after = static_links(&env);
    assert_eq!(after.len(), 2, "{after:?}");
    assert!(after.contains(&format!("c-{head}")));
    for link in &before {
        assert!(after.contains(link));
    }
}

#[test]
fn static_link_points_into_the_release() {
    let env = TestEnv::builder().build();
    let head = env.short_id("HEAD");
    assert!(env.run(&["deploy", "--branch", "HEAD"]).is_success());

    let link = env.base_path("static").join(&static_links(&env)[0]);
    let target = std::fs::read_link(&link).expect("static link");

    assert!(target.is_absolute());
    assert!(target.starts_with(env.base_path(&format!("code/{head}"))));
    assert!(link.join("app.css").exists());
}
