use std::collections::HashMap;

use crate::until::{
    config::RunUntilConfig,
    env::{LEAVE_ALIVE_VAR, RunnerEnv, SILENT_VAR, TARGET_STRING_VAR},
    error::RunUntilError,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn missing_target_fails() {
    let result = RunnerEnv::from_lookup(lookup(&[(SILENT_VAR, "true")]));
    assert_eq!(result, Err(RunUntilError::MissingTarget));

    let result = RunnerEnv::from_lookup(lookup(&[(TARGET_STRING_VAR, "")]));
    assert_eq!(result, Err(RunUntilError::MissingTarget));
}

#[test]
fn flags_are_true_only_when_set_to_true() {
    let env = RunnerEnv::from_lookup(lookup(&[(TARGET_STRING_VAR, "ready")])).unwrap();
    assert_eq!(env.target_string, "ready");
    assert!(!env.silent);
    assert!(!env.leave_alive);

    let env = RunnerEnv::from_lookup(lookup(&[
        (TARGET_STRING_VAR, "ready"),
        (SILENT_VAR, "true"),
        (LEAVE_ALIVE_VAR, "1"),
    ]))
    .unwrap();
    assert!(env.silent);
    assert!(!env.leave_alive);
}

#[test]
fn from_config() {
    let config = RunUntilConfig::new("listening").leave_alive(true);
    let env = RunnerEnv::from(&config);
    assert_eq!(
        env,
        RunnerEnv {
            target_string: "listening".to_string(),
            silent: false,
            leave_alive: true,
        }
    );
}
