#![allow(dead_code)]

use envik::{parse, EnvMap};

pub fn parse_map(input: &str) -> EnvMap {
    parse(input).expect("lenient parse must not fail on content")
}

pub fn assert_pair(input: &str, expected_key: &str, expected_value: &str) {
    let env = parse_map(input);
    assert_eq!(env.len(), 1, "expected a single entry for input: {:?}", input);
    assert_eq!(
        env.get(expected_key),
        Some(expected_value),
        "value mismatch for input: {:?}",
        input
    );
}

pub fn assert_value(input: &str, key: &str, expected_value: &str) {
    let env = parse_map(input);
    assert_eq!(
        env.get(key),
        Some(expected_value),
        "value mismatch for key {:?} in input: {:?}",
        key,
        input
    );
}

pub fn assert_absent(input: &str, key: &str) {
    let env = parse_map(input);
    assert!(
        !env.contains_key(key),
        "expected {:?} to be skipped for input: {:?}",
        key,
        input
    );
}

/// Sets a process environment variable for the duration of a test and
/// restores the previous state on drop. Use unique names per test: the
/// process environment is shared across the parallel test runner.
pub struct EnvVarGuard {
    key: String,
    prior: Option<String>,
}

impl EnvVarGuard {
    pub fn set(key: &str, value: &str) -> Self {
        let prior = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self {
            key: key.to_string(),
            prior,
        }
    }

    pub fn unset(key: &str) -> Self {
        let prior = std::env::var(key).ok();
        std::env::remove_var(key);
        Self {
            key: key.to_string(),
            prior,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.prior {
            Some(value) => std::env::set_var(&self.key, value),
            None => std::env::remove_var(&self.key),
        }
    }
}
