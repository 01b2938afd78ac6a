//! Removal of internal, sensitive and noisy fields from task results.
//!
//! Filtering never mutates the caller's value: the body is deep-copied before
//! any rule runs. Every rule is idempotent, so filtering an already filtered
//! result with the same policy yields the same result.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::core::types::{FilterOptions, FilteredResult, Flags, is_truthy, kind_name};

/// Kept only at or above the verbose threshold, or on explicit request.
pub const INVOCATION_KEY: &str = "invocation";
/// Kept only at or above the verbose threshold.
pub const DIFF_KEY: &str = "diff";

/// Field rules applied to every result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterPolicy {
    /// Truthy value under this key censors the whole result.
    pub no_log_key: String,

    /// Reason shown in the censored marker.
    pub censored_message: String,

    /// Keys starting with any of these are dropped at every nesting level.
    pub internal_key_prefixes: Vec<String>,

    /// Exact key names dropped at every nesting level.
    pub internal_keys: Vec<String>,

    /// Top-level keys always removed.
    pub removed_keys: Vec<String>,

    /// Minimum verbosity that keeps `invocation` and `diff`.
    pub verbose_threshold: u8,

    /// Replacement value for truncated keys.
    pub placeholder: String,

    /// Keys extracted as leading flags, in render order.
    pub flag_keys: Vec<String>,

    /// Pairs where the target is replaced when the source is present too.
    pub truncations: Vec<Truncation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Truncation {
    pub source: String,
    pub target: String,
}

impl Truncation {
    fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            no_log_key: "_ansible_no_log".to_string(),
            censored_message: "The output has been hidden due to the fact that 'no_log: true' \
                               was specified for this result"
                .to_string(),
            internal_key_prefixes: vec!["_ansible_".to_string()],
            internal_keys: Vec::new(),
            removed_keys: vec!["exception".to_string()],
            verbose_threshold: 3,
            placeholder: "<omitted>".to_string(),
            flag_keys: vec!["changed".to_string(), "skipped".to_string()],
            truncations: vec![
                Truncation::new("stdout", "stdout_lines"),
                Truncation::new("stderr", "stderr_lines"),
            ],
        }
    }
}

impl FilterPolicy {
    /// The object shown in place of a censored result.
    pub fn censored_marker(&self) -> Value {
        json!({ "censored": self.censored_message })
    }

    fn is_internal(&self, key: &str) -> bool {
        self.internal_keys.iter().any(|name| name == key)
            || self
                .internal_key_prefixes
                .iter()
                .any(|prefix| key.starts_with(prefix.as_str()))
    }
}

/// Filter a raw result into flags and a displayable body.
///
/// The no-log check runs before anything else touches the result. A result
/// that is not a mapping is an error; missing optional keys never are.
pub fn filter_result(
    result: &Value,
    options: &FilterOptions,
    policy: &FilterPolicy,
) -> Result<FilteredResult> {
    let Value::Object(raw) = result else {
        bail!("result must be a mapping, got {}", kind_name(result));
    };

    if raw.get(&policy.no_log_key).is_some_and(is_truthy) {
        debug!("result censored by {}", policy.no_log_key);
        return Ok(FilteredResult::Censored(policy.censored_marker()));
    }

    let mut body = raw.clone();
    strip_internal_keys(&mut body, policy);

    let verbose = options.verbosity >= policy.verbose_threshold;
    if !verbose && !options.keep_invocation {
        body.remove(INVOCATION_KEY);
    }
    if !verbose {
        body.remove(DIFF_KEY);
    }
    for key in &policy.removed_keys {
        body.remove(key);
    }

    for truncation in &policy.truncations {
        if !body.contains_key(&truncation.source) {
            continue;
        }
        if let Some(target) = body.get_mut(&truncation.target) {
            debug!("replacing {} with placeholder", truncation.target);
            *target = Value::String(policy.placeholder.clone());
        }
    }

    let mut flags = Flags::default();
    for key in &policy.flag_keys {
        if let Some(value) = body.remove(key) {
            flags.push(key.clone(), value);
        }
    }

    Ok(FilteredResult::Visible { flags, body })
}

/// Drop internal keys from `map` and everything nested below it.
fn strip_internal_keys(map: &mut Map<String, Value>, policy: &FilterPolicy) {
    map.retain(|key, _| !policy.is_internal(key));
    for value in map.values_mut() {
        strip_nested(value, policy);
    }
}

fn strip_nested(value: &mut Value, policy: &FilterPolicy) {
    match value {
        Value::Object(map) => strip_internal_keys(map, policy),
        Value::Array(items) => {
            for item in items {
                strip_nested(item, policy);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(result: &Value, verbosity: u8, keep_invocation: bool) -> (Flags, Map<String, Value>) {
        let options = FilterOptions {
            verbosity,
            keep_invocation,
        };
        match filter_result(result, &options, &FilterPolicy::default()).expect("filter") {
            FilteredResult::Visible { flags, body } => (flags, body),
            FilteredResult::Censored(marker) => panic!("unexpected censor: {marker}"),
        }
    }

    #[test]
    fn non_mapping_results_are_errors() {
        let options = FilterOptions::default();
        let err = filter_result(&json!(["a"]), &options, &FilterPolicy::default())
            .expect_err("sequence is not a result");
        assert!(err.to_string().contains("result must be a mapping, got sequence"));
    }

    #[test]
    fn no_log_wins_over_every_other_rule() {
        let result = json!({
            "_ansible_no_log": true,
            "changed": true,
            "stdout": "secret\nvalue",
            "stdout_lines": ["secret", "value"],
            "invocation": {"module_args": {"password": "hunter2"}},
        });
        let options = FilterOptions {
            verbosity: 5,
            keep_invocation: true,
        };
        let filtered = filter_result(&result, &options, &FilterPolicy::default()).expect("filter");
        assert_eq!(
            filtered,
            FilteredResult::Censored(FilterPolicy::default().censored_marker())
        );
    }

    #[test]
    fn falsy_no_log_is_ignored() {
        let (_, body) = visible(&json!({"_ansible_no_log": false, "msg": "hi"}), 0, false);
        assert_eq!(Value::Object(body), json!({"msg": "hi"}));
    }

    #[test]
    fn internal_keys_are_stripped_recursively() {
        let result = json!({
            "_ansible_parsed": true,
            "results": [{"_ansible_item_label": "a", "item": "a"}],
            "nested": {"_ansible_verbose_always": true, "keep": 1},
        });
        let (_, body) = visible(&result, 0, false);
        assert_eq!(
            Value::Object(body),
            json!({"results": [{"item": "a"}], "nested": {"keep": 1}})
        );
    }

    #[test]
    fn configured_internal_names_are_stripped() {
        let policy = FilterPolicy {
            internal_keys: vec!["token".to_string()],
            ..FilterPolicy::default()
        };
        let result = json!({"token": "x", "inner": [{"token": "y", "ok": true}]});
        let filtered =
            filter_result(&result, &FilterOptions::default(), &policy).expect("filter");
        assert_eq!(filtered.into_value(), json!({"inner": [{"ok": true}]}));
    }

    #[test]
    fn invocation_depends_on_verbosity_or_request() {
        let result = json!({"invocation": {"module_args": {}}, "msg": "x"});
        assert!(!visible(&result, 1, false).1.contains_key(INVOCATION_KEY));
        assert!(visible(&result, 3, false).1.contains_key(INVOCATION_KEY));
        assert!(visible(&result, 0, true).1.contains_key(INVOCATION_KEY));
    }

    #[test]
    fn diff_depends_on_verbosity_only() {
        let result = json!({"diff": {"before": "a", "after": "b"}});
        assert!(!visible(&result, 2, true).1.contains_key(DIFF_KEY));
        assert!(visible(&result, 3, false).1.contains_key(DIFF_KEY));
    }

    #[test]
    fn exception_is_always_removed() {
        let result = json!({"exception": "Traceback", "msg": "boom"});
        let (_, body) = visible(&result, 5, true);
        assert_eq!(Value::Object(body), json!({"msg": "boom"}));
    }

    #[test]
    fn output_lines_are_replaced_only_when_source_present() {
        let result = json!({
            "stdout": "a\nb",
            "stdout_lines": ["a", "b"],
            "stderr_lines": ["warn"],
        });
        let (_, body) = visible(&result, 0, false);
        assert_eq!(body["stdout_lines"], json!("<omitted>"));
        assert_eq!(body["stderr_lines"], json!(["warn"]));
    }

    #[test]
    fn flags_are_extracted_in_fixed_order() {
        let result = json!({"skipped": false, "msg": "m", "changed": true});
        let (flags, body) = visible(&result, 0, false);
        let keys: Vec<&str> = flags.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["changed", "skipped"]);
        assert_eq!(Value::Object(body), json!({"msg": "m"}));
    }

    #[test]
    fn missing_optional_keys_are_fine() {
        let (flags, body) = visible(&json!({}), 0, false);
        assert!(flags.is_empty());
        assert!(body.is_empty());
    }

    #[test]
    fn caller_value_is_not_modified() {
        let result = json!({"_ansible_x": 1, "changed": true, "exception": "e"});
        let before = result.clone();
        visible(&result, 0, false);
        assert_eq!(result, before);
    }

    #[test]
    fn filtering_is_idempotent() {
        let policy = FilterPolicy::default();
        let results = [
            json!({
                "changed": true,
                "skipped": false,
                "stdout": "x",
                "stdout_lines": ["x"],
                "invocation": {"module_args": {"_ansible_check_mode": false}},
                "diff": [{"before": "", "after": "x"}],
                "exception": "trace",
                "_ansible_parsed": true,
            }),
            json!({"_ansible_no_log": true, "msg": "secret"}),
            json!({"msg": "line1\nline2"}),
        ];
        for verbosity in [0, 3] {
            let options = FilterOptions {
                verbosity,
                keep_invocation: false,
            };
            for result in &results {
                let once = filter_result(result, &options, &policy)
                    .expect("filter")
                    .into_value();
                let twice = filter_result(&once, &options, &policy)
                    .expect("filter")
                    .into_value();
                assert_eq!(twice, once);
            }
        }
    }
}
