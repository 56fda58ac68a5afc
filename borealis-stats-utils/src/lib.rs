//! Numeric aggregation over nested climate API responses.
//!
//! The point-data API returns JSON whose nesting depth varies by dataset
//! family (model/scenario/era for some, scenario/year-month for others).
//! Chart and legend scaling only ever needs scalar statistics out of those
//! trees, so
//! everything here works on [`serde_json::Value`] directly and stays
//! agnostic of the payload shape.
//!
//! All functions degrade to `None` on empty or all-non-numeric input
//! instead of panicking; callers treat a missing bound as "no data to plot".

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Matches `YYYY-MM` object keys; capture 1 is the two-digit month code.
static YEAR_MONTH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(\d{2})$").expect("year-month pattern is valid"));

/// Inclusive numeric range observed over a set of candidate values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    fn observe(range: Option<Self>, candidate: f64) -> Option<Self> {
        Some(match range {
            None => Self {
                min: candidate,
                max: candidate,
            },
            Some(range) => Self {
                min: range.min.min(candidate),
                max: range.max.max(candidate),
            },
        })
    }
}

/// Arithmetic mean with spread-dependent display precision.
///
/// Small-magnitude climate variables (degree-index deltas and the like) need
/// sub-integer precision while large-magnitude ones (total degree-days) do
/// not, so a spread under 10 rounds to one decimal place and anything wider
/// rounds to the nearest integer. Returns `None` for an empty slice.
#[must_use]
pub fn precision_mean(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    let (mut min, mut max) = (first, first);
    let mut sum = 0.0;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / values.len() as f64;
    Some(if max - min < 10.0 {
        (mean * 10.0).round() / 10.0
    } else {
        mean.round()
    })
}

/// Folds every numeric leaf of `tree` into a single "best" value.
///
/// The running best is seeded with the first leaf encountered and replaced
/// whenever `replace(candidate, best)` returns true. Traversal order is
/// unspecified; for the usual min/max comparators the result does not depend
/// on it. Returns `None` when the tree holds no numeric leaves.
#[must_use]
pub fn deep_compare<F>(tree: &Value, replace: F) -> Option<f64>
where
    F: Fn(f64, f64) -> bool,
{
    let mut best = None;
    for_each_numeric_leaf(tree, &mut |candidate| fold_best(&mut best, candidate, &replace));
    best
}

/// Smallest numeric leaf anywhere in `tree`, or `None` if there is none.
#[must_use]
pub fn deep_min(tree: &Value) -> Option<f64> {
    deep_compare(tree, |candidate, best| candidate < best)
}

/// Largest numeric leaf anywhere in `tree`, or `None` if there is none.
#[must_use]
pub fn deep_max(tree: &Value) -> Option<f64> {
    deep_compare(tree, |candidate, best| candidate > best)
}

/// [`deep_min`] restricted to subtrees keyed by `YYYY-MM` for the given
/// two-digit month code (e.g. `"06"`).
#[must_use]
pub fn deep_min_for_month(tree: &Value, month: &str) -> Option<f64> {
    deep_compare_for_month(tree, month, |candidate, best| candidate < best)
}

/// [`deep_max`] restricted to subtrees keyed by `YYYY-MM` for the given
/// two-digit month code.
#[must_use]
pub fn deep_max_for_month(tree: &Value, month: &str) -> Option<f64> {
    deep_compare_for_month(tree, month, |candidate, best| candidate > best)
}

/// Value range for one month across a scenario/year-month response shape.
///
/// Entries whose key ends with the two-digit `month` code contribute the
/// numeric field named `data_key`; entries without that field are skipped.
/// Returns `None` when nothing matched.
#[must_use]
pub fn month_min_max(tree: &Value, month: &str, data_key: &str) -> Option<MinMax> {
    let mut range = None;
    for_each_matching_entry(
        tree,
        &|key| key.ends_with(month),
        &mut |entry| {
            if let Some(candidate) = entry.get(data_key).and_then(Value::as_f64) {
                range = MinMax::observe(range, candidate);
            }
        },
    );
    range
}

fn deep_compare_for_month<F>(tree: &Value, month: &str, replace: F) -> Option<f64>
where
    F: Fn(f64, f64) -> bool,
{
    let mut best = None;
    for_each_matching_entry(
        tree,
        &|key| {
            YEAR_MONTH_KEY
                .captures(key)
                .is_some_and(|captures| &captures[1] == month)
        },
        &mut |subtree| {
            for_each_numeric_leaf(subtree, &mut |candidate| {
                fold_best(&mut best, candidate, &replace);
            });
        },
    );
    best
}

fn fold_best(best: &mut Option<f64>, candidate: f64, replace: &impl Fn(f64, f64) -> bool) {
    *best = match *best {
        Some(current) if !replace(candidate, current) => Some(current),
        _ => Some(candidate),
    };
}

/// Depth-first visit of every numeric leaf. Strings, booleans and nulls are
/// skipped; objects and arrays are descended.
fn for_each_numeric_leaf(tree: &Value, visit: &mut dyn FnMut(f64)) {
    match tree {
        Value::Number(number) => {
            if let Some(value) = number.as_f64() {
                visit(value);
            }
        }
        Value::Object(entries) => {
            for child in entries.values() {
                for_each_numeric_leaf(child, visit);
            }
        }
        Value::Array(items) => {
            for child in items {
                for_each_numeric_leaf(child, visit);
            }
        }
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}

/// Key-gated traversal shared by the month-filtered aggregations: object
/// entries whose key satisfies `matches` are yielded whole (no further
/// descent into them), everything else is searched recursively.
fn for_each_matching_entry<'tree>(
    tree: &'tree Value,
    matches: &dyn Fn(&str) -> bool,
    visit: &mut dyn FnMut(&'tree Value),
) {
    match tree {
        Value::Object(entries) => {
            for (key, child) in entries {
                if matches(key) {
                    visit(child);
                } else {
                    for_each_matching_entry(child, matches, visit);
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                for_each_matching_entry(child, matches, visit);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::narrow_spread_keeps_a_decimal(&[1.0, 2.0, 2.5], 1.8)]
    #[case::wide_spread_rounds_whole(&[0.0, 20.0], 10.0)]
    #[case::wide_spread_rounds_up(&[3.3, 18.1], 11.0)]
    #[case::narrow_spread_mid_thirties(&[32.0, 33.0, 35.0], 33.3)]
    #[case::single_value_has_zero_spread(&[5.25], 5.3)]
    fn precision_mean_rounds_by_spread(#[case] values: &[f64], #[case] expected: f64) {
        assert_relative_eq!(precision_mean(values).unwrap(), expected);
    }

    #[test]
    fn precision_mean_of_nothing_is_none() {
        assert_eq!(precision_mean(&[]), None);
    }

    fn monthly_tree() -> Value {
        json!({
            "CCSM4": {
                "rcp45": {
                    "2040-06": { "tas": 11.2, "pr": 48.0 },
                    "2040-07": { "tas": 13.9, "pr": 61.0 }
                },
                "rcp85": {
                    "2040-06": { "tas": 12.6, "pr": 52.0 }
                }
            },
            "GFDL-CM3": {
                "rcp45": {
                    "2040-06": { "tas": 9.4, "pr": 40.0 }
                }
            }
        })
    }

    #[test]
    fn deep_extrema_bound_every_leaf() {
        let tree = monthly_tree();
        let min = deep_min(&tree).unwrap();
        let max = deep_max(&tree).unwrap();
        assert_relative_eq!(min, 9.4);
        assert_relative_eq!(max, 61.0);

        let mut leaves = Vec::new();
        for_each_numeric_leaf(&tree, &mut |v| leaves.push(v));
        assert!(!leaves.is_empty());
        assert!(leaves.iter().all(|&leaf| min <= leaf && leaf <= max));
    }

    #[test]
    fn deep_extrema_descend_arrays() {
        let tree = json!({ "series": [1, 2, { "nested": 3 }, "skip me"] });
        assert_relative_eq!(deep_min(&tree).unwrap(), 1.0);
        assert_relative_eq!(deep_max(&tree).unwrap(), 3.0);
    }

    #[rstest]
    #[case::empty_object(json!({}))]
    #[case::no_numeric_leaves(json!({ "a": { "b": "no data" }, "c": null }))]
    #[case::scalar_string(json!("n/a"))]
    fn leafless_trees_have_no_extrema(#[case] tree: Value) {
        assert_eq!(deep_min(&tree), None);
        assert_eq!(deep_max(&tree), None);
        assert_eq!(deep_min_for_month(&tree, "06"), None);
        assert_eq!(month_min_max(&tree, "06", "value"), None);
    }

    #[test]
    fn sibling_order_does_not_change_the_result() {
        let forward = json!({ "a": { "x": 4.0, "y": -2.0 }, "b": 7.5 });
        let reversed = json!({ "b": 7.5, "a": { "y": -2.0, "x": 4.0 } });
        assert_eq!(deep_min(&forward), deep_min(&reversed));
        assert_eq!(deep_max(&forward), deep_max(&reversed));
    }

    #[rstest]
    #[case::june_min("06", 9.4, false)]
    #[case::june_max("06", 52.0, true)]
    #[case::july_min("07", 13.9, false)]
    #[case::july_max("07", 61.0, true)]
    fn month_filter_selects_only_matching_years(
        #[case] month: &str,
        #[case] expected: f64,
        #[case] want_max: bool,
    ) {
        let tree = monthly_tree();
        let got = if want_max {
            deep_max_for_month(&tree, month)
        } else {
            deep_min_for_month(&tree, month)
        };
        assert_relative_eq!(got.unwrap(), expected);
    }

    #[test]
    fn month_filter_requires_a_year_month_key() {
        // "rcp85" must not be mistaken for a month-85 entry, and bare month
        // keys without a year prefix do not count either.
        let tree = json!({ "rcp85": { "06": 1.0 } });
        assert_eq!(deep_min_for_month(&tree, "85"), None);
        assert_eq!(deep_min_for_month(&tree, "06"), None);
    }

    #[test]
    fn month_min_max_over_scenario_years() {
        let tree = json!({
            "modelA": {
                "rcp85": {
                    "2050-06": { "value": 3 },
                    "2051-06": { "value": 7 }
                }
            }
        });
        assert_eq!(
            month_min_max(&tree, "06", "value"),
            Some(MinMax { min: 3.0, max: 7.0 })
        );
    }

    #[test]
    fn month_min_max_skips_entries_without_the_data_key() {
        let tree = json!({
            "rcp45": {
                "2030-01": { "value": 5.0 },
                "2031-01": { "other": 99.0 },
                "2031-02": { "value": -40.0 }
            }
        });
        assert_eq!(
            month_min_max(&tree, "01", "value"),
            Some(MinMax { min: 5.0, max: 5.0 })
        );
        assert_eq!(month_min_max(&tree, "03", "value"), None);
    }
}
