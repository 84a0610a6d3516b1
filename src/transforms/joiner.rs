use crate::{error::Error, row::Row, traits::Joiner};

/// Cartesian product of `left × right`, renaming any shared non-key column
/// `c` to `c<suffix_a>` on the left side and `c<suffix_b>` on the right.
fn cartesian(keys: &[String], left: &[Row], right: &[Row], suffix_a: &str, suffix_b: &str) -> Vec<Row> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for left_row in left {
        for right_row in right {
            out.push(merged_row(keys, left_row, right_row, suffix_a, suffix_b));
        }
    }
    out
}

fn merged_row(keys: &[String], left: &Row, right: &Row, suffix_a: &str, suffix_b: &str) -> Row {
    let mut row = Row::with_capacity(left.len() + right.len());
    for (name, value) in left.columns() {
        let is_key = keys.iter().any(|k| k == name);
        if !is_key && right.contains(name) {
            row.set(format!("{name}{suffix_a}"), value.clone());
        } else {
            row.set(name, value.clone());
        }
    }
    for (name, value) in right.columns() {
        let is_key = keys.iter().any(|k| k == name);
        if !is_key && left.contains(name) {
            row.set(format!("{name}{suffix_b}"), value.clone());
        } else {
            row.set(name, value.clone());
        }
    }
    row
}

/// Emits the cartesian product of matched groups; one-sided groups vanish.
pub struct InnerJoiner {
    suffix_a: String,
    suffix_b: String,
}

impl Default for InnerJoiner {
    fn default() -> Self {
        Self {
            suffix_a: "_1".to_string(),
            suffix_b: "_2".to_string(),
        }
    }
}

impl InnerJoiner {
    #[must_use]
    pub fn with_suffixes(suffix_a: impl Into<String>, suffix_b: impl Into<String>) -> Self {
        Self {
            suffix_a: suffix_a.into(),
            suffix_b: suffix_b.into(),
        }
    }
}

impl Joiner for InnerJoiner {
    fn apply(&self, keys: &[String], left: Vec<Row>, right: Vec<Row>) -> Result<Vec<Row>, Error> {
        if left.is_empty() || right.is_empty() {
            return Ok(Vec::new());
        }
        Ok(cartesian(keys, &left, &right, &self.suffix_a, &self.suffix_b))
    }
}

/// Matched groups join; left-only rows pass through unchanged; right-only
/// groups vanish.
pub struct LeftJoiner {
    suffix_a: String,
    suffix_b: String,
}

impl Default for LeftJoiner {
    fn default() -> Self {
        Self {
            suffix_a: "_1".to_string(),
            suffix_b: "_2".to_string(),
        }
    }
}

impl Joiner for LeftJoiner {
    fn apply(&self, keys: &[String], left: Vec<Row>, right: Vec<Row>) -> Result<Vec<Row>, Error> {
        if right.is_empty() {
            return Ok(left);
        }
        if left.is_empty() {
            return Ok(Vec::new());
        }
        Ok(cartesian(keys, &left, &right, &self.suffix_a, &self.suffix_b))
    }
}

/// Symmetric to [`LeftJoiner`]: right-only rows pass through unchanged.
pub struct RightJoiner {
    suffix_a: String,
    suffix_b: String,
}

impl Default for RightJoiner {
    fn default() -> Self {
        Self {
            suffix_a: "_1".to_string(),
            suffix_b: "_2".to_string(),
        }
    }
}

impl Joiner for RightJoiner {
    fn apply(&self, keys: &[String], left: Vec<Row>, right: Vec<Row>) -> Result<Vec<Row>, Error> {
        if left.is_empty() {
            return Ok(right);
        }
        if right.is_empty() {
            return Ok(Vec::new());
        }
        Ok(cartesian(keys, &left, &right, &self.suffix_a, &self.suffix_b))
    }
}

/// Matched groups join; one-sided groups of either side pass through
/// unchanged.
pub struct OuterJoiner {
    suffix_a: String,
    suffix_b: String,
}

impl Default for OuterJoiner {
    fn default() -> Self {
        Self {
            suffix_a: "_1".to_string(),
            suffix_b: "_2".to_string(),
        }
    }
}

impl Joiner for OuterJoiner {
    fn apply(&self, keys: &[String], left: Vec<Row>, right: Vec<Row>) -> Result<Vec<Row>, Error> {
        match (left.is_empty(), right.is_empty()) {
            (true, true) => Ok(Vec::new()),
            (false, true) => Ok(left),
            (true, false) => Ok(right),
            (false, false) => Ok(cartesian(keys, &left, &right, &self.suffix_a, &self.suffix_b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn row(k: i64, col: &str, v: i64) -> Row {
        let mut row = Row::new();
        row.set("k", Value::Int(k));
        row.set(col, Value::Int(v));
        row
    }

    #[test]
    fn inner_joiner_renames_colliding_non_key_columns() {
        let mut left = row(1, "a", 10);
        left.set("shared", Value::Int(100));
        let mut right = row(1, "b", 20);
        right.set("shared", Value::Int(200));

        let keys = vec!["k".to_string()];
        let joined = InnerJoiner::default().apply(&keys, vec![left], vec![right]).unwrap();

        assert_eq!(joined.len(), 1);
        let row = &joined[0];
        assert_eq!(row.get("k"), Some(&Value::Int(1)));
        assert_eq!(row.get("shared_1"), Some(&Value::Int(100)));
        assert_eq!(row.get("shared_2"), Some(&Value::Int(200)));
        assert!(!row.contains("shared"));
    }

    #[test]
    fn left_joiner_passes_left_only_rows_through() {
        let keys = vec!["k".to_string()];
        let left_rows = vec![row(1, "a", 10)];
        let out = LeftJoiner::default().apply(&keys, left_rows.clone(), Vec::new()).unwrap();
        assert_eq!(out, left_rows);
    }

    #[test]
    fn left_joiner_drops_right_only_groups() {
        let keys = vec!["k".to_string()];
        let out = LeftJoiner::default()
            .apply(&keys, Vec::new(), vec![row(1, "b", 20)])
            .unwrap();
        assert!(out.is_empty());
    }
}
