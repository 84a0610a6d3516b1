use crate::{error::Error, row::Row, traits::Reducer, value::Value};
use std::collections::HashMap;

fn key_row(group_key: &[(String, Value)]) -> Row {
    let mut row = Row::with_capacity(group_key.len());
    for (name, value) in group_key {
        row.set(name.clone(), value.clone());
    }
    row
}

/// Yields only the first row of each group.
pub struct FirstReducer;

impl Reducer for FirstReducer {
    fn apply(&self, _group_key: &[(String, Value)], rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        Ok(rows.into_iter().take(1).collect())
    }
}

/// Emits one row per group: the grouping columns plus `column ← group size`.
pub struct Count {
    column: String,
}

impl Count {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Reducer for Count {
    fn apply(&self, group_key: &[(String, Value)], rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        let mut row = key_row(group_key);
        row.set(self.column.clone(), Value::Int(rows.len() as i64));
        Ok(vec![row])
    }
}

/// Emits one row per group: the grouping columns plus `column ← Σ row[column]`.
pub struct Sum {
    column: String,
}

impl Sum {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Reducer for Sum {
    fn apply(&self, group_key: &[(String, Value)], rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        let mut row = key_row(group_key);
        let mut total = 0.0_f64;
        let mut total_is_int = true;
        for source in &rows {
            let value = source.require(&self.column)?;
            match value {
                Value::Int(_) => {}
                Value::Float(_) => total_is_int = false,
                other => {
                    return Err(Error::InvalidColumn {
                        column: self.column.clone(),
                        message: format!("cannot sum a column holding {:?}", other),
                    });
                }
            }
            total += value.as_float().expect("checked numeric above");
        }
        let summed = if total_is_int {
            Value::Int(total as i64)
        } else {
            Value::Float(total)
        };
        row.set(self.column.clone(), summed);
        Ok(vec![row])
    }
}

/// For each distinct value of `words_column` within the group, emits one
/// row (a copy of that value's first-seen row) with `result_column ← count
/// of that value / group size`.
pub struct TermFrequency {
    words_column: String,
    result_column: String,
}

impl TermFrequency {
    #[must_use]
    pub fn new(words_column: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            words_column: words_column.into(),
            result_column: result_column.into(),
        }
    }
}

impl Reducer for TermFrequency {
    fn apply(&self, _group_key: &[(String, Value)], rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        let group_size = rows.len();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen: Vec<(String, Row)> = Vec::new();

        for row in rows {
            let word = row
                .require(&self.words_column)?
                .as_str()
                .ok_or_else(|| Error::InvalidColumn {
                    column: self.words_column.clone(),
                    message: "term frequency requires a string column".to_string(),
                })?
                .to_string();
            if !counts.contains_key(&word) {
                first_seen.push((word.clone(), row));
            }
            *counts.entry(word).or_insert(0) += 1;
        }

        let mut out = Vec::with_capacity(first_seen.len());
        for (word, mut row) in first_seen {
            let count = counts[&word];
            #[allow(clippy::cast_precision_loss)]
            let tf = count as f64 / group_size as f64;
            row.set(self.result_column.clone(), Value::Float(tf));
            out.push(row);
        }
        Ok(out)
    }
}

/// Yields the `n` rows of the group with the greatest `column` value,
/// highest first; ties keep the order they arrived in.
pub struct TopN {
    column: String,
    n: usize,
}

impl TopN {
    #[must_use]
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        Self { column: column.into(), n }
    }
}

impl Reducer for TopN {
    fn apply(&self, _group_key: &[(String, Value)], mut rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        let mut error = None;
        rows.sort_by(|a, b| {
            if error.is_some() {
                return std::cmp::Ordering::Equal;
            }
            let ordering = (|| -> Result<std::cmp::Ordering, Error> {
                let av = a.require(&self.column)?.as_float().ok_or_else(|| Error::InvalidColumn {
                    column: self.column.clone(),
                    message: "top-n requires a numeric column".to_string(),
                })?;
                let bv = b.require(&self.column)?.as_float().ok_or_else(|| Error::InvalidColumn {
                    column: self.column.clone(),
                    message: "top-n requires a numeric column".to_string(),
                })?;
                Ok(bv.partial_cmp(&av).unwrap_or(std::cmp::Ordering::Equal))
            })();
            match ordering {
                Ok(ordering) => ordering,
                Err(err) => {
                    error = Some(err);
                    std::cmp::Ordering::Equal
                }
            }
        });
        if let Some(err) = error {
            return Err(err);
        }
        rows.truncate(self.n);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(col: &str, v: i64) -> Row {
        let mut row = Row::new();
        row.set(col, Value::Int(v));
        row
    }

    #[test]
    fn count_emits_group_key_and_size() {
        let key = vec![("word".to_string(), Value::Str("hi".to_string()))];
        let rows = vec![row("n", 1), row("n", 2), row("n", 3)];
        let out = Count::new("count").apply(&key, rows).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("count"), Some(&Value::Int(3)));
        assert_eq!(out[0].get("word"), Some(&Value::Str("hi".to_string())));
    }

    #[test]
    fn sum_accumulates_across_the_group() {
        let key = vec![("k".to_string(), Value::Int(1))];
        let rows = vec![row("amount", 2), row("amount", 3)];
        let out = Sum::new("amount").apply(&key, rows).unwrap();
        assert_eq!(out[0].get("amount"), Some(&Value::Int(5)));
        assert_eq!(out[0].get("k"), Some(&Value::Int(1)));
    }

    #[test]
    fn term_frequency_divides_by_group_size() {
        let mut a = Row::new();
        a.set("text", Value::Str("a".to_string()));
        let mut b = Row::new();
        b.set("text", Value::Str("b".to_string()));
        let mut a2 = Row::new();
        a2.set("text", Value::Str("a".to_string()));

        let out = TermFrequency::new("text", "tf").apply(&[], vec![a, b, a2]).unwrap();
        assert_eq!(out.len(), 2);
        let tf_a = out.iter().find(|r| r.get("text") == Some(&Value::Str("a".to_string()))).unwrap();
        assert_eq!(tf_a.get("tf"), Some(&Value::Float(2.0 / 3.0)));
    }

    #[test]
    fn top_n_orders_descending_and_truncates() {
        let rows = vec![row("score", 1), row("score", 5), row("score", 3)];
        let out = TopN::new("score", 2).apply(&[], rows).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("score"), Some(&Value::Int(5)));
        assert_eq!(out[1].get("score"), Some(&Value::Int(3)));
    }
}
