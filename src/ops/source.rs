use crate::{error::Error, row::Row, stream::RowStream, value::Value};
use serde_json::Value as JsonValue;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Reads rows straight from a row-producing binding.
pub struct ReadFromIterator {
    rows: RowStream,
}

impl ReadFromIterator {
    #[must_use]
    pub fn new(rows: RowStream) -> Self {
        Self { rows }
    }
}

impl Iterator for ReadFromIterator {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

/// Turns one non-empty line of a row file into a [`Row`], or a message
/// describing why it couldn't.
pub type LineParser = fn(&str) -> Result<Row, String>;

/// Reads rows from a file, one row per non-empty line, via `parser`.
pub struct ReadFromFile {
    path: PathBuf,
    lines: std::io::Lines<BufReader<File>>,
    line_number: usize,
    parser: LineParser,
}

impl ReadFromFile {
    pub fn open(path: impl AsRef<Path>, parser: LineParser) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path,
            line_number: 0,
            parser,
        })
    }
}

impl Iterator for ReadFromFile {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(Error::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some((self.parser)(&line).map_err(|message| Error::Parse {
                path: self.path.clone(),
                line_number: self.line_number,
                message,
            }));
        }
    }
}

/// Default row-file parser: one JSON object per line.
///
/// The row-file format is a textual mapping literal per line; JSON is this
/// crate's stand-in, since Rust has no runtime `eval`. A 2-element numeric
/// JSON array is read as a [`Value::Geo`] pair; everything else maps onto
/// [`Value`] directly.
pub fn default_parser(line: &str) -> Result<Row, String> {
    let parsed: JsonValue = serde_json::from_str(line).map_err(|err| err.to_string())?;
    let object = parsed
        .as_object()
        .ok_or_else(|| "expected a JSON object per line".to_string())?;

    let mut row = Row::with_capacity(object.len());
    for (name, value) in object {
        row.set(name.clone(), json_to_value(value)?);
    }
    Ok(row)
}

fn json_to_value(value: &JsonValue) -> Result<Value, String> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(format!("number out of range: {n}"))
            }
        }
        JsonValue::String(s) => Ok(Value::Str(s.clone())),
        JsonValue::Array(items) => match items.as_slice() {
            [JsonValue::Number(a), JsonValue::Number(b)] => {
                let lon = a.as_f64().ok_or_else(|| "expected numeric coordinate".to_string())?;
                let lat = b.as_f64().ok_or_else(|| "expected numeric coordinate".to_string())?;
                Ok(Value::Geo(lon, lat))
            }
            _ => Err("expected a 2-element coordinate array".to_string()),
        },
        JsonValue::Object(_) => Err("nested objects are not supported in row columns".to_string()),
    }
}

/// Renders a row as one line in the same JSON-object format
/// [`default_parser`] reads, so a pipeline's output can be fed back in as
/// another pipeline's input.
#[must_use]
pub fn format_row(row: &Row) -> String {
    let mut object = serde_json::Map::with_capacity(row.len());
    for (name, value) in row.columns() {
        object.insert(name.to_string(), value_to_json(value));
    }
    JsonValue::Object(object).to_string()
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Timestamp(ts) => JsonValue::String(ts.to_rfc3339()),
        Value::Geo(lon, lat) => JsonValue::Array(vec![JsonValue::from(*lon), JsonValue::from(*lat)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parser_reads_scalars_and_coordinates() {
        let row = default_parser(r#"{"text":"hi","count":3,"ratio":1.5,"start":[1.0,2.0]}"#).unwrap();
        assert_eq!(row.get("text"), Some(&Value::Str("hi".to_string())));
        assert_eq!(row.get("count"), Some(&Value::Int(3)));
        assert_eq!(row.get("ratio"), Some(&Value::Float(1.5)));
        assert_eq!(row.get("start"), Some(&Value::Geo(1.0, 2.0)));
    }

    #[test]
    fn default_parser_rejects_non_object_lines() {
        assert!(default_parser("[1,2,3]").is_err());
    }
}
