use crate::{
    error::Error,
    row::Row,
    stream::RowStream,
    value::{Value, canonical_cmp},
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
};
use tempfile::TempDir;

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Sorts a stream by a key tuple.
///
/// Runs of up to `run_capacity` rows are sorted in memory; a stream larger
/// than that spills each full run to its own file under one process-unique
/// temporary directory, then merges the spilled runs with a k-way heap
/// merge. The temporary directory (and everything in it) is removed when
/// this value drops, cancelled or not. Stability across equal keys is not
/// guaranteed.
///
/// Draining and sorting the upstream is deferred to the first call to
/// `next()`, not done in `new()`: like every other operator, this one must
/// not do upstream work, or surface an upstream error, before the caller
/// actually starts pulling from the stream `Graph::execute` returns.
pub struct ExternalSort {
    state: State,
    done: bool,
}

enum State {
    Pending {
        upstream: RowStream,
        keys: Vec<String>,
        run_capacity: usize,
    },
    Ready {
        rows: std::vec::IntoIter<Row>,
        _spill_dir: Option<TempDir>,
    },
}

impl ExternalSort {
    #[must_use]
    pub fn new(upstream: RowStream, keys: Vec<String>, run_capacity: usize) -> Self {
        Self {
            state: State::Pending {
                upstream,
                keys,
                run_capacity,
            },
            done: false,
        }
    }

    /// Drains, sorts (spilling if needed) and merges the upstream exactly
    /// once, on the first `next()` call. A failure here is fatal — the
    /// caller marks the stream `done` so the error is surfaced exactly once
    /// and never retried against a partially-drained upstream.
    fn ensure_sorted(&mut self) -> Result<(), Error> {
        let State::Pending {
            upstream,
            keys,
            run_capacity,
        } = &mut self.state
        else {
            return Ok(());
        };

        let mut buffer = Vec::new();
        let mut runs: Vec<File> = Vec::new();
        let mut spill_dir: Option<TempDir> = None;

        for row in upstream {
            buffer.push(row?);
            if buffer.len() >= *run_capacity {
                let dir = spill_dir.get_or_insert_with(new_spill_dir);
                runs.push(spill_run(dir, keys, std::mem::take(&mut buffer))?);
            }
        }

        let rows = if runs.is_empty() {
            sort_buffer(keys, &mut buffer)?;
            buffer
        } else {
            if !buffer.is_empty() {
                let dir = spill_dir.as_ref().expect("a spilled run implies a spill dir");
                runs.push(spill_run(dir, keys, std::mem::take(&mut buffer))?);
            }
            merge_runs(keys, runs)?
        };

        self.state = State::Ready {
            rows: rows.into_iter(),
            _spill_dir: spill_dir,
        };
        Ok(())
    }
}

impl Iterator for ExternalSort {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Err(err) = self.ensure_sorted() {
            self.done = true;
            return Some(Err(err));
        }
        let State::Ready { rows, .. } = &mut self.state else {
            unreachable!("ensure_sorted always leaves state Ready on success")
        };
        match rows.next() {
            Some(row) => Some(Ok(row)),
            None => {
                self.done = true;
                None
            }
        }
    }
}

fn new_spill_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("rowgraph-sort-{}-", std::process::id()))
        .tempdir()
        .expect("failed to create external-sort spill directory")
}

fn sort_buffer(keys: &[String], rows: &mut [Row]) -> Result<(), Error> {
    let mut error = None;
    rows.sort_by(|a, b| {
        if error.is_some() {
            return Ordering::Equal;
        }
        match key_tuples(keys, a, b) {
            Ok((a_key, b_key)) => cmp_value_tuples(&a_key, &b_key),
            Err(err) => {
                error = Some(err);
                Ordering::Equal
            }
        }
    });
    match error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn key_tuples(keys: &[String], a: &Row, b: &Row) -> Result<(Vec<Value>, Vec<Value>), Error> {
    Ok((a.key_tuple(keys)?, b.key_tuple(keys)?))
}

fn cmp_value_tuples(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ordering = canonical_cmp(x, y);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn spill_run(dir: &TempDir, keys: &[String], mut rows: Vec<Row>) -> Result<File, Error> {
    sort_buffer(keys, &mut rows)?;

    let index = RUN_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    let path = dir.path().join(format!("run-{index}.jsonl"));
    let file = File::create(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    for row in &rows {
        writeln!(writer, "{}", encode_row(row)).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
    }
    writer.flush().map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    File::open(&path).map_err(|source| Error::Io { path, source })
}

fn merge_runs(keys: &[String], runs: Vec<File>) -> Result<Vec<Row>, Error> {
    let mut cursors: Vec<std::io::Lines<BufReader<File>>> =
        runs.into_iter().map(|file| BufReader::new(file).lines()).collect();

    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();
    for (run, cursor) in cursors.iter_mut().enumerate() {
        if let Some(entry) = next_entry(cursor, run, keys)? {
            heap.push(entry);
        }
    }

    let mut merged = Vec::new();
    while let Some(HeapEntry { row, run, .. }) = heap.pop() {
        merged.push(row);
        if let Some(entry) = next_entry(&mut cursors[run], run, keys)? {
            heap.push(entry);
        }
    }

    Ok(merged)
}

fn next_entry(
    cursor: &mut std::io::Lines<BufReader<File>>,
    run: usize,
    keys: &[String],
) -> Result<Option<HeapEntry>, Error> {
    let Some(line) = cursor.next() else {
        return Ok(None);
    };
    let spill_path = PathBuf::from("<external-sort spill run>");
    let line = line.map_err(|source| Error::Io {
        path: spill_path.clone(),
        source,
    })?;
    let row = decode_row(&line).map_err(|message| Error::Parse {
        path: spill_path,
        line_number: 0,
        message,
    })?;
    let key = row.key_tuple(keys)?;
    Ok(Some(HeapEntry { key, row, run }))
}

struct HeapEntry {
    key: Vec<Value>,
    row: Row,
    run: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        cmp_value_tuples(&self.key, &other.key) == Ordering::Equal
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest key tuple pops first.
        cmp_value_tuples(&self.key, &other.key).reverse()
    }
}

/// A row's column values, encoded for the internal spill format. Distinct
/// from [`crate::ops::default_parser`]'s row-file JSON: this one must keep
/// every `Value` variant (in particular `Timestamp`) exact across a
/// round trip, since a spilled row can be any stage's intermediate output.
#[derive(Serialize, Deserialize)]
struct SpillValue {
    name: String,
    value: SpillScalar,
}

#[derive(Serialize, Deserialize)]
enum SpillScalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(String),
    Geo(f64, f64),
}

fn encode_row(row: &Row) -> String {
    let entries: Vec<SpillValue> = row
        .columns()
        .map(|(name, value)| SpillValue {
            name: name.to_string(),
            value: to_spill_scalar(value),
        })
        .collect();
    serde_json::to_string(&entries).expect("row spill encoding cannot fail")
}

fn decode_row(line: &str) -> Result<Row, String> {
    let entries: Vec<SpillValue> = serde_json::from_str(line).map_err(|err| err.to_string())?;
    let mut row = Row::with_capacity(entries.len());
    for entry in entries {
        row.set(entry.name, from_spill_scalar(entry.value)?);
    }
    Ok(row)
}

fn to_spill_scalar(value: &Value) -> SpillScalar {
    match value {
        Value::Null => SpillScalar::Null,
        Value::Bool(b) => SpillScalar::Bool(*b),
        Value::Int(i) => SpillScalar::Int(*i),
        Value::Float(f) => SpillScalar::Float(*f),
        Value::Str(s) => SpillScalar::Str(s.clone()),
        Value::Timestamp(ts) => SpillScalar::Timestamp(ts.to_rfc3339()),
        Value::Geo(lon, lat) => SpillScalar::Geo(*lon, *lat),
    }
}

fn from_spill_scalar(value: SpillScalar) -> Result<Value, String> {
    Ok(match value {
        SpillScalar::Null => Value::Null,
        SpillScalar::Bool(b) => Value::Bool(b),
        SpillScalar::Int(i) => Value::Int(i),
        SpillScalar::Float(f) => Value::Float(f),
        SpillScalar::Str(s) => Value::Str(s),
        SpillScalar::Timestamp(ts) => Value::Timestamp(
            chrono::DateTime::parse_from_rfc3339(&ts)
                .map_err(|err| err.to_string())?
                .with_timezone(&chrono::Utc),
        ),
        SpillScalar::Geo(lon, lat) => Value::Geo(lon, lat),
    })
}
