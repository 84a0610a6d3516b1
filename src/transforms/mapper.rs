use crate::{error::Error, row::Row, traits::Mapper, value::Value};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

/// Keeps only the alphanumeric and space characters of `column`.
pub struct FilterPunctuation {
    column: String,
}

impl FilterPunctuation {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for FilterPunctuation {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let text = row.require(&self.column)?.as_str().ok_or_else(|| Error::InvalidColumn {
            column: self.column.clone(),
            message: "expected a string column".to_string(),
        })?;
        let filtered: String = text.chars().filter(|c| c.is_alphanumeric() || *c == ' ').collect();
        row.set(self.column.clone(), Value::Str(filtered));
        Ok(vec![row])
    }
}

/// Lowercases `column`.
pub struct LowerCase {
    column: String,
}

impl LowerCase {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for LowerCase {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let text = row.require(&self.column)?.as_str().ok_or_else(|| Error::InvalidColumn {
            column: self.column.clone(),
            message: "expected a string column".to_string(),
        })?;
        row.set(self.column.clone(), Value::Str(text.to_lowercase()));
        Ok(vec![row])
    }
}

const DEFAULT_SPLIT_SEPARATORS: &str = "\n\t\u{00A0} ";

/// Splits `column` into one row per maximal run of non-separator
/// characters; a trailing separator yields a final empty token.
pub struct Split {
    column: String,
    separators: String,
}

impl Split {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            separators: DEFAULT_SPLIT_SEPARATORS.to_string(),
        }
    }

    #[must_use]
    pub fn with_separators(column: impl Into<String>, separators: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            separators: separators.into(),
        }
    }
}

impl Mapper for Split {
    fn apply(&self, row: Row) -> Result<Vec<Row>, Error> {
        let text = row.require(&self.column)?.as_str().ok_or_else(|| Error::InvalidColumn {
            column: self.column.clone(),
            message: "expected a string column".to_string(),
        })?;

        let mut tokens = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            if self.separators.contains(ch) {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        tokens.push(current);

        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            let mut next = row.clone();
            next.set(self.column.clone(), Value::Str(token));
            out.push(next);
        }
        Ok(out)
    }
}

/// Sets `result_column ← ∏ row[c]` for `c` in `columns`.
pub struct Product {
    columns: Vec<String>,
    result_column: String,
}

impl Product {
    #[must_use]
    pub fn new(columns: Vec<String>, result_column: impl Into<String>) -> Self {
        Self {
            columns,
            result_column: result_column.into(),
        }
    }
}

impl Mapper for Product {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let mut product = 1.0_f64;
        let mut all_int = true;
        for column in &self.columns {
            let value = row.require(column)?;
            match value {
                Value::Int(_) => {}
                Value::Float(_) => all_int = false,
                other => {
                    return Err(Error::InvalidColumn {
                        column: column.clone(),
                        message: format!("cannot multiply a column holding {other:?}"),
                    });
                }
            }
            product *= value.as_float().expect("checked numeric above");
        }
        let result = if all_int {
            Value::Int(product as i64)
        } else {
            Value::Float(product)
        };
        row.set(self.result_column.clone(), result);
        Ok(vec![row])
    }
}

/// Yields the row iff `predicate(row)`.
pub struct Filter {
    predicate: Box<dyn Fn(&Row) -> bool>,
}

impl Filter {
    pub fn new(predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl Mapper for Filter {
    fn apply(&self, row: Row) -> Result<Vec<Row>, Error> {
        if (self.predicate)(&row) { Ok(vec![row]) } else { Ok(Vec::new()) }
    }
}

/// Yields a row containing only `columns`, in the given order.
pub struct Project {
    columns: Vec<String>,
}

impl Project {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Mapper for Project {
    fn apply(&self, row: Row) -> Result<Vec<Row>, Error> {
        let mut projected = Row::with_capacity(self.columns.len());
        for column in &self.columns {
            projected.set(column.clone(), row.require(column)?.clone());
        }
        Ok(vec![projected])
    }
}

/// Sets `column ← 1`.
pub struct AddDummyColumn {
    column: String,
}

impl AddDummyColumn {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for AddDummyColumn {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        row.set(self.column.clone(), Value::Int(1));
        Ok(vec![row])
    }
}

/// Removes `column`.
pub struct DeleteDummyColumn {
    column: String,
}

impl DeleteDummyColumn {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for DeleteDummyColumn {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        row.remove(&self.column);
        Ok(vec![row])
    }
}

/// Yields the row iff `row[column] > 1`.
pub struct MoreTwice {
    column: String,
}

impl MoreTwice {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for MoreTwice {
    fn apply(&self, row: Row) -> Result<Vec<Row>, Error> {
        let value = row.require(&self.column)?.as_float().ok_or_else(|| Error::InvalidColumn {
            column: self.column.clone(),
            message: "expected a numeric column".to_string(),
        })?;
        if value > 1.0 { Ok(vec![row]) } else { Ok(Vec::new()) }
    }
}

/// Yields the row iff `len(row[column]) > 4`.
pub struct MoreFourCharacters {
    column: String,
}

impl MoreFourCharacters {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for MoreFourCharacters {
    fn apply(&self, row: Row) -> Result<Vec<Row>, Error> {
        let text = row.require(&self.column)?.as_str().ok_or_else(|| Error::InvalidColumn {
            column: self.column.clone(),
            message: "expected a string column".to_string(),
        })?;
        if text.chars().count() > 4 { Ok(vec![row]) } else { Ok(Vec::new()) }
    }
}

/// Sets `result_column ← ln(row[a] / row[b])`, removing `a` and `b`.
pub struct LogarithmOfRatio {
    numerator: String,
    denominator: String,
    result_column: String,
}

impl LogarithmOfRatio {
    #[must_use]
    pub fn new(numerator: impl Into<String>, denominator: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: denominator.into(),
            result_column: result_column.into(),
        }
    }
}

impl Mapper for LogarithmOfRatio {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let numerator = row.require(&self.numerator)?.as_float().ok_or_else(|| Error::InvalidColumn {
            column: self.numerator.clone(),
            message: "expected a numeric column".to_string(),
        })?;
        let denominator = row.require(&self.denominator)?.as_float().ok_or_else(|| Error::InvalidColumn {
            column: self.denominator.clone(),
            message: "expected a numeric column".to_string(),
        })?;
        if denominator == 0.0 {
            return Err(Error::Arithmetic {
                column: self.denominator.clone(),
                message: "division by zero".to_string(),
            });
        }
        let ratio = numerator / denominator;
        if ratio <= 0.0 {
            return Err(Error::Arithmetic {
                column: self.result_column.clone(),
                message: format!("logarithm of non-positive ratio {ratio}"),
            });
        }
        row.remove(&self.numerator);
        row.remove(&self.denominator);
        row.set(self.result_column.clone(), Value::Float(ratio.ln()));
        Ok(vec![row])
    }
}

/// Parses each of `columns` as `format`, falling back to `format` with its
/// last three characters removed (matches a fractional-seconds token being
/// absent from the source data).
pub struct ConvertToDatetime {
    columns: Vec<String>,
    format: String,
}

impl ConvertToDatetime {
    #[must_use]
    pub fn new(columns: Vec<String>, format: impl Into<String>) -> Self {
        Self {
            columns,
            format: format.into(),
        }
    }

    fn parse(&self, text: &str) -> Result<DateTime<Utc>, Error> {
        let primary = NaiveDateTime::parse_from_str(text, &self.format);
        let naive = match primary {
            Ok(naive) => naive,
            Err(_) => {
                let fallback_len = self.format.len().saturating_sub(3);
                let fallback = &self.format[..fallback_len];
                NaiveDateTime::parse_from_str(text, fallback).map_err(|err| Error::InvalidColumn {
                    column: "ConvertToDatetime".to_string(),
                    message: format!("could not parse '{text}' as '{}': {err}", self.format),
                })?
            }
        };
        Ok(naive.and_utc())
    }
}

impl Mapper for ConvertToDatetime {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        for column in &self.columns {
            let text = row.require(column)?.as_str().ok_or_else(|| Error::InvalidColumn {
                column: column.clone(),
                message: "expected a string column".to_string(),
            })?;
            let parsed = self.parse(text)?;
            row.set(column.clone(), Value::Timestamp(parsed));
        }
        Ok(vec![row])
    }
}

/// Great-circle distance in the given radius's units between two `Geo`
/// columns, removing both inputs.
pub struct CompHaversine {
    start: String,
    end: String,
    result_column: String,
    radius: f64,
}

impl CompHaversine {
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>, result_column: impl Into<String>, radius: f64) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            result_column: result_column.into(),
            radius,
        }
    }

    fn haversine((lon1, lat1): (f64, f64), (lon2, lat2): (f64, f64), radius: f64) -> f64 {
        let d_lat = (lat2 - lat1).to_radians();
        let d_lon = (lon2 - lon1).to_radians();
        let lat1 = lat1.to_radians();
        let lat2 = lat2.to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().asin();
        radius * c
    }
}

impl Mapper for CompHaversine {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let start = row.require(&self.start)?.as_geo().ok_or_else(|| Error::InvalidColumn {
            column: self.start.clone(),
            message: "expected a geo coordinate column".to_string(),
        })?;
        let end = row.require(&self.end)?.as_geo().ok_or_else(|| Error::InvalidColumn {
            column: self.end.clone(),
            message: "expected a geo coordinate column".to_string(),
        })?;
        let distance = Self::haversine(start, end, self.radius);
        row.remove(&self.start);
        row.remove(&self.end);
        row.set(self.result_column.clone(), Value::Float(distance));
        Ok(vec![row])
    }
}

/// Sets `result_column ← (row[end] − row[start])` in hours. Leaves the
/// source timestamp columns in place.
pub struct CompTimeDelta {
    start: String,
    end: String,
    result_column: String,
}

impl CompTimeDelta {
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            result_column: result_column.into(),
        }
    }
}

impl Mapper for CompTimeDelta {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let start = *row.require(&self.start)?.as_timestamp().ok_or_else(|| Error::InvalidColumn {
            column: self.start.clone(),
            message: "expected a timestamp column".to_string(),
        })?;
        let end = *row.require(&self.end)?.as_timestamp().ok_or_else(|| Error::InvalidColumn {
            column: self.end.clone(),
            message: "expected a timestamp column".to_string(),
        })?;
        let hours = (end - start).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0);
        row.set(self.result_column.clone(), Value::Float(hours));
        Ok(vec![row])
    }
}

/// Replaces `time_column` with separate weekday-abbreviation and
/// hour-of-day columns.
pub struct GetWeekdayAndHour {
    time_column: String,
    weekday_column: String,
    hour_column: String,
}

impl GetWeekdayAndHour {
    #[must_use]
    pub fn new(time_column: impl Into<String>, weekday_column: impl Into<String>, hour_column: impl Into<String>) -> Self {
        Self {
            time_column: time_column.into(),
            weekday_column: weekday_column.into(),
            hour_column: hour_column.into(),
        }
    }

    fn weekday_label(day: chrono::Weekday) -> &'static str {
        match day.num_days_from_monday() {
            0 => "Mon",
            1 => "Tue",
            2 => "Wed",
            3 => "Thu",
            4 => "Fri",
            5 => "Sat",
            _ => "Sun",
        }
    }
}

impl Mapper for GetWeekdayAndHour {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let timestamp = *row.require(&self.time_column)?.as_timestamp().ok_or_else(|| Error::InvalidColumn {
            column: self.time_column.clone(),
            message: "expected a timestamp column".to_string(),
        })?;
        row.remove(&self.time_column);
        row.set(self.weekday_column.clone(), Value::Str(Self::weekday_label(timestamp.weekday()).to_string()));
        row.set(self.hour_column.clone(), Value::Int(i64::from(timestamp.hour())));
        Ok(vec![row])
    }
}

/// Sets `result_column ← row[distance] / row[time]`, removing both inputs.
pub struct AverageSpeed {
    distance: String,
    time: String,
    result_column: String,
}

impl AverageSpeed {
    #[must_use]
    pub fn new(distance: impl Into<String>, time: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            distance: distance.into(),
            time: time.into(),
            result_column: result_column.into(),
        }
    }
}

impl Mapper for AverageSpeed {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>, Error> {
        let distance = row.require(&self.distance)?.as_float().ok_or_else(|| Error::InvalidColumn {
            column: self.distance.clone(),
            message: "expected a numeric column".to_string(),
        })?;
        let time = row.require(&self.time)?.as_float().ok_or_else(|| Error::InvalidColumn {
            column: self.time.clone(),
            message: "expected a numeric column".to_string(),
        })?;
        if time == 0.0 {
            return Err(Error::Arithmetic {
                column: self.time.clone(),
                message: "division by zero computing average speed".to_string(),
            });
        }
        row.remove(&self.distance);
        row.remove(&self.time);
        row.set(self.result_column.clone(), Value::Float(distance / time));
        Ok(vec![row])
    }
}
