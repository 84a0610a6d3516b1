mod compare;
mod tag;


use chrono::{DateTime, Utc};

pub use compare::{canonical_cmp, compare_key_tuples, strict_order_cmp};
pub(crate) use tag::ValueTag;

///
/// Value
///
/// The dynamic value kinds a row column may hold.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(DateTime<Utc>),
    /// `(longitude, latitude)` pair.
    Geo(f64, f64),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        if let Self::Int(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Widens `Int` alongside `Float` so arithmetic mappers don't have to
    /// care which numeric kind a column happens to hold.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::Str(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        if let Self::Timestamp(v) = self {
            Some(v)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_geo(&self) -> Option<(f64, f64)> {
        if let Self::Geo(lon, lat) = self {
            Some((*lon, *lat))
        } else {
            None
        }
    }

    #[must_use]
    pub(crate) const fn tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}
