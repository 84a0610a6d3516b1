use crate::value::Value;

///
/// ValueTag
///
/// Stable cross-kind ordering tag. Rows are heterogeneous, so Sort/Reduce/Join
/// need *some* total order between different value kinds even though every
/// pipeline in this crate only ever compares values of the same kind within
/// one key column; mismatched kinds are rejected before this tag is consulted
/// for anything but diagnostics (see [`crate::error::Error::KeyTypeMismatch`]).
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueTag {
    Null = 1,
    Bool = 2,
    Int = 3,
    Float = 4,
    Str = 5,
    Timestamp = 6,
    Geo = 7,
}

impl ValueTag {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Timestamp => "timestamp",
            Self::Geo => "geo",
        }
    }
}

#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Null => ValueTag::Null,
        Value::Bool(_) => ValueTag::Bool,
        Value::Int(_) => ValueTag::Int,
        Value::Float(_) => ValueTag::Float,
        Value::Str(_) => ValueTag::Str,
        Value::Timestamp(_) => ValueTag::Timestamp,
        Value::Geo(_, _) => ValueTag::Geo,
    }
}
