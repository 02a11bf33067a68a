//! Fixed-width UTC text timestamps, so that SQL ordering on the column is
//! chronological.
//!
//! sqlx's own `OffsetDateTime` encoding trims trailing subsecond zeros, which
//! breaks text ordering; [`UtcTimestamp`] always writes nine digits.

use anyhow::Context;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

const FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

/// Column value stored as `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTimestamp(pub OffsetDateTime);

impl UtcTimestamp {
    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for UtcTimestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

pub fn encode(value: OffsetDateTime) -> String {
    value
        .to_offset(UtcOffset::UTC)
        .format(FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

pub fn decode(text: &str) -> anyhow::Result<OffsetDateTime> {
    PrimitiveDateTime::parse(text, FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .with_context(|| format!("invalid stored timestamp '{text}'"))
}

impl Type<Sqlite> for UtcTimestamp {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for UtcTimestamp {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(encode(self.0), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for UtcTimestamp {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Self(decode(text)?))
    }
}
