// ==========================================
// Terra em Dia - row decoding helpers
// ==========================================
// Shared by the machine and supply repositories so that enum labels and
// timestamps are decoded the same way everywhere.
// ==========================================

use crate::db::parse_timestamp;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

/// Decodes a TEXT column into an enum implementing `FromStr`.
/// An unknown label is reported as a conversion failure on that column.
pub fn text_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decodes a timestamp column written with `db::TIMESTAMP_FORMAT`.
pub fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp: {}", raw).into(),
        )
    })
}
