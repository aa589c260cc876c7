//! Record mappers.
//!
//! A [`Mapper`] turns one result [`Row`] into one typed value. Any
//! `FnMut(Row) -> Result<T, AppError>` closure is a mapper; the helpers
//! below cover the common shapes.

use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::graph::row::Row;

/// Converts one result record into a typed value.
pub trait Mapper<T> {
    fn map(&mut self, row: Row) -> Result<T, AppError>;
}

impl<T, F> Mapper<T> for F
where
    F: FnMut(Row) -> Result<T, AppError>,
{
    fn map(&mut self, row: Row) -> Result<T, AppError> {
        self(row)
    }
}

/// Deserializes a single column of every record.
///
/// ```ignore
/// let names = template.query(&req, mapper::column::<String>("name")).await?;
/// ```
pub fn column<T: DeserializeOwned>(name: &str) -> impl FnMut(Row) -> Result<T, AppError> {
    let name = name.to_string();
    move |row: Row| row.get(&name)
}

/// Deserializes the whole record, using column names as field names.
pub fn row<T: DeserializeOwned>() -> impl FnMut(Row) -> Result<T, AppError> {
    |row: Row| row.to()
}

/// Returns every record unchanged.
pub fn raw() -> impl FnMut(Row) -> Result<Row, AppError> {
    Ok::<Row, AppError>
}
