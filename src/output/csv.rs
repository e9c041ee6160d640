//! Fully quoted CSV encoding
//!
//! Every field, header included, is wrapped in double quotes with embedded
//! quotes doubled. Nulls become empty strings. Floats are written with two
//! decimals, dates as `YYYY-MM-DD`.

use crate::error::{Error, Result};
use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

/// Encode a batch as CSV text with a header row
pub fn encode_csv(batch: &RecordBatch) -> Result<String> {
    let schema = batch.schema();
    let mut out = String::new();

    let header: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    push_row(&mut out, header.iter().copied());

    let columns = batch.columns();
    let mut cells = Vec::with_capacity(columns.len());
    for row in 0..batch.num_rows() {
        cells.clear();
        for column in columns {
            cells.push(format_cell(column, row)?);
        }
        push_row(&mut out, cells.iter().map(String::as_str));
    }

    Ok(out)
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}

fn downcast<'a, T: 'static>(column: &'a ArrayRef) -> Result<&'a T> {
    column.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::output(format!(
            "Column type {} does not match its array",
            column.data_type()
        ))
    })
}

fn format_cell(column: &ArrayRef, row: usize) -> Result<String> {
    if column.is_null(row) {
        return Ok(String::new());
    }

    let cell = match column.data_type() {
        DataType::Utf8 => downcast::<StringArray>(column)?.value(row).to_string(),
        DataType::Int64 => downcast::<Int64Array>(column)?.value(row).to_string(),
        DataType::Float64 => format!("{:.2}", downcast::<Float64Array>(column)?.value(row)),
        DataType::Date32 => downcast::<Date32Array>(column)?
            .value_as_date(row)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => {
            return Err(Error::output(format!(
                "Unsupported column type for CSV: {other}"
            )))
        }
    };

    Ok(cell)
}
