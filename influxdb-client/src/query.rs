//! Query response decoding
//!
//! The `/query` endpoint answers with JSON of the form
//! `{"results":[{"series":[{"name":...,"columns":[...],"values":[[...]]}]}]}`.
//! Each value row becomes one point: the `time` column is the timestamp,
//! numeric columns become fields, and string columns become tags.

use influxdb_core::{FieldValue, InfluxError, InfluxResult, Point, Timestamp};
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    series: Vec<Series>,

    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    name: String,
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Decode a raw query response body into points.
pub fn parse_response(body: &str) -> InfluxResult<Vec<Point>> {
    let response: QueryResponse = serde_json::from_str(body)?;

    let mut points = Vec::new();
    for result in response.results {
        if let Some(error) = result.error {
            return Err(InfluxError::query(error));
        }
        for series in result.series {
            trace!(series = %series.name, rows = series.values.len(), "decoding series");
            for row in &series.values {
                points.push(decode_row(&series, row)?);
            }
        }
    }
    Ok(points)
}

fn decode_row(series: &Series, row: &[Value]) -> InfluxResult<Point> {
    let mut point = Point::new(series.name.clone());

    for (column, value) in series.columns.iter().zip(row.iter()) {
        if column == "time" {
            point = match value {
                Value::String(s) => point.set_timestamp(Timestamp::from_rfc3339(s)?),
                Value::Number(n) => {
                    let nanos = n.as_i64().ok_or_else(|| {
                        InfluxError::query(format!("non-integer time value: {}", n))
                    })?;
                    point.set_timestamp(Timestamp::from_nanos(nanos))
                }
                other => {
                    return Err(InfluxError::query(format!("unexpected time value: {}", other)))
                }
            };
            continue;
        }

        point = match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    point.add_field(column.clone(), FieldValue::Integer(i))
                } else {
                    point.add_field(column.clone(), FieldValue::Float(n.as_f64().unwrap_or(0.0)))
                }
            }
            // Numeric strings are values that merely round-tripped as text;
            // everything else is treated as a tag.
            Value::String(s) => match s.parse::<f64>() {
                Ok(f) => point.add_field(column.clone(), FieldValue::Float(f)),
                Err(_) => point.add_tag(column.clone(), s.clone()),
            },
            Value::Bool(b) => point.add_tag(column.clone(), b.to_string()),
            Value::Null => point,
            other => {
                return Err(InfluxError::query(format!(
                    "unexpected value in column {}: {}",
                    column, other
                )))
            }
        };
    }

    Ok(point)
}
