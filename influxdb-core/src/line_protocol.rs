//! InfluxDB Line Protocol encoding.
//!
//! Line Protocol format:
//! ```text
//! measurement[,tag1=val1,tag2=val2] field1=val1[,field2=val2] [timestamp_ns]
//! ```
//!
//! See: <https://docs.influxdata.com/influxdb/v1/reference/syntax/line-protocol/>

use crate::point::Point;

/// Encode a point into one line of line protocol.
pub fn encode(point: &Point) -> String {
    encode_with_tags(point, "")
}

/// Encode a point, splicing a pre-rendered set of global `key=value` tag
/// pairs in front of the point's own tags.
///
/// `global_tags` must already be comma-joined and escaped; an empty string
/// means no global tags. A point without tags (and no global tags) renders
/// with no tag segment at all.
pub fn encode_with_tags(point: &Point, global_tags: &str) -> String {
    let mut line = escape_measurement(point.name());

    if !global_tags.is_empty() {
        line.push(',');
        line.push_str(global_tags);
    }

    for (key, value) in point.tags() {
        line.push(',');
        line.push_str(&escape_tag(key));
        line.push('=');
        line.push_str(&escape_tag(value));
    }

    if !point.fields().is_empty() {
        line.push(' ');
        for (i, (key, value)) in point.fields().iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&escape_tag(key));
            line.push('=');
            line.push_str(&value.to_line_protocol());
        }
    }

    if let Some(timestamp) = point.timestamp() {
        line.push(' ');
        line.push_str(&timestamp.timestamp_nanos().to_string());
    }

    line
}

/// Escape a measurement name. Commas and spaces must be backslash-escaped.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Escape a tag key, tag value, or field key.
/// Commas, equals signs, and spaces must be backslash-escaped.
pub fn escape_tag(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}
