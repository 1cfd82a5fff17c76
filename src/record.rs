//! Core record trait and types for extracted packet fields.
//!
//! This module defines the fixed-shape output record produced by the
//! field extractor, plus the typed cell values used when a record is
//! merged back into a tabular row.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a typed cell value in a record's dictionary view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

/// Core trait for fixed-shape records produced by the extractor.
///
/// A record always carries its complete field set: every field is present
/// with either a value or its explicit default, never a sparse key set.
///
/// # Example
///
/// ```
/// use pktinfo::{ParsedFields, Record};
///
/// let fields = ParsedFields::default();
/// let dict = fields.to_dict();
/// assert_eq!(dict.len(), 13);
/// ```
pub trait Record: Serialize + Sized {
    /// The name of this record type
    const NAME: &'static str;

    /// Convert the record to an ordered field-name -> value map.
    ///
    /// Order matches the declared output columns, so callers joining the
    /// record into a wider table can rely on it.
    fn to_dict(&self) -> IndexMap<String, FieldValue>;

    /// Convert the record to a JSON string
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert the record to a pretty-printed JSON string
    fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert the record to an NDJSON line (newline-delimited JSON)
    fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(format!("{}\n", json))
    }
}

/// Structured fields extracted from one protocol summary line.
///
/// Every field defaults to absent/false; an input string matching none of
/// the extraction patterns yields `ParsedFields::default()`. The record is
/// created fresh per input and is not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub flag_syn: bool,
    pub flag_ack: bool,
    pub flag_psh: bool,
    pub flag_fin: bool,
    pub flag_rst: bool,
    pub seq: Option<u32>,
    pub ack_num: Option<u32>,
    pub win: Option<u32>,
    pub payload_len: Option<u32>,
    pub tcp_anomaly: Option<String>,
    pub size_limited: bool,
}

impl ParsedFields {
    /// Output column names, in the order they are appended to a table.
    pub const COLUMNS: [&'static str; 13] = [
        "src_port",
        "dst_port",
        "flag_syn",
        "flag_ack",
        "flag_psh",
        "flag_fin",
        "flag_rst",
        "seq",
        "ack_num",
        "win",
        "payload_len",
        "tcp_anomaly",
        "size_limited",
    ];

    /// Render the record as CSV cells in [`Self::COLUMNS`] order.
    ///
    /// Absent optionals render as empty cells; booleans render as `1`/`0`
    /// so the widened table stays numeric-friendly for analysis tooling.
    pub fn csv_cells(&self) -> Vec<String> {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(|n| n.to_string()).unwrap_or_default()
        }
        fn bit(b: bool) -> String {
            if b { "1" } else { "0" }.to_string()
        }

        vec![
            opt(&self.src_port),
            opt(&self.dst_port),
            bit(self.flag_syn),
            bit(self.flag_ack),
            bit(self.flag_psh),
            bit(self.flag_fin),
            bit(self.flag_rst),
            opt(&self.seq),
            opt(&self.ack_num),
            opt(&self.win),
            opt(&self.payload_len),
            self.tcp_anomaly.clone().unwrap_or_default(),
            bit(self.size_limited),
        ]
    }
}

impl Record for ParsedFields {
    const NAME: &'static str = "ParsedFields";

    fn to_dict(&self) -> IndexMap<String, FieldValue> {
        fn num<T: Into<i64> + Copy>(v: &Option<T>) -> FieldValue {
            match v {
                Some(n) => FieldValue::Int((*n).into()),
                None => FieldValue::Null,
            }
        }

        let mut dict = IndexMap::with_capacity(Self::COLUMNS.len());
        dict.insert("src_port".to_string(), num(&self.src_port));
        dict.insert("dst_port".to_string(), num(&self.dst_port));
        dict.insert("flag_syn".to_string(), FieldValue::Bool(self.flag_syn));
        dict.insert("flag_ack".to_string(), FieldValue::Bool(self.flag_ack));
        dict.insert("flag_psh".to_string(), FieldValue::Bool(self.flag_psh));
        dict.insert("flag_fin".to_string(), FieldValue::Bool(self.flag_fin));
        dict.insert("flag_rst".to_string(), FieldValue::Bool(self.flag_rst));
        dict.insert("seq".to_string(), num(&self.seq));
        dict.insert("ack_num".to_string(), num(&self.ack_num));
        dict.insert("win".to_string(), num(&self.win));
        dict.insert("payload_len".to_string(), num(&self.payload_len));
        dict.insert(
            "tcp_anomaly".to_string(),
            match &self.tcp_anomaly {
                Some(a) => FieldValue::Str(a.clone()),
                None => FieldValue::Null,
            },
        );
        dict.insert(
            "size_limited".to_string(),
            FieldValue::Bool(self.size_limited),
        );
        dict
    }
}
