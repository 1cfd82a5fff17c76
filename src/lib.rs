//! # pktinfo: Structured Field Extraction for Capture Info Columns
//!
//! pktinfo turns the free-text protocol summary line ("Info" column) found
//! in packet-capture CSV exports into a fixed-shape record of typed TCP
//! fields, and joins those fields back onto the table as new columns.
//!
//! ## Features
//!
//! - **Fixed-shape records**: every input yields all 13 fields, each with a
//!   value or its explicit default, never a sparse key set
//! - **Total extraction**: pattern misses produce absent fields, not errors;
//!   any string (including empty) is valid input
//! - **Independent rules**: anomaly annotation, port pair, flag list, numeric
//!   `Key=value` fields, and truncation marker are matched independently over
//!   the same line
//! - **Column pipeline**: CSV in, widened CSV or NDJSON out, with input row
//!   order preserved
//!
//! ## Example
//!
//! ```
//! use pktinfo::InfoExtractor;
//!
//! let extractor = InfoExtractor::new();
//! let fields = extractor.extract(
//!     "[TCP Retransmission] 443 > 52144 [PSH, ACK] Seq=1 Ack=1 Win=501 Len=517",
//! );
//!
//! assert_eq!(fields.tcp_anomaly.as_deref(), Some("TCP Retransmission"));
//! assert_eq!(fields.src_port, Some(443));
//! assert!(fields.flag_psh && fields.flag_ack);
//! assert_eq!(fields.payload_len, Some(517));
//! ```

// Core modules
pub mod record;
pub mod rules;

// Tabular I/O collaborator
pub mod pipeline;

// Re-export key types
pub use record::{FieldValue, ParsedFields, Record};
pub use rules::InfoExtractor;

// Re-export pipeline types
pub use pipeline::{parse_table, OutputFormat, PipelineError, PipelineReport};
