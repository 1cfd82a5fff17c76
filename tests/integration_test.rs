//! Integration tests for the pktinfo extraction core and column pipeline

use pktinfo::{parse_table, InfoExtractor, OutputFormat, ParsedFields, PipelineError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CAPTURE_HEADER: &str = "No.,Time,Source,Destination,Protocol,Length,Info";

fn write_capture_csv(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("capture.csv");
    let mut contents = String::from(CAPTURE_HEADER);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_pipeline_widens_csv_table() {
    let dir = TempDir::new().unwrap();
    let input = write_capture_csv(
        &dir,
        &[
            "1,0.000,10.0.0.2,10.0.0.1,TCP,74,52144 > 443 [SYN] Seq=0 Win=64240 Len=0",
            "2,0.013,10.0.0.1,10.0.0.2,TCP,591,\"[TCP Retransmission] 443 > 52144 [PSH, ACK] Seq=1 Ack=1 Win=501 Len=517\"",
            "3,0.020,10.0.0.2,8.8.8.8,DNS,89,Standard query 0x1a2b A example.com",
        ],
    );
    let output = dir.path().join("parsed.csv");

    let report = parse_table(&input, &output, "Info", OutputFormat::Csv).unwrap();
    assert_eq!(report.rows, 3);
    assert_eq!(report.columns, 7 + 13);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 20);
    assert_eq!(headers.get(0), Some("No."));
    assert_eq!(headers.get(7), Some("src_port"));
    assert_eq!(headers.get(19), Some("size_limited"));

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    // Row order matches the input; original columns are untouched.
    assert_eq!(rows[0].get(0), Some("1"));
    assert_eq!(rows[1].get(0), Some("2"));
    assert_eq!(rows[2].get(0), Some("3"));
    assert!(rows[1].get(6).unwrap().starts_with("[TCP Retransmission]"));

    // SYN row: ports and flags set, ack absent.
    assert_eq!(rows[0].get(7), Some("52144")); // src_port
    assert_eq!(rows[0].get(8), Some("443")); // dst_port
    assert_eq!(rows[0].get(9), Some("1")); // flag_syn
    assert_eq!(rows[0].get(10), Some("0")); // flag_ack
    assert_eq!(rows[0].get(15), Some("")); // ack_num
    assert_eq!(rows[0].get(18), Some("")); // tcp_anomaly

    // Retransmission row: anomaly text plus full numeric set.
    assert_eq!(rows[1].get(7), Some("443"));
    assert_eq!(rows[1].get(10), Some("1")); // flag_ack
    assert_eq!(rows[1].get(11), Some("1")); // flag_psh
    assert_eq!(rows[1].get(14), Some("1")); // seq
    assert_eq!(rows[1].get(15), Some("1")); // ack_num
    assert_eq!(rows[1].get(16), Some("501")); // win
    assert_eq!(rows[1].get(17), Some("517")); // payload_len
    assert_eq!(rows[1].get(18), Some("TCP Retransmission"));

    // Non-TCP row: all extracted cells take their defaults.
    assert_eq!(rows[2].get(7), Some(""));
    assert_eq!(rows[2].get(9), Some("0"));
    assert_eq!(rows[2].get(18), Some(""));
    assert_eq!(rows[2].get(19), Some("0"));
}

#[test]
fn test_pipeline_ndjson_output_is_typed() {
    let dir = TempDir::new().unwrap();
    let input = write_capture_csv(
        &dir,
        &[
            "1,0.000,10.0.0.2,10.0.0.1,TCP,74,52144 > 443 [SYN] Seq=0 Win=64240 Len=0",
            "2,0.500,10.0.0.1,10.0.0.2,TCP,60,443 > 52144 [TCP ACKed segment that was not captured] [size limited during capture]",
        ],
    );
    let output = dir.path().join("parsed.ndjson");

    let report = parse_table(&input, &output, "Info", OutputFormat::Ndjson).unwrap();
    assert_eq!(report.rows, 2);

    let contents = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["No."], "1");
    assert_eq!(first["Protocol"], "TCP");
    assert_eq!(first["src_port"], 52144);
    assert_eq!(first["flag_syn"], true);
    assert_eq!(first["seq"], 0);
    assert!(first["ack_num"].is_null());
    assert!(first["tcp_anomaly"].is_null());

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(
        second["tcp_anomaly"],
        "TCP ACKed segment that was not captured"
    );
    assert_eq!(second["size_limited"], true);
    assert_eq!(second["flag_ack"], false);
}

#[test]
fn test_pipeline_missing_column_fails_fast() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("capture.csv");
    fs::write(&path, "No.,Time,Summary\n1,0.0,hello\n").unwrap();
    let output = dir.path().join("parsed.csv");

    let err = parse_table(&path, &output, "Info", OutputFormat::Csv).unwrap_err();
    match err {
        PipelineError::MissingColumn { column } => assert_eq!(column, "Info"),
        other => panic!("expected MissingColumn, got {}", other),
    }
}

#[test]
fn test_pipeline_custom_column_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("capture.csv");
    fs::write(&path, "id,summary\n7,\"1 > 2 [FIN, ACK] Seq=9\"\n").unwrap();
    let output = dir.path().join("parsed.csv");

    let report = parse_table(&path, &output, "summary", OutputFormat::Csv).unwrap();
    assert_eq!(report.rows, 1);
    assert_eq!(report.columns, 2 + 13);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(row.get(2), Some("1")); // src_port
    assert_eq!(row.get(5), Some("1")); // flag_ack
    assert_eq!(row.get(7), Some("1")); // flag_fin
}

#[test]
fn test_extractor_spec_vectors() {
    let extractor = InfoExtractor::new();

    let syn = extractor.extract("52144 > 443 [SYN, ECN] Seq=0 Win=64240 Len=0");
    assert_eq!(syn.src_port, Some(52144));
    assert_eq!(syn.dst_port, Some(443));
    assert!(syn.flag_syn && !syn.flag_ack);
    assert_eq!(
        (syn.seq, syn.win, syn.payload_len),
        (Some(0), Some(64240), Some(0))
    );
    assert_eq!(syn.ack_num, None);
    assert_eq!(syn.tcp_anomaly, None);
    assert!(!syn.size_limited);

    let pdu = extractor.extract("[TCP segment of a reassembled PDU]");
    assert_eq!(
        pdu.tcp_anomaly.as_deref(),
        Some("TCP segment of a reassembled PDU")
    );
    assert_eq!(pdu.src_port, None);
    assert!(!pdu.flag_syn && !pdu.flag_ack);

    assert_eq!(extractor.extract(""), ParsedFields::default());
}

#[test]
fn test_extraction_is_pure_across_instances() {
    let info = "[TCP Dup ACK 5#2] 993 > 50412 [ACK] Seq=77 Ack=12 Win=2048 Len=0";
    let first = InfoExtractor::new().extract(info);
    let second = InfoExtractor::new().extract(info);
    assert_eq!(first, second);
}
