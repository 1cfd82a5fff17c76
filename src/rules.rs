//! Pattern rules for turning one protocol summary line into typed fields.
//!
//! Each rule is an independent pattern match over the same input string;
//! the rules write into disjoint fields of one [`ParsedFields`] record, so
//! their evaluation order does not matter. Extraction is total: an input
//! matching none of the patterns yields a record of defaults.

use regex::Regex;

use crate::record::ParsedFields;

/// Compiled pattern set for info-string field extraction.
///
/// Patterns are compiled once at construction and reused for every input.
/// The extractor holds no mutable state, so a single instance can be
/// shared freely across threads.
///
/// # Example
///
/// ```
/// use pktinfo::InfoExtractor;
///
/// let extractor = InfoExtractor::new();
/// let fields = extractor.extract("52144 > 443 [SYN] Seq=0 Win=64240 Len=0");
///
/// assert_eq!(fields.src_port, Some(52144));
/// assert_eq!(fields.dst_port, Some(443));
/// assert!(fields.flag_syn);
/// assert_eq!(fields.win, Some(64240));
/// ```
pub struct InfoExtractor {
    /// First bracketed segment whose interior starts with `TCP `
    anomaly: Regex,
    /// Any bracketed segment (stripped before port matching)
    bracket: Regex,
    /// Leading `<digits> > <digits>` port pair
    ports: Regex,
    /// First bracketed segment of uppercase letters, commas, and spaces
    flags: Regex,
    seq: Regex,
    ack: Regex,
    win: Regex,
    len: Regex,
}

impl InfoExtractor {
    /// Compile the pattern set.
    pub fn new() -> Self {
        // All patterns are literals; compilation cannot fail.
        let compile = |pattern: &str| Regex::new(pattern).expect("hard-coded pattern compiles");

        Self {
            anomaly: compile(r"\[(TCP [^\]]+)\]"),
            bracket: compile(r"\[[^\]]*\]"),
            ports: compile(r"^(\d+)\s+>\s+(\d+)"),
            flags: compile(r"\[([A-Z, ]+)\]"),
            seq: compile(r"Seq=(\d+)"),
            ack: compile(r"Ack=(\d+)"),
            win: compile(r"Win=(\d+)"),
            len: compile(r"Len=(\d+)"),
        }
    }

    /// Extract all fields from one info string.
    ///
    /// Total over every input, including the empty string: fields whose
    /// pattern does not match keep their default/absent value, which is
    /// normal behavior rather than an error.
    pub fn extract(&self, info: &str) -> ParsedFields {
        let mut fields = ParsedFields::default();

        if let Some(anomaly) = self.detect_anomaly(info) {
            fields.tcp_anomaly = Some(anomaly.to_string());
        }

        if let Some((src, dst)) = self.extract_ports(info) {
            fields.src_port = Some(src);
            fields.dst_port = Some(dst);
        }

        if let Some(list) = self.flag_bracket(info) {
            fields.flag_syn = list.contains("SYN");
            fields.flag_ack = list.contains("ACK");
            fields.flag_psh = list.contains("PSH");
            fields.flag_fin = list.contains("FIN");
            fields.flag_rst = list.contains("RST");
        }

        fields.seq = self.first_number(&self.seq, info);
        fields.ack_num = self.first_number(&self.ack, info);
        fields.win = self.first_number(&self.win, info);
        fields.payload_len = self.first_number(&self.len, info);

        fields.size_limited = info.to_lowercase().contains("size limited");

        fields
    }

    /// Extract a batch of info strings, preserving input order.
    pub fn extract_all<'a, I>(&self, infos: I) -> Vec<ParsedFields>
    where
        I: IntoIterator<Item = &'a str>,
    {
        infos.into_iter().map(|info| self.extract(info)).collect()
    }

    /// Interior of the first `[TCP ...]` annotation, e.g. `TCP Out-Of-Order`.
    fn detect_anomaly<'a>(&self, info: &'a str) -> Option<&'a str> {
        self.anomaly
            .captures(info)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Leading `src > dst` port pair, matched after every bracketed
    /// segment is removed so bracket text cannot produce a false pair.
    ///
    /// Either both ports parse or neither is reported.
    fn extract_ports(&self, info: &str) -> Option<(u16, u16)> {
        let clean = self.bracket.replace_all(info, "");
        let caps = self.ports.captures(clean.trim())?;

        match (caps[1].parse().ok(), caps[2].parse().ok()) {
            (Some(src), Some(dst)) => Some((src, dst)),
            _ => None,
        }
    }

    /// Interior of the first bracket holding only uppercase letters,
    /// commas, and spaces (a flag list such as `SYN, ACK`).
    fn flag_bracket<'a>(&self, info: &'a str) -> Option<&'a str> {
        self.flags
            .captures(info)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// First `Key=<digits>` occurrence for one of the numeric patterns.
    /// Digit runs that overflow the field width are treated as no match.
    fn first_number(&self, pattern: &Regex, info: &str) -> Option<u32> {
        pattern
            .captures(info)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

impl Default for InfoExtractor {
    fn default() -> Self {
        Self::new()
    }
}
