// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the backend text decoders.

#[cfg(test)]
mod tests {
    use crate::zone::parser::{parse_update_reply, parse_zone_dump, parse_zone_file};
    use crate::zone::record::ZoneRecord;

    // ========================================================================
    // Zone Dump Parsing Tests
    // ========================================================================

    const DUMP_OUTPUT: &str = "\
---
data:
  zone:
    - record:
        - Line: 1
          name: example.com.
          ttl: '86400'
          type: SOA
        - Line: 13
          class: IN
          name: example.com.
          nsdname: ns1.example.com.
          ttl: '86400'
          type: NS
        - Line: 14
          address: 192.0.2.10
          class: IN
          name: www.example.com.
          ttl: '14400'
          type: A
metadata:
  command: dumpzone
  result: 1
";

    #[test]
    fn test_parse_zone_dump_extracts_records() {
        let records = parse_zone_dump(DUMP_OUTPUT);

        // Only the NS block carries a target field (nsdname); the SOA and A
        // blocks have neither nsdname nor data and are treated as not
        // existing.
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            ZoneRecord {
                name: "example.com.".to_string(),
                ttl: 86400,
                record_type: "NS".to_string(),
                target: "ns1.example.com.".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_zone_dump_falls_back_to_data_field() {
        let output = "\
Line: 5
name: example.com.
ttl: '86400'
type: NS
data: ns2.example.com.
";
        let records = parse_zone_dump(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, "ns2.example.com.");
    }

    #[test]
    fn test_parse_zone_dump_drops_incomplete_blocks() {
        let output = "\
Line: 1
name: example.com.
type: NS
Line: 2
name: example.com.
ttl: '86400'
type: NS
nsdname: ns1.example.com.
";
        // First block is missing its ttl entirely
        let records = parse_zone_dump(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, "ns1.example.com.");
    }

    #[test]
    fn test_parse_zone_dump_drops_non_numeric_ttl() {
        let output = "\
Line: 1
name: example.com.
ttl: one-day
type: NS
nsdname: ns1.example.com.
";
        assert!(parse_zone_dump(output).is_empty());
    }

    #[test]
    fn test_parse_zone_dump_empty_output() {
        assert!(parse_zone_dump("").is_empty());
        assert!(parse_zone_dump("metadata:\n  result: 0\n").is_empty());
    }

    // ========================================================================
    // Zone File Parsing Tests
    // ========================================================================

    const ZONE_FILE: &str = "\
; zone file for example.com
$TTL 86400

example.com. 86400 IN SOA ns1.example.com. admin.example.com. (
example.com. 86400 IN NS ns1.example.com.
www 14400 IN A 192.0.2.10
broken-line
";

    #[test]
    fn test_parse_zone_file_takes_first_four_columns() {
        let records = parse_zone_file(ZONE_FILE);

        // Comment, blank, "$TTL" (two columns) and "broken-line" are
        // dropped; the rest keep columns 0-3 as name/ttl/type/target.
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[1],
            ZoneRecord {
                name: "example.com.".to_string(),
                ttl: 86400,
                record_type: "IN".to_string(),
                target: "NS".to_string(),
            }
        );
        assert_eq!(records[2].name, "www");
        assert_eq!(records[2].ttl, 14400);
    }

    #[test]
    fn test_parse_zone_file_skips_comments_and_blanks() {
        let records = parse_zone_file("; only a comment\n\n   \n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_zone_file_drops_non_numeric_ttl() {
        let records = parse_zone_file("example.com. 1d IN NS ns1.example.com.\n");
        assert!(records.is_empty());
    }

    // ========================================================================
    // Update Reply Parsing Tests
    // ========================================================================

    #[test]
    fn test_parse_update_reply_success() {
        let reply = "\
---
metadata:
  command: mass_edit_dns_zone
  reason: OK
  result: 1
";
        let outcome = parse_update_reply(reply);
        assert!(outcome.applied);
        assert_eq!(outcome.result_code, Some(1));
        assert_eq!(outcome.reason, "OK");
        assert!(!outcome.is_serial_conflict());
    }

    #[test]
    fn test_parse_update_reply_serial_conflict() {
        let reply = "\
---
metadata:
  command: mass_edit_dns_zone
  reason: \"The zone's serial number has changed; reload and retry\"
  result: 0
";
        let outcome = parse_update_reply(reply);
        assert!(!outcome.applied);
        assert_eq!(outcome.result_code, Some(0));
        assert!(outcome.is_serial_conflict());
    }

    #[test]
    fn test_parse_update_reply_other_failure() {
        let reply = "metadata:\n  reason: Zone does not exist\n  result: 0\n";
        let outcome = parse_update_reply(reply);
        assert!(!outcome.applied);
        assert!(!outcome.is_serial_conflict());
    }

    #[test]
    fn test_parse_update_reply_undecodable_is_not_applied() {
        let outcome = parse_update_reply("garbage output");
        assert!(!outcome.applied);
        assert_eq!(outcome.result_code, None);
        assert_eq!(outcome.reason, "");
        assert!(!outcome.is_serial_conflict());
    }
}
