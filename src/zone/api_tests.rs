// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the WHM API backend, driven through a scripted command
//! runner so no process is ever spawned.

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::command::{CommandReply, CommandRunner};
    use crate::dns_errors::HookError;
    use crate::serial::ZoneSerial;
    use crate::zone::record::SoaState;
    use crate::zone::soa::{SerialLookup, SoaProber};
    use crate::zone::{ApiBackend, ZoneBackend};

    /// Runner that replays scripted replies and records every invocation.
    struct ScriptedRunner {
        replies: Mutex<VecDeque<CommandReply>>,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl ScriptedRunner {
        fn new(replies: Vec<CommandReply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<CommandReply> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            let mut replies = self.replies.lock().unwrap();
            let last = replies
                .back()
                .cloned()
                .expect("scripted runner needs at least one reply");
            Ok(if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                last
            })
        }

        async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(())
        }
    }

    /// Lookup that always answers with a fixed serial; the prober is not
    /// under test here.
    struct FixedLookup;

    #[async_trait]
    impl SerialLookup for FixedLookup {
        async fn lookup(&self, _domain: &str) -> Result<Option<ZoneSerial>> {
            Ok(Some(ZoneSerial::new(2_024_010_101)))
        }
    }

    fn reply(stdout: &str) -> CommandReply {
        CommandReply {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn backend(runner: Arc<ScriptedRunner>) -> ApiBackend {
        let prober = SoaProber::new(Arc::new(FixedLookup), 1, Duration::from_millis(1));
        ApiBackend::with_transports(runner, prober)
    }

    const ACCEPTED: &str = "metadata:\n  reason: OK\n  result: 1\n";
    const SERIAL_CONFLICT: &str =
        "metadata:\n  reason: The serial number in the zone has changed\n  result: 0\n";
    const OTHER_REJECTION: &str = "metadata:\n  reason: Zone is locked\n  result: 0\n";

    // ========================================================================
    // Commit Retry Tests
    // ========================================================================

    #[tokio::test]
    async fn test_commit_succeeds_on_first_attempt() {
        let runner = ScriptedRunner::new(vec![reply(ACCEPTED)]);
        let backend = backend(runner.clone());

        let soa = SoaState::Serial(ZoneSerial::new(2_024_010_101));
        let outcome = backend
            .commit_record("example.com", "ns1.example.com", &soa, 86400)
            .await
            .unwrap();

        assert!(outcome.applied);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.contains(&"zone=example.com".to_string()));
        assert!(calls[0].1.contains(&"serial=2024010101".to_string()));
    }

    #[tokio::test]
    async fn test_persistent_serial_conflict_stops_after_ten_attempts() {
        let runner = ScriptedRunner::new(vec![reply(SERIAL_CONFLICT)]);
        let backend = backend(runner.clone());

        let soa = SoaState::Serial(ZoneSerial::new(2_024_010_101));
        let outcome = backend
            .commit_record("example.com", "ns1.example.com", &soa, 86400)
            .await
            .unwrap();

        // Bounded: exactly ten attempts, never an error, never a loop.
        assert!(!outcome.applied);
        let calls = runner.calls();
        assert_eq!(calls.len(), 10);
        for (i, (_, args)) in calls.iter().enumerate() {
            let expected = format!("serial={}", 2_024_010_101_u64 + i as u64);
            assert!(
                args.contains(&expected),
                "attempt {} should carry {expected}",
                i + 1
            );
        }
    }

    #[tokio::test]
    async fn test_conflict_then_acceptance_stops_retrying() {
        let runner = ScriptedRunner::new(vec![
            reply(SERIAL_CONFLICT),
            reply(SERIAL_CONFLICT),
            reply(ACCEPTED),
        ]);
        let backend = backend(runner.clone());

        let soa = SoaState::Serial(ZoneSerial::new(2_024_010_101));
        let outcome = backend
            .commit_record("example.com", "ns1.example.com", &soa, 86400)
            .await
            .unwrap();

        assert!(outcome.applied);
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_non_serial_rejection_is_not_retried() {
        let runner = ScriptedRunner::new(vec![reply(OTHER_REJECTION)]);
        let backend = backend(runner.clone());

        let soa = SoaState::Serial(ZoneSerial::new(2_024_010_101));
        let outcome = backend
            .commit_record("example.com", "ns1.example.com", &soa, 86400)
            .await
            .unwrap();

        assert!(!outcome.applied);
        assert_eq!(outcome.reason, "Zone is locked");
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_without_serial_is_a_commit_error() {
        let runner = ScriptedRunner::new(vec![reply(ACCEPTED)]);
        let backend = backend(runner.clone());

        let err = backend
            .commit_record("example.com", "ns1.example.com", &SoaState::Untracked, 86400)
            .await
            .unwrap_err();

        assert!(matches!(err, HookError::Commit(_)));
        assert!(err.is_recoverable());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_commit_payload_shape() {
        let runner = ScriptedRunner::new(vec![reply(ACCEPTED)]);
        let backend = backend(runner.clone());

        let soa = SoaState::Serial(ZoneSerial::new(2_024_010_101));
        backend
            .commit_record("example.com", "ns1.example.com", &soa, 86400)
            .await
            .unwrap();

        let calls = runner.calls();
        let add = calls[0]
            .1
            .iter()
            .find(|arg| arg.starts_with("add="))
            .expect("update call carries an add payload");
        let payload: serde_json::Value =
            serde_json::from_str(add.strip_prefix("add=").unwrap()).unwrap();
        assert_eq!(payload["dname"], "example.com.");
        assert_eq!(payload["ttl"], 86400);
        assert_eq!(payload["record_type"], "NS");
        assert_eq!(payload["data"][0], "ns1.example.com");
    }

    // ========================================================================
    // Zone Read Tests
    // ========================================================================

    #[tokio::test]
    async fn test_read_zone_parses_dump() {
        let dump = "\
Line: 13
name: example.com.
ttl: '86400'
type: NS
nsdname: ns1.example.com.
";
        let runner = ScriptedRunner::new(vec![reply(dump)]);
        let backend = backend(runner.clone());

        let records = backend.read_zone("example.com").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, "ns1.example.com.");

        let calls = runner.calls();
        assert_eq!(calls[0].1[0], "dumpzone");
        assert_eq!(calls[0].1[1], "zone=example.com");
    }

    #[tokio::test]
    async fn test_read_zone_failure_is_fatal() {
        let runner = ScriptedRunner::new(vec![CommandReply {
            success: false,
            stdout: String::new(),
            stderr: "API failure: Unknown zone".to_string(),
        }]);
        let backend = backend(runner.clone());

        let err = backend.read_zone("example.com").await.unwrap_err();
        assert!(matches!(err, HookError::Zone(_)));
        assert!(!err.is_recoverable());
    }

    // ========================================================================
    // Probe and Finalize Tests
    // ========================================================================

    #[tokio::test]
    async fn test_probe_soa_reports_serial_state() {
        let runner = ScriptedRunner::new(vec![reply(ACCEPTED)]);
        let backend = backend(runner.clone());

        let soa = backend.probe_soa("example.com").await.unwrap();
        assert_eq!(soa, SoaState::Serial(ZoneSerial::new(2_024_010_101)));
    }

    #[tokio::test]
    async fn test_finalize_swallows_cache_refresh_failure() {
        let runner = ScriptedRunner::new(vec![CommandReply {
            success: false,
            stdout: String::new(),
            stderr: "cache refresh exploded".to_string(),
        }]);
        let backend = backend(runner.clone());

        // Must not panic or error; the refresh is best-effort.
        backend.finalize("example.com").await;
        assert_eq!(runner.calls().len(), 1);
    }
}
