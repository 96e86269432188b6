// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the SOA prober's bounded fixed-interval polling.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::serial::ZoneSerial;
    use crate::zone::soa::{SerialLookup, SoaProber};

    /// Lookup that answers `None` (or an error) until a configured attempt.
    struct CountdownLookup {
        attempts: AtomicU32,
        resolve_on: u32,
        fail_queries: bool,
    }

    impl CountdownLookup {
        fn resolving_on(resolve_on: u32) -> Arc<Self> {
            Arc::new(Self {
                attempts: AtomicU32::new(0),
                resolve_on,
                fail_queries: false,
            })
        }

        fn never_resolving() -> Arc<Self> {
            Self::resolving_on(u32::MAX)
        }

        fn always_failing() -> Arc<Self> {
            Arc::new(Self {
                attempts: AtomicU32::new(0),
                resolve_on: u32::MAX,
                fail_queries: true,
            })
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SerialLookup for CountdownLookup {
        async fn lookup(&self, _domain: &str) -> Result<Option<ZoneSerial>> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_queries {
                anyhow::bail!("resolver unreachable");
            }
            if attempt >= self.resolve_on {
                Ok(Some(ZoneSerial::new(2_024_010_101)))
            } else {
                Ok(None)
            }
        }
    }

    fn prober(lookup: Arc<CountdownLookup>, max_attempts: u32) -> SoaProber {
        SoaProber::new(lookup, max_attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_probe_returns_serial_on_first_answer() {
        let lookup = CountdownLookup::resolving_on(1);
        let serial = prober(lookup.clone(), 15).probe("example.com").await.unwrap();

        assert_eq!(serial, ZoneSerial::new(2_024_010_101));
        assert_eq!(lookup.attempts(), 1);
    }

    #[tokio::test]
    async fn test_probe_polls_until_zone_appears() {
        let lookup = CountdownLookup::resolving_on(3);
        let serial = prober(lookup.clone(), 15).probe("example.com").await.unwrap();

        assert_eq!(serial, ZoneSerial::new(2_024_010_101));
        assert_eq!(lookup.attempts(), 3);
    }

    #[tokio::test]
    async fn test_probe_performs_exactly_the_configured_attempts() {
        let lookup = CountdownLookup::never_resolving();
        let err = prober(lookup.clone(), 5).probe("example.com").await.unwrap_err();

        assert_eq!(lookup.attempts(), 5);
        assert_eq!(err.domain, "example.com");
        assert_eq!(err.attempts, 5);
    }

    #[tokio::test]
    async fn test_lookup_errors_consume_attempts() {
        let lookup = CountdownLookup::always_failing();
        let err = prober(lookup.clone(), 4).probe("example.com").await.unwrap_err();

        assert_eq!(lookup.attempts(), 4);
        assert_eq!(err.attempts, 4);
    }

    #[tokio::test]
    async fn test_probe_resolving_on_final_attempt_succeeds() {
        let lookup = CountdownLookup::resolving_on(5);
        let serial = prober(lookup.clone(), 5).probe("example.com").await.unwrap();

        assert_eq!(serial, ZoneSerial::new(2_024_010_101));
        assert_eq!(lookup.attempts(), 5);
    }
}
