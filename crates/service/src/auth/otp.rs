//! One-time passcodes keyed by normalised email.
//!
//! Codes live in process memory only. Consumption goes through
//! `DashMap::remove_if`, so at most one verification of a code can succeed.
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    /// Matched and removed.
    Valid,
    /// Nothing stored for this email.
    Missing,
    Mismatch,
    /// Matched but past expiry; the entry is dropped.
    Expired,
}

pub trait OtpStore: Send + Sync {
    fn put(&self, email: &str, code: String, expires_at: DateTime<Utc>);
    fn peek(&self, email: &str) -> Option<OtpEntry>;
    fn check_and_consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> OtpCheck;
}

#[derive(Default)]
pub struct InMemoryOtpStore {
    entries: DashMap<String, OtpEntry>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn key(email: &str) -> String { email.trim().to_lowercase() }

impl OtpStore for InMemoryOtpStore {
    fn put(&self, email: &str, code: String, expires_at: DateTime<Utc>) {
        let now = Utc::now();
        self.entries.retain(|_, e| e.expires_at > now);
        self.entries.insert(key(email), OtpEntry { code, expires_at });
    }

    fn peek(&self, email: &str) -> Option<OtpEntry> {
        self.entries.get(&key(email)).map(|e| e.value().clone())
    }

    fn check_and_consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> OtpCheck {
        let k = key(email);
        let code = code.trim();
        if self.entries.remove_if(&k, |_, e| e.code == code && e.expires_at > now).is_some() {
            return OtpCheck::Valid;
        }
        let current = self.entries.get(&k).map(|e| e.value().clone());
        match current {
            None => OtpCheck::Missing,
            Some(e) if e.code != code => OtpCheck::Mismatch,
            Some(_) => {
                self.entries.remove_if(&k, |_, e| e.expires_at <= now);
                OtpCheck::Expired
            }
        }
    }
}

/// Six digit code in 100000..=999999.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

pub fn expiry_from(now: DateTime<Utc>, ttl_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(ttl_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..200 {
            let c = generate_code();
            assert_eq!(c.len(), 6);
            let n: u32 = c.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn valid_code_is_single_use() {
        let store = InMemoryOtpStore::new();
        let now = Utc::now();
        store.put("User@Example.com", "123456".into(), expiry_from(now, 10));
        assert_eq!(store.check_and_consume("user@example.com", "123456", now), OtpCheck::Valid);
        assert_eq!(store.check_and_consume("user@example.com", "123456", now), OtpCheck::Missing);
    }

    #[test]
    fn mismatch_keeps_the_code() {
        let store = InMemoryOtpStore::new();
        let now = Utc::now();
        store.put("a@b.co", "111111".into(), expiry_from(now, 10));
        assert_eq!(store.check_and_consume("a@b.co", "222222", now), OtpCheck::Mismatch);
        assert_eq!(store.check_and_consume("a@b.co", "111111", now), OtpCheck::Valid);
    }

    #[test]
    fn expired_code_is_rejected_and_dropped() {
        let store = InMemoryOtpStore::new();
        let now = Utc::now();
        store.put("a@b.co", "111111".into(), expiry_from(now, 10));
        let later = now + Duration::minutes(11);
        assert_eq!(store.check_and_consume("a@b.co", "111111", later), OtpCheck::Expired);
        assert!(store.peek("a@b.co").is_none());
    }

    #[test]
    fn new_code_replaces_previous() {
        let store = InMemoryOtpStore::new();
        let now = Utc::now();
        store.put("a@b.co", "111111".into(), expiry_from(now, 10));
        store.put("a@b.co", "222222".into(), expiry_from(now, 10));
        assert_eq!(store.len(), 1);
        assert_eq!(store.check_and_consume("a@b.co", "111111", now), OtpCheck::Mismatch);
    }

    #[test]
    fn concurrent_verification_succeeds_once() {
        use std::sync::Arc;
        let store = Arc::new(InMemoryOtpStore::new());
        let now = Utc::now();
        store.put("race@b.co", "424242".into(), expiry_from(now, 10));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&store);
                std::thread::spawn(move || s.check_and_consume("race@b.co", "424242", now))
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| *r == OtpCheck::Valid)
            .count();
        assert_eq!(wins, 1);
    }
}
