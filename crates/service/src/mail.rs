//! Outgoing notifications.
//!
//! `Notifier` renders the templates and hands them to a `Mailer` on a
//! spawned task. Delivery failures are logged and never reach the caller.
//! Sends still in flight can be awaited with [`Notifier::drain`] on shutdown.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),
    #[error("mail relay rejected message with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Writes mails to the log instead of delivering them.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, "mail (log transport)");
        debug!(body = %mail.body, "mail body");
        Ok(())
    }
}

/// POSTs `{from,to,subject,body}` as JSON to an HTTP mail relay.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&mail)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(MailError::Rejected(resp.status().as_u16()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Held by each spawned send; the last one out wakes `drain`.
struct InFlightGuard(Arc<InFlight>);

impl InFlightGuard {
    fn enter(inflight: &Arc<InFlight>) -> Self {
        inflight.count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(inflight))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    inflight: Arc<InFlight>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>) -> Self {
        Self { mailer, from: from.into(), inflight: Arc::default() }
    }

    pub fn pending(&self) -> usize {
        self.inflight.count.load(Ordering::SeqCst)
    }

    /// Wait for spawned sends to finish. Returns false when `limit` elapsed first.
    pub async fn drain(&self, limit: Duration) -> bool {
        let wait = async {
            loop {
                let idle = self.inflight.idle.notified();
                if self.pending() == 0 {
                    return;
                }
                idle.await;
            }
        };
        match tokio::time::timeout(limit, wait).await {
            Ok(()) => true,
            Err(_) => {
                warn!(pending = self.pending(), "mail queue not drained before deadline");
                false
            }
        }
    }

    pub fn otp_mail(&self, to: &str, code: &str, ttl_minutes: i64) -> OutgoingMail {
        OutgoingMail {
            from: self.from.clone(),
            to: to.to_string(),
            subject: "StartupOcean - Email Verification OTP".to_string(),
            body: format!(
                "Your OTP for StartupOcean is: {}\n\nThis OTP is valid for {} minutes.\n\nIf you did not request this, please ignore this email.",
                code, ttl_minutes
            ),
        }
    }

    pub fn collaboration_mail(&self, to: &str, requester_name: &str, message: Option<&str>) -> OutgoingMail {
        OutgoingMail {
            from: self.from.clone(),
            to: to.to_string(),
            subject: format!("New Collaboration Request from {}", requester_name),
            body: format!(
                "You have received a new collaboration request from {}.\n\nMessage: {}\n\nLog in to StartupOcean to accept or reject it.",
                requester_name,
                message.unwrap_or("")
            ),
        }
    }

    pub fn send_otp(&self, to: &str, code: &str, ttl_minutes: i64) {
        self.dispatch(self.otp_mail(to, code, ttl_minutes));
    }

    pub fn send_collaboration_request(&self, to: &str, requester_name: &str, message: Option<&str>) {
        self.dispatch(self.collaboration_mail(to, requester_name, message));
    }

    /// Fire-and-forget delivery on the current runtime.
    fn dispatch(&self, mail: OutgoingMail) {
        let mailer = Arc::clone(&self.mailer);
        let guard = InFlightGuard::enter(&self.inflight);
        tokio::spawn(async move {
            let _guard = guard;
            let to = mail.to.clone();
            if let Err(e) = mailer.send(mail).await {
                error!(%to, error = %e, "mail delivery failed");
            }
        });
    }
}

/// Keeps every mail it is given; lets tests observe notifications.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: tokio::sync::Mutex<Vec<OutgoingMail>>,
}

#[cfg(test)]
impl RecordingMailer {
    /// Wait until at least `n` mails arrived or give up after ~1s.
    pub async fn wait_for(&self, n: usize) -> Vec<OutgoingMail> {
        for _ in 0..100 {
            {
                let sent = self.sent.lock().await;
                if sent.len() >= n { return sent.clone(); }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.sent.lock().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().await.push(mail);
        Ok(())
    }
}
