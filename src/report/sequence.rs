//! Latest-wins ordering for report requests that may resolve out of order.
//!
//! A client issues a [RequestTicket] per request, sends its value as the
//! `seq` query parameter and hands the response back to the
//! [ResponseSequencer], which only lets through the response for the most
//! recently issued ticket.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request issued by a [ResponseSequencer].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// The sequence number to send with the request.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Hands out increasing request tickets and discards responses to superseded requests.
#[derive(Debug, Default)]
pub struct ResponseSequencer {
    latest: AtomicU64,
}

impl ResponseSequencer {
    /// Create a sequencer that has not issued any tickets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier tickets.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` belongs to the most recently issued request.
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Return `response` if it answers the latest request, otherwise drop it.
    pub fn accept<T>(&self, ticket: RequestTicket, response: T) -> Option<T> {
        if self.is_latest(ticket) {
            Some(response)
        } else {
            tracing::debug!(
                "Discarding stale response for request {} (latest is {})",
                ticket.0,
                self.latest.load(Ordering::Acquire)
            );
            None
        }
    }

    /// Like [ResponseSequencer::accept] but for a `seq` echoed back by the server.
    ///
    /// Responses without a `seq` cannot be ordered and are discarded.
    pub fn accept_echoed<T>(&self, seq: Option<u64>, response: T) -> Option<T> {
        let ticket = RequestTicket(seq?);

        self.accept(ticket, response)
    }
}
