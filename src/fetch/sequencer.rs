// Request sequencing for schedule fetches
//
// Every dispatched request gets a monotonically increasing sequence number. A
// response is applied only if it answers the latest dispatched request; anything
// older is discarded no matter when it arrives. Identical queries already in
// flight are not dispatched twice; re-requesting one moves it to the latest
// sequence number so its pending response is the one applied.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{DataType, HiringType};

/// Filter parameters sent to the schedule backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub hiring_type: Option<HiringType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ScheduleQuery {
    /// Serialized form used as the in-flight de-duplication key
    pub fn key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Handle for one dispatched request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub key: String,
    pub query: ScheduleQuery,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
    /// Query key -> sequence number its response answers
    in_flight: HashMap<String, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request. Returns `None` when the identical query is already
    /// in flight; that pending request then answers the latest sequence number.
    pub fn dispatch(&mut self, query: ScheduleQuery) -> Option<RequestTicket> {
        let key = query.key();
        if let Some(seq) = self.in_flight.get_mut(&key) {
            if *seq != self.latest {
                self.latest += 1;
                *seq = self.latest;
            }
            log::debug!("Skipping duplicate in-flight request {} (seq={})", key, seq);
            return None;
        }

        self.latest += 1;
        self.in_flight.insert(key.clone(), self.latest);
        Some(RequestTicket {
            seq: self.latest,
            key,
            query,
        })
    }

    /// Mark a request finished. Returns true when its response should be applied.
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        let seq = self.in_flight.remove(&ticket.key).unwrap_or(ticket.seq);
        let accepted = seq == self.latest;
        if !accepted {
            log::debug!(
                "Discarding stale response seq={} (latest dispatched {})",
                seq,
                self.latest
            );
        }
        accepted
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
