//! Group the flat event stream into calls.
//!
//! Events are grouped by `callPtr`. A group can hold more than one call:
//! the runtime reuses the address of a freed call object, so a second
//! call-initiating Open on the same pointer means a new call began.
//! Such groups are split and keyed `<callPtr>_<n>`.

use crate::parser::schema::{CallId, Event};
use log::debug;

/// The events of one logical call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// `<callPtr>`, or `<callPtr>_<n>` when the pointer held several calls
    pub key: String,

    pub call_id: CallId,

    /// Events in processing order
    pub events: Vec<Event>,
}

/// Split the events of one call id at every call-initiating Open
///
/// **Public** - used by `partition_calls` and by idempotence tests
///
/// Events before the first call-initiating Open (a trace that started
/// mid-call) form their own sub-group.
pub fn split_reused_calls(events: Vec<Event>, call_start_tag: &str) -> Vec<Vec<Event>> {
    let mut groups: Vec<Vec<Event>> = Vec::new();
    let mut current: Vec<Event> = Vec::new();

    for event in events {
        if event.starts_call(call_start_tag) && !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
        current.push(event);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Partition the full event sequence into calls
///
/// **Public** - main entry point for partitioning
///
/// # Arguments
/// * `events` - Decoded events in input order
/// * `call_start_tag` - Tag of the Open event that begins a call
///
/// # Returns
/// Calls ordered by call id, then by sub-group index
pub fn partition_calls(mut events: Vec<Event>, call_start_tag: &str) -> Vec<Call> {
    debug!("Partitioning {} events by call id", events.len());

    // Stable: equal ids and timestamps keep input order
    events.sort_by(|a, b| {
        a.call_id
            .cmp(&b.call_id)
            .then_with(|| a.timestamp.total_cmp(&b.timestamp))
    });

    let mut calls = Vec::new();
    let mut iter = events.into_iter().peekable();

    while let Some(first) = iter.next() {
        let call_id = first.call_id.clone();
        let mut group = vec![first];
        while let Some(next) = iter.next_if(|e| e.call_id == call_id) {
            group.push(next);
        }

        let sub_groups = split_reused_calls(group, call_start_tag);
        if sub_groups.len() == 1 {
            calls.extend(sub_groups.into_iter().map(|events| Call {
                key: call_id.to_string(),
                call_id: call_id.clone(),
                events,
            }));
        } else {
            debug!(
                "Call id {} was reused for {} calls",
                call_id,
                sub_groups.len()
            );
            for (idx, events) in sub_groups.into_iter().enumerate() {
                calls.push(Call {
                    key: format!("{}_{}", call_id, idx),
                    call_id: call_id.clone(),
                    events,
                });
            }
        }
    }

    debug!("Partitioned into {} calls", calls.len());
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::EventKind;

    fn event(tag: &str, kind: EventKind, t: f64, call: u64, line: usize) -> Event {
        Event {
            tag: tag.to_string(),
            kind,
            timestamp: t,
            important: false,
            source_file: "a".to_string(),
            source_line: 1,
            call_id: CallId::Num(call),
            cq_tag: None,
            record_line: line,
        }
    }

    #[test]
    fn test_groups_by_call_id() {
        let events = vec![
            event("server_request_call", EventKind::Open, 0.0, 9, 1),
            event("server_request_call", EventKind::Open, 1.0, 3, 2),
            event("server_request_call", EventKind::Close, 2.0, 9, 3),
            event("server_request_call", EventKind::Close, 3.0, 3, 4),
        ];

        let calls = partition_calls(events, "server_request_call");

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].key, "3");
        assert_eq!(calls[1].key, "9");
        assert_eq!(
            calls[1].events.iter().map(|e| e.record_line).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_splits_reused_call_id() {
        let events = vec![
            event("server_request_call", EventKind::Open, 0.0, 7, 1),
            event("server_request_call", EventKind::Close, 1.0, 7, 2),
            event("server_request_call", EventKind::Open, 2.0, 7, 3),
            event("server_request_call", EventKind::Close, 3.0, 7, 4),
        ];

        let calls = partition_calls(events, "server_request_call");

        let keys: Vec<&str> = calls.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["7_0", "7_1"]);
        assert_eq!(calls[0].events.len(), 2);
        assert_eq!(calls[1].events[0].record_line, 3);
    }

    #[test]
    fn test_mid_call_prefix_is_kept() {
        let events = vec![
            event("read", EventKind::Close, 0.0, 4, 1),
            event("server_request_call", EventKind::Open, 1.0, 4, 2),
        ];

        let calls = partition_calls(events, "server_request_call");

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].key, "4_0");
        assert_eq!(calls[0].events[0].tag, "read");
    }

    #[test]
    fn test_orders_by_timestamp_stably() {
        let events = vec![
            event("b", EventKind::Mark, 5.0, 1, 1),
            event("a", EventKind::Mark, 2.0, 1, 2),
            event("c", EventKind::Mark, 5.0, 1, 3),
        ];

        let calls = partition_calls(events, "server_request_call");

        let tags: Vec<&str> = calls[0].events.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_custom_start_tag() {
        let events = vec![
            event("client_call", EventKind::Open, 0.0, 1, 1),
            event("client_call", EventKind::Open, 1.0, 1, 2),
        ];

        assert_eq!(partition_calls(events.clone(), "server_request_call").len(), 1);
        assert_eq!(partition_calls(events, "client_call").len(), 2);
    }
}
