//! Rebuild the nested scope tree of a single call.
//!
//! Open events push a scope, Close events pop the most recent one.
//! Matching is positional (LIFO) and never by tag: nested scopes
//! routinely share a tag, e.g. repeated reads inside one handler.
//!
//! Example (depth shown as indentation):
//! ```text
//! server_request_call  {  t=0   -> depth 0, end 4
//!   read               {  t=1   -> depth 1, end 3
//!   read               }  t=3
//! server_request_call  }  t=4
//! ```

use super::partition::Call;
use crate::parser::schema::{EventKind, LineItem};
use crate::utils::error::Anomaly;
use log::{debug, info, warn};

/// Line items of one call plus what went wrong while building them
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTree {
    /// One item per Open or Mark event, in processing order
    pub items: Vec<LineItem>,

    pub anomalies: Vec<Anomaly>,
}

impl ScopeTree {
    /// Indices of the items directly enclosed by `parent`
    pub fn children_of(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.parent == Some(parent))
            .map(|(idx, _)| idx)
    }
}

/// Build line items for one call
///
/// **Public** - main entry point for scope reconstruction
///
/// # Algorithm
/// 1. Keep a stack of indices of pending Open items
/// 2. Open: depth = stack size, then push
/// 3. Close: pop and stamp the end time; an empty stack is a dangling close
/// 4. Mark: zero-length item at the current depth
/// 5. Items left on the stack stay open (`end_timestamp = None`)
pub fn build_line_items(call: &Call) -> ScopeTree {
    let mut items: Vec<LineItem> = Vec::with_capacity(call.events.len());
    let mut anomalies = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for event in &call.events {
        let parent = stack.last().copied();

        match event.kind {
            EventKind::Open => {
                items.push(LineItem::new(event.clone(), stack.len(), parent));
                stack.push(items.len() - 1);
            }
            EventKind::Close => match stack.pop() {
                Some(idx) => items[idx].end_timestamp = Some(event.timestamp),
                None => {
                    let anomaly = Anomaly::DanglingClose {
                        call_key: call.key.clone(),
                        line: event.record_line,
                    };
                    warn!("{}", anomaly);
                    anomalies.push(anomaly);
                }
            },
            EventKind::Mark => {
                let mut item = LineItem::new(event.clone(), stack.len(), parent);
                item.end_timestamp = Some(event.timestamp);
                items.push(item);
            }
        }
    }

    for idx in stack {
        let item = &items[idx];
        let anomaly = Anomaly::UnterminatedScope {
            call_key: call.key.clone(),
            tag: item.event.tag.clone(),
            line: item.event.record_line,
        };
        info!("{}", anomaly);
        anomalies.push(anomaly);
    }

    debug!(
        "Call {}: {} events -> {} line items",
        call.key,
        call.events.len(),
        items.len()
    );

    ScopeTree { items, anomalies }
}
