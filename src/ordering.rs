//! Presentation order for catalog records.
//!
//! Both record kinds sort by namespace, then controller (an absent controller sorts as the
//! empty string). Handlers then put higher-priority verbs first and break ties on the
//! argument list; routes compare the argument list before the verb, so all verbs of one
//! path stay together. Sorting is stable: records equal on every key keep catalog order.

use crate::record::{GeneralHandlerRecord, HandlerRecord, RouteRecord, Verb};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

fn controller_key<V: Verb>(record: &HandlerRecord<V>) -> &str {
    record.controller().unwrap_or("")
}

pub fn compare_handlers(a: &GeneralHandlerRecord, b: &GeneralHandlerRecord) -> Ordering {
    a.namespace()
        .cmp(b.namespace())
        .then_with(|| controller_key(a).cmp(controller_key(b)))
        .then_with(|| b.verb().priority().cmp(&a.verb().priority()))
        .then_with(|| a.args_text().cmp(&b.args_text()))
}

pub fn compare_routes(a: &RouteRecord, b: &RouteRecord) -> Ordering {
    a.namespace()
        .cmp(b.namespace())
        .then_with(|| controller_key(a).cmp(controller_key(b)))
        .then_with(|| a.args_text().cmp(&b.args_text()))
        .then_with(|| b.verb().priority().cmp(&a.verb().priority()))
}

pub fn sort_handlers<R: Borrow<GeneralHandlerRecord>>(records: &mut [R]) {
    records.sort_by(|a, b| compare_handlers(a.borrow(), b.borrow()));
}

pub fn sort_routes<R: Borrow<RouteRecord>>(records: &mut [R]) {
    records.sort_by(|a, b| compare_routes(a.borrow(), b.borrow()));
}

/// Records sharing one controller.
#[derive(Debug)]
pub struct ControllerGroup<'a, V> {
    /// Controller textual form; empty when no controller was in effect
    pub controller: String,
    pub records: Vec<&'a HandlerRecord<V>>,
}

/// Groups already-sorted records by controller. Groups come out ordered by controller name,
/// the empty controller first; records keep their relative order inside a group.
pub fn group_by_controller<'a, V: Verb>(
    records: &[&'a HandlerRecord<V>],
) -> Vec<ControllerGroup<'a, V>> {
    let mut groups: BTreeMap<String, Vec<&'a HandlerRecord<V>>> = BTreeMap::new();
    for record in records {
        groups
            .entry(controller_key(record).to_string())
            .or_default()
            .push(*record);
    }
    groups
        .into_iter()
        .map(|(controller, records)| ControllerGroup {
            controller,
            records,
        })
        .collect()
}
