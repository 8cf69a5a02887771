//! Flow table: packets in capture order → one record per directional key.

use super::{FlowKey, FlowRecord};
use crate::capture::Packet;
use std::collections::HashMap;

/// Insertion-ordered flow table. Lives for a single extraction.
#[derive(Debug, Default)]
pub struct FlowTable {
    records: Vec<FlowRecord>,
    index: HashMap<FlowKey, usize>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_packets<'a>(packets: impl IntoIterator<Item = &'a Packet>) -> Self {
        let mut table = Self::new();
        for packet in packets {
            table.ingest(packet);
        }
        table
    }

    /// Account one packet on its own key (forward side) and on the reverse key (backward side).
    pub fn ingest(&mut self, packet: &Packet) {
        let key = FlowKey::of(packet);
        match self.index.get(&key).copied() {
            Some(i) => self.records[i].add_forward(packet),
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(FlowRecord::open(key, packet));
            }
        }

        let rev = key.reversed();
        let i = match self.index.get(&rev).copied() {
            Some(i) => i,
            None => {
                self.index.insert(rev, self.records.len());
                self.records.push(FlowRecord::empty(rev));
                self.records.len() - 1
            }
        };
        self.records[i].add_backward(packet);
    }

    pub fn get(&self, key: &FlowKey) -> Option<&FlowRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Records in the order their keys were first seen.
    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
