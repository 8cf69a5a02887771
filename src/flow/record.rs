//! Per-flow accumulator.

use super::{ConnState, FlowKey, Service};
use crate::capture::Packet;

/// One side of a flow record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionStats {
    pub bytes: u64,
    pub packets: u64,
    pub sizes: Vec<u64>,
    pub ttls: Vec<u8>,
    pub windows: Vec<u16>,
    pub seqs: Vec<u32>,
    /// Gaps between consecutive entries of the record's `times`
    pub gaps: Vec<f64>,
}

impl DirectionStats {
    fn seed(packet: &Packet) -> Self {
        let tcp = packet.tcp();
        Self {
            bytes: packet.frame_len as u64,
            packets: 1,
            sizes: vec![packet.frame_len as u64],
            ttls: vec![packet.ttl],
            windows: tcp.map(|t| vec![t.window]).unwrap_or_default(),
            seqs: tcp.map(|t| vec![t.seq]).unwrap_or_default(),
            gaps: Vec::new(),
        }
    }

    fn add(&mut self, packet: &Packet, gap: Option<f64>) {
        self.bytes += packet.frame_len as u64;
        self.packets += 1;
        self.sizes.push(packet.frame_len as u64);
        self.ttls.push(packet.ttl);
        if let Some(gap) = gap {
            self.gaps.push(gap);
        }
        if let Some(tcp) = packet.tcp() {
            self.windows.push(tcp.window);
            self.seqs.push(tcp.seq);
        }
    }
}

/// Statistics for one directional flow key.
///
/// `forward` holds packets that travelled along `key`, `backward` holds packets
/// seen on the opposite key. `times` is shared by both sides, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub key: FlowKey,
    pub state: ConnState,
    pub service: Service,
    pub times: Vec<f64>,
    pub forward: DirectionStats,
    pub backward: DirectionStats,
}

impl FlowRecord {
    /// Record created by the first packet on its own key.
    pub(super) fn open(key: FlowKey, packet: &Packet) -> Self {
        Self {
            key,
            state: ConnState::of(packet),
            service: Service::of(packet),
            times: vec![packet.ts],
            forward: DirectionStats::seed(packet),
            backward: DirectionStats::default(),
        }
    }

    /// Placeholder for the reverse side of a conversation nobody has spoken on yet.
    pub(super) fn empty(key: FlowKey) -> Self {
        Self {
            key,
            state: ConnState::Other,
            service: Service::Unknown,
            times: Vec::new(),
            forward: DirectionStats::default(),
            backward: DirectionStats::default(),
        }
    }

    pub(super) fn add_forward(&mut self, packet: &Packet) {
        let gap = self.next_gap(packet.ts);
        self.forward.add(packet, gap);
        self.times.push(packet.ts);
    }

    pub(super) fn add_backward(&mut self, packet: &Packet) {
        let gap = self.next_gap(packet.ts);
        self.backward.add(packet, gap);
        self.times.push(packet.ts);
    }

    fn next_gap(&self, ts: f64) -> Option<f64> {
        self.times.last().map(|last| ts - last)
    }

    /// Total packets attributed to this record in either direction.
    pub fn packet_count(&self) -> u64 {
        self.forward.packets + self.backward.packets
    }
}
