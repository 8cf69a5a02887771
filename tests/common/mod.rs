//! Capture fixtures written on the fly into temp directories.

#![allow(dead_code)]

use etherparse::PacketBuilder;
use pcap_file::pcap::{PcapPacket, PcapWriter};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

const MAC_A: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0a];
const MAC_B: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0b];

pub struct Frame {
    pub ts: Duration,
    pub data: Vec<u8>,
}

pub fn tcp_frame(src: [u8; 4], sport: u16, dst: [u8; 4], dport: u16, syn: bool, ts_ms: u64) -> Frame {
    let mut data = Vec::new();
    let builder = PacketBuilder::ethernet2(MAC_A, MAC_B)
        .ipv4(src, dst, 64)
        .tcp(sport, dport, 1_000, 8_192);
    let builder = if syn { builder.syn() } else { builder.ack(1) };
    builder.write(&mut data, b"payload").unwrap();
    Frame {
        ts: Duration::from_millis(ts_ms),
        data,
    }
}

pub fn udp_frame(src: [u8; 4], sport: u16, dst: [u8; 4], dport: u16, ts_ms: u64) -> Frame {
    let mut data = Vec::new();
    PacketBuilder::ethernet2(MAC_A, MAC_B)
        .ipv4(src, dst, 128)
        .udp(sport, dport)
        .write(&mut data, &[0u8; 16])
        .unwrap();
    Frame {
        ts: Duration::from_millis(ts_ms),
        data,
    }
}

/// Ethernet frame carrying ARP, which has no IP header.
pub fn arp_frame(ts_ms: u64) -> Frame {
    let mut data = vec![0xff; 6];
    data.extend_from_slice(&MAC_A);
    data.extend_from_slice(&[0x08, 0x06]);
    data.extend_from_slice(&[0u8; 28]);
    Frame {
        ts: Duration::from_millis(ts_ms),
        data,
    }
}

pub fn write_pcap(path: &Path, frames: &[Frame]) {
    let mut writer = PcapWriter::new(File::create(path).unwrap()).unwrap();
    for f in frames {
        let pkt = PcapPacket::new(f.ts, f.data.len() as u32, &f.data);
        writer.write_packet(&pkt).unwrap();
    }
}

fn pcapng_block(out: &mut Vec<u8>, block_type: u32, body: &[u8]) {
    let pad = (4 - body.len() % 4) % 4;
    let total = (12 + body.len() + pad) as u32;
    out.extend_from_slice(&block_type.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(&vec![0u8; pad]);
    out.extend_from_slice(&total.to_le_bytes());
}

/// Little-endian pcapng with one Ethernet interface. Frame timestamps are
/// written as ticks of the interface resolution: microseconds unless
/// `tsresol` is given.
pub fn write_pcapng(path: &Path, frames: &[Frame], tsresol: Option<u8>) {
    let mut out = Vec::new();

    let mut shb = Vec::new();
    shb.extend_from_slice(&0x1A2B_3C4Du32.to_le_bytes());
    shb.extend_from_slice(&1u16.to_le_bytes());
    shb.extend_from_slice(&0u16.to_le_bytes());
    shb.extend_from_slice(&(-1i64).to_le_bytes());
    pcapng_block(&mut out, 0x0A0D_0D0A, &shb);

    let mut idb = Vec::new();
    idb.extend_from_slice(&1u16.to_le_bytes()); // LINKTYPE_ETHERNET
    idb.extend_from_slice(&0u16.to_le_bytes());
    idb.extend_from_slice(&65_535u32.to_le_bytes());
    if let Some(r) = tsresol {
        idb.extend_from_slice(&9u16.to_le_bytes());
        idb.extend_from_slice(&1u16.to_le_bytes());
        idb.extend_from_slice(&[r, 0, 0, 0]);
        idb.extend_from_slice(&[0u8; 4]); // opt_endofopt
    }
    pcapng_block(&mut out, 1, &idb);

    for f in frames {
        let ticks: u64 = match tsresol {
            None => f.ts.as_micros() as u64,
            Some(r) => (f.ts.as_secs_f64() * 10f64.powi(i32::from(r))).round() as u64,
        };
        let mut epb = Vec::new();
        epb.extend_from_slice(&0u32.to_le_bytes());
        epb.extend_from_slice(&((ticks >> 32) as u32).to_le_bytes());
        epb.extend_from_slice(&(ticks as u32).to_le_bytes());
        epb.extend_from_slice(&(f.data.len() as u32).to_le_bytes());
        epb.extend_from_slice(&(f.data.len() as u32).to_le_bytes());
        epb.extend_from_slice(&f.data);
        let pad = (4 - f.data.len() % 4) % 4;
        epb.extend_from_slice(&vec![0u8; pad]);
        pcapng_block(&mut out, 6, &epb);
    }

    std::fs::write(path, out).unwrap();
}
