//! Capture input: pcap / pcapng files decoded into per-packet records.
//!
//! Only the attributes the flow aggregator consumes are kept. Frames without a
//! network-layer header never become a [`Packet`].

mod decode;
mod reader;

pub use decode::decode_frame;
pub use reader::read_capture;

use std::net::IpAddr;

/// Transport layer of a decoded packet. Checked in declaration order: TCP, UDP, ICMP, other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp(TcpInfo),
    Udp { src_port: u16, dst_port: u16 },
    Icmp,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpInfo {
    pub src_port: u16,
    pub dst_port: u16,
    /// Full flag field, NS bit included (0x100)
    pub flags: u16,
    pub window: u16,
    pub seq: u32,
}

/// One captured frame with a network-layer header.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub src: IpAddr,
    pub dst: IpAddr,
    pub transport: Transport,
    /// Bytes after the network-layer header
    pub payload_len: usize,
    /// Captured frame length
    pub frame_len: usize,
    /// IPv4 TTL or IPv6 hop limit
    pub ttl: u8,
    /// Seconds since the epoch
    pub ts: f64,
}

impl Packet {
    pub fn src_port(&self) -> u16 {
        match self.transport {
            Transport::Tcp(tcp) => tcp.src_port,
            Transport::Udp { src_port, .. } => src_port,
            Transport::Icmp | Transport::Other => 0,
        }
    }

    pub fn dst_port(&self) -> u16 {
        match self.transport {
            Transport::Tcp(tcp) => tcp.dst_port,
            Transport::Udp { dst_port, .. } => dst_port,
            Transport::Icmp | Transport::Other => 0,
        }
    }

    pub fn tcp(&self) -> Option<&TcpInfo> {
        match &self.transport {
            Transport::Tcp(tcp) => Some(tcp),
            _ => None,
        }
    }
}
