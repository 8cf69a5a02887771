//! Bidirectional flow reconstruction: keys, per-packet labels, and the aggregator.

mod aggregator;
mod record;

pub use aggregator::FlowTable;
pub use record::{DirectionStats, FlowRecord};

use crate::capture::{Packet, Transport};
use std::fmt;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Other,
}

impl Protocol {
    pub fn of(packet: &Packet) -> Self {
        match packet.transport {
            Transport::Tcp(_) => Protocol::Tcp,
            Transport::Udp { .. } => Protocol::Udp,
            Transport::Icmp => Protocol::Icmp,
            Transport::Other => Protocol::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
            Protocol::Other => "other",
        }
    }
}

/// Connection state taken from the exact TCP flag value of a flow's first packet.
///
/// `Int`, `Par` and `Acc` exist in the training vocabulary but are never derived here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Fin,
    Int,
    Con,
    Req,
    Rst,
    Par,
    Acc,
    Other,
}

impl ConnState {
    pub fn of(packet: &Packet) -> Self {
        match packet.tcp().map(|t| t.flags) {
            Some(0x02) => ConnState::Req,
            Some(0x12) => ConnState::Con,
            Some(0x04) => ConnState::Rst,
            Some(0x11) => ConnState::Fin,
            _ => ConnState::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnState::Fin => "FIN",
            ConnState::Int => "INT",
            ConnState::Con => "CON",
            ConnState::Req => "REQ",
            ConnState::Rst => "RST",
            ConnState::Par => "PAR",
            ConnState::Acc => "acc",
            ConnState::Other => "other",
        }
    }
}

/// Application service guessed from transport and destination port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Http,
    Ssh,
    Dns,
    Smtp,
    Ftp,
    FtpData,
    /// `-`: nothing matched
    Unknown,
    Other,
}

impl Service {
    pub fn of(packet: &Packet) -> Self {
        match packet.transport {
            Transport::Tcp(tcp) => match tcp.dst_port {
                80 => Service::Http,
                22 => Service::Ssh,
                25 => Service::Smtp,
                21 => Service::Ftp,
                20 => Service::FtpData,
                _ => Service::Unknown,
            },
            Transport::Udp { dst_port: 53, .. } => Service::Dns,
            _ => Service::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Http => "http",
            Service::Ssh => "ssh",
            Service::Dns => "dns",
            Service::Smtp => "smtp",
            Service::Ftp => "ftp",
            Service::FtpData => "ftp-data",
            Service::Unknown => "-",
            Service::Other => "other",
        }
    }
}

/// Directional 5-tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub src: IpAddr,
    pub src_port: u16,
    pub dst: IpAddr,
    pub dst_port: u16,
    pub proto: Protocol,
}

impl FlowKey {
    pub fn of(packet: &Packet) -> Self {
        Self {
            src: packet.src,
            src_port: packet.src_port(),
            dst: packet.dst,
            dst_port: packet.dst_port(),
            proto: Protocol::of(packet),
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            src: self.dst,
            src_port: self.dst_port,
            dst: self.src,
            dst_port: self.src_port,
            proto: self.proto,
        }
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{} {}",
            self.src,
            self.src_port,
            self.dst,
            self.dst_port,
            self.proto.as_str()
        )
    }
}
