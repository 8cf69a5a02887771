//! Frame → [`Packet`] using etherparse slicing.

use super::{Packet, TcpInfo, Transport};
use etherparse::{NetSlice, SlicedPacket, TcpSlice, TransportSlice};
use pcap_file::DataLink;
use std::net::IpAddr;

/// Decode one captured frame. `None` when the link type is unsupported, the frame
/// does not slice, or there is no IP header.
pub fn decode_frame(linktype: DataLink, data: &[u8], ts: f64) -> Option<Packet> {
    let sliced = match linktype {
        DataLink::ETHERNET => SlicedPacket::from_ethernet(data).ok()?,
        DataLink::RAW | DataLink::IPV4 | DataLink::IPV6 => SlicedPacket::from_ip(data).ok()?,
        DataLink::LINUX_SLL => SlicedPacket::from_linux_sll(data).ok()?,
        _ => return None,
    };

    let (src, dst, ttl, payload_len) = match &sliced.net {
        Some(NetSlice::Ipv4(ipv4)) => {
            let header = ipv4.header();
            (
                IpAddr::V4(header.source_addr()),
                IpAddr::V4(header.destination_addr()),
                header.ttl(),
                ipv4.payload().payload.len(),
            )
        }
        Some(NetSlice::Ipv6(ipv6)) => {
            let header = ipv6.header();
            (
                IpAddr::V6(header.source_addr()),
                IpAddr::V6(header.destination_addr()),
                header.hop_limit(),
                ipv6.payload().payload.len(),
            )
        }
        _ => return None,
    };

    let transport = match &sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => Transport::Tcp(TcpInfo {
            src_port: tcp.source_port(),
            dst_port: tcp.destination_port(),
            flags: tcp_flags(tcp),
            window: tcp.window_size(),
            seq: tcp.sequence_number(),
        }),
        Some(TransportSlice::Udp(udp)) => Transport::Udp {
            src_port: udp.source_port(),
            dst_port: udp.destination_port(),
        },
        Some(TransportSlice::Icmpv4(_)) | Some(TransportSlice::Icmpv6(_)) => Transport::Icmp,
        _ => Transport::Other,
    };

    Some(Packet {
        src,
        dst,
        transport,
        payload_len,
        frame_len: data.len(),
        ttl,
        ts,
    })
}

fn tcp_flags(tcp: &TcpSlice<'_>) -> u16 {
    [
        (tcp.fin(), 0x001),
        (tcp.syn(), 0x002),
        (tcp.rst(), 0x004),
        (tcp.psh(), 0x008),
        (tcp.ack(), 0x010),
        (tcp.urg(), 0x020),
        (tcp.ece(), 0x040),
        (tcp.cwr(), 0x080),
        (tcp.ns(), 0x100),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .fold(0, |acc, (_, bit)| acc | bit)
}
