//! Capture file reader for classic pcap and pcapng.

use super::{decode_frame, Packet};
use crate::error::CaptureError;
use pcap_file::pcap::PcapReader;
use pcap_file::pcapng::blocks::interface_description::{
    InterfaceDescriptionBlock, InterfaceDescriptionOption,
};
use pcap_file::pcapng::{Block, PcapNgReader};
use pcap_file::DataLink;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, trace, warn};

const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// pcapng `if_tsresol` when the option is absent: microseconds.
const DEFAULT_TSRESOL: u8 = 6;

/// Link type and timestamp resolution of one pcapng interface.
#[derive(Debug, Clone, Copy)]
struct Interface {
    linktype: DataLink,
    tsresol: u8,
}

impl Interface {
    fn of(idb: &InterfaceDescriptionBlock<'_>) -> Self {
        let tsresol = idb
            .options
            .iter()
            .find_map(|opt| match opt {
                InterfaceDescriptionOption::IfTsResol(r) => Some(*r),
                _ => None,
            })
            .unwrap_or(DEFAULT_TSRESOL);
        Self {
            linktype: idb.linktype,
            tsresol,
        }
    }
}

/// Convert raw pcapng timestamp ticks to seconds. The high bit of `tsresol`
/// selects a power of two, otherwise a power of ten.
fn ticks_to_secs(ticks: u128, tsresol: u8) -> f64 {
    let exp = i32::from(tsresol & 0x7f);
    let base: f64 = if tsresol & 0x80 != 0 { 2.0 } else { 10.0 };
    ticks as f64 / base.powi(exp)
}

/// Read every decodable packet from `path`, in capture order.
///
/// The format is sniffed from the leading magic rather than the extension.
/// A record that fails to read after the header ends the read with what was
/// decoded so far.
pub fn read_capture(path: &Path) -> Result<Vec<Packet>, CaptureError> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    let is_pcapng = match file.read_exact(&mut magic) {
        Ok(()) => magic == PCAPNG_MAGIC,
        Err(_) => false,
    };
    file.seek(SeekFrom::Start(0))?;
    let reader = BufReader::new(file);

    let packets = if is_pcapng {
        read_pcapng(reader)?
    } else {
        read_pcap(reader)?
    };
    debug!(path = %path.display(), packets = packets.len(), "capture decoded");
    Ok(packets)
}

fn read_pcap<R: Read>(reader: R) -> Result<Vec<Packet>, CaptureError> {
    let mut reader = PcapReader::new(reader)?;
    let linktype = reader.header().datalink;
    let mut packets = Vec::new();
    let mut frames = 0usize;

    while let Some(record) = reader.next_packet() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, frames, "pcap record unreadable; stopping");
                break;
            }
        };
        frames += 1;
        match decode_frame(linktype, &record.data, record.timestamp.as_secs_f64()) {
            Some(p) => packets.push(p),
            None => trace!(frame = frames, "frame without network layer dropped"),
        }
    }
    Ok(packets)
}

fn read_pcapng<R: Read>(reader: R) -> Result<Vec<Packet>, CaptureError> {
    let mut reader = PcapNgReader::new(reader)?;
    let mut interfaces: Vec<Interface> = Vec::new();
    let mut packets = Vec::new();
    let mut frames = 0usize;

    while let Some(block) = reader.next_block() {
        let block = match block {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, frames, "pcapng block unreadable; stopping");
                break;
            }
        };
        let (linktype, data, ts) = match &block {
            Block::SectionHeader(_) => {
                interfaces.clear();
                continue;
            }
            Block::InterfaceDescription(idb) => {
                interfaces.push(Interface::of(idb));
                continue;
            }
            Block::EnhancedPacket(epb) => {
                let Some(iface) = interfaces.get(epb.interface_id as usize) else {
                    trace!(interface = epb.interface_id, "packet on undeclared interface dropped");
                    continue;
                };
                // the reader stores the raw 64-bit tick count as nanoseconds
                let ticks = epb.timestamp.as_nanos();
                (iface.linktype, epb.data.as_ref(), ticks_to_secs(ticks, iface.tsresol))
            }
            Block::SimplePacket(spb) => {
                let Some(iface) = interfaces.first() else {
                    continue;
                };
                (iface.linktype, spb.data.as_ref(), 0.0)
            }
            _ => continue,
        };
        frames += 1;
        match decode_frame(linktype, data, ts) {
            Some(p) => packets.push(p),
            None => trace!(frame = frames, "frame without network layer dropped"),
        }
    }
    Ok(packets)
}
