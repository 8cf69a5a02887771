//! Integration test: capture file → flow table → single feature row.

mod common;

use common::{arp_frame, tcp_frame, udp_frame, write_pcap, write_pcapng};
use pcap_threat_detector::{
    capture::read_capture,
    extract_features,
    features::{hash_address, FEATURE_COLUMNS},
    ExtractError, FeatureRow, FlowKey, FlowTable,
};
use std::net::IpAddr;

const A: [u8; 4] = [192, 168, 1, 10];
const B: [u8; 4] = [192, 168, 1, 20];

#[test]
fn capture_without_ip_packets_gives_zero_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arp.pcap");
    write_pcap(&path, &[arp_frame(0), arp_frame(10)]);
    let row = extract_features(&path).unwrap();
    assert_eq!(row, FeatureRow::zeros());
}

#[test]
fn empty_capture_gives_zero_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pcap");
    write_pcap(&path, &[]);
    assert_eq!(extract_features(&path).unwrap(), FeatureRow::zeros());
}

#[test]
fn single_syn_builds_forward_and_reverse_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syn.pcap");
    write_pcap(&path, &[tcp_frame(A, 1234, B, 80, true, 1_000)]);

    let packets = read_capture(&path).unwrap();
    assert_eq!(packets.len(), 1);
    let table = FlowTable::from_packets(&packets);
    assert_eq!(table.len(), 2);

    let fwd = table.get(&FlowKey::of(&packets[0])).unwrap();
    assert_eq!(fwd.state.as_str(), "REQ");
    assert_eq!(fwd.service.as_str(), "http");
    assert_eq!(fwd.forward.packets, 1);

    let rev = table.get(&FlowKey::of(&packets[0]).reversed()).unwrap();
    assert_eq!(rev.key.src, IpAddr::from(B));
    assert_eq!(rev.key.src_port, 80);
    assert_eq!(rev.key.dst_port, 1234);
    assert_eq!(rev.forward.packets, 0);
    assert_eq!(rev.forward.bytes, 0);
}

#[test]
fn output_row_follows_schema_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.pcap");
    write_pcap(
        &path,
        &[
            tcp_frame(A, 1234, B, 80, true, 0),
            udp_frame(A, 5353, B, 53, 500),
            tcp_frame(B, 80, A, 1234, false, 900),
        ],
    );
    let row = extract_features(&path).unwrap();
    let json = serde_json::to_string(&row).unwrap();
    let positions: Vec<usize> = FEATURE_COLUMNS
        .iter()
        .map(|c| json.find(&format!("\"{c}\":")).unwrap_or_else(|| panic!("missing column {c}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(row.values().len(), 47);
    assert_eq!(row.get("ct_srv_src"), Some(1.0));
    assert_eq!(row.get("sloss"), Some(0.0));
}

#[test]
fn forward_gaps_give_interpacket_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.pcap");
    write_pcap(
        &path,
        &[
            tcp_frame(A, 1234, B, 80, true, 10_000),
            tcp_frame(A, 1234, B, 80, false, 11_000),
            tcp_frame(A, 1234, B, 80, false, 13_000),
        ],
    );
    let packets = read_capture(&path).unwrap();
    let table = FlowTable::from_packets(&packets);
    let fwd = table.get(&FlowKey::of(&packets[0])).unwrap();
    let features = pcap_threat_detector::features::FlowFeatures::from_record(fwd);
    assert!((features.sintpkt - 1.5).abs() < 1e-9);
    assert!((features.sjit - 0.5f64.sqrt()).abs() < 1e-9);
    assert!((features.dur - 3.0).abs() < 1e-9);

    // two records (forward + reverse); both carry dur 3 and Stime 10
    let row = extract_features(&path).unwrap();
    assert!((row.get("dur").unwrap() - 3.0).abs() < 1e-9);
    assert!((row.get("Stime").unwrap() - 10.0).abs() < 1e-9);
    assert!((row.get("Sintpkt").unwrap() - 0.75).abs() < 1e-9);
}

#[test]
fn identical_addresses_set_is_sm_ips_ports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.pcap");
    write_pcap(&path, &[udp_frame(A, 1000, A, 2000, 0)]);
    let row = extract_features(&path).unwrap();
    assert_eq!(row.get("is_sm_ips_ports"), Some(1.0));
    let addr = IpAddr::from(A);
    assert_eq!(row.get("srcip"), Some(hash_address(&addr) as f64));
    assert_eq!(row.get("srcip"), row.get("dstip"));
}

#[test]
fn extraction_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.pcap");
    write_pcap(
        &path,
        &[
            tcp_frame(A, 40000, B, 22, true, 0),
            tcp_frame(B, 22, A, 40000, false, 30),
            udp_frame(B, 6000, A, 53, 60),
            tcp_frame(A, 40000, B, 22, false, 95),
        ],
    );
    let first = extract_features(&path).unwrap();
    let second = extract_features(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn path_checks_come_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.pcap");
    assert!(matches!(extract_features(&missing), Err(ExtractError::NotFound(_))));

    let wrong = dir.path().join("capture.cap");
    write_pcap(&wrong, &[udp_frame(A, 1, B, 2, 0)]);
    assert!(matches!(extract_features(&wrong), Err(ExtractError::BadFormat(_))));

    let corrupt = dir.path().join("corrupt.pcap");
    std::fs::write(&corrupt, b"\x00\x01\x02\x03garbage").unwrap();
    assert!(matches!(extract_features(&corrupt), Err(ExtractError::Capture { .. })));
}

#[test]
fn pcapng_timestamps_use_default_microsecond_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dumpcap.pcapng");
    write_pcapng(
        &path,
        &[
            tcp_frame(A, 1234, B, 80, true, 1_000),
            tcp_frame(A, 1234, B, 80, false, 4_000),
        ],
        None,
    );
    let packets = read_capture(&path).unwrap();
    let ts: Vec<f64> = packets.iter().map(|p| p.ts).collect();
    assert_eq!(ts, vec![1.0, 4.0]);

    let row = extract_features(&path).unwrap();
    assert!((row.get("dur").unwrap() - 3.0).abs() < 1e-9);
    assert!((row.get("Stime").unwrap() - 1.0).abs() < 1e-9);
    assert!((row.get("Ltime").unwrap() - 4.0).abs() < 1e-9);
}

#[test]
fn pcapng_honours_declared_nanosecond_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nanos.pcapng");
    write_pcapng(
        &path,
        &[udp_frame(A, 5353, B, 53, 1_500), udp_frame(A, 5353, B, 53, 2_250)],
        Some(9),
    );
    let packets = read_capture(&path).unwrap();
    assert_eq!(packets.len(), 2);
    assert!((packets[0].ts - 1.5).abs() < 1e-9);
    assert!((packets[1].ts - 2.25).abs() < 1e-9);
}
