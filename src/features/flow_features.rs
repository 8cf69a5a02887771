//! Per-flow reduction: a completed [`FlowRecord`] → named UNSW-NB15 style features.

use super::encoding::{hash_address, proto_code, service_code, state_code};
use super::{FeatureRow, FEATURE_COUNT};
use crate::flow::{ConnState, FlowRecord, Protocol, Service};
use std::net::IpAddr;

/// Features of a single flow before categorical encoding.
///
/// Fields with no computation behind them (`sloss`, `tcprtt`, the `ct_*`
/// correlation counters, ...) are schema placeholders fixed at 0, except the
/// three single-flow approximations `ct_srv_src`, `ct_srv_dst`, `ct_dst_src_ltm`
/// which are fixed at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFeatures {
    pub srcip: IpAddr,
    pub sport: u16,
    pub dstip: IpAddr,
    pub dsport: u16,
    pub proto: Protocol,
    pub state: ConnState,
    pub dur: f64,
    pub sbytes: u64,
    pub dbytes: u64,
    pub sttl: u8,
    pub dttl: u8,
    pub sloss: u64,
    pub dloss: u64,
    pub service: Service,
    pub sload: f64,
    pub dload: f64,
    pub spkts: u64,
    pub dpkts: u64,
    pub swin: u16,
    pub dwin: u16,
    pub stcpb: u32,
    pub dtcpb: u32,
    pub smeansz: f64,
    pub dmeansz: f64,
    pub trans_depth: u32,
    pub res_bdy_len: u64,
    pub sjit: f64,
    pub djit: f64,
    pub stime: f64,
    pub ltime: f64,
    pub sintpkt: f64,
    pub dintpkt: f64,
    pub tcprtt: f64,
    pub synack: f64,
    pub ackdat: f64,
    pub is_sm_ips_ports: bool,
    pub ct_state_ttl: u32,
    pub ct_flw_http_mthd: u32,
    pub is_ftp_login: bool,
    pub ct_ftp_cmd: u32,
    pub ct_srv_src: u32,
    pub ct_srv_dst: u32,
    pub ct_dst_ltm: u32,
    pub ct_src_ltm: u32,
    pub ct_src_dport_ltm: u32,
    pub ct_dst_sport_ltm: u32,
    pub ct_dst_src_ltm: u32,
}

impl FlowFeatures {
    pub fn from_record(r: &FlowRecord) -> Self {
        let (fwd, bwd) = (&r.forward, &r.backward);
        let stime = min_f64(&r.times);
        let ltime = max_f64(&r.times);
        let dur = if r.times.len() > 1 { ltime - stime } else { 0.0 };
        let per_sec = |bytes: u64| if dur > 0.0 { bytes as f64 / dur } else { 0.0 };

        Self {
            srcip: r.key.src,
            sport: r.key.src_port,
            dstip: r.key.dst,
            dsport: r.key.dst_port,
            proto: r.key.proto,
            state: r.state,
            dur,
            sbytes: fwd.bytes,
            dbytes: bwd.bytes,
            sttl: fwd.ttls.iter().copied().max().unwrap_or(0),
            dttl: bwd.ttls.iter().copied().max().unwrap_or(0),
            sloss: 0,
            dloss: 0,
            service: r.service,
            sload: per_sec(fwd.bytes),
            dload: per_sec(bwd.bytes),
            spkts: fwd.packets,
            dpkts: bwd.packets,
            swin: fwd.windows.iter().copied().max().unwrap_or(0),
            dwin: bwd.windows.iter().copied().max().unwrap_or(0),
            stcpb: fwd.seqs.first().copied().unwrap_or(0),
            dtcpb: bwd.seqs.first().copied().unwrap_or(0),
            smeansz: mean(fwd.sizes.iter().map(|&s| s as f64)),
            dmeansz: mean(bwd.sizes.iter().map(|&s| s as f64)),
            trans_depth: 0,
            res_bdy_len: 0,
            sjit: sample_std(&fwd.gaps),
            djit: sample_std(&bwd.gaps),
            stime,
            ltime,
            sintpkt: mean(fwd.gaps.iter().copied()),
            dintpkt: mean(bwd.gaps.iter().copied()),
            tcprtt: 0.0,
            synack: 0.0,
            ackdat: 0.0,
            is_sm_ips_ports: r.key.src == r.key.dst || r.key.src_port == r.key.dst_port,
            ct_state_ttl: 0,
            ct_flw_http_mthd: 0,
            is_ftp_login: r.service == Service::Ftp,
            ct_ftp_cmd: 0,
            ct_srv_src: 1,
            ct_srv_dst: 1,
            ct_dst_ltm: 0,
            ct_src_ltm: 0,
            ct_src_dport_ltm: 0,
            ct_dst_sport_ltm: 0,
            ct_dst_src_ltm: 1,
        }
    }

    /// Encode categoricals and lay the values out in `FEATURE_COLUMNS` order.
    pub fn encode(&self) -> FeatureRow {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let values: [f64; FEATURE_COUNT] = [
            hash_address(&self.srcip) as f64,
            self.sport as f64,
            hash_address(&self.dstip) as f64,
            self.dsport as f64,
            proto_code(self.proto.as_str()) as f64,
            state_code(self.state.as_str()) as f64,
            self.dur,
            self.sbytes as f64,
            self.dbytes as f64,
            self.sttl as f64,
            self.dttl as f64,
            self.sloss as f64,
            self.dloss as f64,
            service_code(self.service.as_str()) as f64,
            self.sload,
            self.dload,
            self.spkts as f64,
            self.dpkts as f64,
            self.swin as f64,
            self.dwin as f64,
            self.stcpb as f64,
            self.dtcpb as f64,
            self.smeansz,
            self.dmeansz,
            self.trans_depth as f64,
            self.res_bdy_len as f64,
            self.sjit,
            self.djit,
            self.stime,
            self.ltime,
            self.sintpkt,
            self.dintpkt,
            self.tcprtt,
            self.synack,
            self.ackdat,
            flag(self.is_sm_ips_ports),
            self.ct_state_ttl as f64,
            self.ct_flw_http_mthd as f64,
            flag(self.is_ftp_login),
            self.ct_ftp_cmd as f64,
            self.ct_srv_src as f64,
            self.ct_srv_dst as f64,
            self.ct_dst_ltm as f64,
            self.ct_src_ltm as f64,
            self.ct_src_dport_ltm as f64,
            self.ct_dst_sport_ltm as f64,
            self.ct_dst_src_ltm as f64,
        ];
        FeatureRow::from_values(values)
    }
}

fn min_f64(xs: &[f64]) -> f64 {
    xs.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

fn max_f64(xs: &[f64]) -> f64 {
    xs.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn mean(xs: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = xs.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Sample (n - 1) standard deviation; 0 below two samples.
fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs.iter().copied());
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}
