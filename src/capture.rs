//! Passive capture port.
//!
//! One `listen` call observes link-layer traffic for a bounded budget and
//! reports the first frame whose source or destination is a watched
//! hardware address. Listening is passive by design: the detector never
//! transmits, so it cannot trigger false "presence" itself, and it still
//! catches devices that only ever answer others (broadcast chatter, ARP
//! replies to other hosts).

use std::time::{Duration, Instant};

use pnet::packet::ethernet::EthernetPacket;
use pnet::util::MacAddr;

use crate::errors::CaptureError;

/// Poll granularity for the capture read loop. Keeps budget expiry and
/// cancellation latency well under one second.
const READ_TIMEOUT_MS: i32 = 250;

/// Capability the sweep scheduler listens through.
///
/// Budget expiry is a normal outcome (`Ok(None)`); errors mean the capture
/// capability itself is unavailable and are fatal upstream.
pub trait CapturePort {
    fn listen(
        &mut self,
        watch: &[MacAddr],
        budget: Duration,
    ) -> Result<Option<MacAddr>, CaptureError>;
}

/// Build the one filter expression for a listen call: any frame whose
/// source or destination is one of the watched addresses.
///
/// Callers must never pass an empty set; `PcapCapture::listen` rejects it
/// before this is reached.
pub fn build_filter(watch: &[MacAddr]) -> String {
    watch
        .iter()
        .map(|addr| format!("ether host {addr}"))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Live adapter over libpcap.
///
/// Each `listen` call opens its own capture handle and drops it on every
/// exit path, so repeated cycles never leak handles.
pub struct PcapCapture {
    interface: String,
}

impl PcapCapture {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }

    /// Use an explicitly named interface, or fall back to libpcap's default
    /// capture device.
    pub fn from_interface_arg(interface: Option<String>) -> Result<Self, CaptureError> {
        match interface {
            Some(name) => Ok(Self::new(name)),
            None => {
                let device = pcap::Device::lookup()
                    .map_err(|e| CaptureError::NoDevice(e.to_string()))?
                    .ok_or_else(|| {
                        CaptureError::NoDevice("libpcap reported no capture device".to_string())
                    })?;
                tracing::debug!("Using default capture device: {}", device.name);
                Ok(Self::new(device.name))
            }
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl CapturePort for PcapCapture {
    fn listen(
        &mut self,
        watch: &[MacAddr],
        budget: Duration,
    ) -> Result<Option<MacAddr>, CaptureError> {
        if watch.is_empty() {
            return Err(CaptureError::EmptyWatchSet);
        }

        let mut handle = pcap::Capture::from_device(self.interface.as_str())
            .and_then(|inactive| {
                inactive
                    .promisc(true)
                    .timeout(READ_TIMEOUT_MS)
                    .snaplen(256)
                    .open()
            })
            .map_err(|e| CaptureError::Open {
                interface: self.interface.clone(),
                message: e.to_string(),
            })?;

        let filter = build_filter(watch);
        handle
            .filter(&filter, true)
            .map_err(|e| CaptureError::Filter {
                filter: filter.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Listening on {} for {} address(es), budget {:?}",
            self.interface,
            watch.len(),
            budget
        );

        let deadline = Instant::now() + budget;
        while Instant::now() < deadline {
            match handle.next_packet() {
                Ok(packet) => {
                    if let Some(matched) = match_frame(packet.data, watch) {
                        return Ok(Some(matched));
                    }
                }
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => {
                    return Err(CaptureError::Read {
                        interface: self.interface.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(None)
    }
}

/// Pick the watched address out of a captured frame, destination first.
/// The BPF filter already restricts traffic; this re-check decides *which*
/// watched address matched.
fn match_frame(frame: &[u8], watch: &[MacAddr]) -> Option<MacAddr> {
    let ethernet = EthernetPacket::new(frame)?;
    let destination = ethernet.get_destination();
    if watch.contains(&destination) {
        return Some(destination);
    }
    let source = ethernet.get_source();
    if watch.contains(&source) {
        return Some(source);
    }
    None
}
