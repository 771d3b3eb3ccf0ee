//! Best-effort discovery of the host's outbound-facing local address.
//!
//! Used only for the startup banner, so the operator knows which `ws://`
//! address to enter in the client.  The trick: `connect` a UDP socket to a
//! public address and read back the local address the OS chose for the route.
//! No packet is ever sent; UDP `connect` just fixes the peer.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Returns the local address used for outbound traffic, or loopback when the
/// route cannot be determined (no network, sandboxed test environment, ...).
pub fn outbound_local_ip() -> IpAddr {
    probe().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn probe() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(("1.1.1.1", 1))?;
    Ok(socket.local_addr()?.ip())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
