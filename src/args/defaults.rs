use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

pub(crate) const DEFAULT_HTTP_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3001));
pub(crate) const DEFAULT_WS_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3002));
pub(crate) const DEFAULT_WATCH_URL: &str = "ws://127.0.0.1:3002";
