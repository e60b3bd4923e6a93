//! Default value functions for configuration.

use std::net::{Ipv4Addr, SocketAddr};

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8790))
}

pub fn default_max_line_len() -> usize {
    hatcog_proto::MAX_LINE_LEN
}

pub fn default_outgoing_queue() -> usize {
    256
}

pub fn default_event_queue() -> usize {
    1024
}
