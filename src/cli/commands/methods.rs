//! Methods command implementation

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::app::App;
use crate::protocol::{self, Direction, MessageKind, MethodInfo};

#[derive(Args, Debug)]
pub struct MethodsArgs {
    /// Only list requests or notifications
    #[arg(long, value_enum)]
    pub kind: Option<KindFilter>,

    /// Only list methods sent by this peer (client, server)
    #[arg(long, value_enum)]
    pub from: Option<PeerFilter>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Request,
    Notification,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerFilter {
    Client,
    Server,
}

#[derive(Serialize)]
struct MethodsResponse {
    count: usize,
    methods: Vec<MethodInfo>,
}

fn is_listed(info: &MethodInfo, kind: Option<KindFilter>, from: Option<PeerFilter>) -> bool {
    let kind_ok = match kind {
        Some(KindFilter::Request) => info.kind == MessageKind::Request,
        Some(KindFilter::Notification) => info.kind == MessageKind::Notification,
        None => true,
    };
    let peer_ok = match (from, info.direction) {
        (None, _) | (_, Direction::Both) => true,
        (Some(PeerFilter::Client), dir) => dir == Direction::ClientToServer,
        (Some(PeerFilter::Server), dir) => dir == Direction::ServerToClient,
    };
    kind_ok && peer_ok
}

pub fn execute(args: MethodsArgs, app: &App) -> Result<()> {
    let methods: Vec<MethodInfo> = protocol::all_methods()
        .iter()
        .filter(|info| is_listed(info, args.kind, args.from))
        .copied()
        .collect();

    app.output.print_success_flat(MethodsResponse {
        count: methods.len(),
        methods,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_kind_and_peer() {
        let from_server: Vec<&str> = protocol::all_methods()
            .iter()
            .filter(|m| is_listed(m, Some(KindFilter::Request), Some(PeerFilter::Server)))
            .map(|m| m.method)
            .collect();
        assert!(from_server.contains(&"workspace/applyEdit"));
        assert!(!from_server.contains(&"initialize"));
        assert!(!from_server.contains(&"window/showMessage"));
    }

    #[test]
    fn test_bidirectional_always_listed() {
        let progress = protocol::lookup("$/progress").unwrap();
        assert!(is_listed(&progress, None, Some(PeerFilter::Client)));
        assert!(is_listed(&progress, None, Some(PeerFilter::Server)));
    }

    #[test]
    fn test_method_info_serialization() {
        let info = protocol::lookup("workspace/symbol").unwrap();
        assert_eq!(
            serde_json::to_value(info).unwrap(),
            serde_json::json!({
                "method": "workspace/symbol",
                "kind": "request",
                "direction": "client_to_server"
            })
        );
    }
}
