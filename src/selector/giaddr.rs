// src/selector/giaddr.rs
use super::hash::fnv1a_32;
use super::{PoolKind, SelectorError, ServerPools, ServerSelector};
use crate::dhcp::{DhcpMessage, DhcpServer};
use std::sync::Arc;
use tracing::info;

/// Routes on the relay agent address: FNV-1a of giaddr picks both the pool
/// (`hash % 100 < ratio` means canary) and the index within it.
///
/// The same hash feeds both decisions, so a relay that lands in the canary
/// slice always does, and always on the same server.
#[derive(Debug, Default)]
pub struct GiaddrModulo {
    pools: ServerPools,
}

impl GiaddrModulo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pools(&self) -> &ServerPools {
        &self.pools
    }

    fn pick(servers: &[Arc<DhcpServer>], hash: u32) -> Option<Arc<DhcpServer>> {
        if servers.is_empty() {
            return None;
        }
        let index = (hash % servers.len() as u32) as usize;
        Some(servers[index].clone())
    }

    fn update(&self, kind: PoolKind, servers: Vec<Arc<DhcpServer>>) {
        let active = self.pools.replace(kind, servers);
        info!("List of available {} servers ({}):", kind, active.len());
        for server in active.iter() {
            info!("{}", server);
        }
    }
}

impl ServerSelector for GiaddrModulo {
    fn name(&self) -> &'static str {
        "giaddr"
    }

    fn route(&self, message: &DhcpMessage) -> Result<(PoolKind, Arc<DhcpServer>), SelectorError> {
        let hash = fnv1a_32(message.giaddr());
        let kind = if hash % 100 < self.pools.canary_ratio() {
            PoolKind::Canary
        } else {
            PoolKind::Stable
        };

        let lists = self.pools.read();
        Self::pick(lists.get(kind), hash)
            .map(|server| (kind, server))
            .ok_or(SelectorError::EmptyPool(kind))
    }

    fn select_from_list(
        &self,
        servers: &[Arc<DhcpServer>],
        message: &DhcpMessage,
    ) -> Result<Arc<DhcpServer>, SelectorError> {
        Self::pick(servers, fnv1a_32(message.giaddr())).ok_or(SelectorError::EmptyServerList)
    }

    fn update_stable_servers(&self, servers: Vec<Arc<DhcpServer>>) {
        self.update(PoolKind::Stable, servers);
    }

    fn update_canary_servers(&self, servers: Vec<Arc<DhcpServer>>) {
        self.update(PoolKind::Canary, servers);
    }

    fn set_canary_ratio(&self, ratio: u32) {
        self.pools.set_canary_ratio(ratio);
        info!("Canary ratio set to {}%", ratio);
    }

    fn canary_ratio(&self) -> u32 {
        self.pools.canary_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn servers(ports: std::ops::Range<u16>) -> Vec<Arc<DhcpServer>> {
        ports
            .map(|port| {
                Arc::new(DhcpServer::new(
                    format!("dhcp-{}", port),
                    IpAddr::V4(Ipv4Addr::LOCALHOST),
                    port,
                ))
            })
            .collect()
    }

    #[test]
    fn test_name() {
        assert_eq!(GiaddrModulo::new().name(), "giaddr");
    }

    #[test]
    fn test_empty_pools_fail() {
        let selector = GiaddrModulo::new();
        let err = selector.select_server(&DhcpMessage::new(vec![0])).unwrap_err();
        assert_eq!(err, SelectorError::EmptyPool(PoolKind::Stable));

        selector.set_canary_ratio(100);
        let err = selector.select_server(&DhcpMessage::new(vec![0])).unwrap_err();
        assert_eq!(err, SelectorError::EmptyPool(PoolKind::Canary));
    }

    #[test]
    fn test_hash_fixture_selects_by_port() {
        let tokens: [&[u8]; 4] = [
            &[0xf6, 0x85, 0x63, 0x03, 0x11, 0x80, 0x72, 0x97, 0x23, 0xa1],
            &[0x8c, 0x41, 0x34, 0xe1, 0x9c, 0x0d, 0xfc, 0xe5, 0x41, 0x4b],
            &[0x54, 0xc9, 0xeb, 0x57, 0x0a, 0x57, 0x14, 0x43, 0x2b, 0x19],
            &[0x54, 0xc5, 0x89, 0x66, 0xb2, 0xdc, 0x39, 0xf7, 0x8f, 0xa5],
        ];
        let selector = GiaddrModulo::new();
        selector.update_stable_servers(servers(0..4));

        for (i, token) in tokens.iter().enumerate() {
            let server = selector.select_server(&DhcpMessage::new(*token)).unwrap();
            assert_eq!(server.port, i as u16, "wrong server for {:x?}", token);
        }
    }

    #[test]
    fn test_no_fallback_to_other_pool() {
        let selector = GiaddrModulo::new();
        selector.update_canary_servers(servers(0..2));
        assert_eq!(
            selector.select_server(&DhcpMessage::new(vec![10, 0, 0, 1])),
            Err(SelectorError::EmptyPool(PoolKind::Stable))
        );
    }

    #[test]
    fn test_ratio_zero_never_routes_to_canary() {
        let selector = GiaddrModulo::new();
        selector.update_stable_servers(servers(0..3));
        selector.update_canary_servers(servers(100..103));

        for i in 0..=255u8 {
            let (kind, server) = selector
                .route(&DhcpMessage::from_giaddr(Ipv4Addr::new(10, 1, i, 1)))
                .unwrap();
            assert_eq!(kind, PoolKind::Stable);
            assert!(server.port < 100);
        }
    }

    #[test]
    fn test_ratio_at_or_above_hundred_always_routes_to_canary() {
        let selector = GiaddrModulo::new();
        selector.update_stable_servers(servers(0..3));
        selector.update_canary_servers(servers(100..103));

        for ratio in [100, 150] {
            selector.set_canary_ratio(ratio);
            for i in 0..=255u8 {
                let (kind, server) = selector
                    .route(&DhcpMessage::from_giaddr(Ipv4Addr::new(10, 2, i, 1)))
                    .unwrap();
                assert_eq!(kind, PoolKind::Canary);
                assert!(server.port >= 100);
            }
        }
    }

    #[test]
    fn test_canary_index_reuses_pool_hash() {
        let selector = GiaddrModulo::new();
        selector.update_canary_servers(servers(100..105));
        selector.set_canary_ratio(100);

        let message = DhcpMessage::new(vec![172, 16, 0, 9]);
        let expected = (fnv1a_32(message.giaddr()) % 5) as u16 + 100;
        assert_eq!(selector.select_server(&message).unwrap().port, expected);
    }

    #[test]
    fn test_select_from_list() {
        let selector = GiaddrModulo::new();
        let message = DhcpMessage::new(vec![0xf6, 0x85, 0x63, 0x03, 0x11, 0x80, 0x72, 0x97, 0x23, 0xa1]);
        assert_eq!(
            selector.select_from_list(&[], &message),
            Err(SelectorError::EmptyServerList)
        );
        let list = servers(0..4);
        assert_eq!(selector.select_from_list(&list, &message).unwrap().port, 0);
    }

    #[test]
    fn test_replacement_takes_effect_immediately() {
        let selector = GiaddrModulo::new();
        let message = DhcpMessage::new(vec![192, 168, 0, 1]);
        selector.update_stable_servers(servers(0..4));
        assert!(selector.select_server(&message).unwrap().port < 4);

        selector.update_stable_servers(servers(50..51));
        assert_eq!(selector.select_server(&message).unwrap().port, 50);
    }

    proptest! {
        #[test]
        fn prop_selection_is_deterministic_and_in_pool(
            giaddr in proptest::collection::vec(any::<u8>(), 0..16),
            stable_len in 1u16..20,
            canary_len in 1u16..20,
            ratio in 0u32..=100,
        ) {
            let selector = GiaddrModulo::new();
            let stable = servers(0..stable_len);
            let canary = servers(1000..1000 + canary_len);
            selector.update_stable_servers(stable.clone());
            selector.update_canary_servers(canary.clone());
            selector.set_canary_ratio(ratio);

            let message = DhcpMessage::new(giaddr);
            let (kind, first) = selector.route(&message).unwrap();
            let (_, second) = selector.route(&message).unwrap();
            prop_assert_eq!(&first, &second);

            let expected_kind = if fnv1a_32(message.giaddr()) % 100 < ratio {
                PoolKind::Canary
            } else {
                PoolKind::Stable
            };
            prop_assert_eq!(kind, expected_kind);
            let pool = match kind {
                PoolKind::Stable => &stable,
                PoolKind::Canary => &canary,
            };
            prop_assert!(pool.contains(&first));
        }
    }
}
