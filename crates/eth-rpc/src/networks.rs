use serde::Serialize;

/// A well-known EVM network and a public endpoint for it.
#[derive(Debug, Clone, Serialize)]
pub struct Network {
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub is_testnet: bool,
}

pub const ETHEREUM: Network = Network {
    chain_id: 1,
    name: "Ethereum",
    rpc_url: "https://eth.llamarpc.com",
    is_testnet: false,
};

pub const BSC: Network = Network {
    chain_id: 56,
    name: "BNB Smart Chain",
    rpc_url: "https://bsc-dataseed.binance.org",
    is_testnet: false,
};

pub const POLYGON: Network = Network {
    chain_id: 137,
    name: "Polygon",
    rpc_url: "https://polygon-rpc.com",
    is_testnet: false,
};

pub const SEPOLIA: Network = Network {
    chain_id: 11155111,
    name: "Sepolia",
    rpc_url: "https://rpc.sepolia.org",
    is_testnet: true,
};

/// A local development node (anvil, hardhat, ganache).
pub const LOCAL: Network = Network {
    chain_id: 31337,
    name: "Local",
    rpc_url: "http://127.0.0.1:8545",
    is_testnet: true,
};

const ALL_NETWORKS: &[&Network] = &[&ETHEREUM, &BSC, &POLYGON, &SEPOLIA, &LOCAL];

/// Looks up a network by chain id.
pub fn get_network(chain_id: u64) -> Option<&'static Network> {
    ALL_NETWORKS
        .iter()
        .find(|n| n.chain_id == chain_id)
        .copied()
}

pub fn supported_networks() -> Vec<&'static Network> {
    ALL_NETWORKS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_ethereum() {
        let network = get_network(1).expect("Ethereum should be known");
        assert_eq!(network.name, "Ethereum");
        assert!(!network.is_testnet);
    }

    #[test]
    fn get_local() {
        let network = get_network(31337).expect("local node should be known");
        assert!(network.rpc_url.starts_with("http://127.0.0.1"));
    }

    #[test]
    fn unknown_network_returns_none() {
        assert!(get_network(999_999).is_none());
    }

    #[test]
    fn chain_ids_are_unique() {
        let mut ids: Vec<u64> = supported_networks().iter().map(|n| n.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), supported_networks().len());
    }
}
