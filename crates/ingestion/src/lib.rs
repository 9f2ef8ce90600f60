//! Contract discovery over an Ethereum JSON-RPC endpoint.

pub mod address_list;
pub mod chain;
pub mod range;
pub mod rpc_client;
pub mod scanner;
pub mod units;

pub use address_list::read_addresses;
pub use chain::{ChainReader, RpcBlock, RpcError, RpcReceipt, RpcTransaction};
pub use range::BlockRange;
pub use rpc_client::RpcClient;
pub use scanner::ContractScanner;
