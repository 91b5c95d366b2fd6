//! regsnipe-chain
//!
//! Everything that talks to (or models) the remote ledger: the `ChainRpc`
//! collaborator trait, its WebSocket implementation, the transaction-status
//! wire model with dispatch-error decoding, the registration call builder,
//! and the startup chain-facts reader.

pub mod facts;
pub mod op;
pub mod rpc;
pub mod status;
pub mod testing;

pub use facts::read_chain_facts;
pub use op::{sign_operation, RegisterCall, SignedOperation};
pub use rpc::{ChainRpc, WsChain};
pub use status::{DispatchFailure, ErrorIndex, StatusEvent, TxStatus};
