//! # tokenex-types
//!
//! Shared types, errors, and collaborator contracts for the **tokenex**
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`MarketId`], [`OrderId`], [`Symbol`]
//! - **Market model**: [`Market`]
//! - **Order model**: [`Order`], [`OrderSide`], [`OrderStatus`]
//! - **Balance model**: [`SubBalance`]
//! - **Request model**: [`Opcode`], [`Request`], [`Value`]
//! - **Errors**: [`ExchangeError`] with wire result codes
//! - **Collaborators**: the [`Ledger`] substrate contract and [`CallContext`]
//! - **Constants**: wire sentinels and protocol defaults

pub mod balance;
pub mod collaborators;
pub mod constants;
pub mod error;
pub mod ids;
pub mod market;
pub mod order;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use tokenex_types::{Market, Order, OrderSide, Request, ...};

pub use balance::*;
pub use collaborators::*;
pub use error::*;
pub use ids::*;
pub use market::*;
pub use order::*;
pub use request::*;

// Constants are accessed via `tokenex_types::constants::FOO`
// (not re-exported to avoid name collisions).
