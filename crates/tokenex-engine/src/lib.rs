//! # tokenex-engine
//!
//! The deterministic settlement engine behind the tokenex exchange:
//! market registration, custodial balances, and the escrowed order
//! lifecycle, with no external arbitrator.
//!
//! ## Architecture
//!
//! 1. **`access`**: single owner identity, re-checked on every admin call
//! 2. **`registry`**: market list with sequential ids and immutable params
//! 3. **`custody`**: per-(trader, market) token balances and the
//!    deposit/withdraw paths against the external token contracts
//! 4. **`trading`**: the order book and lifecycle state machine —
//!    placement, cancellation, atomic fulfillment, last-price updates
//! 5. **`exchange`**: the aggregate state object owning all of the above,
//!    plus typed-request dispatch and the clone-apply transition helper
//!
//! ## Call Flow
//!
//! ```text
//! boundary → Request → Exchange::execute() → component → Vec<Value>
//! ```
//!
//! Every operation validates completely before mutating, so a failure
//! reply always implies untouched state.

pub mod access;
pub mod custody;
pub mod exchange;
pub mod registry;
pub mod trading;

pub use access::AccessControl;
pub use custody::BalanceCustody;
pub use exchange::{transition, Exchange};
pub use registry::MarketRegistry;
pub use trading::TradeEngine;
