//! System-wide constants for the tokenex settlement engine.

/// Decimal places of the native currency (base units per whole unit = 10^18).
pub const NATIVE_DECIMALS: u32 = 18;

/// `last_price` placeholder assigned at market creation, before any fill.
/// Not a real price: it marks "no trade yet" and is overwritten by the
/// first successful fill.
pub const NEW_MARKET_LAST_PRICE: u128 = 1;

/// The first market id ever assigned. Id `0` never names a market.
pub const FIRST_MARKET_ID: u64 = 1;

/// Wire word for a successful operation without a richer payload.
pub const SUCCESS: u128 = 1;

/// Wire word for a generic failure (also the Unauthorized result code).
pub const FAILURE: u128 = 0;

/// Maximum symbol width in bytes (fixed-width, NUL-padded).
pub const MAX_SYMBOL_LEN: usize = 8;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "tokenex";
