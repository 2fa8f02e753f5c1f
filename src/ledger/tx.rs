//! Pure transaction construction for the wallet layer.
//!
//! No network I/O here. Each builder validates its local inputs and
//! returns a serializable call description; signing and submission
//! belong to the caller's wallet, and the ledger contract re-validates
//! everything (including the price) at execution time.

use serde::{Deserialize, Serialize};

use crate::config::LEDGER_MODULE;
use crate::error::{VaultError, VaultResult};

/// One argument of a ledger call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TxArg {
    /// Reference to an existing ledger object.
    Object(String),
    /// Plain string payload.
    Str(String),
    /// Unsigned integer payload (the ledger's native numeric encoding
    /// is a string).
    U64(u64),
}

/// A serializable description of one contract call, ready for the
/// wallet layer to sign and submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSpec {
    pub package_id: String,
    pub module: String,
    pub function: String,
    pub args: Vec<TxArg>,
}

impl TransactionSpec {
    fn call(package_id: &str, function: &str, args: Vec<TxArg>) -> Self {
        Self {
            package_id: package_id.to_string(),
            module: LEDGER_MODULE.to_string(),
            function: function.to_string(),
            args,
        }
    }
}

fn require_nonempty(value: &str, what: &str) -> VaultResult<()> {
    if value.trim().is_empty() {
        return Err(VaultError::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}

fn require_positive(value: u64, what: &str) -> VaultResult<()> {
    if value == 0 {
        return Err(VaultError::Validation(format!("{what} must be positive")));
    }
    Ok(())
}

/// Anchor a freshly published blob as a listing. `blob_id` and
/// `key_derivation_hash` are written once here and never mutated by any
/// later transaction.
pub fn build_create_listing_tx(
    package_id: &str,
    blob_id: &str,
    key_derivation_hash: &str,
    base_price: u64,
    price_slope: u64,
    mime_type: &str,
) -> VaultResult<TransactionSpec> {
    require_nonempty(blob_id, "blob id")?;
    require_nonempty(key_derivation_hash, "key derivation hash")?;
    require_nonempty(mime_type, "mime type")?;
    require_positive(base_price, "base price")?;

    Ok(TransactionSpec::call(
        package_id,
        "create_listing",
        vec![
            TxArg::Str(blob_id.to_string()),
            TxArg::Str(key_derivation_hash.to_string()),
            TxArg::U64(base_price),
            TxArg::U64(price_slope),
            TxArg::Str(mime_type.to_string()),
        ],
    ))
}

/// Rent access to a listing for `duration_secs`.
///
/// `max_price` is the slippage bound: the contract recomputes the
/// bonding-curve price at execution time and aborts when it exceeds
/// what the renter saw displayed.
pub fn build_rent_access_tx(
    package_id: &str,
    listing_id: &str,
    duration_secs: u64,
    max_price: u64,
) -> VaultResult<TransactionSpec> {
    require_nonempty(listing_id, "listing id")?;
    require_positive(duration_secs, "rental duration")?;
    require_positive(max_price, "max price")?;

    Ok(TransactionSpec::call(
        package_id,
        "rent_access",
        vec![
            TxArg::Object(listing_id.to_string()),
            TxArg::U64(duration_secs),
            TxArg::U64(max_price),
        ],
    ))
}

/// Withdraw accumulated rental proceeds from a listing.
pub fn build_withdraw_tx(package_id: &str, listing_id: &str) -> VaultResult<TransactionSpec> {
    require_nonempty(listing_id, "listing id")?;

    Ok(TransactionSpec::call(
        package_id,
        "withdraw_proceeds",
        vec![TxArg::Object(listing_id.to_string())],
    ))
}

/// Stop accepting new rentals. Existing passes keep working until they
/// expire.
pub fn build_pause_tx(package_id: &str, listing_id: &str) -> VaultResult<TransactionSpec> {
    require_nonempty(listing_id, "listing id")?;

    Ok(TransactionSpec::call(
        package_id,
        "pause_listing",
        vec![TxArg::Object(listing_id.to_string())],
    ))
}

/// Resume accepting rentals on a paused listing.
pub fn build_resume_tx(package_id: &str, listing_id: &str) -> VaultResult<TransactionSpec> {
    require_nonempty(listing_id, "listing id")?;

    Ok(TransactionSpec::call(
        package_id,
        "resume_listing",
        vec![TxArg::Object(listing_id.to_string())],
    ))
}
