use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{VaultError, VaultResult};

/// A marketplace listing anchored on the ledger.
///
/// Read-only from the pipeline's perspective: `storage_blob_id` and
/// `key_derivation_hash` are written once by the create-listing
/// transaction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Ledger object id.
    pub id: String,

    /// Address of the seller who anchored the listing.
    pub seller_address: String,

    /// Locator of the hex ciphertext in the storage network.
    pub storage_blob_id: String,

    /// Opaque reference the key-release network needs to reconstruct
    /// the symmetric key.
    pub key_derivation_hash: String,

    /// Price floor in atomic units.
    pub base_price: u64,

    /// Per-active-rental price increment (bonding curve slope).
    pub price_slope: u64,

    /// Rentals currently active against this listing.
    pub active_rental_count: u64,

    /// Declared content type of the plaintext.
    pub mime_type: String,

    /// Whether the seller currently accepts new rentals.
    pub is_active: bool,
}

impl Listing {
    /// Canonical decoding from the ledger's raw field record.
    ///
    /// The on-chain schema is snake_case; fields added in later contract
    /// versions may be absent from older objects and default to
    /// zero/empty instead of erroring.
    pub fn from_ledger_fields(id: impl Into<String>, fields: &Value) -> VaultResult<Self> {
        let fields = fields
            .as_object()
            .ok_or_else(|| VaultError::LedgerQuery("listing fields are not an object".into()))?;

        Ok(Self {
            id: id.into(),
            seller_address: field_str(fields, "seller"),
            storage_blob_id: field_str(fields, "blob_id"),
            key_derivation_hash: field_str(fields, "key_derivation_hash"),
            base_price: field_u64(fields, "base_price"),
            price_slope: field_u64(fields, "price_slope"),
            active_rental_count: field_u64(fields, "active_rentals"),
            mime_type: field_str(fields, "mime_type"),
            is_active: fields.get("is_active").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    /// Display price under the bonding curve:
    /// `base_price + price_slope * active_rental_count`.
    ///
    /// A read model only. The ledger contract recomputes the charge at
    /// execution time; rent transactions carry a max-price bound against
    /// drift between display and execution.
    pub const fn current_price(&self) -> u64 {
        self.base_price
            .saturating_add(self.price_slope.saturating_mul(self.active_rental_count))
    }
}

/// String field with an empty default for absent values.
pub(crate) fn field_str(fields: &serde_json::Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Numeric field tolerant of both JSON numbers and the ledger's
/// string-encoded u64s, with a zero default for absent values.
pub(crate) fn field_u64(fields: &serde_json::Map<String, Value>, key: &str) -> u64 {
    match fields.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_ledger_fields_full_record() {
        let fields = json!({
            "seller": "0xseller",
            "blob_id": "b1",
            "key_derivation_hash": "h1",
            "base_price": "1000",
            "price_slope": 50,
            "active_rentals": "3",
            "mime_type": "image/png",
            "is_active": true,
        });

        let listing = Listing::from_ledger_fields("0xlisting", &fields).unwrap();

        assert_eq!(listing.id, "0xlisting");
        assert_eq!(listing.seller_address, "0xseller");
        assert_eq!(listing.storage_blob_id, "b1");
        assert_eq!(listing.key_derivation_hash, "h1");
        assert_eq!(listing.base_price, 1000);
        assert_eq!(listing.price_slope, 50);
        assert_eq!(listing.active_rental_count, 3);
        assert_eq!(listing.mime_type, "image/png");
        assert!(listing.is_active);
    }

    #[test]
    fn test_from_ledger_fields_missing_optionals_default() {
        // Older on-chain objects predate the slope and mime_type fields.
        let fields = json!({
            "seller": "0xseller",
            "blob_id": "b1",
            "key_derivation_hash": "h1",
            "base_price": "1000",
        });

        let listing = Listing::from_ledger_fields("0xlisting", &fields).unwrap();

        assert_eq!(listing.price_slope, 0);
        assert_eq!(listing.active_rental_count, 0);
        assert_eq!(listing.mime_type, "");
        assert!(!listing.is_active);
    }

    #[test]
    fn test_from_ledger_fields_rejects_non_object() {
        let result = Listing::from_ledger_fields("0xlisting", &json!("not-an-object"));
        assert!(result.is_err());
    }

    #[test]
    fn test_current_price_follows_bonding_curve() {
        let mut listing =
            Listing::from_ledger_fields("l", &json!({"base_price": 100, "price_slope": 25}))
                .unwrap();

        assert_eq!(listing.current_price(), 100);

        listing.active_rental_count = 4;
        assert_eq!(listing.current_price(), 200);
    }

    #[test]
    fn test_current_price_saturates() {
        let listing = Listing {
            id: "l".into(),
            seller_address: String::new(),
            storage_blob_id: String::new(),
            key_derivation_hash: String::new(),
            base_price: u64::MAX,
            price_slope: u64::MAX,
            active_rental_count: 2,
            mime_type: String::new(),
            is_active: true,
        };

        assert_eq!(listing.current_price(), u64::MAX);
    }
}
