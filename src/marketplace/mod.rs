pub mod listing;
pub mod pass;
pub mod payload;

pub use listing::Listing;
pub use pass::AccessPass;
pub use payload::{EncryptedPayload, PublishReceipt};
