//! Core Mys types used by the sponsorship pipeline.

mod address;
mod object;

pub use address::{MysAddress, ObjectId, ADDRESS_LENGTH};
pub use object::{GasPaymentReference, ObjectDigest, ObjectRef, DIGEST_LENGTH};
pub(crate) use object::WireObjectRef;

/// The native coin type used to pay for gas.
pub const MYS_COIN_TYPE: &str = "0x2::mys::MYS";
