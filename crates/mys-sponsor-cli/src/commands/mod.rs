//! CLI command implementations.

pub mod address;
pub mod execute;
pub mod sponsor;

pub use address::AddressArgs;
pub use execute::ExecuteArgs;
pub use sponsor::SponsorArgs;
