pub use kernel::id::IdentityId;
