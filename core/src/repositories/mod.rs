pub mod revocation;
pub mod user;

pub use revocation::RevocationRepository;
pub use user::UserDirectory;

#[cfg(test)]
pub use revocation::MockRevocationRepository;
#[cfg(test)]
pub use user::MockUserDirectory;
