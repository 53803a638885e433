pub mod avatar;
pub mod config;
pub mod error;
pub mod form;
pub mod service;
pub mod table;

pub use avatar::{AvatarStore, AvatarUpload, FsAvatarStore, NoopAvatarStore};
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use form::RegistrationForm;
pub use service::{RankedPlayer, Registry};
