mod assume_role;
pub use assume_role::AssumeRoleCredentialProvider;
pub use assume_role::DEFAULT_DURATION_SECONDS;

mod config;
pub use config::ConfigCredentialProvider;

mod default;
pub use default::DefaultCredentialProvider;

mod env;
pub use env::EnvCredentialProvider;

mod r#static;
pub use r#static::StaticCredentialProvider;

mod utils;
