//! relflow の実行設定
//!
//! 環境変数（と任意の env ファイル）から `RunConfig` を解決する。
//! 解決は `ConfigSource` を受け取る純粋関数で、プロセス環境には直接依存しない。

pub mod credentials;
pub mod error;
pub mod run_config;
pub mod source;

pub use credentials::{CONTAINER_CREDENTIALS_DIR, CredentialMount, HostKind, mount_source};
pub use error::{ConfigError, Result};
pub use run_config::{BuildDefinition, ConfigKey, RunConfig, RunOptions};
pub use source::{ConfigSource, EnvSource, Layered, MapSource};
