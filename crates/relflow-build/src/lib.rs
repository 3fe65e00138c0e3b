//! relflow の Docker 操作
//!
//! docker CLI をサブプロセスとして呼び出し、イメージのビルドと
//! アップロード用コンテナの実行を行う。

pub mod docker;
pub mod error;

pub use docker::{DEFAULT_PLATFORM, DockerCli, UploadRun};
pub use error::{DockerError, Result};
