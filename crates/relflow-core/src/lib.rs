//! relflow の共通基盤
//!
//! 外部コマンド（docker, aws）の実行を `CommandRunner` トレイトに集約し、
//! パイプラインの各ステージが返す結果型・エラー型を定義する。

pub mod error;
pub mod runner;
pub mod stage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{StageError, describe_exit};
pub use runner::{CommandOutput, CommandRunner, Invocation, OutputMode, SystemRunner};
pub use stage::{StageKind, StageReport, StageResult};
