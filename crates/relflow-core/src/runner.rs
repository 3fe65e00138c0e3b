//! 外部コマンド実行の抽象化
//!
//! パイプラインは docker / aws を直接 spawn せず、必ず `CommandRunner` 経由で
//! 呼び出す。本番では `SystemRunner`、テストでは `testing::ScriptedRunner` を使う。

use std::fmt;
use std::process::{Command, Stdio};

/// 実行するコマンドライン（プログラム名 + 引数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// 最初の引数（サブコマンド）
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// 子プロセスの標準出力の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// stdout/stderr を取り込む（バージョン確認・認証確認）
    Capture,
    /// 端末にそのまま流す（ビルド・アップロードの進捗表示）
    Inherit,
}

/// 子プロセスの終了結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// 終了コード（シグナルで終了した場合は None）
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// 失敗理由として表示する文字列（stderr があればそれを優先）
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            crate::describe_exit(self.code)
        } else {
            stderr.to_string()
        }
    }
}

/// 外部コマンドの実行器
///
/// 呼び出しは常にブロッキングで、子プロセスの終了まで戻らない。
/// プログラムが見つからない・起動できない場合は `Err(io::Error)` を返す。
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> std::io::Result<CommandOutput>;
}

/// `std::process::Command` による実装
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, mode: OutputMode) -> std::io::Result<CommandOutput> {
        tracing::debug!("Running: {}", invocation);

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.arguments());

        match mode {
            OutputMode::Capture => {
                let output = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output()?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            OutputMode::Inherit => {
                let status = cmd.status()?;
                Ok(CommandOutput {
                    code: status.code(),
                    ..Default::default()
                })
            }
        }
    }
}
