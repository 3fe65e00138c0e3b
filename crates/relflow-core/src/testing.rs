//! テスト用の CommandRunner
//!
//! 実際のプロセスを起動せず、プログラム名とサブコマンドごとに応答を決めておく。
//! 呼び出し履歴を記録するので「このコマンドは呼ばれていない」ことを検証できる。

use crate::runner::{CommandOutput, CommandRunner, Invocation, OutputMode};
use std::cell::RefCell;
use std::io;

/// 呼び出しに対する応答
#[derive(Debug, Clone)]
pub enum Reply {
    /// 指定の終了コードで終了
    Exit(i32),
    /// 終了コード 0 と標準出力
    Stdout(String),
    /// 終了コードと標準エラー出力
    Stderr(i32, String),
    /// プログラムが見つからない
    Missing,
}

#[derive(Debug)]
struct Rule {
    program: String,
    subcommand: Option<String>,
    reply: Reply,
}

/// 応答を事前定義できる CommandRunner
///
/// ルールに一致しない呼び出しは終了コード 0 で成功する。
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `program subcommand ...` への応答を登録
    pub fn on(mut self, program: &str, subcommand: &str, reply: Reply) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            subcommand: Some(subcommand.to_string()),
            reply,
        });
        self
    }

    /// プログラム自体が存在しないことにする
    pub fn missing(mut self, program: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            subcommand: None,
            reply: Reply::Missing,
        });
        self
    }

    /// これまでの呼び出し履歴
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// `program subcommand` が一度でも呼ばれたか
    pub fn called(&self, program: &str, subcommand: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| c.program() == program && c.subcommand() == Some(subcommand))
    }

    fn reply_for(&self, invocation: &Invocation) -> Reply {
        self.rules
            .iter()
            .find(|rule| {
                rule.program == invocation.program()
                    && rule
                        .subcommand
                        .as_deref()
                        .is_none_or(|sub| invocation.subcommand() == Some(sub))
            })
            .map(|rule| rule.reply.clone())
            .unwrap_or(Reply::Exit(0))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation, _mode: OutputMode) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());

        match self.reply_for(invocation) {
            Reply::Exit(code) => Ok(CommandOutput::exited(code)),
            Reply::Stdout(stdout) => Ok(CommandOutput {
                code: Some(0),
                stdout,
                stderr: String::new(),
            }),
            Reply::Stderr(code, stderr) => Ok(CommandOutput {
                code: Some(code),
                stdout: String::new(),
                stderr,
            }),
            Reply::Missing => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: command not found", invocation.program()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_runner_records_calls() {
        let runner = ScriptedRunner::new().on("docker", "build", Reply::Exit(1));

        let build = Invocation::new("docker").args(["build", "."]);
        let output = runner.run(&build, OutputMode::Inherit).unwrap();
        assert_eq!(output.code, Some(1));

        let version = Invocation::new("docker").arg("--version");
        assert!(runner.run(&version, OutputMode::Capture).unwrap().success());

        assert!(runner.called("docker", "build"));
        assert!(!runner.called("docker", "run"));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_scripted_runner_missing_program() {
        let runner = ScriptedRunner::new().missing("aws");
        let inv = Invocation::new("aws").arg("--version");
        let err = runner.run(&inv, OutputMode::Capture).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
