mod pipeline;
mod report;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use relflow_config::{BuildDefinition, EnvSource, Layered, MapSource, RunConfig, RunOptions};
use relflow_core::SystemRunner;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "relflow", version)]
#[command(
    about = "サービスのコンテナイメージをビルドし、成果物を S3 にアップロードする",
    long_about = None
)]
struct Cli {
    /// イメージのビルドのみ行う（AWS の確認とアップロードをスキップ）
    #[arg(long, alias = "BuildOnly")]
    build_only: bool,
    /// ビルド済みバイナリ用の Dockerfile.artifact を使う
    #[arg(long)]
    artifact: bool,
    /// 設定を読み込む env ファイル（プロセスの環境変数が優先）
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
    /// ログを詳細にする（-v: info, -vv: debug, -vvv: trace）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> RunOptions {
        RunOptions {
            build_only: self.build_only,
            definition: if self.artifact {
                BuildDefinition::Artifact
            } else {
                BuildDefinition::Service
            },
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG が設定されていればそちらを優先
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// 設定を解決する（プロセス環境変数 > envファイル > デフォルト）
fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut source = Layered::new().push(EnvSource);

    if let Some(path) = &cli.env_file {
        let file_source = MapSource::from_env_file(path)
            .with_context(|| format!("envファイルの読み込みに失敗しました: {}", path.display()))?;
        tracing::info!("Loaded env file: {}", path.display());
        source = source.push(file_source);
    }

    Ok(RunConfig::resolve(&source, cli.options()))
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = resolve_config(&cli)?;
    report::print_config(&config);

    let runner = SystemRunner;
    match Pipeline::new(&runner, &config).run() {
        Ok(outcome) => {
            report::print_outcome(&outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report::print_failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["relflow"]).unwrap();
        assert_eq!(cli.options(), RunOptions::default());
        assert!(cli.env_file.is_none());
    }

    #[test]
    fn test_cli_build_only_alias() {
        let cli = Cli::try_parse_from(["relflow", "--BuildOnly"]).unwrap();
        assert!(cli.options().build_only);

        let cli = Cli::try_parse_from(["relflow", "--build-only", "--artifact"]).unwrap();
        assert_eq!(
            cli.options(),
            RunOptions {
                build_only: true,
                definition: BuildDefinition::Artifact,
            }
        );
    }

    #[test]
    fn test_cli_verbose_count() {
        let cli = Cli::try_parse_from(["relflow", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["relflow", "--upload-only"]).is_err());
    }
}
