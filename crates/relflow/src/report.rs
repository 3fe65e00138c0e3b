//! オペレーター向けの表示
//!
//! 進捗と結果は stdout、致命的エラーは stderr に出す。

use crate::pipeline::Outcome;
use colored::Colorize;
use relflow_config::RunConfig;
use relflow_core::{StageError, StageKind, StageReport};

/// 解決済みの設定を表示（ビルド・アップロード前の確認用）
pub fn print_config(config: &RunConfig) {
    println!("{}", "リリースビルドを開始します...".blue().bold());
    println!("📄 実行設定:");
    println!("  プロファイル: {}", config.profile().cyan());
    println!("  バケット: {}", config.bucket().cyan());
    println!("  プレフィックス: {}", config.prefix().cyan());
    println!("  バージョン: {}", config.version().cyan());
    println!("  イメージ: {}", config.image_name().cyan());
    println!("  Dockerfile: {}", config.definition().file_name().cyan());
    if config.build_only() {
        println!("  モード: {}", "ビルドのみ".yellow());
    } else {
        println!("  モード: ビルド＋アップロード");
    }
}

pub fn stage_start(step: usize, total: usize, stage: StageKind) {
    let label = if stage.is_preflight() {
        format!("事前チェック: {}", stage.name())
    } else {
        stage.name().to_string()
    };
    println!();
    println!("{}", format!("【Step {}/{}】{}...", step, total, label).yellow());
}

pub fn stage_ok(report: &StageReport) {
    for message in &report.warnings {
        warning(message);
    }
    println!("  {} {}", "✓".green(), report.message);
}

pub fn stage_failed(stage: StageKind, error: &StageError) {
    println!("  {} {}: {}", "✗".red().bold(), stage.name(), error);
}

fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

pub fn print_outcome(outcome: &Outcome) {
    println!();
    match outcome {
        Outcome::Built { image } => {
            println!(
                "{} {}",
                "✓ イメージをビルドしました:".green().bold(),
                image.cyan()
            );
            println!("ビルドのみのため、アップロードはスキップしました。");
        }
        Outcome::Uploaded {
            image,
            bucket,
            prefix,
            version,
        } => {
            println!("{}", "✓ アップロードが完了しました！".green().bold());
            println!("  イメージ: {}", image.cyan());
            println!(
                "  送信先: {} (バージョン: {})",
                format!("s3://{}/{}", bucket, prefix).cyan(),
                version
            );
        }
    }
}

pub fn print_failure(error: &StageError) {
    eprintln!();
    eprintln!("{} {}", "Error:".red().bold(), error.user_message());
}
