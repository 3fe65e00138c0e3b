use thiserror::Error;

#[derive(Debug, Error)]
pub enum DockerError {
    #[error("docker を起動できません: {0}")]
    NotFound(#[source] std::io::Error),

    #[error("docker コマンドが失敗しました: {0}")]
    CommandFailed(String),

    #[error("docker {subcommand} が異常終了しました (code: {code:?})")]
    ExitStatus {
        subcommand: &'static str,
        code: Option<i32>,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DockerError>;
