use thiserror::Error;

/// パイプラインを中断させる致命的エラー
///
/// どのバリアントも発生したステージで即座にパイプラインを終了させる。
/// リトライや握りつぶしは行わない。
#[derive(Error, Debug)]
pub enum StageError {
    #[error("{tool} が利用できません: {reason}")]
    ToolMissing { tool: String, reason: String },

    #[error("プロファイル '{profile}' の認証情報を確認できません: {reason}")]
    CredentialInvalid { profile: String, reason: String },

    #[error("イメージのビルドに失敗しました: {image} ({})", describe_exit(*.code))]
    BuildFailed { image: String, code: Option<i32> },

    #[error("アップロードコンテナが失敗しました: {image} ({})", describe_exit(*.code))]
    UploadFailed { image: String, code: Option<i32> },
}

impl StageError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            StageError::ToolMissing { tool, reason } => {
                format!(
                    "{} が見つからないか、実行できません: {}\n\
                     \n\
                     解決方法:\n\
                     1. {} をインストールしてください\n\
                     2. PATH が通っていることを確認してください",
                    tool, reason, tool
                )
            }
            StageError::CredentialInvalid { profile, reason } => {
                format!(
                    "プロファイル '{}' で AWS の認証情報を確認できませんでした: {}\n\
                     \n\
                     解決方法:\n\
                     1. aws configure --profile {} で認証情報を設定し直してください\n\
                     2. 別のプロファイルを使う場合は AWS_PROFILE を指定してください",
                    profile, reason, profile
                )
            }
            StageError::BuildFailed { image, code } => {
                format!(
                    "イメージ {} のビルドに失敗しました ({})\n\
                     \n\
                     Dockerfileの内容とビルドログを確認してください。",
                    image,
                    describe_exit(*code)
                )
            }
            StageError::UploadFailed { image, code } => {
                format!(
                    "イメージ {} によるアップロードに失敗しました ({})\n\
                     \n\
                     コンテナのログと S3 バケットへの権限を確認してください。",
                    image,
                    describe_exit(*code)
                )
            }
        }
    }
}

/// 終了コードを表示用の文字列にする
pub fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("終了コード {}", code),
        None => "シグナルにより終了".to_string(),
    }
}
