//! パイプラインのステージ定義と実行結果

use crate::error::StageError;

/// パイプラインの各ステージ（実行順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// docker の存在確認
    BuildToolCheck,
    /// aws CLI の存在確認
    UploadToolCheck,
    /// 呼び出し元 ID の確認
    IdentityCheck,
    /// イメージのビルド
    Build,
    /// コンテナによるアップロード
    Upload,
}

impl StageKind {
    /// ステージの日本語名
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuildToolCheck => "Docker確認",
            Self::UploadToolCheck => "AWS CLI確認",
            Self::IdentityCheck => "認証情報確認",
            Self::Build => "イメージビルド",
            Self::Upload => "アップロード",
        }
    }

    /// 事前チェック（ビルド・アップロード前の検証）か
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::BuildToolCheck | Self::UploadToolCheck | Self::IdentityCheck
        )
    }
}

/// 成功したステージの報告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: StageKind,
    pub message: String,
    /// 続行可能な警告（認証情報ディレクトリが無い等）
    pub warnings: Vec<String>,
}

impl StageReport {
    pub fn new(stage: StageKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub type StageResult = std::result::Result<StageReport, StageError>;
