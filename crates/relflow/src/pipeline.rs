//! リリースパイプライン
//!
//! Docker確認 → AWS CLI確認 → 認証情報確認 → ビルド → アップロード の順に一直線に進む。
//! どのステージも失敗した時点で `StageError` を返して終了し、後続は実行しない。
//! ビルドのみの場合は AWS 関連の確認とアップロードを計画から外す。

use crate::report;
use relflow_build::{DockerCli, DockerError, UploadRun};
use relflow_cloud_aws::{AwsCli, AwsError};
use relflow_config::{CredentialMount, RunConfig};
use relflow_core::{CommandRunner, StageError, StageKind, StageReport, StageResult};

/// パイプラインの最終結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// ビルドのみで正常終了
    Built { image: String },
    /// アップロードまで完了
    Uploaded {
        image: String,
        bucket: String,
        prefix: String,
        version: String,
    },
}

pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a RunConfig,
    credentials: Option<CredentialMount>,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn CommandRunner, config: &'a RunConfig) -> Self {
        Self {
            runner,
            config,
            credentials: None,
        }
    }

    /// 認証情報マウントを固定する（未指定ならアップロード時にホームから解決）
    #[cfg(test)]
    pub fn with_credentials(mut self, credentials: CredentialMount) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// 実行するステージ（順序固定）
    pub fn plan(&self) -> Vec<StageKind> {
        if self.config.build_only() {
            vec![StageKind::BuildToolCheck, StageKind::Build]
        } else {
            vec![
                StageKind::BuildToolCheck,
                StageKind::UploadToolCheck,
                StageKind::IdentityCheck,
                StageKind::Build,
                StageKind::Upload,
            ]
        }
    }

    pub fn run(&self) -> Result<Outcome, StageError> {
        let plan = self.plan();

        for (index, stage) in plan.iter().enumerate() {
            report::stage_start(index + 1, plan.len(), *stage);
            let stage_report = self
                .run_stage(*stage)
                .inspect_err(|e| report::stage_failed(*stage, e))?;
            report::stage_ok(&stage_report);
        }

        let image = self.config.image_name().to_string();
        if self.config.build_only() {
            return Ok(Outcome::Built { image });
        }

        Ok(Outcome::Uploaded {
            image,
            bucket: self.config.bucket().to_string(),
            prefix: self.config.prefix().to_string(),
            version: self.config.version().to_string(),
        })
    }

    fn run_stage(&self, stage: StageKind) -> StageResult {
        match stage {
            StageKind::BuildToolCheck => self.check_build_tool(),
            StageKind::UploadToolCheck => self.check_upload_tool(),
            StageKind::IdentityCheck => self.check_identity(),
            StageKind::Build => self.build(),
            StageKind::Upload => self.upload(),
        }
    }

    fn check_build_tool(&self) -> StageResult {
        let version = DockerCli::new(self.runner)
            .version()
            .map_err(|e| tool_missing("docker", e))?;
        Ok(StageReport::new(StageKind::BuildToolCheck, version))
    }

    fn check_upload_tool(&self) -> StageResult {
        let version = AwsCli::new(self.runner)
            .version()
            .map_err(|e| tool_missing("aws", e))?;
        Ok(StageReport::new(StageKind::UploadToolCheck, version))
    }

    fn check_identity(&self) -> StageResult {
        let profile = self.config.profile();
        let identity = AwsCli::new(self.runner)
            .caller_identity(profile)
            .map_err(|e| match e {
                err @ AwsError::AwsCliNotFound(_) => tool_missing("aws", err),
                AwsError::AuthenticationFailed(reason) => StageError::CredentialInvalid {
                    profile: profile.to_string(),
                    reason,
                },
                other => StageError::CredentialInvalid {
                    profile: profile.to_string(),
                    reason: other.to_string(),
                },
            })?;

        Ok(StageReport::new(
            StageKind::IdentityCheck,
            format!("{} ({})", identity.describe(), profile),
        ))
    }

    fn build(&self) -> StageResult {
        let image = self.config.image_name();
        DockerCli::new(self.runner)
            .build(self.config.definition(), image)
            .map_err(|e| match e {
                DockerError::ExitStatus { code, .. } => StageError::BuildFailed {
                    image: image.to_string(),
                    code,
                },
                other => tool_missing("docker", other),
            })?;

        Ok(StageReport::new(StageKind::Build, image))
    }

    fn upload(&self) -> StageResult {
        let mut stage_report = StageReport::new(
            StageKind::Upload,
            format!("s3://{}/{}", self.config.bucket(), self.config.prefix()),
        );

        let credentials = self
            .credentials
            .clone()
            .unwrap_or_else(CredentialMount::detect);

        // 認証情報ディレクトリが無くても続行する（コンテナ側で別の方法で解決できる場合がある）
        if !credentials.exists() {
            tracing::debug!(
                "Credentials directory not found: {}",
                credentials.host_path().display()
            );
            stage_report = stage_report.with_warning(format!(
                "認証情報ディレクトリが見つかりません: {}",
                credentials.host_path().display()
            ));
        }

        let run = UploadRun::from_config(self.config, &credentials);
        DockerCli::new(self.runner)
            .run_upload(&run)
            .map_err(|e| match e {
                DockerError::ExitStatus { code, .. } => StageError::UploadFailed {
                    image: run.image.clone(),
                    code,
                },
                other => tool_missing("docker", other),
            })?;

        Ok(stage_report)
    }
}

fn tool_missing(tool: &str, error: impl std::fmt::Display) -> StageError {
    StageError::ToolMissing {
        tool: tool.to_string(),
        reason: error.to_string(),
    }
}
