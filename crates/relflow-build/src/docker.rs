use crate::error::{DockerError, Result};
use relflow_config::{BuildDefinition, CredentialMount, RunConfig};
use relflow_core::{CommandRunner, Invocation, OutputMode};

/// アップロードコンテナのプラットフォーム（ホストのアーキテクチャに関わらず固定）
pub const DEFAULT_PLATFORM: &str = "linux/amd64";

/// docker CLI wrapper
pub struct DockerCli<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> DockerCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// `docker --version` で docker が使えるか確認
    pub fn version(&self) -> Result<String> {
        let inv = Invocation::new("docker").arg("--version");
        let output = self
            .runner
            .run(&inv, OutputMode::Capture)
            .map_err(DockerError::NotFound)?;

        if !output.success() {
            return Err(DockerError::CommandFailed(output.failure_reason()));
        }

        Ok(output.stdout.trim().to_string())
    }

    /// `docker build -f <Dockerfile> -t <tag> .`
    pub fn build_invocation(definition: BuildDefinition, tag: &str) -> Invocation {
        Invocation::new("docker")
            .arg("build")
            .arg("-f")
            .arg(definition.file_name())
            .arg("-t")
            .arg(tag)
            // ビルドコンテキストはカレントディレクトリ
            .arg(".")
    }

    /// イメージをビルド
    ///
    /// ビルドログは端末にそのまま流す。
    pub fn build(&self, definition: BuildDefinition, tag: &str) -> Result<()> {
        tracing::info!("Building image: {} ({})", tag, definition);

        let inv = Self::build_invocation(definition, tag);
        let output = self.runner.run(&inv, OutputMode::Inherit)?;

        if !output.success() {
            return Err(DockerError::ExitStatus {
                subcommand: "build",
                code: output.code,
            });
        }

        tracing::info!("Successfully built: {}", tag);
        Ok(())
    }

    /// アップロード用コンテナを実行（終了まで待つ）
    pub fn run_upload(&self, run: &UploadRun) -> Result<()> {
        tracing::info!("Running upload container: {}", run.image);

        let output = self.runner.run(&run.invocation(), OutputMode::Inherit)?;

        if !output.success() {
            return Err(DockerError::ExitStatus {
                subcommand: "run",
                code: output.code,
            });
        }

        Ok(())
    }
}

/// アップロード用コンテナの起動設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRun {
    pub image: String,
    pub platform: String,
    /// `<host>:<container>` 形式
    pub volume: String,
    pub env: Vec<(String, String)>,
}

impl UploadRun {
    pub fn from_config(config: &RunConfig, mount: &CredentialMount) -> Self {
        Self {
            image: config.image_name().to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            volume: mount.volume_arg(),
            env: config
                .container_env()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// `docker run --rm --platform ... -v ... -e K=V ... <image>`
    pub fn invocation(&self) -> Invocation {
        let mut inv = Invocation::new("docker")
            .arg("run")
            .arg("--rm")
            .arg("--platform")
            .arg(&self.platform)
            .arg("-v")
            .arg(&self.volume);

        for (key, value) in &self.env {
            inv = inv.arg("-e").arg(format!("{}={}", key, value));
        }

        inv.arg(&self.image)
    }
}
