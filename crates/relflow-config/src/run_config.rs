//! 実行設定（RunConfig）の解決

use crate::source::ConfigSource;
use std::fmt;

/// 環境変数で上書きできる設定キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Profile,
    Bucket,
    Prefix,
    Version,
    ImageName,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::Profile,
        ConfigKey::Bucket,
        ConfigKey::Prefix,
        ConfigKey::Version,
        ConfigKey::ImageName,
    ];

    /// 上書きに使う環境変数名
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Profile => "AWS_PROFILE",
            Self::Bucket => "S3_BUCKET",
            Self::Prefix => "S3_PREFIX",
            Self::Version => "VERSION",
            Self::ImageName => "IMAGE_NAME",
        }
    }

    /// 組み込みデフォルト値
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::Profile => "deploy-user",
            Self::Bucket => "rewardo-deploy-artefacts",
            Self::Prefix => "rewardo-search-api",
            Self::Version => "latest",
            Self::ImageName => "rewardo-search-api:latest",
        }
    }
}

/// ビルドに使う Dockerfile の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildDefinition {
    /// マルチステージでソースからコンパイルする
    #[default]
    Service,
    /// ビルド済みバイナリと env ファイルをコピーするだけのランタイムイメージ
    Artifact,
}

impl BuildDefinition {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Service => "Dockerfile",
            Self::Artifact => "Dockerfile.artifact",
        }
    }
}

impl fmt::Display for BuildDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// 呼び出し時にCLIから渡される値（環境変数では上書きできない）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub build_only: bool,
    pub definition: BuildDefinition,
}

/// 1回の実行で使う設定
///
/// 起動時に一度だけ解決され、以降は読み取り専用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    profile: String,
    bucket: String,
    prefix: String,
    version: String,
    image_name: String,
    build_only: bool,
    definition: BuildDefinition,
}

impl RunConfig {
    /// 上書き値とデフォルトをマージする
    ///
    /// 値の形式（バケット名の規則など）は検証しない。不正な値は
    /// docker / aws 側のエラーとして後で表面化する。
    pub fn resolve(source: &dyn ConfigSource, options: RunOptions) -> Self {
        let value = |key: ConfigKey| {
            source
                .get(key.env_var())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| key.default_value().to_string())
        };

        Self {
            profile: value(ConfigKey::Profile),
            bucket: value(ConfigKey::Bucket),
            prefix: value(ConfigKey::Prefix),
            version: value(ConfigKey::Version),
            image_name: value(ConfigKey::ImageName),
            build_only: options.build_only,
            definition: options.definition,
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn build_only(&self) -> bool {
        self.build_only
    }

    pub fn definition(&self) -> BuildDefinition {
        self.definition
    }

    /// キーに対応する解決済みの値
    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::Profile => &self.profile,
            ConfigKey::Bucket => &self.bucket,
            ConfigKey::Prefix => &self.prefix,
            ConfigKey::Version => &self.version,
            ConfigKey::ImageName => &self.image_name,
        }
    }

    /// アップロードコンテナに渡す環境変数（IMAGE_NAME は渡さない）
    pub fn container_env(&self) -> Vec<(&'static str, &str)> {
        [
            ConfigKey::Profile,
            ConfigKey::Bucket,
            ConfigKey::Prefix,
            ConfigKey::Version,
        ]
        .into_iter()
        .map(|key| (key.env_var(), self.get(key)))
        .collect()
    }
}
