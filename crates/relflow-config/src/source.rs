//! 設定値の取得元
//!
//! 優先順位: プロセス環境変数 > envファイル > 組み込みデフォルト
//! （デフォルトは `RunConfig::resolve` 側が持つ）

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::path::Path;

/// 設定キー（環境変数名）から上書き値を引く
pub trait ConfigSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// プロセスの環境変数
///
/// UTF-8 でない値も「設定あり」として扱い、不正なバイトは U+FFFD に置き換える。
/// 未設定扱いにしてデフォルト（本番バケット等）へ落ちることはない。
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        let value = std::env::var_os(name)?;
        match value.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                let lossy = raw.to_string_lossy().into_owned();
                tracing::warn!("{} is not valid UTF-8, using lossy value: {}", name, lossy);
                Some(lossy)
            }
        }
    }
}

/// メモリ上の key/value
#[derive(Debug, Default, Clone)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// dotenv 形式のファイルを読み込む
    ///
    /// プロセス環境変数には書き込まない。
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let to_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(to_error)? {
            let (key, value) = item.map_err(to_error)?;
            values.insert(key, value);
        }

        tracing::debug!("Loaded {} entries from {}", values.len(), path.display());
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for MapSource {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 複数の取得元を順に参照する
///
/// 先頭から順に見て、空でない値が最初に見つかったものを採用する。
/// 空文字列は「未設定」と同じ扱いで次の取得元にフォールバックする。
#[derive(Default)]
pub struct Layered {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Layered {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl ConfigSource for Layered {
    fn get(&self, name: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.get(name))
            .find(|value| !value.is_empty())
    }
}
