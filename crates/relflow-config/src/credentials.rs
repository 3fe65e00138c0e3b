//! アップロードコンテナにマウントする AWS 認証情報ディレクトリ
//!
//! ホスト固有のパス表記（Windows のドライブレター等）の変換はこのモジュールに閉じ込める。

use std::path::{Path, PathBuf};

/// コンテナ内の認証情報ディレクトリ
pub const CONTAINER_CREDENTIALS_DIR: &str = "/root/.aws";

/// ホスト OS の種類（マウント元パスの表記が変わる）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Unix,
    Windows,
}

impl HostKind {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// ホストパスを `docker run -v` のマウント元表記に変換
///
/// Windows では `C:\Users\me\.aws` を `/c/Users/me/.aws` にする。
pub fn mount_source(path: &Path, host: HostKind) -> String {
    let raw = path.to_string_lossy();
    match host {
        HostKind::Unix => raw.to_string(),
        HostKind::Windows => {
            let slashed = raw.replace('\\', "/");
            let mut chars = slashed.chars();
            match (chars.next(), chars.next()) {
                (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
                    format!("/{}{}", drive.to_ascii_lowercase(), &slashed[2..])
                }
                _ => slashed,
            }
        }
    }
}

/// 解決済みの認証情報マウント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialMount {
    host_path: PathBuf,
    host: HostKind,
    exists: bool,
}

impl CredentialMount {
    /// 実行ユーザーのホームディレクトリから解決
    pub fn detect() -> Self {
        Self::from_home(dirs::home_dir().as_deref(), HostKind::current())
    }

    /// ホームディレクトリを指定して解決
    ///
    /// ホームが分からない場合は `~/.aws` を返す（存在しない扱い）。
    pub fn from_home(home: Option<&Path>, host: HostKind) -> Self {
        match home {
            Some(home) => {
                let host_path = home.join(".aws");
                let exists = host_path.is_dir();
                Self {
                    host_path,
                    host,
                    exists,
                }
            }
            None => {
                tracing::debug!("Home directory could not be determined");
                Self {
                    host_path: PathBuf::from("~/.aws"),
                    host,
                    exists: false,
                }
            }
        }
    }

    pub fn host_path(&self) -> &Path {
        &self.host_path
    }

    /// ディレクトリが存在するか（存在しなくても処理は続行する）
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// `-v` に渡す `<host>:<container>` 文字列
    pub fn volume_arg(&self) -> String {
        format!(
            "{}:{}",
            mount_source(&self.host_path, self.host),
            CONTAINER_CREDENTIALS_DIR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_mount_source_unix_verbatim() {
        let path = Path::new("/home/deploy/.aws");
        assert_eq!(mount_source(path, HostKind::Unix), "/home/deploy/.aws");
    }

    #[test]
    fn test_mount_source_windows_drive() {
        let path = Path::new(r"C:\Users\deploy\.aws");
        assert_eq!(mount_source(path, HostKind::Windows), "/c/Users/deploy/.aws");
    }

    #[test]
    fn test_mount_source_windows_without_drive() {
        let path = Path::new(r"\\server\share\.aws");
        assert_eq!(
            mount_source(path, HostKind::Windows),
            "//server/share/.aws"
        );
    }

    #[test]
    fn test_existing_credentials_dir() {
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(home.path().join(".aws")).unwrap();

        let mount = CredentialMount::from_home(Some(home.path()), HostKind::Unix);
        assert!(mount.exists());
        assert_eq!(mount.host_path(), home.path().join(".aws"));
        assert_eq!(
            mount.volume_arg(),
            format!("{}:/root/.aws", home.path().join(".aws").display())
        );
    }

    #[test]
    fn test_missing_credentials_dir() {
        let home = tempfile::tempdir().unwrap();

        let mount = CredentialMount::from_home(Some(home.path()), HostKind::Unix);
        assert!(!mount.exists());
        // 存在しなくてもマウント指定は作る
        assert!(mount.volume_arg().ends_with(".aws:/root/.aws"));
    }

    #[test]
    fn test_unknown_home() {
        let mount = CredentialMount::from_home(None, HostKind::Unix);
        assert!(!mount.exists());
        assert_eq!(mount.volume_arg(), "~/.aws:/root/.aws");
    }
}
