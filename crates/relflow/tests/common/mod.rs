use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

const FAKE_DOCKER: &str = r#"#!/bin/sh
echo "docker $*" >> "$RELFLOW_CALL_LOG"
case "$1" in
  --version) echo "Docker version 27.3.1, build ce12230" ;;
  build) exit "${FAKE_DOCKER_BUILD_EXIT:-0}" ;;
  run) exit "${FAKE_DOCKER_RUN_EXIT:-0}" ;;
esac
exit 0
"#;

const FAKE_AWS: &str = r#"#!/bin/sh
echo "aws $*" >> "$RELFLOW_CALL_LOG"
case "$1" in
  --version) echo "aws-cli/2.15.0 Python/3.11.6 Linux/6.5.0 exe/x86_64" ;;
  sts)
    if [ "${FAKE_AWS_STS_EXIT:-0}" != "0" ]; then
      echo "Unable to locate credentials. You can configure credentials by running \"aws configure\"." >&2
      exit "$FAKE_AWS_STS_EXIT"
    fi
    echo '{"UserId":"AIDAEXAMPLE","Account":"123456789012","Arn":"arn:aws:iam::123456789012:user/deploy-user"}'
    ;;
esac
exit 0
"#;

/// 偽の docker / aws を置いたディレクトリ
///
/// スクリプトはプロセス全体で一度だけ書き込む（書き込み中のファイルを
/// 別スレッドの fork が掴むと ETXTBSY になるため）。
struct FakeTools {
    _root: TempDir,
    /// docker と aws の両方
    full: PathBuf,
    /// aws のみ（docker 未インストール）
    aws_only: PathBuf,
}

fn fake_tools() -> &'static FakeTools {
    static TOOLS: OnceLock<FakeTools> = OnceLock::new();
    TOOLS.get_or_init(|| {
        let root = tempfile::tempdir().unwrap();
        let full = root.path().join("full");
        let aws_only = root.path().join("aws-only");
        fs::create_dir_all(&full).unwrap();
        fs::create_dir_all(&aws_only).unwrap();

        write_script(&full.join("docker"), FAKE_DOCKER);
        write_script(&full.join("aws"), FAKE_AWS);
        write_script(&aws_only.join("aws"), FAKE_AWS);

        FakeTools {
            _root: root,
            full,
            aws_only,
        }
    })
}

fn write_script(path: &Path, content: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// 1テスト分の作業環境（ビルドコンテキスト・HOME・呼び出しログ）
pub struct TestRelease {
    pub root: TempDir,
    path_dir: PathBuf,
}

impl TestRelease {
    pub fn new() -> Self {
        let tools = fake_tools();
        let release = Self::with_path(tools.full.clone());
        fs::create_dir_all(release.home().join(".aws")).unwrap();
        release
    }

    /// docker が PATH に無い環境
    #[allow(dead_code)]
    pub fn without_docker() -> Self {
        Self::with_path(fake_tools().aws_only.clone())
    }

    fn with_path(path_dir: PathBuf) -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("home")).unwrap();
        fs::create_dir_all(root.path().join("context")).unwrap();
        Self { root, path_dir }
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn context(&self) -> PathBuf {
        self.root.path().join("context")
    }

    fn call_log_path(&self) -> PathBuf {
        self.root.path().join("calls.log")
    }

    /// 偽ツールが記録したコマンドライン（1行1呼び出し）
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.call_log_path())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[allow(dead_code)]
    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    /// 環境変数を空にした relflow コマンド
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("relflow").unwrap();
        cmd.current_dir(self.context())
            .env_clear()
            .env("PATH", &self.path_dir)
            .env("HOME", self.home())
            .env("NO_COLOR", "1")
            .env("RELFLOW_CALL_LOG", self.call_log_path());
        cmd
    }
}
