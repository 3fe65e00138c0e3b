//! aws CLI wrapper
//!
//! Wraps the aws CLI commands used by the preflight checks.

use crate::error::{AwsError, Result};
use relflow_core::{CommandRunner, Invocation, OutputMode};
use serde::{Deserialize, Serialize};

/// aws CLI wrapper
pub struct AwsCli<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> AwsCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Check if the aws CLI is installed
    pub fn version(&self) -> Result<String> {
        let inv = Invocation::new("aws").arg("--version");
        let output = self
            .runner
            .run(&inv, OutputMode::Capture)
            .map_err(AwsError::AwsCliNotFound)?;

        if !output.success() {
            return Err(AwsError::CommandFailed(output.failure_reason()));
        }

        // aws CLI v1 prints its version to stderr
        let version = if output.stdout.trim().is_empty() {
            output.stderr.trim()
        } else {
            output.stdout.trim()
        };
        Ok(version.to_string())
    }

    /// Query the caller identity for a profile
    ///
    /// A non-zero exit means the profile's credentials are missing, expired
    /// or misconfigured. If the CLI succeeds but prints something we cannot
    /// parse, the credentials are still considered valid.
    pub fn caller_identity(&self, profile: &str) -> Result<CallerIdentity> {
        let inv = Invocation::new("aws").args([
            "sts",
            "get-caller-identity",
            "--profile",
            profile,
            "--output",
            "json",
        ]);

        let output = self
            .runner
            .run(&inv, OutputMode::Capture)
            .map_err(AwsError::AwsCliNotFound)?;

        if !output.success() {
            return Err(AwsError::AuthenticationFailed(output.failure_reason()));
        }

        match CallerIdentity::parse(&output.stdout) {
            Ok(identity) => Ok(identity),
            Err(e) => {
                tracing::warn!("Could not parse caller identity: {}", e);
                Ok(CallerIdentity::default())
            }
        }
    }
}

/// Caller identity from `aws sts get-caller-identity`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "UserId")]
    pub user_id: Option<String>,

    #[serde(rename = "Account")]
    pub account: Option<String>,

    #[serde(rename = "Arn")]
    pub arn: Option<String>,
}

impl CallerIdentity {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Human readable summary (ARN if known, then account)
    pub fn describe(&self) -> String {
        match (&self.arn, &self.account) {
            (Some(arn), _) => arn.clone(),
            (None, Some(account)) => format!("account {}", account),
            (None, None) => "unknown identity".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relflow_core::testing::{Reply, ScriptedRunner};

    const IDENTITY_JSON: &str = r#"{
    "UserId": "AIDAEXAMPLEUSERID",
    "Account": "123456789012",
    "Arn": "arn:aws:iam::123456789012:user/deploy-user"
}"#;

    #[test]
    fn test_version_v1_on_stderr() {
        let runner = ScriptedRunner::new().on(
            "aws",
            "--version",
            Reply::Stderr(0, "aws-cli/1.18.69 Python/3.8.10".to_string()),
        );
        let aws = AwsCli::new(&runner);
        assert_eq!(aws.version().unwrap(), "aws-cli/1.18.69 Python/3.8.10");
    }

    #[test]
    fn test_version_not_installed() {
        let runner = ScriptedRunner::new().missing("aws");
        let aws = AwsCli::new(&runner);
        assert!(matches!(aws.version(), Err(AwsError::AwsCliNotFound(_))));
    }

    #[test]
    fn test_caller_identity() {
        let runner = ScriptedRunner::new().on(
            "aws",
            "sts",
            Reply::Stdout(IDENTITY_JSON.to_string()),
        );
        let aws = AwsCli::new(&runner);

        let identity = aws.caller_identity("deploy-user").unwrap();
        assert_eq!(identity.account.as_deref(), Some("123456789012"));
        assert_eq!(
            identity.describe(),
            "arn:aws:iam::123456789012:user/deploy-user"
        );

        let call = &runner.calls()[0];
        assert_eq!(
            call.to_string(),
            "aws sts get-caller-identity --profile deploy-user --output json"
        );
    }

    #[test]
    fn test_caller_identity_expired() {
        let runner = ScriptedRunner::new().on(
            "aws",
            "sts",
            Reply::Stderr(
                255,
                "An error occurred (ExpiredToken) when calling the GetCallerIdentity operation"
                    .to_string(),
            ),
        );
        let aws = AwsCli::new(&runner);

        match aws.caller_identity("deploy-user") {
            Err(AwsError::AuthenticationFailed(msg)) => assert!(msg.contains("ExpiredToken")),
            other => panic!("Expected AuthenticationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_caller_identity_unparseable_is_not_fatal() {
        let runner = ScriptedRunner::new().on("aws", "sts", Reply::Stdout("ok\n".to_string()));
        let aws = AwsCli::new(&runner);

        let identity = aws.caller_identity("deploy-user").unwrap();
        assert_eq!(identity, CallerIdentity::default());
        assert_eq!(identity.describe(), "unknown identity");
    }

    #[test]
    fn test_describe_account_only() {
        let identity = CallerIdentity {
            account: Some("123456789012".to_string()),
            ..Default::default()
        };
        assert_eq!(identity.describe(), "account 123456789012");
    }
}
