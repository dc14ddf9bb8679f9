use crate::shared::core::primitives::AccessToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    Cli,
    Http,
}

/// What the process was started with. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    mode: InvocationMode,
    args: Vec<String>,
    access_token: Option<AccessToken>,
}

impl ExecutionContext {
    pub fn cli(args: Vec<String>) -> Self {
        Self {
            mode: InvocationMode::Cli,
            args,
            access_token: None,
        }
    }

    /// An absent `token_auth` parameter is carried as the empty token.
    pub fn http(token_auth: Option<String>) -> Self {
        Self {
            mode: InvocationMode::Http,
            args: Vec::new(),
            access_token: Some(AccessToken::new(token_auth.unwrap_or_default())),
        }
    }

    pub fn mode(&self) -> InvocationMode {
        self.mode
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `argv[0]`, or the empty string.
    pub fn callee(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }
}
