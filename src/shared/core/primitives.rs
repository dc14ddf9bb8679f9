use std::fmt;

/// Length of a well-formed `token_auth` value (hex encoded).
pub const TOKEN_AUTH_LENGTH: usize = 32;

/// Opaque credential passed as `token_auth`.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A token is well formed when it is exactly 32 ASCII hex digits.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == TOKEN_AUTH_LENGTH && self.0.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod primitives_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_never_print_the_token_value() {
        let token = AccessToken::new("0123456789abcdef0123456789abcdef");
        let printed = format!("{token:?}");
        assert_eq!(printed, "AccessToken(***)");
        assert!(!printed.contains("0123"));
    }

    #[rstest]
    #[case("0123456789abcdef0123456789abcdef", true)]
    #[case("0123456789ABCDEF0123456789ABCDEF", true)]
    #[case("", false)]
    #[case("0123456789abcdef", false)]
    #[case("0123456789abcdef0123456789abcdeg", false)]
    #[case("0123456789abcdef0123456789abcdef0", false)]
    fn it_should_check_the_token_shape(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(AccessToken::new(value).is_well_formed(), expected);
    }
}
