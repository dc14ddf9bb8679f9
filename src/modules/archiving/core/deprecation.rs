use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Script name of the legacy entry point.
pub const LEGACY_SCRIPT_NAME: &str = "archive.php";

pub fn is_legacy_invocation(callee: &str) -> bool {
    callee.contains(LEGACY_SCRIPT_NAME)
}

/// Banner shown when the legacy script name is used.
///
/// Forwarded arguments are concatenated without a separator, exactly as the
/// legacy script printed them.
pub fn deprecation_banner(home: &Path, args: &[String]) -> String {
    let home = home.display();
    let forwarded = args.iter().skip(1).cloned().collect::<Vec<_>>().concat();
    format!(
        "
-------------------------------------------------------
Using this 'archive.php' script is no longer recommended.
Please use '/path/to/php {home}/console core:archive {forwarded}' instead.
To get help use '/path/to/php {home}/console core:archive --help'
See also: http://piwik.org/docs/setup-auto-archiving/

If you cannot use the console because it requires CLI
try 'php archive.php --url=http://your.piwik/path'
-------------------------------------------------------


"
    )
}

/// Prints the banner at most once per notice, whatever happens afterwards.
#[derive(Debug, Default)]
pub struct DeprecationNotice {
    emitted: AtomicBool,
}

impl DeprecationNotice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the banner was written by this call.
    pub fn emit_once(&self, out: &mut impl Write, home: &Path, args: &[String]) -> io::Result<bool> {
        if self.emitted.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        out.write_all(deprecation_banner(home, args).as_bytes())?;
        out.flush()?;
        Ok(true)
    }

    pub fn was_emitted(&self) -> bool {
        self.emitted.load(Ordering::SeqCst)
    }
}
