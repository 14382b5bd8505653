//! POSIX signal wiring
//!
//! SIGINT and SIGTERM both ask for an orderly shutdown. Handlers run
//! in signal context, so the bridge to the rest of the process is one
//! atomic store on a pre-registered flag.

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use mormo_core::shutdown::ShutdownFlag;
use tracing::debug;

static FLAG: OnceLock<ShutdownFlag> = OnceLock::new();

extern "C" fn handle_shutdown_signal(_signum: libc::c_int) {
    // Signal context: no allocation, no locking.
    if let Some(flag) = FLAG.get() {
        flag.request();
    }
}

/// Route SIGINT and SIGTERM to `flag`
///
/// The first registered flag wins; this is installed once at start-up.
pub fn install(flag: ShutdownFlag) -> Result<()> {
    let _ = FLAG.set(flag);
    for signum in [libc::SIGINT, libc::SIGTERM] {
        unsafe {
            let handler = handle_shutdown_signal as *const () as libc::sighandler_t;
            if libc::signal(signum, handler) == libc::SIG_ERR {
                return Err(anyhow!("could not install handler for signal {signum}"));
            }
        }
    }
    debug!("signal handlers installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_signal_requests_shutdown() {
        let flag = ShutdownFlag::new();
        install(flag.clone()).expect("install signal handlers");
        assert!(!flag.is_set());

        unsafe {
            libc::raise(libc::SIGTERM);
        }
        for _ in 0..20 {
            if flag.is_set() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("SIGTERM did not reach the shutdown flag");
    }
}
