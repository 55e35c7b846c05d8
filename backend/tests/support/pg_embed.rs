//! Embedded PostgreSQL bootstrap for integration tests.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` unless `PG_RUNTIME_DIR`
//! and `PG_DATA_DIR` are set. When either is missing both are pointed at a
//! fresh directory under the cargo target dir for the duration of the
//! bootstrap, so sandboxed runs can still start a cluster.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP: Mutex<()> = Mutex::new(());

const ATTEMPTS: u32 = 4;
const BACKOFF: Duration = Duration::from_millis(500);

fn scratch_dirs() -> std::io::Result<(PathBuf, PathBuf)> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("{}-{}", std::process::id(), Uuid::new_v4()));
    let install = base.join("install");
    let data = base.join("data");
    std::fs::create_dir_all(&install)?;
    std::fs::create_dir_all(&data)?;
    Ok((install, data))
}

/// Download failures are worth another attempt; everything else is not.
fn is_transient(error: &str) -> bool {
    let lowered = error.to_lowercase();
    [
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "dns error",
        "error decoding response body",
    ]
    .iter()
    .any(|needle| lowered.contains(needle))
}

/// Start a [`TestCluster`], retrying transient download errors with backoff.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _serialised = BOOTSTRAP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let missing_dirs =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if missing_dirs {
        let (install, data) = scratch_dirs().map_err(|e| e.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(install.to_string_lossy().into_owned())),
            ("PG_DATA_DIR", Some(data.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut attempt = 1;
    loop {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                let rendered = format!("{err:?}");
                if attempt >= ATTEMPTS || !is_transient(&rendered) {
                    return Err(rendered);
                }
                eprintln!("pg-embed: attempt {attempt}/{ATTEMPTS} failed, retrying: {rendered}");
                std::thread::sleep(BACKOFF * attempt);
                attempt += 1;
            }
        }
    }
}
