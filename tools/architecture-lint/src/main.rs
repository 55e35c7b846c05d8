//! `cargo run -p architecture-lint [SRC_DIR]`; defaults to `backend/src`.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let src_root = std::env::args_os().nth(1).map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../backend/src"),
        PathBuf::from,
    );
    match architecture_lint::lint_source_tree(&src_root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
