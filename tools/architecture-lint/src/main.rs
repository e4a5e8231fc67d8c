//! Runs the layering lint over the `docstore` crate of this workspace.

use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};

fn main() -> ExitCode {
    let Some(root) = workspace_root() else {
        report("unable to locate the workspace root (a Cargo.toml declaring [workspace])");
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_crate(&root.join("docstore")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn report(message: &str) {
    if writeln!(io::stderr().lock(), "{message}").is_err() {
        // stderr is gone; the exit code still reports failure.
    }
}

fn workspace_root() -> Option<Utf8PathBuf> {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let from_env = std::env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from);
    let from_cwd = std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());

    [from_env, from_cwd, Some(manifest_dir.to_path_buf())]
        .into_iter()
        .flatten()
        .find_map(|start| find_workspace(&start))
}

fn find_workspace(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(dir))
        .map(Utf8Path::to_path_buf)
}

fn declares_workspace(dir: &Utf8Path) -> bool {
    Dir::open_ambient_dir(dir, ambient_authority())
        .and_then(|handle| handle.read_to_string("Cargo.toml"))
        .is_ok_and(|manifest| manifest.contains("[workspace]"))
}
