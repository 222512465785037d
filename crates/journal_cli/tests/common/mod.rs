use assert_cmd::Command;
use std::path::Path;

/// `journal` command isolated from the caller's environment and config.
pub fn journal_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("journal").unwrap();
    cmd.current_dir(workdir);
    cmd.env_remove("JOURNAL_DB");
    cmd
}
