//! Helpers shared by unit tests

#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script standing in for the `az` CLI
#[cfg(unix)]
pub fn fake_cli(dir: &Path, body: &str) -> PathBuf {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("az");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
