use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script named `name` into `dir`.
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A stub that behaves like `RNAfold --noPS`: echoes the sequence, then prints
/// an all-unpaired structure of the same length with energy `-len`.
pub const ECHO_FOLD: &str = r#"read seq
echo "$seq"
echo "$(echo "$seq" | tr 'AUGC' '....') ( -${#seq}.00)""#;
