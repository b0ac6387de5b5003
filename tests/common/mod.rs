// Shared test helpers for integration tests
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Writes a script to `path` and marks it executable.
#[cfg(unix)]
pub fn write_executable(path: &Path, script: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, script)
        .with_context(|| format!("Failed to write script: {}", path.display()))?;
    let mut perms = fs::metadata(path)
        .with_context(|| format!("Failed to stat script: {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to chmod script: {}", path.display()))?;
    Ok(())
}

/// Writes a stub tool named `name` into `bin_dir`. The stub appends its
/// name and arguments to `log`, runs `extra` in the caller's cwd and exits
/// with `exit_code`.
#[cfg(unix)]
pub fn stub_tool(bin_dir: &Path, name: &str, log: &Path, extra: &str, exit_code: i32) -> Result<()> {
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"{name} $*\" >> \"{log}\"\n{extra}\nexit {exit_code}\n",
        name = name,
        log = log.display(),
        extra = extra,
        exit_code = exit_code
    );
    write_executable(&bin_dir.join(name), &script)
}

/// Stubs out the whole external toolchain with always-succeeding recorders.
/// The `make` stub creates the build output directory the way a real build
/// would.
#[cfg(unix)]
pub fn stub_toolchain(bin_dir: &Path, log: &Path) -> Result<()> {
    stub_tool(bin_dir, "git", log, "", 0)?;
    stub_tool(bin_dir, "make", log, "mkdir -p blib/arch", 0)?;
    stub_tool(bin_dir, "perl", log, "", 0)?;
    Ok(())
}

/// Reads the invocation log back as trimmed lines, in call order.
pub fn read_log(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(|line| line.trim().to_string())
        .collect()
}
