//! Shell scripts standing in for real solver programs in tests.

#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Write an executable script that echoes every stdin line back to stdout
/// and exits when it reads `EXIT`, imitating an interactive solver console.
#[cfg(unix)]
pub fn write_step_echo_script(dir: &Path) -> std::io::Result<PathBuf> {
    write_script(
        dir,
        "step_echo.sh",
        "#!/bin/sh\n\
         while IFS= read -r line; do\n\
         \u{20} if [ \"$line\" = \"EXIT\" ]; then exit 0; fi\n\
         \u{20} echo \"$line\"\n\
         done\n",
    )
}

/// Write an executable script that drops displacement and force result
/// files into its working directory and exits, like a static analysis run.
#[cfg(unix)]
pub fn write_result_file_script(dir: &Path) -> std::io::Result<PathBuf> {
    write_script(
        dir,
        "static_run.sh",
        "#!/bin/sh\n\
         printf '1.0 2.0\\n3.0 4.0\\n' > tmp_disp.out\n\
         printf '5.0 6.0\\n7.0 8.0\\n' > tmp_forc.out\n",
    )
}

/// Write an executable script that reports an error on stderr and then
/// keeps reading stdin, so the process stays alive after erroring.
#[cfg(unix)]
pub fn write_stderr_script(dir: &Path) -> std::io::Result<PathBuf> {
    write_script(
        dir,
        "stderr_run.sh",
        "#!/bin/sh\n\
         echo 'analysis failed to converge' 1>&2\n\
         while IFS= read -r line; do\n\
         \u{20} if [ \"$line\" = \"EXIT\" ]; then exit 1; fi\n\
         done\n",
    )
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body)?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(path)
}
