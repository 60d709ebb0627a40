use crate::prelude::*;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// Clipboard writers we know how to drive, in order of preference.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Pick the first candidate that `lookup` can resolve to an executable.
fn select_command<F>(lookup: F) -> Option<(PathBuf, &'static [&'static str])>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    CANDIDATES
        .iter()
        .find_map(|(program, args)| lookup(program).map(|path| (path, *args)))
}

/// Best-effort write of `text` to the system clipboard.
pub async fn copy(text: &str) -> Result<()> {
    let (program, args) =
        select_command(|program| which::which(program).ok()).ok_or_else(|| {
            let tried: Vec<&str> = CANDIDATES.iter().map(|(program, _)| *program).collect();
            Error::NoClipboard(tried.join(", "))
        })?;

    let mut child = tokio::process::Command::new(&program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start {}", program.display()))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_eyre("Clipboard command has no stdin")?;
    stdin.write_all(text.as_bytes()).await?;
    // Closing stdin tells the command the input is complete.
    drop(stdin);

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::ClipboardFailed(f!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            stderr
        ))
        .into());
    }

    Ok(())
}
