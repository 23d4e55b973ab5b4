use tracing::debug;

use crate::error::{Error, Result};

/// External tools the pipeline shells out to, with install hints.
const REQUIRED_TOOLS: &[(&str, &str)] = &[("ffmpeg", "apt install ffmpeg")];

/// Verify the runtime environment before doing any real work.
///
/// Every required tool must be runnable; the first one that is not is
/// reported with an install hint.
pub async fn check() -> Result<()> {
    for (tool, install) in REQUIRED_TOOLS {
        check_tool(tool, install).await?;
    }
    Ok(())
}

async fn check_tool(tool: &str, install: &str) -> Result<()> {
    let output = tokio::process::Command::new(tool)
        .arg("-version")
        .output()
        .await
        .map_err(|_| Error::Environment(format!("{tool} not found — install with: {install}")))?;

    if !output.status.success() {
        return Err(Error::Environment(format!(
            "{tool} is installed but not working (exit status {}) — reinstall with: {install}",
            output.status
        )));
    }

    let version = String::from_utf8_lossy(&output.stdout);
    debug!(tool, version = version.lines().next().unwrap_or_default(), "found tool");
    Ok(())
}
