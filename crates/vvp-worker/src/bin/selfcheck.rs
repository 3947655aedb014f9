use std::path::Path;
use std::process::Command;

use vvp_models::Provider;
use vvp_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = WorkerConfig::from_env();

    println!(
        "vvp-selfcheck: starting with work_dir={}",
        config.work_dir.display()
    );
    ensure_workdir(&config.work_dir).await?;
    ensure_ffmpeg()?;
    ensure_tools(&["ffprobe", "yt-dlp"])?;
    warn_missing_keys(&config);

    println!("vvp-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await?;

    let probe = path.join(".selfcheck");
    tokio::fs::write(&probe, b"ok")
        .await
        .map_err(|e| anyhow::anyhow!("work dir {} not writable: {}", path.display(), e))?;
    tokio::fs::remove_file(&probe).await?;
    Ok(())
}

fn ensure_ffmpeg() -> anyhow::Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| anyhow::anyhow!("ffmpeg not available: {}", e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "ffmpeg -version failed: {:?}",
            output.status
        ));
    }
    Ok(())
}

fn ensure_tools(tools: &[&str]) -> anyhow::Result<()> {
    for tool in tools {
        which::which(tool).map_err(|_| anyhow::anyhow!("{} not found in PATH", tool))?;
    }
    Ok(())
}

/// Keys can also arrive per request, so their absence is not fatal.
fn warn_missing_keys(config: &WorkerConfig) {
    for provider in [Provider::Youtube, Provider::Gemini] {
        if config.default_keys.get(provider).is_none() {
            println!(
                "vvp-selfcheck: warning: no default {} API key; requests must supply one",
                provider
            );
        }
    }
}
