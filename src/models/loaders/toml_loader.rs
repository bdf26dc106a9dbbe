use crate::error::AppError;
use crate::models::profile::ExamProfile;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一场考试的配置
pub async fn load_profile(toml_file_path: &Path) -> Result<ExamProfile> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let profile: ExamProfile =
        toml::from_str(&content).map_err(|source| AppError::ProfileParseFailed {
            path: toml_file_path.display().to_string(),
            source,
        })?;

    Ok(profile.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 加载文件夹中所有考试配置，按文件名排序
///
/// 单个文件解析失败只记录警告，其余配置照常返回
pub async fn load_all_profiles(folder_path: &str) -> Result<Vec<ExamProfile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut profiles = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_profile(&path).await {
            Ok(profile) => {
                tracing::info!("成功加载考试配置: {} ({})", profile.name, profile.subject);
                profiles.push(profile);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(profiles)
}
