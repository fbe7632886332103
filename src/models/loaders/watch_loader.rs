use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;
use tokio::fs;

/// TOML 格式的监听列表
#[derive(Debug, Deserialize)]
struct WatchListToml {
    watch_ids: Vec<toml::Value>,
}

/// 从文件加载监听用户ID列表
///
/// 支持两种格式：
/// - `.json`：`[123, "456"]`，字符串形式的ID会被转成整型
/// - `.toml`：`watch_ids = [123, "456"]`
///
/// 重复的ID只保留第一次出现的位置
pub async fn load_watch_ids(path: &Path) -> Result<Vec<i64>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取监听列表: {}", path.display()))?;

    let ids = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        parse_toml_ids(&content)
    } else {
        parse_json_ids(&content)
    }
    .with_context(|| format!("无法解析监听列表: {}", path.display()))?;

    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }

    tracing::info!("成功加载 {} 个监听用户", unique.len());
    Ok(unique)
}

fn parse_json_ids(content: &str) -> Result<Vec<i64>> {
    let values: Vec<JsonValue> = serde_json::from_str(content)?;
    values
        .iter()
        .map(|v| match v {
            JsonValue::Number(n) => n.as_i64().with_context(|| format!("无效的用户ID: {}", n)),
            JsonValue::String(s) => s.trim().parse().with_context(|| format!("无效的用户ID: {}", s)),
            other => anyhow::bail!("无效的用户ID: {}", other),
        })
        .collect()
}

fn parse_toml_ids(content: &str) -> Result<Vec<i64>> {
    let list: WatchListToml = toml::from_str(content)?;
    list.watch_ids
        .iter()
        .map(|v| match v {
            toml::Value::Integer(n) => Ok(*n),
            toml::Value::String(s) => s.trim().parse().with_context(|| format!("无效的用户ID: {}", s)),
            other => anyhow::bail!("无效的用户ID: {}", other),
        })
        .collect()
}
