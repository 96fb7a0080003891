use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 测试节目清单地址
pub const TEST_STREAMS_MANIFEST_URL: &str =
    "https://vpe-static.bamgrid.com/sample-files/take-home-exam/test-streams.json";

/// 清单中的一个节目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEntry {
    pub title: String,
    pub url: String,
}

/// 节目清单 `{ "streams": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamManifest {
    pub streams: Vec<StreamEntry>,
}

impl StreamManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Malformed stream manifest")
    }
}

/// 获取节目清单，只发一次请求，不重试
pub async fn fetch_manifest(url: &str) -> Result<StreamManifest> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request manifest {}", url))?
        .error_for_status()
        .with_context(|| format!("Manifest request rejected {}", url))?;

    let manifest = response
        .json::<StreamManifest>()
        .await
        .context("Malformed stream manifest")?;

    log::debug!("manifest {} lists {} streams", url, manifest.streams.len());
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_manifest() {
        let manifest = StreamManifest::from_json(
            r#"{"streams":[{"title":"Big Buck Bunny","url":"https://example.com/bbb.m3u8"}]}"#,
        )
        .unwrap();

        assert_eq!(
            manifest.streams,
            vec![StreamEntry {
                title: "Big Buck Bunny".to_string(),
                url: "https://example.com/bbb.m3u8".to_string(),
            }]
        );
    }

    #[test]
    fn rejects_missing_streams() {
        assert!(StreamManifest::from_json(r#"{"videos":[]}"#).is_err());
        assert!(StreamManifest::from_json("not json").is_err());
    }
}
