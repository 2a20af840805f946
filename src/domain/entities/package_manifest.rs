use serde::Deserialize;
use serde_json::Value;

/// Manifest file read from every package directory.
pub const PACKAGE_MANIFEST_FILE: &str = "package.json";

/// パッケージマニフェスト（`package.json`）のうち、ドキュメント生成に必要な部分
///
/// マニフェストはデータとしてのみ読み込み、スクリプト等は一切実行しない。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageManifest {
    /// パッケージ名
    #[serde(default)]
    pub name: Option<String>,

    /// バージョン
    #[serde(default)]
    pub version: Option<String>,

    /// 名前付きエクスポートのマップ（順序を保持）
    #[serde(default)]
    pub exports: Option<Value>,
}

impl PackageManifest {
    /// Source files behind the manifest's export map, in manifest order.
    ///
    /// Only entries whose value is an object carrying a string `input` count;
    /// type-only or asset-only exports are skipped.
    pub fn entry_points(&self) -> Vec<String> {
        let Some(Value::Object(exports)) = &self.exports else {
            return Vec::new();
        };

        exports
            .values()
            .filter_map(|entry| entry.as_object())
            .filter_map(|entry| entry.get("input"))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    }
}
