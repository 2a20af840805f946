use serde_json::{Map, Value};

/// Per-package configuration file written next to `package.json`.
pub const TYPEDOC_CONFIG_FILE: &str = "typedoc.json";

/// Options every package is documented with, in the order they are written.
pub const PACKAGE_DEFAULTS: [(&str, bool); 7] = [
    ("excludePrivate", true),
    ("excludeInternal", true),
    ("excludeExternals", true),
    ("excludeNotDocumented", false),
    ("includeVersion", true),
    ("categorizeByGroup", true),
    ("skipErrorChecking", true),
];

/// パッケージ単位のドキュメント設定（`typedoc.json`）
///
/// 既存ファイルのキー順序を保持したまま既定値とエントリポイントを上書きする。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDocConfig(Map<String, Value>);

impl PackageDocConfig {
    /// 既存の設定オブジェクトから作成
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Overwrites the fixed defaults and `entryPoints`, keeping any other key.
    pub fn merge_defaults(mut self, entry_points: &[String]) -> Self {
        for (key, value) in PACKAGE_DEFAULTS {
            self.0.insert(key.to_string(), Value::Bool(value));
        }
        self.0.insert(
            "entryPoints".to_string(),
            Value::Array(entry_points.iter().cloned().map(Value::String).collect()),
        );
        self
    }

    /// 設定値を取得
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Two-space indented JSON with exactly one trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.0)?;
        text.push('\n');
        Ok(text)
    }
}
