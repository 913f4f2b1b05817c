//! メタデータヘッダーの解析
//!
//! ファイル先頭のヘッダーブロックを本文から切り離し、`key: value` 行を読み取る。
//! 対応する書式は2種類:
//!
//! - `---` で囲まれた frontmatter（`description` / `triggers`）
//! - `<!-- ... -->` のコメントヘッダー（`description` のみ）
//!
//! どちらにも一致しない場合はメタデータなしで、本文は入力そのまま。

use once_cell::sync::Lazy;
use regex::Regex;

/// `---` 行で囲まれたブロック。閉じ行の直後の改行1つは本文に含めない
static FRONT_MATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)(.*)\z")
        .expect("front matter pattern is valid")
});

/// 先頭の単一HTMLコメント
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A<!--\s*(.*?)\s*-->(?:\r?\n)?(.*)\z").expect("comment header pattern is valid")
});

/// ヘッダーから読み取るキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKey {
    Description,
    Triggers,
}

impl MetadataKey {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Triggers => "triggers",
        }
    }
}

/// ヘッダー書式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDialect {
    /// `---` 区切りの frontmatter
    FrontMatter,
    /// `<!-- ... -->` コメントヘッダー
    HtmlComment,
}

impl HeaderDialect {
    /// この書式で認識するキー
    pub fn keys(&self) -> &'static [MetadataKey] {
        match self {
            Self::FrontMatter => &[MetadataKey::Description, MetadataKey::Triggers],
            Self::HtmlComment => &[MetadataKey::Description],
        }
    }

    /// ヘッダーブロックと本文に分割。一致しなければ `None`
    pub fn split<'a>(&self, raw: &'a str) -> Option<(&'a str, &'a str)> {
        let pattern = match self {
            Self::FrontMatter => &FRONT_MATTER,
            Self::HtmlComment => &HTML_COMMENT,
        };
        let caps = pattern.captures(raw)?;
        let block = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        Some((block, body))
    }

    /// 分割してキーを読み取る
    fn parse(&self, raw: &str) -> Option<ParsedContent> {
        let (block, body) = self.split(raw)?;
        Some(ParsedContent {
            metadata: Metadata::from_block(block, self.keys()),
            body: body.to_string(),
            dialect: Some(*self),
        })
    }
}

/// ヘッダーから得られたメタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// 説明文
    pub description: Option<String>,
    /// トリガー（カンマ区切りを分割・trim済み）
    pub triggers: Option<Vec<String>>,
}

impl Metadata {
    /// ブロック内の `key: value` 行を読み取る。同じキーは最初の行を採用
    fn from_block(block: &str, keys: &[MetadataKey]) -> Self {
        let mut metadata = Self::default();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let Some(key) = keys.iter().find(|k| k.as_str() == key.trim()) else {
                continue;
            };

            match key {
                MetadataKey::Description => {
                    metadata.description.get_or_insert_with(|| value.to_string());
                }
                MetadataKey::Triggers => {
                    metadata.triggers.get_or_insert_with(|| split_triggers(value));
                }
            }
        }

        metadata
    }
}

/// カンマ区切りのトリガーを分割（空要素は捨てる）
fn split_triggers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// ヘッダー解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    pub metadata: Metadata,
    /// ヘッダーを除いた本文
    pub body: String,
    /// 一致した書式（ヘッダーなしなら `None`）
    pub dialect: Option<HeaderDialect>,
}

/// 書式を優先順に試し、最初に一致したもので解析する
pub fn parse_header(raw: &str, dialects: &[HeaderDialect]) -> ParsedContent {
    dialects
        .iter()
        .find_map(|dialect| dialect.parse(raw))
        .unwrap_or_else(|| ParsedContent {
            metadata: Metadata::default(),
            body: raw.to_string(),
            dialect: None,
        })
}
