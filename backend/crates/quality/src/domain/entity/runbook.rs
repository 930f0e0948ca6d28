//! Runbook Record
//!
//! Content record as produced by the runbook generator. Every field is
//! optional on input so incomplete records are scored rather than rejected.

use serde::{Deserialize, Serialize};

/// Typed content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RunbookBlock {
    H2 { text: String },
    H3 { text: String },
    H4 { text: String },
    P { text: String },
    Ul { items: Vec<String> },
    Code { lang: String, code: String },
    Callout {
        tone: CalloutTone,
        title: String,
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutTone {
    Warn,
    Tip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub q: String,
    pub a: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunbookAuthor {
    pub name: String,
    pub role: String,
    pub experience: String,
    pub sources: Vec<String>,
    pub last_updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HowTo {
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Runbook {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    pub howto: HowTo,
    pub blocks: Vec<RunbookBlock>,
    pub claw_score: f64,
    pub faq: Vec<FaqEntry>,
    pub related_slugs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<RunbookAuthor>,
}

impl Runbook {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Author name if present and non-blank
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_deserializes() {
        let runbook: Runbook = serde_json::from_str(r#"{"slug":"a-b","title":"T"}"#).unwrap();
        assert_eq!(runbook.slug, "a-b");
        assert!(runbook.howto.steps.is_empty());
        assert_eq!(runbook.lastmod, None);
        assert_eq!(runbook.author_name(), None);
    }

    #[test]
    fn test_blocks_by_kind() {
        let json = r#"{"blocks":[
            {"kind":"h2","text":"Intro"},
            {"kind":"code","lang":"bash","code":"ufw enable"},
            {"kind":"callout","tone":"warn","title":"Careful","text":"Backup first"},
            {"kind":"diagram","src":"x.svg"}
        ]}"#;
        let runbook: Runbook = serde_json::from_str(json).unwrap();
        assert_eq!(runbook.blocks.len(), 4);
        assert_eq!(runbook.blocks[3], RunbookBlock::Other);
        assert!(matches!(
            runbook.blocks[2],
            RunbookBlock::Callout {
                tone: CalloutTone::Warn,
                ..
            }
        ));
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{"clawScore":88,"relatedSlugs":["x"],"author":{"name":"Ops","lastUpdated":"2026-02-25"}}"#;
        let runbook: Runbook = serde_json::from_str(json).unwrap();
        assert_eq!(runbook.claw_score, 88.0);
        assert_eq!(runbook.related_slugs, vec!["x"]);
        assert_eq!(runbook.author_name(), Some("Ops"));
    }
}
