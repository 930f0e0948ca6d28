//! Quality Gate Services
//!
//! Pure scoring functions. Same record and thresholds, same report.

use std::collections::HashMap;

use crate::domain::entity::{
    AutoImprove, FieldCount, QualityDashboard, QualityReport, QualityStats, QualityViolation,
    Runbook,
};
use crate::domain::value_object::{CertifiedTier, QualityThresholds, Severity};

/// Number of violation fields listed in aggregates.
pub const TOP_VIOLATIONS: usize = 5;

/// Passing runbooks below this score are candidates for rework.
pub const AUTO_IMPROVE_THRESHOLD: u32 = 90;

const AUTO_IMPROVE_DESCRIPTION: &str =
    "Runbooks passing the gate but scoring below 90, eligible for automated improvement";

const HOUR: u64 = 60 * 60;

/// Score a single runbook
///
/// Starts at 100 and subtracts a fixed penalty per violated rule, floored at
/// 0. Passes when no error-severity rule fired and the score reaches
/// `min_pass_score`.
pub fn validate_runbook(runbook: &Runbook, thresholds: &QualityThresholds) -> QualityReport {
    let mut violations = Vec::new();
    let mut score: i32 = 100;
    let mut flag = |field: &'static str, severity: Severity, penalty: i32, message: String| {
        violations.push(QualityViolation {
            field,
            message,
            severity,
        });
        score -= penalty;
    };

    let title_len = runbook.title.chars().count();
    if title_len < thresholds.min_title_length {
        flag(
            "title",
            Severity::Error,
            25,
            format!("Title too short ({title_len} < {} chars)", thresholds.min_title_length),
        );
    } else if title_len > thresholds.max_title_length {
        flag(
            "title",
            Severity::Warning,
            5,
            format!("Title too long ({title_len} > {} chars)", thresholds.max_title_length),
        );
    }

    let summary = runbook.summary.trim();
    let summary_len = summary.chars().count();
    if summary_len < thresholds.min_summary_length {
        flag(
            "summary",
            Severity::Error,
            20,
            format!("Summary too short ({summary_len} < {} chars)", thresholds.min_summary_length),
        );
    }

    let steps = runbook.howto.steps.len();
    if steps < thresholds.min_step_count {
        flag(
            "howto.steps",
            Severity::Error,
            20,
            format!("Too few steps ({steps} < {})", thresholds.min_step_count),
        );
    }

    let blocks = runbook.blocks.len();
    if blocks < thresholds.min_block_count {
        flag(
            "blocks",
            Severity::Warning,
            10,
            format!("Low block count ({blocks} < {})", thresholds.min_block_count),
        );
    }

    let faqs = runbook.faq.len();
    if faqs < thresholds.min_faq_count {
        flag(
            "faq",
            Severity::Warning,
            10,
            format!("Too few FAQ entries ({faqs} < {})", thresholds.min_faq_count),
        );
    }

    let tags = runbook.tags.len();
    if tags < thresholds.min_tag_count {
        flag(
            "tags",
            Severity::Warning,
            5,
            format!("Too few tags ({tags} < {})", thresholds.min_tag_count),
        );
    }

    if !is_valid_slug(&runbook.slug) {
        flag(
            "slug",
            Severity::Error,
            30,
            format!("Invalid slug format: \"{}\"", runbook.slug),
        );
    }

    let title = runbook.title.trim();
    if !title.is_empty() && !summary.is_empty() && title == summary {
        flag(
            "summary",
            Severity::Error,
            20,
            "Title and summary are identical (duplicate content)".to_string(),
        );
    }

    if runbook.author_name().is_none() {
        flag(
            "author",
            Severity::Warning,
            5,
            "Missing author name".to_string(),
        );
    }

    let lastmod = runbook.lastmod.as_deref();
    if !lastmod.is_some_and(is_iso_date) {
        flag(
            "lastmod",
            Severity::Warning,
            5,
            format!("Missing or invalid lastmod: \"{}\"", lastmod.unwrap_or_default()),
        );
    }

    let score = score.max(0) as u32;
    let has_errors = violations.iter().any(|v| v.severity.is_error());
    let pass = !has_errors && score >= thresholds.min_pass_score;

    QualityReport {
        slug: runbook.slug.clone(),
        pass,
        score,
        violations,
        certified_tier: CertifiedTier::classify(pass, score, thresholds),
    }
}

/// Non-empty, no `--`, no leading or trailing `-`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains("--") && !slug.starts_with('-') && !slug.ends_with('-')
}

/// Shape check for `YYYY-MM-DD` (ASCII digits, no calendar validation).
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Runbooks that pass the gate, in input order
pub fn filter_quality_runbooks<'a>(
    runbooks: &'a [Runbook],
    thresholds: &QualityThresholds,
) -> Vec<&'a Runbook> {
    runbooks
        .iter()
        .filter(|r| validate_runbook(r, thresholds).pass)
        .collect()
}

/// Aggregate statistics over a batch
pub fn compute_quality_stats(runbooks: &[Runbook], thresholds: &QualityThresholds) -> QualityStats {
    let reports: Vec<QualityReport> = runbooks
        .iter()
        .map(|r| validate_runbook(r, thresholds))
        .collect();
    stats_from_reports(&reports)
}

/// Aggregate statistics from already computed reports
pub fn stats_from_reports(reports: &[QualityReport]) -> QualityStats {
    if reports.is_empty() {
        return QualityStats::default();
    }

    let total = reports.len();
    let mut passed = 0;
    let mut gold_count = 0;
    let mut silver_count = 0;
    let mut score_sum: u64 = 0;
    let mut field_counts: HashMap<&'static str, usize> = HashMap::new();

    for report in reports {
        if report.pass {
            passed += 1;
        }
        match report.certified_tier {
            CertifiedTier::Gold => gold_count += 1,
            CertifiedTier::Silver => silver_count += 1,
            CertifiedTier::Hidden => {}
        }
        score_sum += u64::from(report.score);
        for violation in &report.violations {
            *field_counts.entry(violation.field).or_default() += 1;
        }
    }

    let mut top_violations: Vec<FieldCount> = field_counts
        .into_iter()
        .map(|(field, count)| FieldCount { field, count })
        .collect();
    top_violations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.field.cmp(b.field)));
    top_violations.truncate(TOP_VIOLATIONS);

    QualityStats {
        total,
        passed,
        failed: total - passed,
        avg_score: round_div(score_sum, total as u64),
        pass_rate: round_div(passed as u64 * 100, total as u64),
        gold_count,
        silver_count,
        hidden_count: total - gold_count - silver_count,
        top_violations,
    }
}

/// Stats plus rework candidates and the thresholds used
pub fn compute_quality_dashboard(
    runbooks: &[Runbook],
    thresholds: &QualityThresholds,
) -> QualityDashboard {
    let reports: Vec<QualityReport> = runbooks
        .iter()
        .map(|r| validate_runbook(r, thresholds))
        .collect();
    let eligible = reports
        .iter()
        .filter(|r| r.pass && r.score < AUTO_IMPROVE_THRESHOLD)
        .count();

    QualityDashboard {
        stats: stats_from_reports(&reports),
        auto_improve: AutoImprove {
            eligible,
            threshold: AUTO_IMPROVE_THRESHOLD,
            description: AUTO_IMPROVE_DESCRIPTION,
        },
        thresholds: thresholds.clone(),
    }
}

/// Page revalidation interval in seconds
///
/// Weak pages wait longest; incident and error pages refresh fastest.
pub fn revalidate_seconds(runbook: &Runbook, thresholds: &QualityThresholds) -> u64 {
    let report = validate_runbook(runbook, thresholds);
    if !report.pass || report.score < 70 {
        return 48 * HOUR;
    }

    let is_incident = runbook.has_tag("incident");
    let is_error = runbook.tags.iter().any(|t| t.starts_with("error:"));
    let high_score = runbook.claw_score >= 85.0;

    if is_incident || is_error {
        if high_score { 4 * HOUR } else { 12 * HOUR }
    } else if runbook.has_tag("config") {
        7 * 24 * HOUR
    } else {
        24 * HOUR
    }
}

/// `round(numerator / denominator)` with halves rounded up
fn round_div(numerator: u64, denominator: u64) -> u32 {
    ((numerator * 2 + denominator) / (denominator * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{FaqEntry, HowTo, RunbookAuthor, RunbookBlock};

    fn good_runbook(slug: &str) -> Runbook {
        Runbook {
            slug: slug.to_string(),
            title: "Harden SSH on Hetzner in 10 minutes".to_string(),
            summary: "Disable password logins, restrict users and enable fail2ban so brute force stops."
                .to_string(),
            tags: vec!["ssh".into(), "hetzner".into()],
            lastmod: Some("2026-02-25".to_string()),
            howto: HowTo {
                steps: vec!["a".into(), "b".into(), "c".into()],
            },
            blocks: vec![
                RunbookBlock::H2 { text: "x".into() },
                RunbookBlock::P { text: "x".into() },
                RunbookBlock::Ul { items: vec![] },
                RunbookBlock::Code {
                    lang: "bash".into(),
                    code: "x".into(),
                },
            ],
            claw_score: 80.0,
            faq: vec![FaqEntry::default(), FaqEntry::default()],
            related_slugs: vec![],
            author: Some(RunbookAuthor {
                name: "Ops Team".into(),
                ..Default::default()
            }),
        }
    }

    fn fields(report: &QualityReport) -> Vec<&'static str> {
        report.violations.iter().map(|v| v.field).collect()
    }

    #[test]
    fn test_complete_runbook_is_gold() {
        let report = validate_runbook(&good_runbook("ssh-hardening"), &QualityThresholds::default());
        assert!(report.pass);
        assert_eq!(report.score, 100);
        assert!(report.violations.is_empty());
        assert_eq!(report.certified_tier, CertifiedTier::Gold);
    }

    #[test]
    fn test_deterministic() {
        let mut runbook = good_runbook("x");
        runbook.faq.clear();
        let t = QualityThresholds::default();
        assert_eq!(validate_runbook(&runbook, &t), validate_runbook(&runbook, &t));
    }

    #[test]
    fn test_warnings_only_still_pass() {
        let mut runbook = good_runbook("ssh");
        runbook.blocks.clear();
        runbook.faq.pop();
        runbook.author = None;
        let report = validate_runbook(&runbook, &QualityThresholds::default());
        assert!(report.pass);
        assert_eq!(report.score, 75);
        assert_eq!(report.certified_tier, CertifiedTier::Silver);
        assert_eq!(fields(&report), vec!["blocks", "faq", "author"]);
    }

    #[test]
    fn test_single_error_fails() {
        let mut runbook = good_runbook("ssh");
        runbook.howto.steps.truncate(2);
        let report = validate_runbook(&runbook, &QualityThresholds::default());
        assert!(!report.pass);
        assert_eq!(report.score, 80);
        assert!(report.has_errors());
        assert_eq!(report.certified_tier, CertifiedTier::Hidden);
    }

    #[test]
    fn test_score_floor_at_zero() {
        let runbook = Runbook {
            slug: "-bad--slug-".to_string(),
            ..Default::default()
        };
        let report = validate_runbook(&runbook, &QualityThresholds::default());
        assert_eq!(report.score, 0);
        assert!(!report.pass);
        assert_eq!(
            fields(&report),
            vec!["title", "summary", "howto.steps", "blocks", "faq", "tags", "slug", "author", "lastmod"]
        );
    }

    #[test]
    fn test_title_length_in_characters() {
        let mut runbook = good_runbook("umlaut");
        runbook.title = "Größenänderung".to_string();
        assert!(validate_runbook(&runbook, &QualityThresholds::default()).pass);

        runbook.title = "ä".repeat(111);
        let report = validate_runbook(&runbook, &QualityThresholds::default());
        assert_eq!(report.violations[0].severity, Severity::Warning);
        assert_eq!(report.violations[0].message, "Title too long (111 > 110 chars)");
        assert_eq!(report.score, 95);
    }

    #[test]
    fn test_duplicate_title_and_summary() {
        let mut runbook = good_runbook("dup");
        runbook.title = "A".repeat(70);
        runbook.summary = format!("  {}  ", "A".repeat(70));
        let report = validate_runbook(&runbook, &QualityThresholds::default());
        assert_eq!(fields(&report), vec!["summary"]);
        assert!(report.violations[0].message.contains("identical"));
        assert!(!report.pass);
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("nginx-502-fix"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("-a"));
        assert!(!is_valid_slug("a-"));
    }

    #[test]
    fn test_iso_date_shape() {
        assert!(is_iso_date("2026-02-25"));
        assert!(!is_iso_date("2026-2-25"));
        assert!(!is_iso_date("2026/02/25"));
        assert!(!is_iso_date("2026-02-25T00:00"));
        assert!(!is_iso_date("２０２６-02-25"));
    }

    #[test]
    fn test_invalid_lastmod_message() {
        let mut runbook = good_runbook("d");
        runbook.lastmod = Some("yesterday".into());
        let report = validate_runbook(&runbook, &QualityThresholds::default());
        assert_eq!(report.violations[0].message, "Missing or invalid lastmod: \"yesterday\"");
        assert_eq!(report.score, 95);
    }

    #[test]
    fn test_stats_all_pass() {
        let runbooks = vec![good_runbook("a"), good_runbook("b"), good_runbook("c")];
        let stats = compute_quality_stats(&runbooks, &QualityThresholds::default());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 3);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.pass_rate, 100);
        assert_eq!(stats.avg_score, 100);
        assert_eq!(stats.gold_count, 3);
        assert!(stats.top_violations.is_empty());
    }

    #[test]
    fn test_stats_empty() {
        let stats = compute_quality_stats(&[], &QualityThresholds::default());
        assert_eq!(stats, QualityStats::default());
    }

    #[test]
    fn test_stats_rounding_and_top_violations() {
        let t = QualityThresholds::default();
        let mut weak = good_runbook("weak");
        weak.tags.clear();
        weak.faq.clear();
        let mut weaker = good_runbook("weaker");
        weaker.tags.clear();
        weaker.howto.steps.clear();

        // scores: 100, 85, 75 -> avg 86.67
        let stats = compute_quality_stats(&[good_runbook("ok"), weak, weaker], &t);
        assert_eq!(stats.avg_score, 87);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.pass_rate, 67);
        assert_eq!(stats.gold_count, 1);
        assert_eq!(stats.silver_count, 1);
        assert_eq!(stats.hidden_count, 1);
        assert_eq!(
            stats.top_violations,
            vec![
                FieldCount { field: "tags", count: 2 },
                FieldCount { field: "faq", count: 1 },
                FieldCount { field: "howto.steps", count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_violations_capped() {
        let runbooks = vec![Runbook::default(), Runbook::default()];
        let stats = compute_quality_stats(&runbooks, &QualityThresholds::default());
        assert_eq!(stats.top_violations.len(), TOP_VIOLATIONS);
        assert!(stats.top_violations.iter().all(|fc| fc.count == 2));
        assert_eq!(stats.top_violations[0].field, "author");
    }

    #[test]
    fn test_filter_keeps_order() {
        let runbooks = vec![good_runbook("a"), Runbook::default(), good_runbook("c")];
        let kept = filter_quality_runbooks(&runbooks, &QualityThresholds::default());
        let slugs: Vec<&str> = kept.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[test]
    fn test_dashboard_auto_improve() {
        let mut silver = good_runbook("s");
        silver.blocks.clear();
        silver.faq.clear();
        let dashboard = compute_quality_dashboard(
            &[good_runbook("g"), silver, Runbook::default()],
            &QualityThresholds::default(),
        );
        assert_eq!(dashboard.auto_improve.eligible, 1);
        assert_eq!(dashboard.auto_improve.threshold, 90);
        assert_eq!(dashboard.stats.total, 3);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["passRate"], 67);
        assert_eq!(json["autoImprove"]["eligible"], 1);
        assert_eq!(json["thresholds"]["minPassScore"], 60);
    }

    #[test]
    fn test_revalidate_seconds() {
        let t = QualityThresholds::default();
        assert_eq!(revalidate_seconds(&Runbook::default(), &t), 48 * HOUR);

        let mut plain = good_runbook("p");
        assert_eq!(revalidate_seconds(&plain, &t), 24 * HOUR);

        plain.tags.push("config".into());
        assert_eq!(revalidate_seconds(&plain, &t), 7 * 24 * HOUR);

        let mut incident = good_runbook("i");
        incident.tags.push("error:502".into());
        assert_eq!(revalidate_seconds(&incident, &t), 12 * HOUR);
        incident.claw_score = 85.0;
        assert_eq!(revalidate_seconds(&incident, &t), 4 * HOUR);

        let mut low = good_runbook("low");
        low.tags = vec!["incident".into()];
        low.blocks.clear();
        low.faq.clear();
        // 100 - 10 - 10 - 5 = 75 passes, >= 70
        assert_eq!(revalidate_seconds(&low, &t), 12 * HOUR);
        low.author = None;
        low.lastmod = None;
        // 65 passes but < 70
        assert_eq!(revalidate_seconds(&low, &t), 48 * HOUR);
    }
}
