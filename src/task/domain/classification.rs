//! Keyword classification and entity extraction over task text.
//!
//! Pure and deterministic: the same title/description always produces the
//! same output. Keyword tables are ordered association lists because
//! iteration order decides ties; the first category (or priority) with any
//! keyword found in the text wins, regardless of later matches.

use super::{ExtractedEntities, TaskCategory, TaskPriority};

/// Category keyword table, in match-priority order.
const CATEGORY_KEYWORDS: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::Scheduling,
        &[
            "meeting",
            "schedule",
            "call",
            "appointment",
            "deadline",
            "conference",
            "standup",
            "sync",
        ],
    ),
    (
        TaskCategory::Finance,
        &[
            "payment",
            "invoice",
            "bill",
            "budget",
            "cost",
            "expense",
            "financial",
            "accounting",
        ],
    ),
    (
        TaskCategory::Technical,
        &[
            "bug", "fix", "error", "install", "repair", "maintain", "deploy", "code", "system",
        ],
    ),
    (
        TaskCategory::Safety,
        &[
            "safety",
            "hazard",
            "inspection",
            "compliance",
            "ppe",
            "accident",
            "incident",
        ],
    ),
];

/// Priority keyword table, in match-priority order.
const PRIORITY_KEYWORDS: &[(TaskPriority, &[&str])] = &[
    (
        TaskPriority::High,
        &["urgent", "asap", "immediately", "today", "critical", "emergency"],
    ),
    (
        TaskPriority::Medium,
        &["soon", "this week", "important", "next week"],
    ),
];

/// Suggested next actions per category storage name.
const SUGGESTED_ACTIONS: &[(&str, &[&str])] = &[
    ("scheduling", &["Block calendar", "Send invite", "Prepare agenda"]),
    ("finance", &["Check budget", "Generate invoice", "Process payment"]),
    ("technical", &["Diagnose issue", "Assign technician", "Create ticket"]),
    ("safety", &["Conduct inspection", "Notify supervisor", "Document incident"]),
    ("general", GENERAL_ACTIONS),
];

/// Fallback action list for unrecognized category keys.
const GENERAL_ACTIONS: &[&str] = &["Review task", "Plan approach", "Assign resource"];

/// Lowercased `title + " " + description` blob scanned for keywords.
///
/// An absent description still contributes the joining space, matching the
/// raw text used for [`ExtractedEntities::text_length`].
fn classification_text(title: &str, description: Option<&str>) -> String {
    raw_text(title, description).to_lowercase()
}

/// Raw (case-preserving) `title + " " + description` text.
fn raw_text(title: &str, description: Option<&str>) -> String {
    format!("{title} {}", description.unwrap_or_default())
}

/// Classifies the task category from keywords in title and description.
///
/// Scans the category table in order (scheduling, finance, technical,
/// safety); the first category with any keyword appearing as a substring of
/// the lowercased text wins. Falls back to [`TaskCategory::General`].
#[must_use]
pub fn classify_category(title: &str, description: Option<&str>) -> TaskCategory {
    let text = classification_text(title, description);
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return *category;
        }
    }
    TaskCategory::General
}

/// Classifies the task priority from keywords in title and description.
///
/// Checks high before medium; the first priority with any keyword found
/// wins. Falls back to [`TaskPriority::Low`].
#[must_use]
pub fn classify_priority(title: &str, description: Option<&str>) -> TaskPriority {
    let text = classification_text(title, description);
    for (priority, keywords) in PRIORITY_KEYWORDS {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return *priority;
        }
    }
    TaskPriority::Low
}

/// Extracts the entity summary for a new task.
///
/// Keywords are every category keyword (priority keywords are excluded)
/// whose substring appears in the lowercased text, deduplicated and in
/// table-scan order. The text length counts characters of the raw,
/// case-preserving text; a task without a description still carries the
/// joining space, so its length is the title length plus one.
#[must_use]
pub fn extract_entities(
    title: &str,
    description: Option<&str>,
    assigned_to: Option<&str>,
) -> ExtractedEntities {
    let text = classification_text(title, description);
    let mut keywords: Vec<String> = Vec::new();
    for (_, list) in CATEGORY_KEYWORDS {
        for keyword in *list {
            if text.contains(keyword) && !keywords.iter().any(|found| found == keyword) {
                keywords.push((*keyword).to_owned());
            }
        }
    }

    ExtractedEntities {
        keywords,
        assigned_person: assigned_to
            .filter(|person| !person.is_empty())
            .map(str::to_owned),
        text_length: raw_text(title, description).chars().count(),
    }
}

/// Returns the suggested action list for a category storage name.
///
/// The lookup is an exact, case-sensitive string match; any unrecognized
/// key (including case variants like `"SCHEDULING"`) falls back to the
/// general list. The lifecycle service only ever passes lowercase storage
/// names, but the legacy fallback behaviour is part of the observable
/// contract and is kept.
#[must_use]
pub fn suggested_actions(category: &str) -> &'static [&'static str] {
    SUGGESTED_ACTIONS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(GENERAL_ACTIONS, |(_, actions)| *actions)
}
