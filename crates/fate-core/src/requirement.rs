//! Requirement schema helpers: authoring merges, gate rendering, and the
//! passive access predicate.

use contracts::Requirement;

use crate::ladder::LadderTable;
use crate::skills::SkillSet;

/// Folds one authoring pass into an existing record. Overlapping skill
/// entries are replaced, others merged; `desc` is only overwritten when a
/// new one is supplied; `oneshot` always follows the latest pass.
pub fn merge_authoring(
    existing: Option<Requirement>,
    skill: &str,
    level: i64,
    oneshot: bool,
    desc: Option<String>,
) -> Requirement {
    let mut requirement = existing.unwrap_or_default();
    requirement.skills.insert(skill.to_string(), level);
    if desc.is_some() {
        requirement.desc = desc;
    }
    requirement.oneshot = oneshot;
    requirement
}

/// Passive gate per the lock layer contract: actors without a skill
/// capability pass, a missing or empty requirement passes, and otherwise
/// any listed skill at or above its level passes. Never cached; skill
/// values and requirements both move between evaluations.
pub fn passive_check(skills: Option<&SkillSet>, requirement: Option<&Requirement>) -> bool {
    let Some(skills) = skills else {
        return true;
    };
    let Some(requirement) = requirement else {
        return true;
    };
    if requirement.skills.is_empty() {
        return true;
    }
    requirement.skills.iter().any(|(name, level)| {
        skills
            .get(name)
            .map(|skill| skill.value >= *level)
            .unwrap_or(false)
    })
}

/// `Good Notice or Fair Burglary` — the satisfying-skill clause of a gate.
pub fn required_skills_clause(ladder: &LadderTable, requirement: &Requirement) -> String {
    requirement
        .skills
        .iter()
        .map(|(name, level)| format!("{} {}", ladder.label_at(*level), name))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Full refusal message for a gated action, rationale first when present.
pub fn gate_text(ladder: &LadderTable, action: &str, requirement: &Requirement) -> String {
    let mut lines = Vec::new();
    if let Some(desc) = &requirement.desc {
        lines.push(desc.clone());
    }
    lines.push(format!(
        "{} this requires {}.",
        action_gerund(action),
        required_skills_clause(ladder, requirement)
    ));
    lines.join("\n")
}

fn action_gerund(action: &str) -> String {
    let lower = action.trim().to_ascii_lowercase();
    // The hook verbs the authoring wizard offers; anything else falls back
    // to a naive -ing form.
    match lower.as_str() {
        "get" => "Getting".to_string(),
        "put" => "Putting".to_string(),
        "drop" => "Dropping".to_string(),
        "view" => "Viewing".to_string(),
        "open" => "Opening".to_string(),
        "close" => "Closing".to_string(),
        "use" => "Using".to_string(),
        "give" => "Giving".to_string(),
        "enter" => "Entering".to_string(),
        "leave" => "Leaving".to_string(),
        _ => {
            let stem = lower.strip_suffix('e').unwrap_or(&lower);
            let mut gerund = String::with_capacity(stem.len() + 3);
            let mut chars = stem.chars();
            if let Some(first) = chars.next() {
                gerund.extend(first.to_uppercase());
                gerund.push_str(chars.as_str());
            }
            gerund.push_str("ing");
            gerund
        }
    }
}
