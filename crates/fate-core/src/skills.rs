//! Static skill catalog and the per-actor skill capability.

use std::collections::BTreeMap;

use contracts::Verb;

use crate::ladder::LadderTable;

/// The full skill list with the action verbs each supports
/// (Overcome, Create-Advantage, Attack, Defend).
pub const SKILL_CATALOG: &[(&str, &[Verb])] = &[
    ("Athletics", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Burglary", &[Verb::Overcome, Verb::CreateAdvantage]),
    ("Contacts", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Crafts", &[Verb::Overcome, Verb::CreateAdvantage]),
    ("Deceive", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Drive", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Empathy", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    (
        "Fight",
        &[Verb::Overcome, Verb::CreateAdvantage, Verb::Attack, Verb::Defend],
    ),
    ("Investigate", &[Verb::Overcome, Verb::CreateAdvantage]),
    ("Lore", &[Verb::Overcome, Verb::CreateAdvantage]),
    ("Notice", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Physique", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Provoke", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Attack]),
    ("Rapport", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Resources", &[Verb::Overcome, Verb::CreateAdvantage]),
    ("Shoot", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Attack]),
    ("Stealth", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
    ("Will", &[Verb::Overcome, Verb::CreateAdvantage, Verb::Defend]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub value: i64,
    pub verbs: Vec<Verb>,
}

impl Skill {
    pub fn supports(&self, verb: Verb) -> bool {
        self.verbs.contains(&verb)
    }
}

/// Skill capability for one actor. Keys are lowercase skill names so
/// lookups are case-insensitive; `name` keeps display casing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkillSet {
    skills: BTreeMap<String, Skill>,
}

impl SkillSet {
    /// Every catalog skill at value 0, the state of a fresh character.
    pub fn standard() -> Self {
        let mut skills = BTreeMap::new();
        for (name, verbs) in SKILL_CATALOG {
            skills.insert(
                name.to_ascii_lowercase(),
                Skill {
                    name: (*name).to_string(),
                    value: 0,
                    verbs: verbs.to_vec(),
                },
            );
        }
        Self { skills }
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(&name.trim().to_ascii_lowercase())
    }

    /// Sets a proficiency value, used by external advancement logic.
    /// Unknown names are ignored; the catalog is closed.
    pub fn set_value(&mut self, name: &str, value: i64) -> bool {
        match self.skills.get_mut(&name.trim().to_ascii_lowercase()) {
            Some(skill) => {
                skill.value = value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Sheet line for one skill, e.g. `Notice: Good`.
    pub fn sheet_line(&self, skill: &Skill, ladder: &LadderTable) -> String {
        format!("{}: {}", skill.name, ladder.describe(skill.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_covers_the_catalog_at_zero() {
        let set = SkillSet::standard();
        assert_eq!(set.iter().count(), SKILL_CATALOG.len());
        assert!(set.iter().all(|skill| skill.value == 0));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let set = SkillSet::standard();
        assert_eq!(set.get("NOTICE").map(|s| s.name.as_str()), Some("Notice"));
        assert_eq!(set.get(" fight ").map(|s| s.name.as_str()), Some("Fight"));
        assert!(set.get("basketweaving").is_none());
    }

    #[test]
    fn verb_support_follows_the_catalog() {
        let set = SkillSet::standard();
        let fight = set.get("fight").expect("fight exists");
        assert!(fight.supports(Verb::Attack));
        let lore = set.get("lore").expect("lore exists");
        assert!(!lore.supports(Verb::Attack));
        assert!(lore.supports(Verb::Overcome));
    }

    #[test]
    fn set_value_rejects_unknown_skills() {
        let mut set = SkillSet::standard();
        assert!(set.set_value("Notice", 3));
        assert_eq!(set.get("notice").map(|s| s.value), Some(3));
        assert!(!set.set_value("Flying", 2));
    }
}
