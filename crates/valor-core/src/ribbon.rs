//! A ribbon: the awardable decoration wrapping a single rule.
//!
//! Ribbons add presentation (a texture path) and pool semantics (an optional
//! supersede reference, an enabled flag) on top of an [`Achievement`]. The
//! ribbon's code is its achievement's code and never changes.

use valor_logic::rules::Achievement;

#[derive(Debug, Clone)]
pub struct Ribbon {
    achievement: Achievement,
    texture: String,
    /// Code of the ribbon this one replaces in a crew member's display row.
    supersedes: Option<String>,
    enabled: bool,
}

impl Ribbon {
    pub fn new(texture: impl Into<String>, achievement: Achievement) -> Self {
        Self {
            achievement,
            texture: texture.into(),
            supersedes: None,
            enabled: true,
        }
    }

    pub fn superseding(
        texture: impl Into<String>,
        achievement: Achievement,
        supersedes: &Ribbon,
    ) -> Self {
        Self {
            achievement,
            texture: texture.into(),
            supersedes: Some(supersedes.code()),
            enabled: true,
        }
    }

    /// Same as [`superseding`](Self::superseding), for codes of ribbons not
    /// at hand (pack files reference ribbons by code).
    pub fn superseding_code(
        texture: impl Into<String>,
        achievement: Achievement,
        supersedes: impl Into<String>,
    ) -> Self {
        Self {
            achievement,
            texture: texture.into(),
            supersedes: Some(supersedes.into()),
            enabled: true,
        }
    }

    pub fn code(&self) -> String {
        self.achievement.code()
    }

    pub fn name(&self) -> String {
        self.achievement.name()
    }

    pub fn description(&self) -> String {
        self.achievement.description()
    }

    pub fn prestige(&self) -> i32 {
        self.achievement.prestige()
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn supersedes(&self) -> Option<&str> {
        self.supersedes.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled ribbons stay registered but are skipped by evaluation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn achievement(&self) -> &Achievement {
        &self.achievement
    }

    pub fn achievement_mut(&mut self) -> &mut Achievement {
        &mut self.achievement
    }
}

impl PartialEq for Ribbon {
    fn eq(&self, other: &Self) -> bool {
        self.achievement == other.achievement
    }
}

impl Eq for Ribbon {}

impl PartialOrd for Ribbon {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ribbon {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.achievement.cmp(&other.achievement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valor_logic::rules::AchievementKind;

    #[test]
    fn test_supersede_reference_carries_code() {
        let base = Ribbon::new(
            "ribbons/orbit",
            Achievement::new(
                AchievementKind::Orbit {
                    body: "Luna".to_string(),
                    first: false,
                },
                10_011,
            ),
        );
        let first = Ribbon::superseding(
            "ribbons/orbit1",
            Achievement::new(
                AchievementKind::Orbit {
                    body: "Luna".to_string(),
                    first: true,
                },
                10_012,
            ),
            &base,
        );
        assert_eq!(first.supersedes(), Some("O:Luna"));
        assert_eq!(base.supersedes(), None);
    }

    #[test]
    fn test_ribbons_order_by_prestige() {
        let a = Ribbon::new(
            "ribbons/de",
            Achievement::new(AchievementKind::DangerousEva, 100),
        );
        let b = Ribbon::new(
            "ribbons/w",
            Achievement::new(AchievementKind::Splashdown, 80),
        );
        assert!(a < b);
    }
}
