//! Plugin-facing surface of the engine.
//!
//! Other mods talk to the engine through these methods only: registering
//! their own ribbons, awarding and revoking by code, and querying state.
//! Everything here is award-by-decision; no rule evaluation happens, so the
//! calls work for any registered ribbon including the built-in customs.

use valor_logic::rules::{Achievement, AchievementKind};

use crate::engine::AchievementEngine;
use crate::logbook::LogbookEntry;
use crate::ribbon::Ribbon;

impl AchievementEngine {
    /// Register a ribbon under a plugin-owned code. Refused when the code
    /// collides with an existing ribbon.
    pub fn register_external_ribbon(
        &mut self,
        code: &str,
        name: &str,
        description: &str,
        texture: &str,
        prestige: i32,
        first: bool,
    ) -> bool {
        let achievement = Achievement::new(
            AchievementKind::External {
                code: code.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                first,
            },
            prestige,
        );
        let (pool, activities) = self.parts_mut();
        pool.register(Ribbon::new(texture, achievement), activities)
    }

    /// Register a plugin custom ribbon by numeric index; indices below the
    /// reserved base are refused.
    pub fn register_external_custom(
        &mut self,
        index: u32,
        name: &str,
        description: &str,
        texture: &str,
        prestige: i32,
    ) -> bool {
        let (pool, activities) = self.parts_mut();
        pool.register_plugin_custom(index, name, description, texture, prestige, activities)
    }

    /// Change the displayed name and description of a custom or external
    /// ribbon.
    pub fn rename_ribbon(&mut self, code: &str, name: &str, description: &str) -> bool {
        let (pool, activities) = self.parts_mut();
        let Some(ribbon) = pool.get_mut(code) else {
            return false;
        };
        if !ribbon.achievement_mut().set_custom_text(name, description) {
            log::warn!("ribbon '{code}' is not customizable, rename ignored");
            return false;
        }
        activities.rename(code, name)
    }

    /// Award a ribbon to one crew member by code. Returns true when the
    /// award was fresh; unknown codes log and return false.
    pub fn award_ribbon_to(&self, crew_name: &str, code: &str, universal_time: f64) -> bool {
        let Some(ribbon) = self.pool().get(code) else {
            log::error!("cannot award unknown ribbon code '{code}'");
            return false;
        };
        self.hall_of_fame().award_ribbon(
            crew_name,
            ribbon,
            universal_time,
            self.pool(),
            self.catalog(),
        )
    }

    /// Award one ribbon to a whole crew inside a single notification batch.
    pub fn award_ribbon_to_crew(&self, crew: &[String], code: &str, universal_time: f64) -> usize {
        self.hall_of_fame().begin_batch();
        let awarded = crew
            .iter()
            .filter(|name| self.award_ribbon_to(name, code, universal_time))
            .count();
        self.hall_of_fame().end_batch();
        awarded
    }

    /// Revoke a ribbon from a crew member. No-op for unknown codes or
    /// crew without the ribbon.
    pub fn revoke_ribbon_from(&self, crew_name: &str, code: &str) -> bool {
        let Some(ribbon) = self.pool().get(code) else {
            return false;
        };
        self.hall_of_fame()
            .with_entry_mut(crew_name, |entry| entry.revoke(ribbon))
            .unwrap_or(false)
    }

    /// Append a free-form line to a crew member's logbook.
    pub fn record_log(&self, crew_name: &str, text: &str, universal_time: f64) {
        self.hall_of_fame().log(
            crew_name,
            LogbookEntry::new(universal_time, "LOG", crew_name, text),
        );
    }

    pub fn has_ribbon(&self, crew_name: &str, code: &str) -> bool {
        self.hall_of_fame().has_ribbon(crew_name, code)
    }

    pub fn ribbon_count_of(&self, crew_name: &str) -> usize {
        self.hall_of_fame()
            .with_entry(crew_name, |entry| entry.ribbon_count())
            .unwrap_or(0)
    }

    pub fn is_ready(&self) -> bool {
        self.pool().is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_registration_and_award() {
        let mut engine = AchievementEngine::new();
        assert!(engine.register_external_ribbon(
            "ACME:TEST",
            "Acme Test Ribbon",
            "Awarded for testing Acme hardware",
            "acme/ribbons/test",
            500,
            false,
        ));
        // same code again is refused
        assert!(!engine.register_external_ribbon(
            "ACME:TEST",
            "Other",
            "",
            "acme/other",
            1,
            false,
        ));
        engine.complete_setup();
        assert!(engine.award_ribbon_to("Sam", "ACME:TEST", 10.0));
        assert!(!engine.award_ribbon_to("Sam", "ACME:TEST", 20.0));
        assert!(engine.has_ribbon("Sam", "ACME:TEST"));
    }

    #[test]
    fn test_unknown_code_award_is_refused() {
        let engine = AchievementEngine::new();
        assert!(!engine.award_ribbon_to("Sam", "NOPE", 0.0));
        assert_eq!(engine.ribbon_count_of("Sam"), 0);
    }

    #[test]
    fn test_crew_award_batches_notices() {
        let mut engine = AchievementEngine::new();
        engine.complete_setup();
        let crew = vec!["Sam".to_string(), "Alex".to_string(), "Sam".to_string()];
        let awarded = engine.award_ribbon_to_crew(&crew, "X100", 10.0);
        // the duplicate name only counts once
        assert_eq!(awarded, 2);
        // crew awards are batched, so no per-award notices surface
        assert!(engine.hall_of_fame().take_notices().is_empty());
        assert!(engine.has_ribbon("Alex", "X100"));
    }

    #[test]
    fn test_revoke_removes_prestige() {
        let mut engine = AchievementEngine::new();
        engine.complete_setup();
        engine.award_ribbon_to("Sam", "DE", 1.0);
        let before = engine
            .hall_of_fame()
            .with_entry("Sam", |e| e.prestige())
            .unwrap();
        assert!(engine.revoke_ribbon_from("Sam", "DE"));
        let after = engine
            .hall_of_fame()
            .with_entry("Sam", |e| e.prestige())
            .unwrap();
        assert!(after < before);
        assert!(!engine.has_ribbon("Sam", "DE"));
        assert!(!engine.revoke_ribbon_from("Sam", "DE"));
    }

    #[test]
    fn test_rename_custom_ribbon() {
        let mut engine = AchievementEngine::new();
        assert!(engine.rename_ribbon("X100", "Order of Valor", "For conspicuous bravery"));
        assert_eq!(
            engine.pool().get("X100").map(Ribbon::name),
            Some("Order of Valor".to_string())
        );
        assert_eq!(
            engine.activities().get("X100").map(|a| a.name().to_string()),
            Some("Order of Valor".to_string())
        );
        // built-in rule ribbons keep their identity
        assert!(!engine.rename_ribbon("DE", "Nope", ""));
    }

    #[test]
    fn test_record_log_appends_entry() {
        let engine = AchievementEngine::new();
        engine.record_log("Sam", "Completed a flawless docking", 42.0);
        engine
            .hall_of_fame()
            .with_entry("Sam", |entry| {
                assert_eq!(entry.logbook().len(), 1);
                assert_eq!(entry.logbook()[0].code, "LOG");
            })
            .unwrap();
    }
}
