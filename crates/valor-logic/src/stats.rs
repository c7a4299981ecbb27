//! Per-crew-member cumulative statistics.
//!
//! Counters are driven by host-reported events through [`StatUpdate`], never
//! by the rule-check path; rules only read them. Everything is monotonic
//! except the last-EVA fields, which reset when a new EVA starts.

use serde::{Deserialize, Serialize};

/// Professional specialization of a crew member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    Pilot,
    Engineer,
    Scientist,
}

/// A single statistic update reported by the host simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatUpdate {
    /// A mission ended and the crew member returned safely.
    MissionCompleted { duration: f64 },
    /// A docking was performed with this crew member aboard.
    DockingPerformed,
    /// A contract was completed with this crew member contributing.
    ContractCompleted,
    /// Science points were recovered.
    ResearchGained { points: f64 },
    /// The crew member left the vessel.
    EvaStarted { universal_time: f64 },
    /// Periodic progress report while on EVA.
    EvaProgress { universal_time: f64 },
    /// The crew member boarded a vessel again.
    EvaEnded { universal_time: f64 },
    /// The host assigned or changed the crew member's specialization.
    SpecializationAssigned(Specialization),
}

/// Cumulative statistics for one crew member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewStats {
    pub missions_flown: u32,
    /// Total time spent in missions, in seconds.
    pub total_mission_time: f64,
    /// Duration of the longest single completed mission, in seconds.
    pub longest_mission_time: f64,
    /// Total time spent on EVA, in seconds.
    pub total_eva_time: f64,
    /// Universal time the current or last EVA started, if any.
    pub last_eva_start: Option<f64>,
    /// Duration of the current or last EVA, in seconds.
    pub last_eva_duration: f64,
    pub dockings: u32,
    pub contracts_completed: u32,
    /// Science points recovered.
    pub research: f64,
    pub specialization: Option<Specialization>,
}

impl CrewStats {
    /// Apply one host-reported update. Counters only ever grow, except the
    /// last-EVA fields which reset at EVA start.
    pub fn apply(&mut self, update: &StatUpdate) {
        match update {
            StatUpdate::MissionCompleted { duration } => {
                self.missions_flown += 1;
                if *duration > 0.0 {
                    self.total_mission_time += duration;
                    if *duration > self.longest_mission_time {
                        self.longest_mission_time = *duration;
                    }
                }
            }
            StatUpdate::DockingPerformed => self.dockings += 1,
            StatUpdate::ContractCompleted => self.contracts_completed += 1,
            StatUpdate::ResearchGained { points } => {
                if *points > 0.0 {
                    self.research += points;
                }
            }
            StatUpdate::EvaStarted { universal_time } => {
                self.last_eva_start = Some(*universal_time);
                self.last_eva_duration = 0.0;
            }
            StatUpdate::EvaProgress { universal_time }
            | StatUpdate::EvaEnded { universal_time } => {
                if let Some(start) = self.last_eva_start {
                    let elapsed = (universal_time - start).max(0.0);
                    // total accumulates only the delta since the last report
                    let delta = (elapsed - self.last_eva_duration).max(0.0);
                    self.total_eva_time += delta;
                    self.last_eva_duration = elapsed;
                }
                if matches!(update, StatUpdate::EvaEnded { .. }) {
                    self.last_eva_start = None;
                }
            }
            StatUpdate::SpecializationAssigned(spec) => {
                self.specialization = Some(*spec);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_completed_updates_all_three_timers() {
        let mut stats = CrewStats::default();
        stats.apply(&StatUpdate::MissionCompleted { duration: 100.0 });
        stats.apply(&StatUpdate::MissionCompleted { duration: 40.0 });
        assert_eq!(stats.missions_flown, 2);
        assert_eq!(stats.total_mission_time, 140.0);
        assert_eq!(stats.longest_mission_time, 100.0);
    }

    #[test]
    fn test_eva_accumulates_without_double_counting() {
        let mut stats = CrewStats::default();
        stats.apply(&StatUpdate::EvaStarted { universal_time: 100.0 });
        stats.apply(&StatUpdate::EvaProgress { universal_time: 130.0 });
        stats.apply(&StatUpdate::EvaProgress { universal_time: 160.0 });
        stats.apply(&StatUpdate::EvaEnded { universal_time: 200.0 });
        assert_eq!(stats.total_eva_time, 100.0);
        assert_eq!(stats.last_eva_duration, 100.0);
        assert!(stats.last_eva_start.is_none());
    }

    #[test]
    fn test_new_eva_resets_last_duration_only() {
        let mut stats = CrewStats::default();
        stats.apply(&StatUpdate::EvaStarted { universal_time: 0.0 });
        stats.apply(&StatUpdate::EvaEnded { universal_time: 50.0 });
        stats.apply(&StatUpdate::EvaStarted { universal_time: 500.0 });
        assert_eq!(stats.last_eva_duration, 0.0);
        assert_eq!(stats.total_eva_time, 50.0);
    }

    #[test]
    fn test_negative_inputs_are_ignored() {
        let mut stats = CrewStats::default();
        stats.apply(&StatUpdate::ResearchGained { points: -5.0 });
        stats.apply(&StatUpdate::MissionCompleted { duration: -1.0 });
        assert_eq!(stats.research, 0.0);
        assert_eq!(stats.total_mission_time, 0.0);
        // the mission itself still counts
        assert_eq!(stats.missions_flown, 1);
    }
}
