use serde_json::json;

/// HL/SL course depth designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Hl,
    Sl,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Hl => "HL",
            Level::Sl => "SL",
        }
    }
}

/// One IA milestone of a subject. The catalog ships demo milestones; the
/// attached file list is always empty at build time.
#[derive(Debug, Clone, Copy)]
pub struct Milestone {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub due_date: &'static str,
    pub completed: bool,
}

/// A selectable subject. Fixed at build time; never mutated at runtime.
/// Identities reference subjects by id only (weak set membership), so a
/// stored id that is no longer in the catalog simply stops rendering.
#[derive(Debug, Clone, Copy)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub level: Level,
    pub progress: i64,
    pub next_milestone: &'static str,
    pub due_date: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub papers: &'static [&'static str],
    pub milestones: &'static [Milestone],
}

impl Milestone {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "dueDate": self.due_date,
            "completed": self.completed,
            "files": [],
        })
    }
}

impl Subject {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "level": self.level.as_str(),
            "progress": self.progress,
            "nextMilestone": self.next_milestone,
            "dueDate": self.due_date,
            "color": self.color,
            "icon": self.icon,
            "papers": self.papers,
            "milestones": self.milestones.iter().map(|m| m.to_json()).collect::<Vec<_>>(),
        })
    }
}

const PHYSICS_MILESTONES: &[Milestone] = &[
    Milestone {
        id: "1",
        title: "Topic Selection",
        description: "Choose and approve your IA topic",
        due_date: "2024-01-15",
        completed: true,
    },
    Milestone {
        id: "2",
        title: "Research and Data Collection",
        description: "Gather data and conduct research",
        due_date: "2024-02-15",
        completed: true,
    },
    Milestone {
        id: "3",
        title: "Draft 1",
        description: "Submit first complete draft",
        due_date: "2024-12-15",
        completed: false,
    },
];

const SUBJECTS: &[Subject] = &[
    Subject {
        id: "physics-hl",
        name: "Physics",
        level: Level::Hl,
        progress: 75,
        next_milestone: "Draft 1 Due",
        due_date: "Dec 15",
        color: "#3B82F6",
        icon: "physics",
        papers: &["Paper 1", "Paper 2"],
        milestones: PHYSICS_MILESTONES,
    },
    Subject {
        id: "chemistry-hl",
        name: "Chemistry",
        level: Level::Hl,
        progress: 45,
        next_milestone: "Data Collection",
        due_date: "Jan 10",
        color: "#10B981",
        icon: "chemistry",
        papers: &["Paper 1", "Paper 2", "Paper 3"],
        milestones: &[],
    },
    Subject {
        id: "math-aa-hl",
        name: "Math AA",
        level: Level::Hl,
        progress: 90,
        next_milestone: "Final Review",
        due_date: "Dec 20",
        color: "#8B5CF6",
        icon: "math",
        papers: &["Paper 1", "Paper 2", "Paper 3"],
        milestones: &[],
    },
    Subject {
        id: "economics-hl",
        name: "Economics",
        level: Level::Hl,
        progress: 30,
        next_milestone: "Topic Selection",
        due_date: "Jan 25",
        color: "#F59E0B",
        icon: "economics",
        papers: &["Paper 1", "Paper 2", "Paper 3"],
        milestones: &[],
    },
    Subject {
        id: "geography-hl",
        name: "Geography",
        level: Level::Hl,
        progress: 60,
        next_milestone: "Research Phase",
        due_date: "Feb 01",
        color: "#EF4444",
        icon: "geography",
        papers: &["Paper 1", "Paper 2", "Paper 3"],
        milestones: &[],
    },
    Subject {
        id: "computer-science-hl",
        name: "Computer Science",
        level: Level::Hl,
        progress: 85,
        next_milestone: "Testing Phase",
        due_date: "Dec 18",
        color: "#06B6D4",
        icon: "computer",
        papers: &["Paper 1", "Paper 2"],
        milestones: &[],
    },
    Subject {
        id: "english-lang-lit-sl",
        name: "English Lang & Lit",
        level: Level::Sl,
        progress: 55,
        next_milestone: "Draft Review",
        due_date: "Jan 08",
        color: "#EC4899",
        icon: "english",
        papers: &["Paper 1", "Paper 2"],
        milestones: &[],
    },
    Subject {
        id: "arabic-lang-lit-sl",
        name: "Arabic Lang & Lit",
        level: Level::Sl,
        progress: 40,
        next_milestone: "Topic Research",
        due_date: "Jan 30",
        color: "#84CC16",
        icon: "arabic",
        papers: &["Paper 1", "Paper 2"],
        milestones: &[],
    },
];

pub fn all() -> &'static [Subject] {
    SUBJECTS
}

pub fn find_by_id(id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

/// Mean of the selected subjects' baseline progress, rounded to the nearest
/// integer; 0 for an empty selection. Ids not in the catalog are skipped, so
/// a stale stored selection degrades instead of skewing the average.
pub fn aggregate_progress(subject_ids: &[String]) -> i64 {
    let selected: Vec<&Subject> = subject_ids
        .iter()
        .filter_map(|id| find_by_id(id))
        .collect();
    if selected.is_empty() {
        return 0;
    }
    let total: i64 = selected.iter().map(|s| s.progress).sum();
    (total as f64 / selected.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn catalog_is_fixed_and_ordered() {
        assert_eq!(all().len(), 8);
        assert_eq!(all()[0].id, "physics-hl");
        assert_eq!(all()[7].id, "arabic-lang-lit-sl");
        assert_eq!(find_by_id("math-aa-hl").map(|s| s.progress), Some(90));
        assert!(find_by_id("biology-hl").is_none());
    }

    #[test]
    fn physics_ships_demo_milestones() {
        let physics = find_by_id("physics-hl").expect("physics");
        assert_eq!(physics.milestones.len(), 3);
        assert!(physics.milestones[0].completed);
        assert!(!physics.milestones[2].completed);
    }

    #[test]
    fn aggregate_is_rounded_mean() {
        assert_eq!(aggregate_progress(&ids(&["physics-hl", "chemistry-hl"])), 60);
        // 75 + 90 = 165 / 2 = 82.5, rounds half up like the web build.
        assert_eq!(aggregate_progress(&ids(&["physics-hl", "math-aa-hl"])), 83);
        assert_eq!(aggregate_progress(&ids(&["physics-hl"])), 75);
    }

    #[test]
    fn aggregate_of_empty_selection_is_zero() {
        assert_eq!(aggregate_progress(&[]), 0);
    }

    #[test]
    fn aggregate_skips_unknown_ids() {
        assert_eq!(
            aggregate_progress(&ids(&["physics-hl", "retired-subject"])),
            75
        );
        assert_eq!(aggregate_progress(&ids(&["retired-subject"])), 0);
    }
}
