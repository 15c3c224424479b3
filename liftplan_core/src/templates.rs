//! Static exercise pools and split day templates for the fallback generator.
//!
//! Pools are ordered tables of movements tagged with the equipment they need.
//! Day templates map each split type to six slots of pool selectors so every
//! supported `days_per_week` (3-6) is covered.

use crate::SplitType;

/// Whether a movement is a primary lift or a lighter accessory
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Main,
    Accessory,
}

/// One candidate movement in a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateExercise {
    pub name: &'static str,
    pub muscle_group: &'static str,
    pub equipment: &'static str,
    pub role: Role,
}

const fn main(
    name: &'static str,
    muscle_group: &'static str,
    equipment: &'static str,
) -> TemplateExercise {
    TemplateExercise {
        name,
        muscle_group,
        equipment,
        role: Role::Main,
    }
}

const fn accessory(
    name: &'static str,
    muscle_group: &'static str,
    equipment: &'static str,
) -> TemplateExercise {
    TemplateExercise {
        name,
        muscle_group,
        equipment,
        role: Role::Accessory,
    }
}

pub static PUSH_POOL: &[TemplateExercise] = &[
    main("Barbell Bench Press", "Chest", "barbell"),
    main("Dumbbell Bench Press", "Chest", "dumbbell"),
    main("Push-ups", "Chest", "bodyweight"),
    main("Overhead Press", "Shoulders", "barbell"),
    main("Dumbbell Shoulder Press", "Shoulders", "dumbbell"),
    main("Pike Push-ups", "Shoulders", "bodyweight"),
    accessory("Incline Dumbbell Press", "Chest", "dumbbell"),
    accessory("Cable Fly", "Chest", "cable"),
    accessory("Lateral Raises", "Shoulders", "dumbbell"),
    accessory("Tricep Pushdown", "Triceps", "cable"),
    accessory("Dips", "Triceps", "bodyweight"),
    accessory("Overhead Tricep Extension", "Triceps", "dumbbell"),
];

pub static PULL_POOL: &[TemplateExercise] = &[
    main("Barbell Row", "Back", "barbell"),
    main("Pull-ups", "Back", "bodyweight"),
    main("Lat Pulldown", "Back", "cable"),
    main("Dumbbell Row", "Back", "dumbbell"),
    main("Deadlift", "Back", "barbell"),
    accessory("Seated Cable Row", "Back", "cable"),
    accessory("Inverted Rows", "Back", "bodyweight"),
    accessory("Face Pulls", "Shoulders", "cable"),
    accessory("Dumbbell Curls", "Biceps", "dumbbell"),
    accessory("Barbell Curls", "Biceps", "barbell"),
    accessory("Chin-ups", "Biceps", "bodyweight"),
];

pub static LEG_POOL: &[TemplateExercise] = &[
    main("Barbell Back Squat", "Quadriceps", "barbell"),
    main("Bodyweight Squats", "Quadriceps", "bodyweight"),
    main("Goblet Squat", "Quadriceps", "dumbbell"),
    main("Leg Press", "Quadriceps", "machine"),
    main("Romanian Deadlift", "Hamstrings", "barbell"),
    main("Dumbbell Romanian Deadlift", "Hamstrings", "dumbbell"),
    accessory("Walking Lunges", "Quadriceps", "bodyweight"),
    accessory("Leg Curls", "Hamstrings", "machine"),
    accessory("Glute Bridges", "Glutes", "bodyweight"),
    accessory("Calf Raises", "Calves", "bodyweight"),
];

/// Which pool (or pool slice) fills one training day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolSelector {
    Push,
    Pull,
    Legs,
    /// Push followed by pull
    Upper,
    FullBody,
    /// Push and pull entries whose muscle group is one of the listed groups
    Muscles(&'static [&'static str]),
}

/// One slot of a split template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayTemplate {
    pub label: &'static str,
    pub focus: &'static str,
    pub selector: PoolSelector,
}

const fn day(label: &'static str, focus: &'static str, selector: PoolSelector) -> DayTemplate {
    DayTemplate {
        label,
        focus,
        selector,
    }
}

const PUSH_DAY: DayTemplate = day("Push", "Chest, Shoulders, Triceps", PoolSelector::Push);
const PULL_DAY: DayTemplate = day("Pull", "Back, Biceps", PoolSelector::Pull);
const LEG_DAY: DayTemplate = day("Legs", "Quadriceps, Hamstrings, Glutes", PoolSelector::Legs);
const UPPER_DAY: DayTemplate = day("Upper Body", "Chest, Back, Shoulders, Arms", PoolSelector::Upper);
const LOWER_DAY: DayTemplate = day("Lower Body", "Quadriceps, Hamstrings, Glutes", PoolSelector::Legs);
const FULL_DAY: DayTemplate = day("Full Body", "Full Body", PoolSelector::FullBody);

static PUSH_PULL_LEGS_DAYS: [DayTemplate; 6] =
    [PUSH_DAY, PULL_DAY, LEG_DAY, PUSH_DAY, PULL_DAY, LEG_DAY];

static UPPER_LOWER_DAYS: [DayTemplate; 6] =
    [UPPER_DAY, LOWER_DAY, UPPER_DAY, LOWER_DAY, UPPER_DAY, LOWER_DAY];

static FULL_BODY_DAYS: [DayTemplate; 6] =
    [FULL_DAY, FULL_DAY, FULL_DAY, FULL_DAY, FULL_DAY, FULL_DAY];

static BRO_SPLIT_DAYS: [DayTemplate; 6] = [
    day("Chest", "Chest", PoolSelector::Muscles(&["Chest"])),
    day("Back", "Back", PoolSelector::Muscles(&["Back"])),
    LEG_DAY,
    day("Shoulders", "Shoulders", PoolSelector::Muscles(&["Shoulders"])),
    day("Arms", "Biceps, Triceps", PoolSelector::Muscles(&["Biceps", "Triceps"])),
    FULL_DAY,
];

/// Day-by-day template for a split; custom splits use the body-part layout
pub fn day_templates(split: SplitType) -> &'static [DayTemplate] {
    match split {
        SplitType::PushPullLegs => &PUSH_PULL_LEGS_DAYS,
        SplitType::UpperLower => &UPPER_LOWER_DAYS,
        SplitType::FullBody => &FULL_BODY_DAYS,
        SplitType::BroSplit | SplitType::Custom => &BRO_SPLIT_DAYS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_DAYS_PER_WEEK;
    use std::collections::HashSet;

    const ALL_SPLITS: [SplitType; 5] = [
        SplitType::PushPullLegs,
        SplitType::UpperLower,
        SplitType::FullBody,
        SplitType::BroSplit,
        SplitType::Custom,
    ];

    #[test]
    fn test_every_split_covers_max_days() {
        for split in ALL_SPLITS {
            assert!(
                day_templates(split).len() >= MAX_DAYS_PER_WEEK as usize,
                "{:?} template is too short",
                split
            );
        }
    }

    #[test]
    fn test_pool_names_are_unique() {
        let mut seen = HashSet::new();
        for entry in PUSH_POOL.iter().chain(PULL_POOL).chain(LEG_POOL) {
            assert!(seen.insert(entry.name), "duplicate pool entry {}", entry.name);
        }
    }

    #[test]
    fn test_no_pool_uses_bands() {
        let uses_bands = PUSH_POOL
            .iter()
            .chain(PULL_POOL)
            .chain(LEG_POOL)
            .any(|e| e.equipment == "bands");
        assert!(!uses_bands);
    }

    #[test]
    fn test_bro_split_ends_with_full_body() {
        let days = day_templates(SplitType::BroSplit);
        assert_eq!(days.last().map(|d| d.selector), Some(PoolSelector::FullBody));
    }
}
