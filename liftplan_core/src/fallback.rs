//! Deterministic, offline program construction.
//!
//! Used whenever the generation service is unconfigured or fails. The output
//! obeys the same contract as a normalized service response:
//! - exactly `days_per_week` workouts numbered from 1
//! - sets and rest derived from experience and goal
//! - movements limited to the equipment the user has

use crate::templates::{
    day_templates, DayTemplate, PoolSelector, Role, TemplateExercise, LEG_POOL, PULL_POOL,
    PUSH_POOL,
};
use crate::{Experience, GeneratedExercise, GeneratedProgram, GeneratedWorkout, GenerationParams, Goal};

/// Sets and rest values for the movements in one program
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Volume {
    pub main_sets: u32,
    pub reps: &'static str,
    pub rest_seconds: u32,
}

impl Volume {
    pub fn for_params(params: &GenerationParams) -> Self {
        let (reps, rest_seconds) = rep_scheme(params.goal);
        Self {
            main_sets: sets_for_experience(params.experience),
            reps,
            rest_seconds,
        }
    }

    fn accessory_sets(&self) -> u32 {
        self.main_sets.saturating_sub(1).max(1)
    }

    fn accessory_rest(&self) -> u32 {
        (self.rest_seconds / 2).max(45)
    }
}

/// Sets per main lift
pub fn sets_for_experience(experience: Experience) -> u32 {
    match experience {
        Experience::Beginner => 3,
        Experience::Intermediate => 4,
        Experience::Advanced => 5,
    }
}

/// Rep range text and rest seconds for a goal
pub fn rep_scheme(goal: Goal) -> (&'static str, u32) {
    match goal {
        Goal::Strength => ("4-6", 180),
        Goal::Hypertrophy => ("8-12", 90),
        Goal::Endurance => ("15-20", 60),
        Goal::GeneralFitness => ("10-12", 60),
    }
}

/// Equipment-filtered exercise pools for one set of params
struct Pools {
    push: Vec<TemplateExercise>,
    pull: Vec<TemplateExercise>,
    legs: Vec<TemplateExercise>,
    full_body: Vec<TemplateExercise>,
}

impl Pools {
    fn build(params: &GenerationParams) -> Self {
        let filter = |pool: &[TemplateExercise]| -> Vec<TemplateExercise> {
            pool.iter()
                .filter(|e| params.has_equipment(e.equipment))
                .copied()
                .collect()
        };

        let push = filter(PUSH_POOL);
        let pull = filter(PULL_POOL);
        let legs = filter(LEG_POOL);

        let full_body = push
            .iter()
            .take(2)
            .chain(pull.iter().take(2))
            .chain(legs.iter().take(2))
            .copied()
            .collect();

        Self {
            push,
            pull,
            legs,
            full_body,
        }
    }

    fn select(&self, selector: PoolSelector) -> Vec<TemplateExercise> {
        match selector {
            PoolSelector::Push => self.push.clone(),
            PoolSelector::Pull => self.pull.clone(),
            PoolSelector::Legs => self.legs.clone(),
            PoolSelector::Upper => self.push.iter().chain(&self.pull).copied().collect(),
            PoolSelector::FullBody => self.full_body.clone(),
            PoolSelector::Muscles(groups) => self
                .push
                .iter()
                .chain(&self.pull)
                .filter(|e| groups.iter().any(|g| g.eq_ignore_ascii_case(e.muscle_group)))
                .copied()
                .collect(),
        }
    }
}

/// Build a complete program from the static templates
///
/// Never fails: a pool emptied by the equipment filter produces a workout
/// with no exercises.
pub fn fallback(params: &GenerationParams) -> GeneratedProgram {
    let volume = Volume::for_params(params);
    let pools = Pools::build(params);

    let workouts: Vec<GeneratedWorkout> = day_templates(params.split_type)
        .iter()
        .take(params.days_per_week as usize)
        .enumerate()
        .map(|(idx, template)| build_workout(idx as u32 + 1, template, &pools, &volume, params))
        .collect();

    let split_label = match (&params.custom_split, params.split_type) {
        (Some(label), crate::SplitType::Custom) if !label.trim().is_empty() => label.trim(),
        _ => params.split_type.label(),
    };

    tracing::debug!(
        "Built fallback program: {} workouts, {} exercises",
        workouts.len(),
        workouts.iter().map(|w| w.exercises.len()).sum::<usize>()
    );

    GeneratedProgram {
        name: format!("{} {} Program", params.experience.label(), split_label),
        description: format!(
            "A {}-day per week program focused on {}.",
            params.days_per_week,
            params.goal.describe()
        ),
        days_per_week: workouts.len() as u32,
        workouts,
    }
}

fn build_workout(
    day_number: u32,
    template: &DayTemplate,
    pools: &Pools,
    volume: &Volume,
    params: &GenerationParams,
) -> GeneratedWorkout {
    let exercises: Vec<GeneratedExercise> = pools
        .select(template.selector)
        .into_iter()
        .map(|e| to_exercise(&e, volume))
        .collect();

    if exercises.is_empty() {
        tracing::warn!(
            "No exercises for {} day with equipment {:?}",
            template.label,
            params.equipment
        );
    }

    GeneratedWorkout {
        name: format!("Day {}: {}", day_number, template.label),
        day_number,
        focus: template.focus.to_string(),
        exercises,
        estimated_duration: params.duration,
    }
}

fn to_exercise(entry: &TemplateExercise, volume: &Volume) -> GeneratedExercise {
    let (sets, rest_seconds) = match entry.role {
        Role::Main => (volume.main_sets, volume.rest_seconds),
        Role::Accessory => (volume.accessory_sets(), volume.accessory_rest()),
    };

    GeneratedExercise {
        name: entry.name.to_string(),
        muscle_group: entry.muscle_group.to_string(),
        sets,
        reps: volume.reps.to_string(),
        rest_seconds,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{LEG_POOL, PULL_POOL, PUSH_POOL};
    use crate::SplitType;

    const ALL_SPLITS: [SplitType; 5] = [
        SplitType::PushPullLegs,
        SplitType::UpperLower,
        SplitType::FullBody,
        SplitType::BroSplit,
        SplitType::Custom,
    ];

    fn params(split: SplitType, equipment: &[&str], days: u32) -> GenerationParams {
        GenerationParams::new(
            split,
            equipment.iter().copied(),
            60,
            Experience::Intermediate,
            Goal::Hypertrophy,
            days,
        )
    }

    fn is_bodyweight(name: &str) -> bool {
        PUSH_POOL
            .iter()
            .chain(PULL_POOL)
            .chain(LEG_POOL)
            .any(|e| e.name == name && e.equipment == "bodyweight")
    }

    #[test]
    fn test_workout_count_and_numbering_for_all_params() {
        let gear = ["barbell", "dumbbell", "cable", "machine", "bodyweight"];
        for split in ALL_SPLITS {
            for days in 3..=6 {
                let program = fallback(&params(split, &gear, days));
                assert_eq!(program.workouts.len(), days as usize, "{:?}/{}", split, days);
                assert_eq!(program.days_per_week, days);
                for (idx, workout) in program.workouts.iter().enumerate() {
                    assert_eq!(workout.day_number, idx as u32 + 1);
                    assert_eq!(workout.estimated_duration, 60);
                    for exercise in &workout.exercises {
                        assert!(exercise.sets >= 1);
                        assert!(!exercise.name.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_sets_follow_experience() {
        assert_eq!(sets_for_experience(Experience::Beginner), 3);
        assert_eq!(sets_for_experience(Experience::Intermediate), 4);
        assert_eq!(sets_for_experience(Experience::Advanced), 5);
    }

    #[test]
    fn test_rep_scheme_follows_goal() {
        assert_eq!(rep_scheme(Goal::Strength), ("4-6", 180));
        assert_eq!(rep_scheme(Goal::Hypertrophy), ("8-12", 90));
        assert_eq!(rep_scheme(Goal::Endurance), ("15-20", 60));
        assert_eq!(rep_scheme(Goal::GeneralFitness), ("10-12", 60));
    }

    #[test]
    fn test_accessories_get_reduced_volume() {
        let program = fallback(&params(SplitType::PushPullLegs, &["dumbbell", "cable"], 3));
        let push = &program.workouts[0];

        let press = push
            .exercises
            .iter()
            .find(|e| e.name == "Dumbbell Bench Press")
            .unwrap();
        assert_eq!(press.sets, 4);
        assert_eq!(press.rest_seconds, 90);

        let raises = push
            .exercises
            .iter()
            .find(|e| e.name == "Lateral Raises")
            .unwrap();
        assert_eq!(raises.sets, 3);
        assert_eq!(raises.rest_seconds, 45);
    }

    #[test]
    fn test_full_body_bodyweight_beginner() {
        let p = GenerationParams::new(
            SplitType::FullBody,
            ["bodyweight"],
            30,
            Experience::Beginner,
            Goal::GeneralFitness,
            3,
        );
        let program = fallback(&p);

        assert_eq!(program.workouts.len(), 3);
        assert_eq!(program.name, "Beginner Full Body Program");
        let first = &program.workouts[0].exercises;
        assert!(!first.is_empty());
        for workout in &program.workouts {
            assert_eq!(&workout.exercises, first);
            for exercise in &workout.exercises {
                assert!(is_bodyweight(&exercise.name), "{} is not bodyweight", exercise.name);
            }
        }
    }

    #[test]
    fn test_full_body_takes_two_from_each_pool() {
        let program = fallback(&params(SplitType::FullBody, &["bodyweight"], 3));
        let names: Vec<_> = program.workouts[0]
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Push-ups",
                "Pike Push-ups",
                "Pull-ups",
                "Inverted Rows",
                "Bodyweight Squats",
                "Walking Lunges"
            ]
        );
    }

    #[test]
    fn test_unknown_equipment_yields_empty_workouts() {
        for split in ALL_SPLITS {
            let program = fallback(&params(split, &["bands"], 4));
            assert_eq!(program.workouts.len(), 4);
            assert!(program.workouts.iter().all(|w| w.exercises.is_empty()));
        }
    }

    #[test]
    fn test_push_pull_legs_cycles() {
        let program = fallback(&params(SplitType::PushPullLegs, &["barbell"], 6));
        let labels: Vec<_> = program.workouts.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Day 1: Push",
                "Day 2: Pull",
                "Day 3: Legs",
                "Day 4: Push",
                "Day 5: Pull",
                "Day 6: Legs"
            ]
        );
        assert_eq!(program.workouts[0].exercises, program.workouts[3].exercises);
    }

    #[test]
    fn test_upper_lower_alternates() {
        let program = fallback(&params(SplitType::UpperLower, &["barbell"], 4));
        let upper = &program.workouts[0];
        assert!(upper.exercises.iter().any(|e| e.name == "Barbell Bench Press"));
        assert!(upper.exercises.iter().any(|e| e.name == "Barbell Row"));
        let lower = &program.workouts[1];
        assert!(lower.exercises.iter().all(|e| {
            LEG_POOL.iter().any(|l| l.name == e.name)
        }));
    }

    #[test]
    fn test_bro_split_filters_by_muscle() {
        let gear = ["barbell", "dumbbell", "cable", "bodyweight"];
        let program = fallback(&params(SplitType::BroSplit, &gear, 6));
        assert!(program.workouts[0].exercises.iter().all(|e| e.muscle_group == "Chest"));
        assert!(program.workouts[1].exercises.iter().all(|e| e.muscle_group == "Back"));
        assert!(program.workouts[3].exercises.iter().all(|e| e.muscle_group == "Shoulders"));
        assert!(program.workouts[4]
            .exercises
            .iter()
            .all(|e| e.muscle_group == "Biceps" || e.muscle_group == "Triceps"));
        assert_eq!(program.workouts[5].name, "Day 6: Full Body");
    }

    #[test]
    fn test_custom_split_uses_label_in_name() {
        let p = params(SplitType::Custom, &["dumbbell"], 3).with_custom_split("Glute Focus");
        let program = fallback(&p);
        assert_eq!(program.name, "Intermediate Glute Focus Program");
        assert_eq!(program.workouts[0].name, "Day 1: Chest");
    }

    #[test]
    fn test_description_names_goal_and_days() {
        let program = fallback(&params(SplitType::FullBody, &["dumbbell"], 5));
        assert!(program.description.contains("5-day"));
        assert!(program.description.contains("hypertrophy"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let p = params(SplitType::UpperLower, &["dumbbell", "machine"], 5);
        assert_eq!(fallback(&p), fallback(&p));
    }
}
