//! Directive text sent to the generation service.

use crate::{GenerationParams, SplitType};

/// JSON shape the service must answer with, quoted verbatim in every prompt
pub const SCHEMA_TEMPLATE: &str = r#"{
  "name": "Program name",
  "description": "Short program description",
  "daysPerWeek": 3,
  "workouts": [
    {
      "name": "Workout name",
      "dayNumber": 1,
      "focus": "Muscle groups trained",
      "exercises": [
        {
          "name": "Exercise name",
          "muscleGroup": "Primary muscle group",
          "sets": 3,
          "reps": "8-12",
          "restSeconds": 90,
          "notes": "Optional coaching cue"
        }
      ],
      "estimatedDuration": 60
    }
  ]
}"#;

fn split_description(params: &GenerationParams) -> String {
    match params.split_type {
        SplitType::PushPullLegs => {
            "Push/Pull/Legs (push = chest, shoulders, triceps; pull = back, biceps; legs = lower body)"
                .to_string()
        }
        SplitType::UpperLower => "Upper/Lower (alternate upper body and lower body days)".to_string(),
        SplitType::FullBody => "Full Body (train every major muscle group each session)".to_string(),
        SplitType::BroSplit => {
            "Body Part Split (one major muscle group per day: chest, back, legs, shoulders, arms)"
                .to_string()
        }
        SplitType::Custom => match params.custom_split.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => params.split_type.as_str().to_string(),
        },
    }
}

fn equipment_label(tag: &str) -> &str {
    match tag {
        "barbell" => "barbell",
        "dumbbell" => "dumbbells",
        "cable" => "cable machine",
        "machine" => "weight machines",
        "bodyweight" => "bodyweight only",
        "kettlebell" => "kettlebells",
        "bands" => "resistance bands",
        "pullup_bar" => "pull-up bar",
        "bench" => "adjustable bench",
        other => other,
    }
}

fn experience_description(params: &GenerationParams) -> &'static str {
    match params.experience {
        crate::Experience::Beginner => "beginner (less than 1 year of consistent training)",
        crate::Experience::Intermediate => "intermediate (1-3 years of consistent training)",
        crate::Experience::Advanced => "advanced (3+ years of consistent training)",
    }
}

/// Build the single directive prompt for a generation request
pub fn build_prompt(params: &GenerationParams) -> String {
    let equipment = params
        .equipment
        .iter()
        .map(|tag| equipment_label(tag))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "You are an experienced strength and conditioning coach. Create a {days}-day per week \
         workout program.\n\n\
         REQUIREMENTS:\n\
         - Training split: {split}\n\
         - Available equipment: {equipment}\n\
         - Session duration: {duration} minutes\n\
         - Experience level: {experience}\n\
         - Primary goal: {goal}\n",
        days = params.days_per_week,
        split = split_description(params),
        equipment = equipment,
        duration = params.duration,
        experience = experience_description(params),
        goal = params.goal.describe(),
    );

    if !params.focus_areas.is_empty() {
        let focus = params
            .focus_areas
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!("- Extra focus on: {}\n", focus));
    }

    prompt.push_str(&format!(
        "\nRULES:\n\
         - Return exactly {days} workouts with dayNumber 1 to {days}.\n\
         - Only use exercises possible with the available equipment.\n\
         - Each workout must fit in {duration} minutes including rest.\n\
         - reps is a string such as \"8-12\" or \"5\"; sets and restSeconds are integers.\n\n\
         Respond with ONLY a JSON object in exactly this format:\n{schema}\n",
        days = params.days_per_week,
        duration = params.duration,
        schema = SCHEMA_TEMPLATE,
    ));

    prompt
}
