//! Prompt construction.

use tlens_models::PlayerProfile;

/// Build the scouting-report prompt from the profile and metric means.
///
/// The prompt requests six fixed sections so downstream consumers see a
/// consistent report structure regardless of the model's mood.
pub fn build_prompt(profile: &PlayerProfile, mean_speed: f64, mean_accuracy: f64) -> String {
    format!(
        r#"You are a professional football scout. Analyze the following player
performance data and write a detailed scouting report.

PLAYER PROFILE:
- Name: {name}
- Age: {age}
- Position: {position}
- Height: {height:.0} cm
- Weight: {weight:.0} kg
- Team: {team}

PERFORMANCE DATA (from video analysis):
- Average Speed: {speed:.2} km/h
- Passing Accuracy: {accuracy:.2}%

Structure the report with exactly these six sections:
1. Profile Summary
2. Performance Analysis
3. Strengths
4. Weaknesses
5. Position-Specific Recommendations
6. Overall Potential

Write in plain prose. Do not use markdown formatting.
"#,
        name = profile.name,
        age = profile.age,
        position = profile.position.label(),
        height = profile.height_cm,
        weight = profile.weight_kg,
        team = if profile.team.is_empty() {
            "(unaffiliated)"
        } else {
            &profile.team
        },
        speed = mean_speed,
        accuracy = mean_accuracy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlens_models::Position;

    fn sample_profile() -> PlayerProfile {
        PlayerProfile {
            name: "Ada Striker".to_string(),
            age: 21,
            position: Position::Forward,
            height_cm: 168.0,
            weight_kg: 60.0,
            team: "Demo FC".to_string(),
        }
    }

    #[test]
    fn test_prompt_contains_metrics_and_profile() {
        let prompt = build_prompt(&sample_profile(), 12.345, 84.5);
        assert!(prompt.contains("Ada Striker"));
        assert!(prompt.contains("Forward"));
        assert!(prompt.contains("12.35 km/h"));
        assert!(prompt.contains("84.50%"));
    }

    #[test]
    fn test_prompt_requests_six_sections() {
        let prompt = build_prompt(&sample_profile(), 0.0, 0.0);
        for section in [
            "Profile Summary",
            "Performance Analysis",
            "Strengths",
            "Weaknesses",
            "Position-Specific Recommendations",
            "Overall Potential",
        ] {
            assert!(prompt.contains(section), "missing section: {section}");
        }
    }

    #[test]
    fn test_prompt_handles_empty_team() {
        let mut profile = sample_profile();
        profile.team = String::new();
        let prompt = build_prompt(&profile, 0.0, 0.0);
        assert!(prompt.contains("(unaffiliated)"));
    }
}
