//! Prompt templates for the advisor.

use crate::store::SavedPlay;
use crate::types::{Play, PlayerType, RouteStyle};

const SUGGEST_PLAY_TEMPLATE: &str = "Given the opponent's football formation: {{opponentFormation}}, suggest an effective play and explain why it would be effective against this formation.  Provide both the name of the play and detailed rationale for its effectiveness in the response.";

const SUMMARIZE_PLAYBOOK_TEMPLATE: &str = "You are an expert football coach, skilled at quickly understanding playbooks.

Please provide a concise summary of the following playbook content, highlighting key plays and strategies.

Playbook Content: {{playbookContent}}";

/// Output contract appended to the suggestion prompt.
pub const SUGGEST_PLAY_OUTPUT: &str = r#"Respond with a JSON object of the form {"suggestedPlay": "<play name>", "rationale": "<why it works>"}."#;

/// Output contract appended to the summary prompt.
pub const SUMMARIZE_PLAYBOOK_OUTPUT: &str = r#"Respond with a JSON object of the form {"summary": "<summary>"}."#;

pub fn suggest_play_prompt(opponent_formation: &str) -> String {
    SUGGEST_PLAY_TEMPLATE.replace("{{opponentFormation}}", opponent_formation)
}

pub fn summarize_playbook_prompt(playbook_content: &str) -> String {
    SUMMARIZE_PLAYBOOK_TEMPLATE.replace("{{playbookContent}}", playbook_content)
}

/// Plain-text description of a playbook, one paragraph per play.
///
/// Plays whose diagram cannot be read are listed by name only.
pub fn describe_playbook(plays: &[SavedPlay]) -> String {
    plays
        .iter()
        .map(describe_play)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn describe_play(saved: &SavedPlay) -> String {
    let Ok(play) = Play::from_json(&saved.diagram) else {
        return format!("Play \"{}\"", saved.name);
    };

    let players: Vec<String> = PlayerType::ALL
        .iter()
        .filter_map(|player_type| {
            let count = play
                .players
                .iter()
                .filter(|p| p.player_type == *player_type)
                .count();
            let name = player_type.style().name.to_lowercase();
            (count > 0).then(|| format!("{count} {name}"))
        })
        .collect();
    let dashed = play
        .routes
        .iter()
        .filter(|r| r.style == RouteStyle::Dashed)
        .count();
    let solid = play.routes.len() - dashed;

    format!(
        "Play \"{}\": players: {}; routes: {} solid, {} dashed",
        saved.name,
        if players.is_empty() {
            "none".to_string()
        } else {
            players.join(", ")
        },
        solid,
        dashed
    )
}
