//! Roster of everyone who joined the event.

use egui::RichText;

use crate::models::participant::Participant;

pub fn render_participant_list(
    ui: &mut egui::Ui,
    participants: &[Participant],
    current_participant_id: Option<&str>,
) {
    ui.label(RichText::new(format!("Uczestnicy ({})", participants.len())).strong());
    ui.add_space(4.0);

    if participants.is_empty() {
        ui.label("Nikt jeszcze nie dołączył.");
        return;
    }

    for participant in participants {
        let is_current = current_participant_id == Some(participant.id.as_str());
        let label = if is_current {
            format!("• {} (Ty)", participant.name)
        } else {
            format!("• {}", participant.name)
        };

        if is_current {
            ui.label(RichText::new(label).strong());
        } else {
            ui.label(label);
        }
    }
}
