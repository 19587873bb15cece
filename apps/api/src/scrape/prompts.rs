// Refinement message format.
// The assistant's instructions (persona, output schema) live with the assistant
// configuration on the model service; only the labeled input block is sent.

pub const REFINE_MESSAGE_TEMPLATE: &str = "Job Title: {title}\n\
Company: {company}\n\
Location: {location}\n\
Requirements: {requirements}";

/// Builds the single user message for a refinement thread.
pub fn build_refine_message(
    title: &str,
    company: &str,
    location: &str,
    requirements: &str,
    user: Option<&str>,
) -> String {
    let mut message = REFINE_MESSAGE_TEMPLATE
        .replace("{title}", title)
        .replace("{company}", company)
        .replace("{location}", location)
        .replace("{requirements}", requirements);
    if let Some(user) = user.map(str::trim).filter(|u| !u.is_empty()) {
        message.push_str("\nUser: ");
        message.push_str(user);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_labels_fields_on_separate_lines() {
        let message = build_refine_message("Engineer", "Acme", "Remote", "Rust", None);
        assert_eq!(
            message,
            "Job Title: Engineer\nCompany: Acme\nLocation: Remote\nRequirements: Rust"
        );
    }

    #[test]
    fn test_message_appends_user_note() {
        let message = build_refine_message("Engineer", "Acme", "", "Rust", Some("prefers remote"));
        assert!(message.ends_with("\nUser: prefers remote"));
        assert!(message.contains("Location: \n"));
    }

    #[test]
    fn test_blank_user_note_is_ignored() {
        let message = build_refine_message("Engineer", "Acme", "Remote", "Rust", Some("  "));
        assert!(!message.contains("User:"));
    }
}
