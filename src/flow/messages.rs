//! Text the bot sends at each step of the flow.

use super::action::MenuOption;

/// Default booking link used when none is configured.
pub const DEFAULT_BOOKING_LINK: &str = "https://cal.com/your-booking-link";

/// Menu value for the human hand-off choice.
pub const CONNECT_AGENT: &str = "connect_agent";

/// Menu value for the self-service booking choice.
pub const BOOK_DEMO: &str = "book_demo";

/// Bot copy for every step. Only the booking link varies per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMessages {
    pub welcome: String,
    pub restart: String,
    pub ask_project: String,
    pub ask_framework: String,
    pub menu_prompt: String,
    pub menu_prompt_offline: String,
    pub handoff: String,
    pub booking: String,
    pub reprompt: String,
}

impl FlowMessages {
    pub fn with_booking_link(link: &str) -> Self {
        Self {
            welcome: "Hi! Welcome to our support. What is your name?".to_string(),
            restart: "Hi! What is your name?".to_string(),
            ask_project: "Great! What project do you want to deploy?".to_string(),
            ask_framework: "Interesting! What framework is it?".to_string(),
            menu_prompt: "How would you like to proceed?".to_string(),
            menu_prompt_offline:
                "Our team is currently offline. You can book a demo at your convenience:"
                    .to_string(),
            handoff:
                "Connecting you to our executive team. Someone will be with you shortly!"
                    .to_string(),
            booking: format!("Book your demo here: {link}"),
            reprompt: "Please select one of the options above.".to_string(),
        }
    }

    /// Prompt and options for the final menu. The hand-off choice is only
    /// offered while the team is available.
    pub fn menu(&self, within_business_hours: bool) -> (String, Vec<MenuOption>) {
        if within_business_hours {
            (
                self.menu_prompt.clone(),
                vec![
                    MenuOption::new("Talk to our Executive", CONNECT_AGENT),
                    MenuOption::new("Book a Demo", BOOK_DEMO),
                ],
            )
        } else {
            (
                self.menu_prompt_offline.clone(),
                vec![MenuOption::new("Book a Demo", BOOK_DEMO)],
            )
        }
    }
}

impl Default for FlowMessages {
    fn default() -> Self {
        Self::with_booking_link(DEFAULT_BOOKING_LINK)
    }
}
