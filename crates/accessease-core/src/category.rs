//! Service categories offered by the visual assistant.
//!
//! Each category carries a fixed canned body (used in mock mode) and a prompt
//! instruction (used when the reply comes from the live endpoint).

/// Reply for an id that does not name a category.
pub const UNKNOWN_CATEGORY_REPLY: &str =
    "I'm here to help! Please select a category above to get specific information and resources.";

/// Live-mode instruction for an id that does not name a category.
pub const GENERAL_ASSISTANCE_PROMPT: &str = "Provide general assistance and support information.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Transportation,
    Documents,
    Emergency,
    Communication,
}

impl Category {
    pub fn all() -> [Category; 4] {
        [
            Category::Transportation,
            Category::Documents,
            Category::Emergency,
            Category::Communication,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::Documents => "documents",
            Category::Emergency => "emergency",
            Category::Communication => "communication",
        }
    }

    /// Exact id lookup; ids are lowercase.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Transportation => "Transportation",
            Category::Documents => "Documents",
            Category::Emergency => "Emergency",
            Category::Communication => "Communication",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Transportation => {
                "Public transit, ride services, and accessible transportation options"
            }
            Category::Documents => "Access and manage important documents and forms",
            Category::Emergency => "Emergency services and safety information",
            Category::Communication => "Communication tools and interpretation services",
        }
    }

    /// Canned multi-paragraph reply. Uses `**bold**` markers for headings.
    pub fn body(&self) -> &'static str {
        match self {
            Category::Transportation => TRANSPORTATION_BODY,
            Category::Documents => DOCUMENTS_BODY,
            Category::Emergency => EMERGENCY_BODY,
            Category::Communication => COMMUNICATION_BODY,
        }
    }

    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            Category::Transportation => "Provide helpful information about accessible transportation options, including public transit accessibility features, ride-sharing services, and tips for traveling with disabilities.",
            Category::Documents => "Explain how to access and manage important documents, including digital accessibility tools, document readers, and assistance programs for people with hearing impairments.",
            Category::Emergency => "Provide important emergency information and resources specifically for people who are deaf or hard of hearing, including text-based emergency services and visual alert systems.",
            Category::Communication => "Suggest communication tools and resources for deaf individuals, including video relay services, text-to-speech apps, and sign language interpretation services.",
        }
    }
}

/// Canned reply for a category id, or [`UNKNOWN_CATEGORY_REPLY`].
pub fn select_category_response(category_id: &str) -> &'static str {
    Category::from_id(category_id)
        .map(|c| c.body())
        .unwrap_or(UNKNOWN_CATEGORY_REPLY)
}

/// Prompt instruction for a category id, or [`GENERAL_ASSISTANCE_PROMPT`].
pub fn category_prompt(category_id: &str) -> &'static str {
    Category::from_id(category_id)
        .map(|c| c.prompt_instruction())
        .unwrap_or(GENERAL_ASSISTANCE_PROMPT)
}

const TRANSPORTATION_BODY: &str = "🚌 **Accessible Transportation Options**

**Public Transit:**
• Most buses and trains have visual displays for stops and announcements
• Many transit apps provide real-time updates with visual notifications
• Look for wheelchair accessible symbols and priority seating areas

**Ride Services:**
• Uber and Lyft offer in-app messaging with drivers
• You can add notes about communication preferences in your profile
• Both services have accessibility features and vehicle options

**Tips:**
• Download transit apps for your city for visual schedules
• Consider ride-sharing for door-to-door convenience
• Many airports offer visual paging systems and assistance services";

const DOCUMENTS_BODY: &str = "📄 **Document Access & Management**

**Digital Tools:**
• Use screen readers and document scanners for paper documents
• Cloud storage services (Google Drive, Dropbox) for easy access
• PDF readers with text-to-speech capabilities

**Accessibility Features:**
• High contrast mode for better document visibility
• Text size adjustment in most document viewers
• Voice-to-text software for document creation

**Support Services:**
• Many government offices provide sign language interpreters
• Document assistance programs available through disability services
• Online forms often have accessibility compliance features";

const EMERGENCY_BODY: &str = "🚨 **Emergency Resources & Safety**

**Text-Based Emergency Services:**
• Text 911 is available in many areas (check local availability)
• Emergency apps with location sharing and pre-written messages
• Medical alert systems with visual and vibrating notifications

**Visual Alert Systems:**
• Flashing light smoke detectors and carbon monoxide alarms
• Vibrating bed shakers for emergency alerts
• Smart home systems with visual notifications

**Important:**
• Register with local emergency services for communication preferences
• Keep emergency contact cards with communication needs noted
• Consider medical alert jewelry indicating hearing status";

const COMMUNICATION_BODY: &str = "💬 **Communication Tools & Services**

**Video Services:**
• Video Relay Service (VRS) for phone calls with hearing people
• Video Remote Interpreting (VRI) for on-demand interpretation
• FaceTime, Zoom, and other video platforms for direct communication

**Text & Messaging:**
• SMS and messaging apps for real-time communication
• Email for detailed conversations and documentation
• Live chat features on websites and customer service

**Assistive Technology:**
• Hearing loop systems in public venues
• FM systems for group conversations
• Speech-to-text apps for real-time conversation transcription";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_returns_its_body() {
        for category in Category::all() {
            assert_eq!(select_category_response(category.id()), category.body());
        }
        assert!(select_category_response("transportation")
            .starts_with("🚌 **Accessible Transportation Options**"));
        assert!(select_category_response("communication")
            .ends_with("Speech-to-text apps for real-time conversation transcription"));
    }

    #[test]
    fn test_unknown_category_returns_default() {
        assert_eq!(select_category_response("housing"), UNKNOWN_CATEGORY_REPLY);
        assert_eq!(select_category_response(""), UNKNOWN_CATEGORY_REPLY);
        // ids are case-sensitive
        assert_eq!(select_category_response("Emergency"), UNKNOWN_CATEGORY_REPLY);
    }

    #[test]
    fn test_category_response_is_stable() {
        let first = select_category_response("transportation");
        for _ in 0..50 {
            assert_eq!(select_category_response("transportation").as_bytes(), first.as_bytes());
        }
    }

    #[test]
    fn test_category_prompt_falls_back_to_general() {
        assert!(category_prompt("emergency").contains("deaf or hard of hearing"));
        assert_eq!(category_prompt("weather"), GENERAL_ASSISTANCE_PROMPT);
    }
}
