//! User-facing messages shown after moderation.
//!
//! - [`crisis_resources`] for submissions flagged as urgent
//! - [`rejection_message`] for refused submissions

use serde::Serialize;

use crate::moderation::SubmissionType;

/// How to reach a crisis resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Contact {
    /// Phone number or texting instructions.
    Phone(&'static str),
    /// Website.
    Url(&'static str),
}

/// A single crisis support service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrisisResource {
    pub name: &'static str,
    #[serde(flatten)]
    pub contact: Contact,
    pub description: &'static str,
}

/// Crisis support shown to a submitter whose text was flagged as urgent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBundle {
    pub message: &'static str,
    pub resources: Vec<CrisisResource>,
    pub closing_message: &'static str,
}

const RESOURCES_MESSAGE: &str = "We're concerned about your wellbeing. If you're in crisis or \
     experiencing thoughts of self-harm, please reach out to these resources immediately:";

const RESOURCES_CLOSING: &str = "Your message has been received and will be reviewed. \
     Please know that you are not alone, and help is available.";

const TRIBUTE_GUIDELINES: &str = "Our memorial wall is a sacred space for honoring loved ones. \
     Please ensure your tribute is respectful, compassionate, and free from hate speech, \
     slurs, or harassment.";

const WHISPER_GUIDELINES: &str = "Whispers of the Veil is a space for reflection and healing. \
     We cannot accept content containing hate speech, slurs, or harassment.";

/// Returns the fixed crisis resource bundle.
pub fn crisis_resources() -> ResourceBundle {
    ResourceBundle {
        message: RESOURCES_MESSAGE,
        resources: vec![
            CrisisResource {
                name: "National Suicide Prevention Lifeline",
                contact: Contact::Phone("988"),
                description: "24/7 crisis support in English and Spanish",
            },
            CrisisResource {
                name: "Crisis Text Line",
                contact: Contact::Phone("Text HOME to 741741"),
                description: "24/7 crisis support via text",
            },
            CrisisResource {
                name: "International Association for Suicide Prevention",
                contact: Contact::Url("https://www.iasp.info/resources/Crisis_Centres/"),
                description: "Find crisis centers worldwide",
            },
            CrisisResource {
                name: "Emergency Services",
                contact: Contact::Phone("911 (US) or your local emergency number"),
                description: "For immediate danger",
            },
        ],
        closing_message: RESOURCES_CLOSING,
    }
}

/// Rejection payload returned to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionInfo {
    pub rejected: bool,
    pub message: String,
    pub reason: String,
    pub guidelines: &'static str,
    pub can_resubmit: bool,
}

/// Builds the rejection payload for a refused submission.
///
/// `reason` is echoed back unchanged.
pub fn rejection_message(reason: &str, submission_type: SubmissionType) -> RejectionInfo {
    let guidelines = match submission_type {
        SubmissionType::Tribute => TRIBUTE_GUIDELINES,
        SubmissionType::Whisper => WHISPER_GUIDELINES,
    };

    RejectionInfo {
        rejected: true,
        message: format!("Your {} could not be accepted.", submission_type.as_str()),
        reason: reason.to_string(),
        guidelines,
        can_resubmit: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundle_has_four_resources_in_order() {
        let bundle = crisis_resources();
        let names: Vec<_> = bundle.resources.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "National Suicide Prevention Lifeline",
                "Crisis Text Line",
                "International Association for Suicide Prevention",
                "Emergency Services",
            ]
        );
    }

    #[test]
    fn bundle_is_constant() {
        assert_eq!(crisis_resources(), crisis_resources());
        assert!(crisis_resources().message.starts_with("We're concerned"));
        assert!(crisis_resources().closing_message.contains("you are not alone"));
    }

    #[test]
    fn resources_serialize_with_phone_or_url() {
        let value = serde_json::to_value(crisis_resources()).unwrap();
        assert_eq!(
            value["resources"][0],
            json!({
                "name": "National Suicide Prevention Lifeline",
                "phone": "988",
                "description": "24/7 crisis support in English and Spanish"
            })
        );
        assert_eq!(
            value["resources"][2]["url"],
            "https://www.iasp.info/resources/Crisis_Centres/"
        );
        assert!(value["resources"][2].get("phone").is_none());
        assert!(value["closingMessage"].is_string());
    }

    #[test]
    fn rejection_echoes_reason() {
        let info = rejection_message("custom reason", SubmissionType::Whisper);
        assert!(info.rejected);
        assert!(info.can_resubmit);
        assert_eq!(info.reason, "custom reason");
        assert_eq!(info.message, "Your whisper could not be accepted.");
        assert_eq!(info.guidelines, WHISPER_GUIDELINES);
    }

    #[test]
    fn rejection_differs_by_type_only_in_label_and_guidelines() {
        let reason = "Offensive language, hate speech, or slurs detected";
        let whisper = rejection_message(reason, SubmissionType::Whisper);
        let tribute = rejection_message(reason, SubmissionType::Tribute);

        assert_eq!(tribute.message, "Your tribute could not be accepted.");
        assert_eq!(tribute.guidelines, TRIBUTE_GUIDELINES);
        assert_ne!(whisper.guidelines, tribute.guidelines);
        assert_eq!(whisper.reason, tribute.reason);
        assert_eq!(whisper.rejected, tribute.rejected);
        assert_eq!(whisper.can_resubmit, tribute.can_resubmit);
    }

    #[test]
    fn rejection_serializes_camel_case() {
        let value = serde_json::to_value(rejection_message("r", SubmissionType::Tribute)).unwrap();
        assert_eq!(value["canResubmit"], true);
        assert_eq!(value["rejected"], true);
    }
}
