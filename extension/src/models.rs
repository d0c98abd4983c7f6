// Records persisted in chrome.storage.
// Field names are camelCase on the wire so the stored JSON stays readable
// from the extension's devtools console.

use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::error::ValidationError;

/// The user's own context, read by the compose assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: String,
    pub company: String,
    pub background: String,
    pub communication_style: String,
    pub tone_preference: String,
    pub common_signatures: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: String::new(),
            company: String::new(),
            background: String::new(),
            communication_style: String::new(),
            tone_preference: "professional".to_string(),
            common_signatures: Vec::new(),
        }
    }
}

impl UserProfile {
    pub fn add_signature(&mut self, raw: &str) -> bool {
        push_trimmed(&mut self.common_signatures, raw)
    }

    pub fn remove_signature(&mut self, index: usize) -> Option<String> {
        remove_at(&mut self.common_signatures, index)
    }

    /// Name used to sign generated drafts
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "Your Name"
        } else {
            name
        }
    }
}

pub const RELATIONSHIPS: &[&str] = &[
    "colleague",
    "client",
    "vendor",
    "manager",
    "partner",
    "other",
];

pub const COMMUNICATION_STYLES: &[&str] = &[
    "professional",
    "formal",
    "casual",
    "friendly",
    "direct",
    "detailed",
    "concise",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_communication: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Recipient {
    /// Blank recipient as opened by the "add" dialog
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            role: None,
            company: None,
            relationship: None,
            notes: None,
            preferred_communication: Some("professional".to_string()),
            topics: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ValidationError::RecipientIncomplete);
        }
        Ok(())
    }

    pub fn add_topic(&mut self, raw: &str) -> bool {
        push_trimmed(&mut self.topics, raw)
    }

    pub fn remove_topic(&mut self, index: usize) -> Option<String> {
        remove_at(&mut self.topics, index)
    }
}

pub const TEMPLATE_CATEGORIES: &[&str] = &[
    "general",
    "introduction",
    "followup",
    "request",
    "thankyou",
    "apology",
    "invitation",
];

/// Reusable message body. `content` may contain `{{token}}` placeholders;
/// they are stored verbatim and never substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_category() -> String {
    "general".to_string()
}

impl Template {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            category: default_category(),
            content: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ValidationError::TemplateIncomplete);
        }
        Ok(())
    }

    pub fn add_tag(&mut self, raw: &str) -> bool {
        push_trimmed(&mut self.tags, raw)
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        remove_at(&mut self.tags, index)
    }

    /// Unsaved copy under a fresh id
    pub fn duplicate(&self, new_id: impl Into<String>) -> Self {
        Self {
            id: new_id.into(),
            name: format!("{} (Copy)", self.name),
            ..self.clone()
        }
    }

    /// Category used for grouping; blank counts as "general"
    pub fn category_or_default(&self) -> &str {
        if self.category.trim().is_empty() {
            "general"
        } else {
            &self.category
        }
    }
}

/// Groups templates by category, categories in first-seen order.
pub fn group_by_category(templates: &[Template]) -> Vec<(String, Vec<Template>)> {
    let mut groups: Vec<(String, Vec<Template>)> = Vec::new();
    for template in templates {
        let category = template.category_or_default();
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, members)) => members.push(template.clone()),
            None => groups.push((category.to_string(), vec![template.clone()])),
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    #[default]
    OpenAi,
    Anthropic,
    Google,
}

impl ApiProvider {
    pub const ALL: [ApiProvider; 3] = [ApiProvider::OpenAi, ApiProvider::Anthropic, ApiProvider::Google];

    /// Models offered for this provider, first one is the default
    pub fn models(self) -> &'static [&'static str] {
        match self {
            ApiProvider::OpenAi => &["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"],
            ApiProvider::Anthropic => &["claude-3-opus", "claude-3-sonnet", "claude-3-haiku"],
            ApiProvider::Google => &["gemini-pro", "gemini-ultra"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApiProvider::OpenAi => "OpenAI",
            ApiProvider::Anthropic => "Anthropic (Claude)",
            ApiProvider::Google => "Google (Gemini)",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApiProvider::OpenAi => "openai",
            ApiProvider::Anthropic => "anthropic",
            ApiProvider::Google => "google",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

pub const MIN_MAX_TOKENS: u32 = 100;
pub const MAX_MAX_TOKENS: u32 = 4000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub api_provider: ApiProvider,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub auto_generate: bool,
    pub privacy_mode: bool,
    pub store_drafts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_provider: ApiProvider::OpenAi,
            model: "gpt-4".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            auto_generate: false,
            privacy_mode: true,
            store_drafts: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&self.max_tokens) {
            return Err(ValidationError::MaxTokensOutOfRange {
                value: self.max_tokens,
                min: MIN_MAX_TOKENS,
                max: MAX_MAX_TOKENS,
            });
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ValidationError::TemperatureOutOfRange(self.temperature));
        }
        Ok(())
    }

    /// Switch provider, falling back to its default model when the
    /// current one is not offered there
    pub fn set_provider(&mut self, provider: ApiProvider) {
        self.api_provider = provider;
        if !provider.models().contains(&self.model.as_str()) {
            self.model = provider.models()[0].to_string();
        }
    }

    /// Offline key check until a real provider round-trip exists
    pub fn api_key_plausible(&self) -> bool {
        self.api_key.trim().len() > 10
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInfo {
    /// Absent when Chrome did not report the version updated from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    pub current_version: String,
}

/// Flags the background worker leaves in local storage for the popup.
/// Each field is its own top-level storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeFlags {
    pub update_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    pub update_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_info: Option<UpdateInfo>,
}

/// `<prefix>_<unix millis>`, bumped until `taken` reports it free
pub fn new_record_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    loop {
        let id = format!("{}_{}", prefix, millis);
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

fn push_trimmed(list: &mut Vec<String>, raw: &str) -> bool {
    let value = raw.trim();
    if value.is_empty() {
        return false;
    }
    list.push(value.to_string());
    true
}

fn remove_at(list: &mut Vec<String>, index: usize) -> Option<String> {
    if index < list.len() {
        Some(list.remove(index))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_requires_name_and_email() {
        let mut recipient = Recipient::new("recipient_1");
        recipient.name = "Ana".to_string();
        recipient.email = "   ".to_string();
        assert_eq!(recipient.validate(), Err(ValidationError::RecipientIncomplete));

        recipient.email = "ana@x.com".to_string();
        assert!(recipient.validate().is_ok());
    }

    #[test]
    fn test_template_requires_name_and_content() {
        let mut template = Template::new("template_1");
        template.name = "Intro".to_string();
        assert_eq!(template.validate(), Err(ValidationError::TemplateIncomplete));

        template.content = "Hi {{recipient.name}}".to_string();
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_topics_append_and_remove_by_index() {
        let mut recipient = Recipient::new("recipient_1");
        assert!(recipient.add_topic(" budget "));
        assert!(recipient.add_topic("hiring"));
        assert!(recipient.add_topic("roadmap"));
        assert!(!recipient.add_topic("   "));
        assert_eq!(recipient.topics, vec!["budget", "hiring", "roadmap"]);

        assert_eq!(recipient.remove_topic(1).as_deref(), Some("hiring"));
        assert_eq!(recipient.topics, vec!["budget", "roadmap"]);

        assert_eq!(recipient.remove_topic(5), None);
        assert_eq!(recipient.topics, vec!["budget", "roadmap"]);
    }

    #[test]
    fn test_template_tags_and_signatures() {
        let mut template = Template::new("template_1");
        template.add_tag("formal");
        template.add_tag("business");
        template.remove_tag(0);
        assert_eq!(template.tags, vec!["business"]);

        let mut profile = UserProfile::default();
        profile.add_signature("Best,\nAna");
        profile.add_signature("Cheers");
        assert_eq!(profile.remove_signature(0).as_deref(), Some("Best,\nAna"));
        assert_eq!(profile.common_signatures, vec!["Cheers"]);
    }

    #[test]
    fn test_duplicate_template_gets_copy_suffix() {
        let mut template = Template::new("template_1");
        template.name = "Meeting Follow-up".to_string();
        template.tags = vec!["meeting".to_string()];

        let copy = template.duplicate("template_2");
        assert_eq!(copy.id, "template_2");
        assert_eq!(copy.name, "Meeting Follow-up (Copy)");
        assert_eq!(copy.tags, template.tags);
    }

    #[test]
    fn test_group_by_category_keeps_first_seen_order() {
        let mut a = Template::new("a");
        a.category = "followup".to_string();
        let mut b = Template::new("b");
        b.category = String::new();
        let mut c = Template::new("c");
        c.category = "followup".to_string();

        let groups = group_by_category(&[a, b, c]);
        let names: Vec<_> = groups.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["followup", "general"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_settings_ranges() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.max_tokens = 50;
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::MaxTokensOutOfRange { value: 50, .. })
        ));

        settings.max_tokens = 4000;
        settings.temperature = 1.5;
        assert_eq!(
            settings.validate(),
            Err(ValidationError::TemperatureOutOfRange(1.5))
        );
    }

    #[test]
    fn test_switching_provider_resets_unknown_model() {
        let mut settings = Settings::default();
        settings.set_provider(ApiProvider::Anthropic);
        assert_eq!(settings.model, "claude-3-opus");

        settings.model = "claude-3-haiku".to_string();
        settings.set_provider(ApiProvider::Anthropic);
        assert_eq!(settings.model, "claude-3-haiku");
    }

    #[test]
    fn test_settings_wire_format() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["apiProvider"], "openai");
        assert_eq!(json["maxTokens"], 2000);
        assert_eq!(json["privacyMode"], true);

        let parsed: Settings =
            serde_json::from_value(serde_json::json!({ "apiProvider": "google" })).unwrap();
        assert_eq!(parsed.api_provider, ApiProvider::Google);
        assert_eq!(parsed.max_tokens, 2000);
    }

    #[test]
    fn test_new_record_id_skips_taken() {
        let first = new_record_id("recipient", |_| false);
        assert!(first.starts_with("recipient_"));

        let taken = first.clone();
        let second = new_record_id("recipient", |id| id == taken);
        assert_ne!(first, second);
    }
}
