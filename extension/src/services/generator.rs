// Draft generation capability used by the compose assistant.
// Only the placeholder exists so far; a provider-backed generator plugs in
// behind the same trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::UserProfile;

#[derive(Debug, Clone, PartialEq)]
pub struct DraftRequest {
    pub prompt: String,
    pub profile: UserProfile,
}

#[async_trait(?Send)]
pub trait DraftGenerator {
    /// Returns the draft body as HTML
    async fn generate(&self, request: &DraftRequest) -> Result<String>;
}

#[async_trait(?Send)]
impl<F> DraftGenerator for F
where
    F: Fn(&DraftRequest) -> Result<String>,
{
    async fn generate(&self, request: &DraftRequest) -> Result<String> {
        self(request)
    }
}

/// Canned draft echoing the prompt, signed with the profile name
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGenerator;

#[async_trait(?Send)]
impl DraftGenerator for PlaceholderGenerator {
    async fn generate(&self, request: &DraftRequest) -> Result<String> {
        Ok(format!(
            "<p>Dear Recipient,</p>\
             <p>This is a placeholder for the generated email based on your prompt: \"{}\"</p>\
             <p>Best regards,<br>{}</p>",
            html_escape::encode_text(request.prompt.trim()),
            html_escape::encode_text(request.profile.display_name()),
        ))
    }
}

/// Waits `delay_ms` before delegating, standing in for model latency
#[cfg(target_arch = "wasm32")]
pub struct Delayed<G> {
    inner: G,
    delay_ms: u32,
}

#[cfg(target_arch = "wasm32")]
impl<G> Delayed<G> {
    pub fn new(inner: G, delay_ms: u32) -> Self {
        Self { inner, delay_ms }
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl<G: DraftGenerator> DraftGenerator for Delayed<G> {
    async fn generate(&self, request: &DraftRequest) -> Result<String> {
        gloo_timers::future::TimeoutFuture::new(self.delay_ms).await;
        self.inner.generate(request).await
    }
}
