use ashram_core::{
    non_empty, AshramResult, ChatRequest, ChatResponse, ClientInfo, CompassContent,
    CompassPayload, GuidanceTransport, VerseEntry,
};
use ashram_handoff::PrefillMailbox;
use tracing::{debug, error, info, warn};

use crate::{html, sections};

pub const MISSING_SITUATION: &str = "Please describe your situation or dilemma first.";
pub const GUIDANCE_UNAVAILABLE: &str = "Unable to fetch guidance from the Gita just now.";
pub const CONNECTION_PROBLEM: &str = "There was a problem connecting to the Gita Ashram server.";
pub const NO_GUIDANCE: &str = "Sorry, no guidance was returned from the Gita just now.";

/// Where the verse follow-up sends the user
pub const QNA_PAGE_PATH: &str = "/";

const UNNAMED_VERSE: &str = "this verse from the Bhagavad Gita";

/// Values of the decision-compass form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompassForm {
    pub situation: String,
    pub life_area: String,
    pub emotion: String,
    pub desired_outcome: String,
    pub constraints: String,
}

/// Everything a compass submission can end in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompassOutcome {
    /// Validation failed; no request was made
    Invalid(&'static str),
    ConnectionError,
    GuidanceUnavailable,
    Guidance(CompassView),
}

/// A successful response ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompassView {
    content: Option<CompassContent>,
    submitted_situation: String,
}

impl CompassView {
    pub fn new(content: Option<CompassContent>, submitted_situation: impl Into<String>) -> Self {
        Self {
            content,
            submitted_situation: submitted_situation.into(),
        }
    }

    pub fn content(&self) -> Option<&CompassContent> {
        self.content.as_ref()
    }

    pub fn verses(&self) -> &[VerseEntry] {
        self.content
            .as_ref()
            .map(|c| c.verses.as_slice())
            .unwrap_or_default()
    }

    /// The situation as echoed by the endpoint, else as submitted
    pub fn situation(&self) -> &str {
        self.content
            .as_ref()
            .and_then(|c| c.input_echo.as_ref())
            .and_then(|echo| non_empty(&echo.situation))
            .unwrap_or(self.submitted_situation.as_str())
    }

    /// Names of the sections the rendered HTML contains
    pub fn section_names(&self) -> Vec<&'static str> {
        self.content
            .as_ref()
            .map(|c| sections::render(c).1)
            .unwrap_or_default()
    }

    pub fn render(&self) -> String {
        match &self.content {
            Some(content) => sections::render(content).0,
            None => html::message(NO_GUIDANCE),
        }
    }

    /// Follow-up question for the verse at `index`
    pub fn followup_for(&self, index: usize) -> Option<String> {
        let verse = self.verses().get(index)?;
        Some(followup_question(
            non_empty(&verse.reference),
            self.situation(),
        ))
    }
}

/// Question asked on the Q&A page when a verse's follow-up control is used
pub fn followup_question(verse_ref: Option<&str>, situation: &str) -> String {
    format!(
        "Please explain {} in detail in the context of this situation: \"{}\". Focus on how its teaching can guide me practically in real life.",
        verse_ref.unwrap_or(UNNAMED_VERSE),
        situation
    )
}

pub fn validate(form: &CompassForm) -> Result<(), &'static str> {
    if form.situation.trim().is_empty() {
        Err(MISSING_SITUATION)
    } else {
        Ok(())
    }
}

pub fn build_request(form: &CompassForm, client: ClientInfo) -> ChatRequest {
    let payload = CompassPayload {
        situation: form.situation.clone(),
        life_area: form.life_area.clone(),
        emotion: form.emotion.clone(),
        desired_outcome: form.desired_outcome.clone(),
        constraints: form.constraints.clone(),
        // Not collected by the form
        title: String::new(),
        time_horizon: String::new(),
    };
    ChatRequest::decision_compass(payload, client)
}

/// Maps the transport result to an outcome. Failures are logged, never shown.
pub fn interpret(form: &CompassForm, result: AshramResult<ChatResponse>) -> CompassOutcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Error calling chat-gita endpoint: {}", e);
            return CompassOutcome::ConnectionError;
        }
    };

    if !response.success {
        debug!("Endpoint reported failure");
        return CompassOutcome::GuidanceUnavailable;
    }

    match response.content_as::<CompassContent>() {
        Ok(content) => CompassOutcome::Guidance(CompassView::new(content, form.situation.clone())),
        Err(e) => {
            warn!("Ignoring unusable compass content: {}", e);
            CompassOutcome::GuidanceUnavailable
        }
    }
}

/// Runs one submission from form values to outcome
pub async fn handle(
    form: &CompassForm,
    transport: &dyn GuidanceTransport,
    client: &ClientInfo,
) -> CompassOutcome {
    if let Err(message) = validate(form) {
        return CompassOutcome::Invalid(message);
    }

    let request = build_request(form, client.clone());
    let result = transport.send(&request).await;
    interpret(form, result)
}

/// Where a submission currently stands. `Error`, `Rendered`, `NetworkError`
/// and `LogicalError` are terminal; the next submission starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Error,
    Loading,
    Rendered,
    NetworkError,
    LogicalError,
}

/// Result of activating a verse's follow-up control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: &'static str,
    pub question: String,
}

/// The loading, error, result and placeholder regions of the compass page
#[derive(Debug, Clone)]
pub struct CompassPage {
    client: ClientInfo,
    state: SubmissionState,
    loading: bool,
    error: Option<String>,
    result_html: String,
    placeholder_visible: bool,
    view: Option<CompassView>,
    // Form of the submission in flight
    pending: Option<CompassForm>,
}

impl CompassPage {
    pub fn new(client: ClientInfo) -> Self {
        Self {
            client,
            state: SubmissionState::Idle,
            loading: false,
            error: None,
            result_html: String::new(),
            placeholder_visible: true,
            view: None,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result_html(&self) -> &str {
        &self.result_html
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    pub fn view(&self) -> Option<&CompassView> {
        self.view.as_ref()
    }

    /// Starts a submission: clears the error, validates and turns loading on.
    ///
    /// Returns the request to send, or `None` when validation failed.
    pub fn begin(&mut self, form: &CompassForm) -> Option<ChatRequest> {
        self.error = None;
        self.pending = None;
        self.state = SubmissionState::Validating;

        if let Err(message) = validate(form) {
            self.show_error(message, SubmissionState::Error);
            return None;
        }

        self.loading = true;
        self.state = SubmissionState::Loading;
        self.pending = Some(form.clone());
        Some(build_request(form, self.client.clone()))
    }

    /// Applies the reply to the submission started by `begin`
    pub fn finish(&mut self, result: AshramResult<ChatResponse>) -> SubmissionState {
        let Some(form) = self.pending.take() else {
            warn!("Reply arrived with no submission in flight");
            return self.state;
        };
        let outcome = interpret(&form, result);
        self.loading = false;

        match outcome {
            CompassOutcome::Invalid(message) => self.show_error(message, SubmissionState::Error),
            CompassOutcome::ConnectionError => {
                self.show_error(CONNECTION_PROBLEM, SubmissionState::NetworkError)
            }
            CompassOutcome::GuidanceUnavailable => {
                self.show_error(GUIDANCE_UNAVAILABLE, SubmissionState::LogicalError)
            }
            CompassOutcome::Guidance(view) => {
                self.result_html = view.render();
                // Stays hidden once real guidance has been shown
                if view.content().is_some() {
                    self.placeholder_visible = false;
                }
                self.view = Some(view);
                self.state = SubmissionState::Rendered;
            }
        }
        self.state
    }

    /// Submits the form and updates the page regions
    pub async fn submit(
        &mut self,
        form: &CompassForm,
        transport: &dyn GuidanceTransport,
    ) -> SubmissionState {
        let Some(request) = self.begin(form) else {
            return self.state;
        };
        let result = transport.send(&request).await;
        self.finish(result)
    }

    /// Activates the follow-up control of the verse at `index`.
    ///
    /// Stores the composed question for the Q&A page and returns where to go.
    /// `None` when nothing is rendered or the index is out of range.
    pub fn ask_deeper(&self, index: usize, mailbox: &dyn PrefillMailbox) -> Option<Navigation> {
        let question = self.view.as_ref()?.followup_for(index)?;

        if let Err(e) = mailbox.put(question.clone()) {
            warn!("Could not store prefill: {}", e);
        } else {
            info!("Stored follow-up question for verse {}", index);
        }

        Some(Navigation {
            target: QNA_PAGE_PATH,
            question,
        })
    }

    fn show_error(&mut self, message: &str, state: SubmissionState) {
        self.error = Some(message.to_string());
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashram_core::{AshramError, InputEcho};
    use serde_json::json;

    fn form(situation: &str) -> CompassForm {
        CompassForm {
            situation: situation.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_situation() {
        assert_eq!(validate(&form("")), Err(MISSING_SITUATION));
        assert_eq!(validate(&form("  \n ")), Err(MISSING_SITUATION));
        assert_eq!(validate(&form("Should I move?")), Ok(()));
    }

    #[test]
    fn test_build_request_defaults_optional_fields() {
        let mut values = form("Should I move?");
        values.emotion = "restless".to_string();
        let body = serde_json::to_value(build_request(&values, ClientInfo::default())).unwrap();

        assert_eq!(body["feature"], "decision_compass");
        assert_eq!(
            body["payload"],
            json!({
                "title": "",
                "situation": "Should I move?",
                "lifeArea": "",
                "emotion": "restless",
                "timeHorizon": "",
                "desiredOutcome": "",
                "constraints": ""
            })
        );
    }

    #[test]
    fn test_interpret_outcomes() {
        let values = form("x");

        let failed = Ok(ChatResponse {
            success: false,
            content: Some(json!({ "summary": "ignored" })),
        });
        assert_eq!(interpret(&values, failed), CompassOutcome::GuidanceUnavailable);

        let transport = Err(AshramError::RequestError("refused".to_string()));
        assert_eq!(interpret(&values, transport), CompassOutcome::ConnectionError);

        let empty = Ok(ChatResponse {
            success: true,
            content: None,
        });
        match interpret(&values, empty) {
            CompassOutcome::Guidance(view) => assert_eq!(view.render(), html::message(NO_GUIDANCE)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_followup_question_template() {
        assert_eq!(
            followup_question(Some("BG 2.47"), "X"),
            "Please explain BG 2.47 in detail in the context of this situation: \"X\". Focus on how its teaching can guide me practically in real life."
        );
        assert!(followup_question(None, "X").starts_with("Please explain this verse from the Bhagavad Gita in detail"));
    }

    #[test]
    fn test_followup_prefers_echoed_situation() {
        let content = CompassContent {
            input_echo: Some(InputEcho {
                situation: Some("echoed".to_string()),
                ..Default::default()
            }),
            verses: vec![VerseEntry::default()],
            ..Default::default()
        };
        let view = CompassView::new(Some(content.clone()), "submitted");
        assert_eq!(view.situation(), "echoed");

        let view = CompassView::new(
            Some(CompassContent {
                input_echo: None,
                ..content
            }),
            "submitted",
        );
        assert_eq!(view.situation(), "submitted");
        assert!(view.followup_for(0).unwrap().contains("\"submitted\""));
        assert_eq!(view.followup_for(1), None);
    }

    #[test]
    fn test_loading_between_begin_and_finish() {
        let mut page = CompassPage::new(ClientInfo::default());

        let request = page.begin(&form("Should I move?")).expect("request");
        assert_eq!(request.feature, ashram_core::Feature::DecisionCompass);
        assert!(page.is_loading());
        assert_eq!(page.state(), SubmissionState::Loading);
        assert!(page.placeholder_visible());

        let state = page.finish(Ok(ChatResponse {
            success: true,
            content: Some(json!({ "summary": "Stay a while." })),
        }));
        assert_eq!(state, SubmissionState::Rendered);
        assert!(!page.is_loading());
        assert!(!page.placeholder_visible());
    }

    #[test]
    fn test_invalid_form_never_loads() {
        let mut page = CompassPage::new(ClientInfo::default());
        assert_eq!(page.begin(&form("   ")), None);
        assert!(!page.is_loading());
        assert_eq!(page.state(), SubmissionState::Error);
        assert_eq!(page.error(), Some(MISSING_SITUATION));

        // A stray reply does not touch the page
        let state = page.finish(Err(AshramError::RequestError("late".to_string())));
        assert_eq!(state, SubmissionState::Error);
        assert_eq!(page.error(), Some(MISSING_SITUATION));
    }
}
