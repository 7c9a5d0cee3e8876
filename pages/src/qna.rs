use ashram_core::{AshramResult, ChatRequest, ChatResponse, ClientInfo, GuidanceTransport, QnaContent};
use ashram_handoff::PrefillMailbox;
use tracing::{debug, error, info, warn};

use crate::html;

pub const EMPTY_QUESTION: &str = "Please enter a question.";
pub const WAITING: &str = "Reflecting on your question...";
pub const CONNECTION_PROBLEM: &str = "There was a problem connecting to the Gita Ashram server.";
pub const UNAVAILABLE: &str =
    "Sorry, guidance from the Gita is unavailable just now. Please try again later.";
pub const NO_ANSWER: &str = "No answer was returned for this question.";

/// Everything a Q&A submission can end in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QnaOutcome {
    /// Nothing to ask; no request was made
    MissingQuestion,
    Answered { question: String, answer: String },
    /// The endpoint replied but reported failure or sent no content
    Unavailable,
    /// Transport failure or non-2xx status
    ConnectionProblem,
}

impl QnaOutcome {
    /// HTML that replaces the whole output region
    pub fn to_html(&self) -> String {
        match self {
            QnaOutcome::MissingQuestion => html::message(EMPTY_QUESTION),
            QnaOutcome::Unavailable => html::message(UNAVAILABLE),
            QnaOutcome::ConnectionProblem => html::message(CONNECTION_PROBLEM),
            QnaOutcome::Answered { question, answer } => format!(
                "<div class=\"gita-qa-answer\" style=\"background:white;padding:1rem;border-radius:8px;border:1px solid #f0c38e;\">\n\
                 <p><strong>Your question:</strong> {}</p>\n\
                 <hr>\n\
                 <p><strong>Gita Reflection:</strong></p>\n\
                 <p>{}</p>\n\
                 </div>",
                html::escape(question),
                html::multiline(answer)
            ),
        }
    }
}

/// HTML shown while a request is in flight
pub fn waiting_html() -> String {
    html::message(WAITING)
}

/// Trimmed question, or `None` when there is nothing to ask
pub fn validate(raw: &str) -> Option<&str> {
    let question = raw.trim();
    (!question.is_empty()).then_some(question)
}

pub fn build_request(question: &str, client: ClientInfo) -> ChatRequest {
    ChatRequest::qna(question, client)
}

/// Maps the transport result for `question` to an outcome. Failures are logged, never shown.
pub fn interpret(question: &str, result: AshramResult<ChatResponse>) -> QnaOutcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Error calling chat-gita endpoint: {}", e);
            return QnaOutcome::ConnectionProblem;
        }
    };

    if !response.success {
        debug!("Endpoint reported failure");
        return QnaOutcome::Unavailable;
    }

    match response.content_as::<QnaContent>() {
        Ok(Some(content)) => QnaOutcome::Answered {
            question: question.to_string(),
            answer: content.resolved_text().unwrap_or(NO_ANSWER).to_string(),
        },
        Ok(None) => QnaOutcome::Unavailable,
        Err(e) => {
            warn!("Ignoring unusable Q&A content: {}", e);
            QnaOutcome::Unavailable
        }
    }
}

/// Runs one submission from raw input to outcome
pub async fn handle(
    raw: &str,
    transport: &dyn GuidanceTransport,
    client: &ClientInfo,
) -> QnaOutcome {
    let Some(question) = validate(raw) else {
        return QnaOutcome::MissingQuestion;
    };

    let request = build_request(question, client.clone());
    let result = transport.send(&request).await;
    interpret(question, result)
}

/// The question input and output region of the Q&A page
#[derive(Debug, Clone)]
pub struct QnaPage {
    client: ClientInfo,
    question: String,
    output: String,
    // Trimmed question of the submission in flight
    pending: Option<String>,
}

impl QnaPage {
    pub fn new(client: ClientInfo) -> Self {
        Self {
            client,
            question: String::new(),
            output: String::new(),
            pending: None,
        }
    }

    /// Opens the page, moving any pending prefill into the question input.
    ///
    /// The mailbox is emptied by this call; a store failure leaves the input blank.
    pub fn load(client: ClientInfo, mailbox: &dyn PrefillMailbox) -> Self {
        let mut page = Self::new(client);
        match mailbox.take_once() {
            Ok(Some(prefill)) => {
                info!("Prefilling question from handoff");
                page.question = prefill;
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read prefill: {}", e),
        }
        page
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    /// Current contents of the output region
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Whether a submission is waiting for its reply
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a submission of the current question.
    ///
    /// Shows the waiting message and returns the request to send, or shows the
    /// empty-question message and returns `None`.
    pub fn begin(&mut self) -> Option<ChatRequest> {
        let Some(question) = validate(&self.question).map(str::to_string) else {
            self.pending = None;
            self.output = QnaOutcome::MissingQuestion.to_html();
            return None;
        };

        self.output = waiting_html();
        let request = build_request(&question, self.client.clone());
        self.pending = Some(question);
        Some(request)
    }

    /// Applies the reply to the submission started by `begin`
    pub fn finish(&mut self, result: AshramResult<ChatResponse>) -> QnaOutcome {
        let outcome = match self.pending.take() {
            Some(question) => interpret(&question, result),
            None => {
                warn!("Reply arrived with no submission in flight");
                QnaOutcome::MissingQuestion
            }
        };
        self.output = outcome.to_html();
        outcome
    }

    /// Submits the current question and replaces the output region with the result
    pub async fn submit(&mut self, transport: &dyn GuidanceTransport) -> QnaOutcome {
        let Some(request) = self.begin() else {
            return QnaOutcome::MissingQuestion;
        };
        let result = transport.send(&request).await;
        self.finish(result)
    }
}
