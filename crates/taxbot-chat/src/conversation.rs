//! Conversation state: capture context, message log, and the pending flag.

use taxbot_client::{TaxRequest, TaxTransport};

use crate::machine::{self, Context, ConversationState, GREETING, Step};
use crate::message::{Message, MessageLog};

/// What happened to a submitted input
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Blank input, nothing recorded
    Ignored,
    /// A calculation is in flight; input refused
    Busy,
    /// The bot answered immediately
    Replied,
    /// The request must be sent, then passed to [`Conversation::resolve`]
    Pending(TaxRequest),
}

/// Everything the widget owns: the capture context, the message log, and
/// whether a calculation is in flight.
#[derive(Debug, Clone)]
pub struct Conversation {
    context: Context,
    log: MessageLog,
    loading: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Start a conversation with the greeting already in the log
    pub fn new() -> Self {
        let mut log = MessageLog::new();
        log.push(Message::bot(GREETING));
        Self {
            context: Context::new(),
            log,
            loading: false,
        }
    }

    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn state(&self) -> ConversationState {
        self.context.state()
    }

    /// Whether a calculation is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record the user's input and advance the machine.
    ///
    /// On [`Submission::Pending`] the caller owns the network call and must
    /// hand its result to [`Conversation::resolve`].
    pub fn submit(&mut self, input: &str) -> Submission {
        if self.loading {
            return Submission::Busy;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Submission::Ignored;
        }

        self.log.push(Message::user(input));

        match machine::transition(&self.context, trimmed) {
            Step::Reply { context, text } => {
                self.context = context;
                self.log.push(Message::bot(text));
                Submission::Replied
            }
            Step::Calculate { context, request } => {
                self.context = context;
                self.loading = true;
                Submission::Pending(request)
            }
        }
    }

    /// Apply the outcome of the in-flight calculation
    pub fn resolve(&mut self, result: taxbot_client::Result<String>) {
        if !self.loading {
            tracing::debug!("no calculation pending, ignoring result");
            return;
        }

        let (context, reply) = machine::complete(std::mem::take(&mut self.context), result);
        self.context = context;
        self.log.push(Message::bot(reply));
        self.loading = false;
    }

    /// Submit, run the calculation through `transport` if needed, and resolve
    pub async fn send<T>(&mut self, transport: &T, input: &str) -> Submission
    where
        T: TaxTransport + ?Sized,
    {
        let submission = self.submit(input);
        if let Submission::Pending(request) = &submission {
            let result = transport.calculate(request).await;
            self.resolve(result);
        }
        submission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{ASK_COUNTRY, INVALID_INCOME, RESTART};
    use crate::message::Sender;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use taxbot_client::{Error, StatusCode};

    /// Replays canned results and remembers every request it saw.
    struct MockTransport {
        responses: Mutex<Vec<taxbot_client::Result<String>>>,
        requests: Mutex<Vec<TaxRequest>>,
    }

    impl MockTransport {
        fn new(responses: Vec<taxbot_client::Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<TaxRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaxTransport for MockTransport {
        async fn calculate(&self, request: &TaxRequest) -> taxbot_client::Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok("done".to_string())
            } else {
                responses.remove(0)
            }
        }
    }

    fn last_text(conversation: &Conversation) -> &str {
        conversation.messages().last().map(Message::text).unwrap()
    }

    #[test]
    fn test_starts_with_greeting() {
        let conversation = Conversation::new();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(last_text(&conversation), GREETING);
        assert_eq!(conversation.state(), ConversationState::AwaitingIncome);
        assert!(!conversation.is_loading());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.submit("   "), Submission::Ignored);
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn test_invalid_income_appends_user_and_reprompt() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.submit("lots"), Submission::Replied);

        let log = conversation.messages().as_slice();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1], Message::user("lots"));
        assert_eq!(log[2], Message::bot(INVALID_INCOME));
        assert_eq!(conversation.state(), ConversationState::AwaitingIncome);
    }

    #[test]
    fn test_user_text_is_recorded_as_typed() {
        let mut conversation = Conversation::new();
        conversation.submit("  50000 ");
        assert_eq!(conversation.messages().as_slice()[1].text(), "  50000 ");
        assert_eq!(conversation.context().income(), Some(50000.0));
    }

    #[test]
    fn test_country_submission_is_pending_until_resolved() {
        let mut conversation = Conversation::new();
        conversation.submit("50000");
        let before = conversation.messages().len();

        let submission = conversation.submit(" NG ");
        assert_eq!(submission, Submission::Pending(TaxRequest::new(50000.0, "ng")));
        assert!(conversation.is_loading());
        assert_eq!(conversation.messages().len(), before + 1);
        assert_eq!(conversation.submit("again"), Submission::Busy);
        assert_eq!(conversation.messages().len(), before + 1);

        conversation.resolve(Ok("No tax due".to_string()));
        assert!(!conversation.is_loading());
        assert_eq!(conversation.messages().len(), before + 2);
        assert_eq!(last_text(&conversation), "No tax due");
        assert_eq!(conversation.context(), &Context::new());
    }

    #[test]
    fn test_resolve_without_pending_is_noop() {
        let mut conversation = Conversation::new();
        conversation.resolve(Ok("stray".to_string()));
        assert_eq!(conversation.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_full_round_trip() {
        let transport = MockTransport::new(vec![Ok(
            r#"{"taxAmount":1200,"classification":"middle"}"#.to_string(),
        )]);
        let mut conversation = Conversation::new();

        conversation.send(&transport, "50000").await;
        assert_eq!(last_text(&conversation), ASK_COUNTRY);

        conversation.send(&transport, " NG ").await;
        assert_eq!(
            last_text(&conversation),
            "Your estimated tax is $1200. Classification: middle. Would you like to calculate again?"
        );
        assert_eq!(transport.requests(), vec![TaxRequest::new(50000.0, "ng")]);
        assert_eq!(conversation.messages().len(), 5);
        assert_eq!(conversation.state(), ConversationState::AwaitingIncome);

        // next input is a fresh income
        conversation.send(&transport, "20000").await;
        assert_eq!(last_text(&conversation), ASK_COUNTRY);
        assert_eq!(conversation.context().income(), Some(20000.0));
    }

    #[tokio::test]
    async fn test_each_submission_adds_user_then_bot() {
        let transport = MockTransport::new(vec![]);
        let mut conversation = Conversation::new();

        for input in ["nope", "100", "us", "100"] {
            let before = conversation.messages().len();
            conversation.send(&transport, input).await;
            let log = conversation.messages().as_slice();
            assert_eq!(log.len(), before + 2, "input {:?}", input);
            assert_eq!(log[before].sender(), Sender::User);
            assert_eq!(log[before + 1].sender(), Sender::Bot);
        }
    }

    #[tokio::test]
    async fn test_transport_error_keeps_context_then_restarts() {
        let transport = MockTransport::new(vec![Err(Error::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
        })]);
        let mut conversation = Conversation::new();

        conversation.send(&transport, "50000").await;
        conversation.send(&transport, "uk").await;

        assert!(last_text(&conversation).starts_with("Error: "));
        assert!(!conversation.is_loading());
        assert_eq!(conversation.state(), ConversationState::Idle);
        assert_eq!(conversation.context().country(), Some("uk"));

        conversation.send(&transport, "60000").await;
        assert_eq!(last_text(&conversation), RESTART);
        assert_eq!(conversation.context(), &Context::new());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_one_request_per_completed_pair() {
        let transport = MockTransport::new(vec![]);
        let mut conversation = Conversation::new();

        conversation.send(&transport, "x").await;
        conversation.send(&transport, "10").await;
        assert!(transport.requests().is_empty());

        conversation.send(&transport, "CA").await;
        assert_eq!(transport.requests(), vec![TaxRequest::new(10.0, "ca")]);
    }
}
