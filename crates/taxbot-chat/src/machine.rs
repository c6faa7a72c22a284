//! Two-question conversation state machine
//!
//! The bot asks for an annual income, then a country, then hands the pair to
//! the transport. Which question comes next is decided entirely by the
//! [`Context`]; [`transition`] is pure and never touches the network.

use taxbot_client::{TaxRequest, interpret};

/// Opening line of every conversation
pub const GREETING: &str = "Hello! I can help you calculate your tax. What's your annual income?";
/// Re-prompt for an unusable income
pub const INVALID_INCOME: &str = "Please enter a valid income amount (a number greater than 0).";
/// Asked once a valid income is stored
pub const ASK_COUNTRY: &str = "Got it! Now, please tell me your country (e.g., US, UK, NG, CA).";
/// Reply when both answers are already held
pub const RESTART: &str = "Let's start again. What's your annual income?";

/// Capture state for the two answers.
///
/// `country` is only ever set after `income`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    income: Option<f64>,
    country: Option<String>,
}

/// Which question the next input answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    AwaitingIncome,
    AwaitingCountry,
    /// Both answers held. Only reachable when a calculation failed.
    Idle,
}

impl Context {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn income(&self) -> Option<f64> {
        self.income
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn state(&self) -> ConversationState {
        match (self.income, &self.country) {
            (None, _) => ConversationState::AwaitingIncome,
            (Some(_), None) => ConversationState::AwaitingCountry,
            (Some(_), Some(_)) => ConversationState::Idle,
        }
    }

    fn with_income(income: f64) -> Self {
        Self {
            income: Some(income),
            country: None,
        }
    }

    fn with_country(&self, country: String) -> Self {
        Self {
            income: self.income,
            country: Some(country),
        }
    }
}

/// Outcome of feeding one input to the machine
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Answer locally with `text`
    Reply { context: Context, text: String },
    /// Both answers collected; the request must be sent before replying
    Calculate {
        context: Context,
        request: TaxRequest,
    },
}

/// Decide the next step for a trimmed user input
pub fn transition(context: &Context, input: &str) -> Step {
    let state = context.state();
    tracing::debug!(?state, input, "conversation transition");

    match (state, context.income) {
        (ConversationState::AwaitingIncome, _) => match parse_income(input) {
            Some(income) => Step::Reply {
                context: Context::with_income(income),
                text: ASK_COUNTRY.to_string(),
            },
            None => Step::Reply {
                context: context.clone(),
                text: INVALID_INCOME.to_string(),
            },
        },
        (ConversationState::AwaitingCountry, Some(income)) => {
            let country = input.trim().to_lowercase();
            Step::Calculate {
                context: context.with_country(country.clone()),
                request: TaxRequest::new(income, country),
            }
        }
        _ => Step::Reply {
            context: Context::new(),
            text: RESTART.to_string(),
        },
    }
}

/// Fold a finished calculation back into the context.
///
/// Success clears the context. A failed request keeps it as is, so the
/// following input lands on the restart prompt.
pub fn complete(context: Context, result: taxbot_client::Result<String>) -> (Context, String) {
    match result {
        Ok(body) => (Context::new(), interpret(&body).into_reply()),
        Err(e) => {
            tracing::warn!(error = %e, "tax calculation failed");
            (context, format!("Error: {}", e))
        }
    }
}

/// Parse an income answer. Returns `None` unless the value is finite and > 0.
///
/// Only the leading numeric part is read, so `"50000 naira"` is 50000.
pub fn parse_income(input: &str) -> Option<f64> {
    let value = leading_number(input.trim())?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxbot_client::{Error, StatusCode};

    fn awaiting_country(income: f64) -> Context {
        Context::with_income(income)
    }

    #[test]
    fn test_new_context_awaits_income() {
        assert_eq!(Context::new().state(), ConversationState::AwaitingIncome);
    }

    #[test]
    fn test_invalid_income_reprompts_without_change() {
        for input in ["abc", "0", "-5", "", "-0.0", "inf", "NaN", "1e400", ".", "+"] {
            match transition(&Context::new(), input) {
                Step::Reply { context, text } => {
                    assert_eq!(context, Context::new(), "input {:?}", input);
                    assert_eq!(text, INVALID_INCOME, "input {:?}", input);
                }
                other => panic!("unexpected step for {:?}: {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_valid_income_moves_to_country() {
        match transition(&Context::new(), "50000") {
            Step::Reply { context, text } => {
                assert_eq!(context.income(), Some(50000.0));
                assert_eq!(context.country(), None);
                assert_eq!(context.state(), ConversationState::AwaitingCountry);
                assert_eq!(text, ASK_COUNTRY);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_country_is_trimmed_and_lowercased() {
        match transition(&awaiting_country(50000.0), " NG ") {
            Step::Calculate { context, request } => {
                assert_eq!(request, TaxRequest::new(50000.0, "ng"));
                assert_eq!(context.country(), Some("ng"));
                assert_eq!(context.state(), ConversationState::Idle);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_idle_context_restarts() {
        let idle = awaiting_country(1000.0).with_country("us".into());
        match transition(&idle, "anything") {
            Step::Reply { context, text } => {
                assert_eq!(context, Context::new());
                assert_eq!(text, RESTART);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_complete_success_resets_context() {
        let context = awaiting_country(50000.0).with_country("ng".into());
        let (context, reply) = complete(
            context,
            Ok(r#"{"taxAmount":1200,"classification":"middle"}"#.to_string()),
        );
        assert_eq!(context, Context::new());
        assert_eq!(
            reply,
            "Your estimated tax is $1200. Classification: middle. Would you like to calculate again?"
        );
    }

    #[test]
    fn test_complete_failure_keeps_context() {
        let held = awaiting_country(50000.0).with_country("ng".into());
        let (context, reply) = complete(
            held.clone(),
            Err(Error::Status {
                status: StatusCode::BAD_GATEWAY,
            }),
        );
        assert_eq!(context, held);
        assert!(reply.starts_with("Error: "), "got: {}", reply);
    }

    #[test]
    fn test_parse_income_plain_numbers() {
        assert_eq!(parse_income("50000"), Some(50000.0));
        assert_eq!(parse_income("  1234.56 "), Some(1234.56));
        assert_eq!(parse_income("+7"), Some(7.0));
        assert_eq!(parse_income(".5"), Some(0.5));
        assert_eq!(parse_income("5."), Some(5.0));
        assert_eq!(parse_income("1e3"), Some(1000.0));
    }

    #[test]
    fn test_parse_income_reads_leading_number_only() {
        assert_eq!(parse_income("50000 naira"), Some(50000.0));
        assert_eq!(parse_income("2e"), Some(2.0));
        assert_eq!(parse_income("3e+x"), Some(3.0));
        assert_eq!(parse_income("1,000"), Some(1.0));
    }

    #[test]
    fn test_parse_income_rejects_non_numbers() {
        assert_eq!(parse_income("$50000"), None);
        assert_eq!(parse_income("Infinity"), None);
        assert_eq!(parse_income("e5"), None);
        assert_eq!(parse_income("-100"), None);
    }
}
