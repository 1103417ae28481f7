//! Checks applied to every request before it leaves the process.
//!
//! Both functions are pure: they never touch the network and return the
//! same result for the same input.

use crate::error::{Error, Violation};
use crate::message::{Message, Role};
use crate::params::SamplingParameters;

/// The maximum number of characters of all message contents combined,
/// counted in UTF-16 code units like the service does.
pub const MAX_TOTAL_CONTENT_CHARS: usize = 20_000;

/// Checks the structure of a conversation.
///
/// The first failing check is reported, in this order: emptiness, odd
/// length, role alternation (starting with [`Role::User`]), total content
/// length.
pub fn validate_messages(messages: &[Message]) -> Result<(), Error> {
    if messages.is_empty() {
        return Err(Violation::EmptyConversation.into());
    }
    if messages.len() % 2 == 0 {
        return Err(Violation::EvenLength(messages.len()).into());
    }

    for (idx, message) in messages.iter().enumerate() {
        let expected = Role::expected_at(idx);
        if message.role != expected {
            return Err(Violation::UnexpectedRole {
                position: idx + 1,
                expected,
            }
            .into());
        }
    }

    let total = messages
        .iter()
        .map(|message| message.content.encode_utf16().count())
        .sum();
    if total > MAX_TOTAL_CONTENT_CHARS {
        return Err(Violation::ContentTooLong {
            total,
            limit: MAX_TOTAL_CONTENT_CHARS,
        }
        .into());
    }

    Ok(())
}

/// Checks the sampling parameters against their ranges.
///
/// Only the first violation is reported, in the order `temperature`,
/// `top_p`, `penalty_score`, `max_output_tokens`.
pub fn validate_parameters(params: &SamplingParameters) -> Result<(), Error> {
    for (parameter, value) in params.values() {
        if !parameter.accepts(value) {
            return Err(Violation::OutOfRange { parameter, value }.into());
        }
    }
    Ok(())
}
