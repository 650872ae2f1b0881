//! Prompt text sent to the language model

/// System instruction for headline and post classification
///
/// The reply format is what [`crate::classifier::parse_reply`] expects.
pub const SENTIMENT_ANALYST_PROMPT: &str = "You are a financial analyst. \
Perform sentiment analysis on the following text. Provide the sentiment \
(Positive, Negative, Neutral), a sentiment score between -1 (negative) to +1 \
(positive), and a key highlight of the text.\n\
Reply in exactly three lines:\n\
Sentiment: <Positive|Negative|Neutral>\n\
Score: <number between -1 and 1>\n\
Highlight: <one sentence>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_field() {
        for keyword in ["Sentiment:", "Score:", "Highlight:"] {
            assert!(SENTIMENT_ANALYST_PROMPT.contains(keyword));
        }
        assert!(SENTIMENT_ANALYST_PROMPT.starts_with("You are a financial analyst."));
    }
}
