use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use crate::clients::gemini::GeminiClient;
use crate::errors::UpstreamError;

pub const QUOTE_INSTRUCTION: &str =
    "Generate a short, powerful fitness motivation quote (max 20 words). Return only the quote.";
pub const FALLBACK_QUOTE: &str = "Push yourself because no one else will!";

lazy_static! {
    static ref SURROUNDING_QUOTE: Regex = Regex::new(r#"^["'`]|["'`]$"#).unwrap();
}

/// Drops one quote character from each end of the model's answer.
pub fn clean_quote(text: &str) -> String {
    SURROUNDING_QUOTE.replace_all(text.trim(), "").trim().to_string()
}

pub async fn generate_motivation_quote(gemini: &GeminiClient) -> String {
    let result = gemini
        .generate_text(QUOTE_INSTRUCTION)
        .await
        .map(|text| clean_quote(&text))
        .and_then(|quote| if quote.is_empty() { Err(UpstreamError::EmptyResponse) } else { Ok(quote) });

    match result {
        Ok(quote) => quote,
        Err(err) => {
            warn!("Motivation quote failed: {}", err);
            FALLBACK_QUOTE.to_string()
        }
    }
}
