//! Analysis prompt rendering

use crate::error::Result;
use crate::ticker::TickerSymbol;
use minijinja::{Environment, UndefinedBehavior, context};

/// Default outlook prompt; `{{ ticker }}` is replaced with the symbol
pub const DEFAULT_ANALYSIS_TEMPLATE: &str = "You are a financial analyst providing a brief, \
neutral summary for a stock dashboard. Analyze the stock with ticker {{ ticker }}, considering \
its recent performance, relevant news, and analyst ratings to summarize the investment outlook.\
\n\n\
Your response MUST follow these rules exactly:\n\
1. The output must be a single, plain text paragraph.\n\
2. Do NOT use any markdown (no headings, bolding, bullet points, italics, etc.).\n\
3. Do NOT include a title, preamble, or any conversational text like 'Here is the summary:'.\n\
4. The entire summary must be under 120 words.";

/// A compiled-once, validated analysis prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    source: String,
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

impl AnalysisPrompt {
    /// Validate a template source
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        environment().template_from_str(&source)?;
        Ok(Self { source })
    }

    /// Render the prompt for a ticker
    pub fn render(&self, ticker: &TickerSymbol) -> Result<String> {
        let rendered = environment().render_str(&self.source, context! { ticker => ticker.as_str() })?;
        Ok(rendered)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for AnalysisPrompt {
    fn default() -> Self {
        Self {
            source: DEFAULT_ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StockError;

    fn ticker(s: &str) -> TickerSymbol {
        TickerSymbol::parse(s).unwrap()
    }

    #[test]
    fn test_default_template_renders_ticker() {
        let prompt = AnalysisPrompt::default().render(&ticker("nvda")).unwrap();
        assert!(prompt.contains("Analyze the stock with ticker NVDA,"));
        assert!(prompt.contains("under 120 words"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_default_template_is_valid() {
        assert!(AnalysisPrompt::new(DEFAULT_ANALYSIS_TEMPLATE).is_ok());
    }

    #[test]
    fn test_custom_template() {
        let prompt = AnalysisPrompt::new("Summarize {{ ticker }} in one line.").unwrap();
        assert_eq!(
            prompt.render(&ticker("msft")).unwrap(),
            "Summarize MSFT in one line."
        );
    }

    #[test]
    fn test_syntax_error_rejected() {
        assert!(matches!(
            AnalysisPrompt::new("{% if %}"),
            Err(StockError::PromptError(_))
        ));
    }

    #[test]
    fn test_unknown_variable_fails_at_render() {
        let prompt = AnalysisPrompt::new("Analyze {{ symbol }}").unwrap();
        assert!(prompt.render(&ticker("AAPL")).is_err());
    }
}
