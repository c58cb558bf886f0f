//! Fixtures shared by unit tests

use crate::model::{PriceBar, PriceSeries, RatingRecord, RatingsSnapshot, StockInfo};
use crate::ticker::TickerSymbol;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use dash_llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message,
    MessageContent, Role, StopReason, TokenUsage,
};
use std::sync::Mutex;

pub fn ticker(raw: &str) -> TickerSymbol {
    TickerSymbol::parse(raw).unwrap()
}

pub fn sample_info(symbol: &str, current: f64, previous_close: f64) -> StockInfo {
    StockInfo {
        symbol: symbol.to_string(),
        long_name: format!("{symbol} Holdings Inc."),
        short_name: Some(symbol.to_string()),
        currency: Some("USD".to_string()),
        current_price: Some(current),
        previous_close: Some(previous_close),
        exchange: Some("NasdaqGS".to_string()),
        instrument_type: Some("EQUITY".to_string()),
    }
}

/// Daily bars starting 2024-01-02, one per close
pub fn sample_series(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close,
                volume: Some(1_000),
            })
            .collect(),
    )
}

pub fn sample_ratings() -> RatingsSnapshot {
    RatingsSnapshot::new(vec![
        RatingRecord {
            period: "2024-06-01".to_string(),
            strong_buy: 5,
            buy: 10,
            hold: 3,
            sell: 1,
            strong_sell: 0,
        },
        RatingRecord {
            period: "2024-05-01".to_string(),
            strong_buy: 4,
            buy: 9,
            hold: 5,
            sell: 2,
            strong_sell: 1,
        },
    ])
}

type Reply = Box<dyn Fn() -> dash_llm::Result<CompletionResponse> + Send + Sync>;

/// Scripted LLM provider that records every request it receives
pub struct FakeLlm {
    reply: Reply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeLlm {
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with_reply(move || Ok(response(Message::assistant(text.clone()))))
    }

    /// Replies with a message that carries no text block
    pub fn without_text() -> Self {
        Self::with_reply(|| {
            Ok(response(Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(vec![ContentBlock::Unsupported])),
            }))
        })
    }

    pub fn failing(error: fn() -> LLMError) -> Self {
        Self::with_reply(move || Err(error()))
    }

    fn with_reply(reply: impl Fn() -> dash_llm::Result<CompletionResponse> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn response(message: Message) -> CompletionResponse {
    CompletionResponse {
        message,
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 80,
            output_tokens: 40,
        },
    }
}

#[async_trait]
impl LLMProvider for FakeLlm {
    async fn complete(&self, request: CompletionRequest) -> dash_llm::Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        (self.reply)()
    }

    fn name(&self) -> &str {
        "fake-llm"
    }
}
