//! Shared helpers for integration tests.

use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;

use gangway::config::GangwayConfig;
use gangway::types::OutputChunk;

/// Config pointed at a mock server, with intervals small enough to keep
/// real-clock tests fast.
pub fn fast_config(base_url: &str) -> GangwayConfig {
    GangwayConfig {
        base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(2),
        join_timeout: Duration::from_secs(2),
        run_budget: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
        liveness_interval: Duration::from_millis(40),
        ..GangwayConfig::default()
    }
}

/// Drain a turn's output stream.
pub async fn collect_turn(stream: BoxStream<'static, OutputChunk>) -> Vec<OutputChunk> {
    stream.collect().await
}

/// Concatenate the text chunks of a turn.
pub fn joined_text(chunks: &[OutputChunk]) -> String {
    chunks
        .iter()
        .filter_map(OutputChunk::as_text)
        .collect::<Vec<_>>()
        .concat()
}

/// Every turn that opens a thinking block closes it exactly once, in order.
pub fn assert_thinking_well_formed(text: &str) {
    assert_eq!(
        text.matches("<thinking>").count(),
        1,
        "expected exactly one opening marker in: {text}"
    );
    assert_eq!(
        text.matches("</thinking>").count(),
        1,
        "expected exactly one closing marker in: {text}"
    );
    let open = text.find("<thinking>").expect("opening marker");
    let close = text.find("</thinking>").expect("closing marker");
    assert!(open < close, "thinking block closed before it opened");
}
