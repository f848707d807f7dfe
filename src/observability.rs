use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("ragchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("ragchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("ragchat.client.request_duration_seconds");

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("ragchat.chat.submissions");
pub(crate) static CHAT_REJECTED: Counter = Counter::new("ragchat.chat.rejected");
pub(crate) static CHAT_ERRORS: Counter = Counter::new("ragchat.chat.errors");

pub(crate) static REVEAL_CHARS: Counter = Counter::new("ragchat.reveal.chars");
pub(crate) static REVEAL_CANCELLED: Counter = Counter::new("ragchat.reveal.cancelled");

pub(crate) static UPLOADS: Counter = Counter::new("ragchat.uploads");
pub(crate) static UPLOAD_ERRORS: Counter = Counter::new("ragchat.upload_errors");
pub(crate) static UPLOAD_BYTES: Counter = Counter::new("ragchat.upload_bytes");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CHAT_SUBMISSIONS);
    collector.register_counter(&CHAT_REJECTED);
    collector.register_counter(&CHAT_ERRORS);

    collector.register_counter(&REVEAL_CHARS);
    collector.register_counter(&REVEAL_CANCELLED);

    collector.register_counter(&UPLOADS);
    collector.register_counter(&UPLOAD_ERRORS);
    collector.register_counter(&UPLOAD_BYTES);
}
