use thiserror::Error;

/// Failures talking to the document store. None of them are fatal to the view.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{resource}: store replied {status}: {body}")]
    Status {
        resource: &'static str,
        status: u16,
        body: String,
    },
    #[error("{resource}: could not decode response: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{resource}: expected an object or null, found {found}")]
    Shape {
        resource: &'static str,
        found: &'static str,
    },
}
