//! Background recipe loading
//!
//! The UI loop never awaits the network. Requests are handed to a background
//! task which runs each one on the `RecipeService` and reports back through a
//! tokio channel that the event loop drains between frames.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::cache::Batch;
use crate::data::RecipeDetail;
use crate::error::RecipeError;
use crate::service::{RecipeService, SimilarRecipes};

/// Work the UI asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// The random batch (served from cache when fresh)
    Batch { count: usize },
    /// Full details for one recipe
    Detail(u64),
    /// Recipes similar to one recipe
    Similar(u64),
    /// Free-text search
    Search { query: String, count: usize },
}

/// Messages sent from background loads to the main app
#[derive(Debug, Clone)]
pub enum LoadMessage {
    BatchLoaded(Result<Batch, RecipeError>),
    DetailLoaded {
        id: u64,
        result: Result<RecipeDetail, RecipeError>,
    },
    SimilarLoaded {
        id: u64,
        similar: SimilarRecipes,
    },
    SearchLoaded {
        query: String,
        result: Result<Batch, RecipeError>,
    },
}

/// Handle for submitting requests and receiving their results
pub struct Loader {
    requests: mpsc::UnboundedSender<LoadRequest>,
    /// Channel for receiving load results
    pub receiver: mpsc::Receiver<LoadMessage>,
}

impl Loader {
    /// Spawns the background task that serves requests with `service`
    ///
    /// Every request runs in its own task so a slow detail fetch never holds up
    /// the list; identical concurrent requests are collapsed by the service.
    pub fn spawn(service: Arc<RecipeService>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<LoadRequest>();
        let (msg_tx, msg_rx) = mpsc::channel(32);

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                debug!(?request, "load requested");
                let service = Arc::clone(&service);
                let tx = msg_tx.clone();
                tokio::spawn(async move {
                    let message = run(&service, request).await;
                    // The receiver is gone once the UI has quit
                    let _ = tx.send(message).await;
                });
            }
        });

        Self {
            requests: request_tx,
            receiver: msg_rx,
        }
    }

    /// Queues a request; results arrive on `receiver`
    pub fn request(&self, request: LoadRequest) {
        let _ = self.requests.send(request);
    }

    /// Returns a finished load without blocking, if any
    pub fn try_recv(&mut self) -> Option<LoadMessage> {
        self.receiver.try_recv().ok()
    }
}

async fn run(service: &RecipeService, request: LoadRequest) -> LoadMessage {
    match request {
        LoadRequest::Batch { count } => LoadMessage::BatchLoaded(service.get_random_recipes(count).await),
        LoadRequest::Detail(id) => LoadMessage::DetailLoaded {
            id,
            result: service.get_recipe_detail(id).await,
        },
        LoadRequest::Similar(id) => LoadMessage::SimilarLoaded {
            id,
            similar: service.get_similar_recipes(id).await,
        },
        LoadRequest::Search { query, count } => {
            let result = service.search_recipes(&query, count).await;
            LoadMessage::SearchLoaded { query, result }
        }
    }
}
