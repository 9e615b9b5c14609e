use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::{
    cache::{CacheEvent, CacheTag},
    config::default_avatar_url,
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationId},
    services::RecommendationsApi,
    view::{
        partition::Partition,
        render::{Badge, Control, ItemView, ListView, ReadyView, Tab},
        tracker::{ActionKind, ActionTracker},
    },
};

/// Which optional controls the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFeatures {
    pub delete: bool,
}

impl ListFeatures {
    /// Approve only
    pub const LIST_ONLY: Self = Self { delete: false };
    /// Approve and delete
    pub const WITH_DELETE: Self = Self { delete: true };
}

impl Default for ListFeatures {
    fn default() -> Self {
        Self::WITH_DELETE
    }
}

/// Result of the list query as seen by the view
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// First fetch has not completed yet
    Loading,
    Failed(String),
    Ready(Vec<Recommendation>),
}

/// How a moderator action ended. The view itself shows no difference;
/// failures are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    Failed,
}

struct ListState {
    query: QueryState,
    active_tab: Tab,
    actions: ActionTracker,
    /// Sequence number handed to the most recently started fetch
    last_started: u64,
    /// Sequence number of the fetch whose result `query` holds
    last_applied: u64,
}

/// The moderation list: pending and approved tabs over the fetched
/// recommendations, with per-item approve and delete controls.
///
/// Cloning is cheap and every clone shares the same state, so a snapshot can
/// be taken from one handle while another is awaiting a mutation.
#[derive(Clone)]
pub struct RecommendationsList {
    api: Arc<dyn RecommendationsApi>,
    features: ListFeatures,
    default_avatar_url: String,
    state: Arc<RwLock<ListState>>,
}

impl RecommendationsList {
    pub fn new(api: Arc<dyn RecommendationsApi>, features: ListFeatures) -> Self {
        Self {
            api,
            features,
            default_avatar_url: default_avatar_url(),
            state: Arc::new(RwLock::new(ListState {
                query: QueryState::Loading,
                active_tab: Tab::default(),
                actions: ActionTracker::default(),
                last_started: 0,
                last_applied: 0,
            })),
        }
    }

    pub fn with_default_avatar(mut self, url: impl Into<String>) -> Self {
        self.default_avatar_url = url.into();
        self
    }

    /// Initial fetch; served from the query cache when it is fresh
    pub async fn mount(&self) {
        tracing::debug!(backend = self.api.name(), "Mounting recommendations list");
        self.load(false).await;
    }

    /// Fetches the list from the backend again, bypassing the query cache.
    /// Previous data stays visible until the new result arrives; a failed
    /// fetch replaces it with the error state.
    pub async fn refetch(&self) {
        self.load(true).await;
    }

    /// Runs one list fetch. Results of fetches that started before the one
    /// currently shown are dropped, so the latest request always wins.
    async fn load(&self, force: bool) {
        let seq = {
            let mut state = self.state.write().await;
            state.last_started += 1;
            state.last_started
        };

        let result = if force {
            self.api.refetch().await
        } else {
            self.api.list().await
        };

        let mut state = self.state.write().await;
        if seq < state.last_applied {
            tracing::debug!(
                seq,
                last_applied = state.last_applied,
                "Dropping result of an outdated fetch"
            );
            return;
        }
        state.last_applied = seq;
        state.query = match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Recommendations list updated");
                QueryState::Ready(items)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load recommendations");
                QueryState::Failed(e.to_string())
            }
        };
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.state.write().await.active_tab = tab;
    }

    pub async fn query_state(&self) -> QueryState {
        self.state.read().await.query.clone()
    }

    /// Id currently tracked for an action kind, if any
    pub async fn in_flight(&self, kind: ActionKind) -> Option<RecommendationId> {
        self.state.read().await.actions.get(kind).current().cloned()
    }

    pub async fn approve(&self, id: RecommendationId) -> ActionOutcome {
        self.run_action(ActionKind::Approve, id).await
    }

    /// Fails only when the delete feature is off; request failures are
    /// reported through the outcome like approve.
    pub async fn delete(&self, id: RecommendationId) -> AppResult<ActionOutcome> {
        if !self.features.delete {
            return Err(AppError::FeatureDisabled("delete"));
        }
        Ok(self.run_action(ActionKind::Delete, id).await)
    }

    async fn run_action(&self, kind: ActionKind, id: RecommendationId) -> ActionOutcome {
        {
            let mut state = self.state.write().await;
            if let Some(previous) = state.actions.get_mut(kind).begin(id.clone()) {
                tracing::debug!(action = %kind, previous = %previous, id = %id, "Replacing in-flight item");
            }
        }

        let result = match kind {
            ActionKind::Approve => self.api.approve(&id).await,
            ActionKind::Delete => self.api.delete(&id).await,
        };

        self.state.write().await.actions.get_mut(kind).finish(&id);

        match result {
            Ok(()) => {
                self.refetch().await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                match kind {
                    ActionKind::Approve => tracing::error!(error = %e, id = %id, "Approval failed"),
                    ActionKind::Delete => tracing::error!(error = %e, id = %id, "Delete failed"),
                }
                ActionOutcome::Failed
            }
        }
    }

    /// Reloads the list whenever the recommendations tag is invalidated.
    ///
    /// Runs until the returned handle is aborted. The list's own client
    /// usually holds the cache that sends these events, so the channel does
    /// not close while the listener is alive. While it runs, a successful
    /// mutation costs two GETs: one from this listener and the forced
    /// refetch after the mutation.
    pub fn spawn_invalidation_listener(
        &self,
        mut events: broadcast::Receiver<CacheEvent>,
    ) -> JoinHandle<()> {
        let list = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(CacheEvent::Invalidated(CacheTag::Recommendations)) => {
                        tracing::debug!("Recommendations invalidated, reloading");
                        list.load(false).await;
                    }
                    Ok(CacheEvent::Stored(_)) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Invalidation listener lagged, refetching");
                        list.refetch().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Everything the view would draw right now
    pub async fn snapshot(&self) -> ListView {
        let state = self.state.read().await;

        let items = match &state.query {
            QueryState::Loading => return ListView::Loading,
            QueryState::Failed(_) => return ListView::Error,
            QueryState::Ready(items) => items,
        };

        let partition = Partition::new(items);
        let items = partition
            .tab(state.active_tab)
            .iter()
            .map(|rec| self.item_view(rec, &state.actions))
            .collect();

        ListView::Ready(ReadyView {
            active_tab: state.active_tab,
            pending_count: partition.count(Tab::Pending),
            approved_count: partition.count(Tab::Approved),
            items,
        })
    }

    fn item_view(&self, rec: &Recommendation, actions: &ActionTracker) -> ItemView {
        let control = |kind: ActionKind| {
            let busy = actions.is_busy(kind, &rec.id);
            Control {
                label: kind.label(),
                disabled: busy,
                busy,
            }
        };

        let approved = rec.is_approved();

        ItemView {
            id: rec.id.clone(),
            full_name: rec.full_name.clone(),
            profession: rec.profession.clone(),
            rating: rec.rating(),
            text: rec.recommendation.clone(),
            image_url: rec
                .image_url()
                .unwrap_or(self.default_avatar_url.as_str())
                .to_string(),
            badge: if approved { Badge::Approved } else { Badge::Pending },
            approve: (!approved).then(|| control(ActionKind::Approve)),
            delete: self.features.delete.then(|| control(ActionKind::Delete)),
        }
    }
}
