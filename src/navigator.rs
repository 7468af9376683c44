//! View switching and event dispatch.
//!
//! The navigator owns the session and the active view. Renders fetch without
//! holding the lock; a render that finishes after a newer `show` started is
//! dropped instead of overwriting the newer view.

use crate::api::ApiClient;
use crate::models::{LogMealRequest, Nutrient};
use crate::notifier::Notifier;
use crate::state::Session;
use crate::views::{self, Action, EventKind, UiEvent, ViewDescriptor, ViewId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const BACK_BUTTON_ID: &str = "back-button";
pub const GREETING: &str = "Hey there! I'm PANDA, your food tracking buddy 🐾";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    Rendered,
    /// The fetch failed; the previous view stays on screen.
    Aborted,
    /// A newer `show` started while this one was fetching.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "render", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No handler for the event in the active view.
    Ignored,
    Navigated(RenderOutcome),
    Selected,
    /// Local validation failed; nothing was sent.
    Rejected,
    /// Sent, accepted, and navigated home.
    Submitted(RenderOutcome),
    /// Sent but the backend call failed.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub back_visible: bool,
    pub message: String,
    pub view: Option<ViewDescriptor>,
}

#[derive(Debug, Default)]
struct Screen {
    session: Session,
    view: Option<ViewDescriptor>,
    back_visible: bool,
}

impl Screen {
    fn active(&self) -> Option<ViewId> {
        self.view.as_ref().map(|view| view.view)
    }

    /// Rebuild the active form view after its session state changed.
    fn refresh(&mut self) {
        let session = &self.session;
        let rebuilt = match self.active() {
            Some(ViewId::Log) => Some(views::log_meal::build(
                &session.foods,
                session.selection.as_ref(),
                session.submitting,
            )),
            Some(ViewId::Targets) => session
                .targets
                .as_ref()
                .map(|targets| {
                    views::targets::build(targets, &session.target_inputs, session.submitting)
                }),
            _ => None,
        };
        if let Some(view) = rebuilt {
            self.view = Some(view);
        }
    }

    fn finish_submission(&mut self) {
        self.session.submitting = false;
        self.refresh();
    }
}

/// Clears the in-flight flag if a submission future is dropped before its
/// reply arrives, e.g. when the shell's client disconnects.
struct SubmissionGuard {
    screen: Arc<Mutex<Screen>>,
    armed: bool,
}

impl SubmissionGuard {
    fn new(screen: &Arc<Mutex<Screen>>) -> Self {
        Self {
            screen: Arc::clone(screen),
            armed: true,
        }
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("submission dropped in flight, clearing in-flight flag");
        if let Ok(mut screen) = self.screen.try_lock() {
            screen.finish_submission();
            return;
        }
        let screen = Arc::clone(&self.screen);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                screen.lock().await.finish_submission();
            });
        }
    }
}

pub struct Navigator {
    api: ApiClient,
    notifier: Notifier,
    screen: Arc<Mutex<Screen>>,
    generation: AtomicU64,
}

impl Navigator {
    pub fn new(api_base: &str) -> Self {
        let notifier = Notifier::new();
        let api = ApiClient::new(api_base, notifier.clone());
        Self {
            api,
            notifier,
            screen: Arc::new(Mutex::new(Screen::default())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Greet, then load the home view.
    pub async fn start(&self) -> RenderOutcome {
        self.notifier.set_message(GREETING);
        self.show(ViewId::Home).await
    }

    pub async fn snapshot(&self) -> Snapshot {
        let screen = self.screen.lock().await;
        Snapshot {
            back_visible: screen.back_visible,
            message: self.notifier.message(),
            view: screen.view.clone(),
        }
    }

    pub async fn show(&self, view: ViewId) -> RenderOutcome {
        // the newest show owns the back control
        let generation = {
            let mut screen = self.screen.lock().await;
            screen.back_visible = view != ViewId::Home;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        info!(view = view.as_str(), generation, "showing view");

        match view {
            ViewId::Home => {
                let Some(summary) = self.api.get_summary().await else {
                    return RenderOutcome::Aborted;
                };
                self.install(generation, |_| views::home::build(&summary))
                    .await
            }
            ViewId::Log => {
                let Some(foods) = self.api.get_foods().await else {
                    return RenderOutcome::Aborted;
                };
                self.install(generation, |session| {
                    session.replace_foods(foods);
                    views::log_meal::build(&session.foods, None, session.submitting)
                })
                .await
            }
            ViewId::Summary => {
                let Some(summary) = self.api.get_summary().await else {
                    return RenderOutcome::Aborted;
                };
                self.install(generation, |_| views::summary::build(&summary))
                    .await
            }
            ViewId::Targets => {
                let Some(targets) = self.api.get_targets().await else {
                    return RenderOutcome::Aborted;
                };
                self.install(generation, |session| {
                    session.targets = Some(targets);
                    views::targets::build(&targets, &session.target_inputs, session.submitting)
                })
                .await
            }
        }
    }

    async fn install(
        &self,
        generation: u64,
        build: impl FnOnce(&mut Session) -> ViewDescriptor,
    ) -> RenderOutcome {
        let mut screen = self.screen.lock().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            debug!(generation, latest, "dropping stale render");
            return RenderOutcome::Superseded;
        }
        screen.session.clear_drafts();
        let built = build(&mut screen.session);
        // replacing the descriptor drops the previous view's bindings
        screen.view = Some(built);
        RenderOutcome::Rendered
    }

    pub async fn dispatch(&self, event: UiEvent) -> DispatchOutcome {
        let action = {
            let mut screen = self.screen.lock().await;

            if event.kind == EventKind::Click && event.target == BACK_BUTTON_ID {
                if !screen.back_visible {
                    debug!("back control is hidden, ignoring click");
                    return DispatchOutcome::Ignored;
                }
                None
            } else {
                let binding = screen
                    .view
                    .as_ref()
                    .and_then(|view| view.binding_for(&event.target, event.kind));
                let Some(binding) = binding else {
                    debug!(element = %event.target, kind = ?event.kind, "no handler for event");
                    return DispatchOutcome::Ignored;
                };
                let action = binding.action.clone();

                if let Action::SelectFood(name) = &action {
                    if screen.session.select_food(name).is_none() {
                        return DispatchOutcome::Ignored;
                    }
                    screen.refresh();
                    return DispatchOutcome::Selected;
                }
                Some(action)
            }
        };

        match action {
            None => DispatchOutcome::Navigated(self.show(ViewId::Home).await),
            Some(Action::Navigate(view)) => DispatchOutcome::Navigated(self.show(view).await),
            Some(Action::SubmitMeal) => self.submit_meal(&event.fields).await,
            Some(Action::SubmitTargets) => self.submit_targets(&event.fields).await,
            Some(Action::SelectFood(_)) => DispatchOutcome::Selected,
        }
    }

    async fn submit_meal(&self, fields: &BTreeMap<String, String>) -> DispatchOutcome {
        let (request, guard) = {
            let mut screen = self.screen.lock().await;
            if screen.session.submitting {
                debug!("meal submission already in flight");
                return DispatchOutcome::Ignored;
            }
            let Some(selection) = screen.session.selection.as_mut() else {
                warn!("meal submitted without a selection");
                self.notifier.set_message(views::log_meal::SELECT_FIRST);
                return DispatchOutcome::Rejected;
            };
            if let Some(raw) = fields.get(views::log_meal::AMOUNT_FIELD) {
                selection.amount = raw.clone();
            }
            let food_name = selection.name.clone();
            let parsed = views::log_meal::parse_amount(&selection.amount);

            match parsed {
                Ok(amount) => {
                    screen.session.submitting = true;
                    screen.refresh();
                    (
                        LogMealRequest { food_name, amount },
                        SubmissionGuard::new(&self.screen),
                    )
                }
                Err(err) => {
                    warn!(error = %err, "meal amount rejected");
                    self.notifier.set_message(err.to_string());
                    screen.refresh();
                    return DispatchOutcome::Rejected;
                }
            }
        };

        let reply = self.api.log_meal(&request).await;
        self.finish_submission(guard).await;

        match reply {
            Some(reply) => {
                info!(food = %request.food_name, amount = request.amount, "meal logged");
                self.notifier.set_message(reply.message);
                DispatchOutcome::Submitted(self.show(ViewId::Home).await)
            }
            None => DispatchOutcome::Failed,
        }
    }

    async fn submit_targets(&self, fields: &BTreeMap<String, String>) -> DispatchOutcome {
        let (targets, guard) = {
            let mut screen = self.screen.lock().await;
            if screen.session.submitting {
                debug!("targets submission already in flight");
                return DispatchOutcome::Ignored;
            }
            for nutrient in Nutrient::ALL {
                if let Some(raw) = fields.get(nutrient.key()) {
                    screen
                        .session
                        .target_inputs
                        .insert(nutrient.key().to_string(), raw.clone());
                }
            }
            match views::targets::parse_targets(fields, screen.session.targets.as_ref()) {
                Ok(targets) => {
                    screen.session.submitting = true;
                    screen.refresh();
                    (targets, SubmissionGuard::new(&self.screen))
                }
                Err(err) => {
                    warn!(error = %err, "targets rejected");
                    self.notifier.set_message(err.to_string());
                    screen.refresh();
                    return DispatchOutcome::Rejected;
                }
            }
        };

        let reply = self.api.set_targets(&targets).await;
        self.finish_submission(guard).await;

        match reply {
            Some(reply) => {
                info!(?targets, "targets saved");
                self.notifier.set_message(reply.message);
                DispatchOutcome::Submitted(self.show(ViewId::Home).await)
            }
            None => DispatchOutcome::Failed,
        }
    }

    async fn finish_submission(&self, mut guard: SubmissionGuard) {
        let mut screen = self.screen.lock().await;
        screen.finish_submission();
        guard.armed = false;
    }
}
