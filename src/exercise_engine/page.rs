//! Page-level mounting and event routing.
//!
//! A [`Page`] plays the role of the document: it mounts every exercise found
//! in the authored markup, keeps the instances keyed by container, owns the
//! two drag sessions (one per drag family) and reads the clock on behalf of
//! the engines.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{MarkupError, Result};
use crate::exercise_engine::{
    config::EngineConfig,
    drag::DragSession,
    engines::{
        matching::MatchItems, order::OrderItems, select_all::SelectAll, sort::SortItems, Exercise,
    },
    markup::{ExerciseMarkup, PageMarkup},
    models::{ContainerId, ExerciseKind},
    timer::{Clock, Millis, SystemClock},
};

#[derive(Debug)]
pub enum ExerciseInstance {
    Order(OrderItems),
    Match(MatchItems),
    SelectAll(SelectAll),
    Sort(SortItems),
}

impl ExerciseInstance {
    pub fn as_exercise(&self) -> &dyn Exercise {
        match self {
            ExerciseInstance::Order(e)     => e,
            ExerciseInstance::Match(e)     => e,
            ExerciseInstance::SelectAll(e) => e,
            ExerciseInstance::Sort(e)      => e,
        }
    }

    pub fn as_exercise_mut(&mut self) -> &mut dyn Exercise {
        match self {
            ExerciseInstance::Order(e)     => e,
            ExerciseInstance::Match(e)     => e,
            ExerciseInstance::SelectAll(e) => e,
            ExerciseInstance::Sort(e)      => e,
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        self.as_exercise().kind()
    }
}

pub struct Page<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
    instances: Vec<ExerciseInstance>,
    index: HashMap<ContainerId, usize>,
    order_drag: DragSession,
    sort_drag: DragSession,
    skipped: Vec<MarkupError>,
    mount_count: usize,
}

impl Page<SystemClock> {
    /// Parse a page document and mount it against the system clock.
    pub fn load(doc: &str, config: EngineConfig) -> Result<Self> {
        Self::from_json(doc, config, SystemClock::new())
    }
}

impl<C: Clock> Page<C> {
    pub fn new(config: EngineConfig, clock: C) -> Self {
        Page {
            config,
            clock,
            instances: Vec::new(),
            index: HashMap::new(),
            order_drag: DragSession::new(),
            sort_drag: DragSession::new(),
            skipped: Vec::new(),
            mount_count: 0,
        }
    }

    pub fn from_json(doc: &str, config: EngineConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let markup = PageMarkup::from_json(doc)?;
        let mut page = Page::new(config, clock);
        page.mount(markup);
        Ok(page)
    }

    /// Mount every exercise in `markup`. Broken exercises are skipped and
    /// recorded; the return value is the number of new instances.
    pub fn mount(&mut self, markup: PageMarkup) -> usize {
        let mut mounted = 0;
        for exercise in markup.exercises {
            let kind = exercise.kind();
            match self.mount_one(exercise) {
                Ok(true) => mounted += 1,
                Ok(false) => {}
                Err(e) => {
                    info!(%kind, error = %e, "skipping exercise");
                    self.skipped.push(e);
                }
            }
        }
        mounted
    }

    /// Mount one exercise. `Ok(false)` means its container is already
    /// mounted and nothing was created.
    pub fn mount_one(&mut self, markup: ExerciseMarkup) -> std::result::Result<bool, MarkupError> {
        let container = ContainerId(markup.container().to_string());
        if self.index.contains_key(&container) {
            debug!(%container, "control panel already present, not mounting again");
            return Ok(false);
        }
        let now = self.clock.now_ms();
        let rng = self.config.rng_for(self.mount_count);
        self.mount_count += 1;

        let c = container.clone();
        let cfg = &self.config;
        let instance = match markup {
            ExerciseMarkup::OrderItems { list, .. } => {
                ExerciseInstance::Order(OrderItems::mount(c, list, cfg, rng, now)?)
            }
            ExerciseMarkup::MatchItems { items, .. } => {
                ExerciseInstance::Match(MatchItems::mount(c, items, cfg, rng, now)?)
            }
            ExerciseMarkup::SelectAll { list, .. } => {
                ExerciseInstance::SelectAll(SelectAll::mount(c, list, cfg, rng, now)?)
            }
            ExerciseMarkup::SortItems { answer_bank, buckets, .. } => {
                ExerciseInstance::Sort(SortItems::mount(c, answer_bank, buckets, cfg, rng, now)?)
            }
        };
        self.index.insert(container, self.instances.len());
        self.instances.push(instance);
        Ok(true)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    pub fn skipped(&self) -> &[MarkupError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances in mount order.
    pub fn instances(&self) -> impl Iterator<Item = &ExerciseInstance> {
        self.instances.iter()
    }

    pub fn get(&self, container: &ContainerId) -> Option<&ExerciseInstance> {
        self.index.get(container).map(|&i| &self.instances[i])
    }

    fn get_mut(&mut self, container: &ContainerId) -> Option<&mut ExerciseInstance> {
        let i = *self.index.get(container)?;
        self.instances.get_mut(i)
    }

    /// Tick every timer and run due feedback.
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();
        for instance in &mut self.instances {
            instance.as_exercise_mut().poll(now);
        }
    }

    pub fn reset(&mut self, container: &ContainerId) -> bool {
        let now = self.clock.now_ms();
        match self.get_mut(container) {
            Some(instance) => {
                instance.as_exercise_mut().reset(now);
                true
            }
            None => false,
        }
    }

    /// An Order Items instance together with the Order drag session.
    pub fn order_mut(&mut self, container: &ContainerId) -> Option<(&mut OrderItems, &mut DragSession)> {
        let i = *self.index.get(container)?;
        match self.instances.get_mut(i)? {
            ExerciseInstance::Order(e) => Some((e, &mut self.order_drag)),
            _ => None,
        }
    }

    /// A Sort Items instance together with the Sort drag session.
    pub fn sort_mut(&mut self, container: &ContainerId) -> Option<(&mut SortItems, &mut DragSession)> {
        let i = *self.index.get(container)?;
        match self.instances.get_mut(i)? {
            ExerciseInstance::Sort(e) => Some((e, &mut self.sort_drag)),
            _ => None,
        }
    }

    pub fn match_mut(&mut self, container: &ContainerId) -> Option<&mut MatchItems> {
        match self.get_mut(container)? {
            ExerciseInstance::Match(e) => Some(e),
            _ => None,
        }
    }

    pub fn select_all_mut(&mut self, container: &ContainerId) -> Option<&mut SelectAll> {
        match self.get_mut(container)? {
            ExerciseInstance::SelectAll(e) => Some(e),
            _ => None,
        }
    }

    pub fn order_drag(&self) -> &DragSession {
        &self.order_drag
    }

    pub fn sort_drag(&self) -> &DragSession {
        &self.sort_drag
    }
}
